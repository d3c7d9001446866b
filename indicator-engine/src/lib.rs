pub mod analysis;
pub mod data;
pub mod indicators;
pub mod signals;

pub use analysis::{
    analyze_bars, analyze_batch, compute_full_analysis, compute_indicator_bundle,
    compute_indicator_bundle_with,
};
pub use data::{generate_synthetic_bars, load_file, sample_bars, sample_series};
pub use signals::{classify_signal, classify_signal_by_name};

// Re-export common types
pub use common::{
    AnalysisError, AnalysisParameters, Bar, BollingerBands, IndicatorBundle,
    IndicatorCalculationDetail, IndicatorCalculationSummary, IndicatorKind, OhlcSeries, Reading,
    Result, Signal, StockAnalysis, TechnicalIndicator, VariableValue, Variables,
};
