use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use indicator_engine::data::SAMPLE_SYMBOL;
use indicator_engine::{
    analyze_bars, analyze_batch, generate_synthetic_bars, load_file, sample_bars,
    AnalysisParameters, Bar, StockAnalysis,
};

#[derive(Parser, Debug)]
#[command(name = "indicator-engine")]
#[command(version = "0.1.0")]
#[command(about = "Technical indicator analysis for daily stock prices", long_about = None)]
struct Args {
    /// Data file path (CSV/JSON); repeat for batch analysis.
    /// Without files, the built-in FPT.VN sample is analysed.
    #[arg(short = 'f', long)]
    data_file: Vec<PathBuf>,

    /// Symbol label (defaults to the file stem or the configured symbol)
    #[arg(short, long)]
    symbol: Option<String>,

    /// Analyse N days of synthetic data instead of a file
    #[arg(long)]
    synthetic_days: Option<usize>,

    /// Initial price for synthetic data
    #[arg(long, default_value = "90000")]
    initial_price: f64,

    /// JSON parameter file
    #[arg(long)]
    config: Option<PathBuf>,

    /// RSI period
    #[arg(long)]
    rsi_period: Option<usize>,

    /// Bollinger Bands period
    #[arg(long)]
    bollinger_period: Option<usize>,

    /// Stochastic oscillator period
    #[arg(long)]
    stochastic_period: Option<usize>,

    /// Williams %R period
    #[arg(long)]
    williams_period: Option<usize>,

    /// Skip Stochastic %K and Williams %R
    #[arg(long)]
    no_oscillators: bool,

    /// Output format (json, text)
    #[arg(short, long, default_value = "json")]
    output: String,

    /// Pretty print JSON output
    #[arg(long)]
    pretty: bool,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level);

    let params = build_parameters(&args)?;

    let analyses = if args.data_file.len() > 1 {
        run_batch(&args.data_file, &params)?
    } else {
        let (symbol, bars) = load_single(&args, &params)?;
        info!(symbol = %symbol, bars = bars.len(), "running analysis");
        vec![analyze_bars(&symbol, &bars, &params)?]
    };

    match args.output.as_str() {
        "json" => print_json(&analyses, args.pretty)?,
        "text" => analyses.iter().for_each(print_text_report),
        other => {
            warn!(format = other, "unknown output format, using text");
            analyses.iter().for_each(print_text_report);
        }
    }

    Ok(())
}

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_parameters(args: &Args) -> Result<AnalysisParameters> {
    let mut params = match &args.config {
        Some(path) => AnalysisParameters::from_json_file(path)
            .with_context(|| format!("loading parameters from {:?}", path))?,
        None => AnalysisParameters::default(),
    };

    if let Some(period) = args.rsi_period {
        params = params.with_rsi_period(period);
    }
    if let Some(period) = args.bollinger_period {
        params = params.with_bollinger_period(period);
    }
    if let Some(period) = args.stochastic_period {
        params = params.with_stochastic_period(period);
    }
    if let Some(period) = args.williams_period {
        params = params.with_williams_period(period);
    }
    if args.no_oscillators {
        params = params.without_oscillators();
    }

    params.validate()?;
    Ok(params)
}

fn file_symbol(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("UNKNOWN")
        .to_uppercase()
}

fn load_single(args: &Args, params: &AnalysisParameters) -> Result<(String, Vec<Bar>)> {
    if let Some(path) = args.data_file.first() {
        info!(path = ?path, "loading data");
        let bars = load_file(path).with_context(|| format!("loading {:?}", path))?;
        let symbol = args.symbol.clone().unwrap_or_else(|| file_symbol(path));
        return Ok((symbol, bars));
    }

    if let Some(days) = args.synthetic_days {
        info!(
            days,
            initial_price = args.initial_price,
            "generating synthetic data"
        );
        let symbol = args.symbol.clone().unwrap_or_else(|| params.symbol.clone());
        return Ok((symbol, generate_synthetic_bars(days, args.initial_price)));
    }

    info!("no data file given, using the built-in sample");
    let symbol = args.symbol.clone().unwrap_or_else(|| SAMPLE_SYMBOL.to_string());
    Ok((symbol, sample_bars(Utc::now())))
}

fn run_batch(paths: &[PathBuf], params: &AnalysisParameters) -> Result<Vec<StockAnalysis>> {
    let mut inputs = Vec::with_capacity(paths.len());
    for path in paths {
        match load_file(path) {
            Ok(bars) => inputs.push((file_symbol(path), bars)),
            Err(e) => error!(path = ?path, error = %e, "failed to load data file"),
        }
    }

    let analyses: Vec<StockAnalysis> = analyze_batch(&inputs, params)
        .into_iter()
        .filter_map(|r| r.ok())
        .collect();

    if analyses.is_empty() {
        bail!("no data file could be analysed");
    }
    Ok(analyses)
}

fn print_json(analyses: &[StockAnalysis], pretty: bool) -> Result<()> {
    let json = match analyses {
        [single] if pretty => serde_json::to_string_pretty(single)?,
        [single] => serde_json::to_string(single)?,
        many if pretty => serde_json::to_string_pretty(many)?,
        many => serde_json::to_string(many)?,
    };
    println!("{}", json);
    Ok(())
}

fn print_text_report(analysis: &StockAnalysis) {
    let bundle = &analysis.bundle;

    println!();
    println!("================================================================");
    println!("  TECHNICAL ANALYSIS - {}", analysis.symbol);
    println!("================================================================");
    println!();
    println!("  Period: {}", analysis.period);
    println!("  Bars:   {}", analysis.bars);
    println!();
    println!("----------------------------------------------------------------");
    println!("  INDICATORS");
    println!("----------------------------------------------------------------");
    for indicator in &bundle.indicators {
        let marker = if bundle.is_fallback(indicator.kind) {
            " (insufficient data)"
        } else {
            ""
        };
        println!(
            "  {:<16} {:>14.2}  {:<5}{}",
            indicator.name(),
            indicator.value,
            indicator.signal,
            marker
        );
        println!("      {}", indicator.recommendation);
    }
    println!();
    println!("----------------------------------------------------------------");
    println!("  SUMMARY");
    println!("----------------------------------------------------------------");
    let s = &bundle.summary;
    println!("  SMA20:            {:>14.2}", s.sma20);
    println!("  SMA50:            {:>14.2}", s.sma50);
    println!("  EMA12:            {:>14.2}", s.ema12);
    println!("  EMA26:            {:>14.2}", s.ema26);
    println!("  RSI:              {:>14.2}", s.rsi);
    println!("  MACD:             {:>14.4}", s.macd);
    println!("  MACD Signal:      {:>14.4}", s.macd_signal);
    println!("  Bollinger Upper:  {:>14.2}", s.bollinger.upper);
    println!("  Bollinger Middle: {:>14.2}", s.bollinger.middle);
    println!("  Bollinger Lower:  {:>14.2}", s.bollinger.lower);
    println!();
    println!("================================================================");
}
