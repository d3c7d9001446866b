use chrono::Utc;
use common::{
    AnalysisError, AnalysisParameters, Bar, IndicatorBundle, IndicatorCalculationDetail,
    IndicatorCalculationSummary, IndicatorKind, OhlcSeries, Result, StockAnalysis, Signal,
    TechnicalIndicator,
};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::indicators::{
    bollinger_reading, calculate_bollinger_with_details, calculate_ema, calculate_macd,
    calculate_macd_with_details, calculate_rsi_with_details, calculate_sma_with_details,
    calculate_stochastic_with_details, calculate_williams_r_with_details, lower_band_detail,
    rsi_reading, sma_reading, stochastic_reading, williams_r_reading,
};
use crate::signals::{classify_signal, description, recommendation};

/// Build an indicator record from a detail, classifying its result
fn indicator_from_detail(
    kind: IndicatorKind,
    detail: IndicatorCalculationDetail,
    prices: &[f64],
) -> TechnicalIndicator {
    let value = detail.result;
    let signal = classify_signal(kind, value, prices);
    TechnicalIndicator {
        kind,
        value,
        signal,
        description: description(kind).to_string(),
        recommendation: recommendation(signal, kind).to_string(),
        formula: Some(detail.formula.clone()),
        calculation: Some(detail),
    }
}

fn band_indicator(
    kind: IndicatorKind,
    value: f64,
    recommendation: String,
    detail: IndicatorCalculationDetail,
) -> TechnicalIndicator {
    TechnicalIndicator {
        kind,
        value,
        signal: Signal::Hold,
        description: description(kind).to_string(),
        recommendation,
        formula: Some(detail.formula.clone()),
        calculation: Some(detail),
    }
}

/// Compute the default indicator bundle with default parameters
///
/// # Errors
/// `AnalysisError::EmptySeries` when `prices` is empty
pub fn compute_indicator_bundle(prices: &[f64]) -> Result<IndicatorBundle> {
    compute_indicator_bundle_with(prices, &AnalysisParameters::default())
}

/// Compute SMA20, SMA50, RSI, MACD and both Bollinger bands over a close
/// series, in that order, plus the flat summary for chart overlays.
///
/// # Errors
/// `AnalysisError::EmptySeries` when `prices` is empty
pub fn compute_indicator_bundle_with(
    prices: &[f64],
    params: &AnalysisParameters,
) -> Result<IndicatorBundle> {
    if prices.is_empty() {
        return Err(AnalysisError::EmptySeries);
    }

    let sma20 = sma_reading(prices, 20);
    let sma50 = sma_reading(prices, 50);
    let ema12 = calculate_ema(prices, 12);
    let ema26 = calculate_ema(prices, 26);
    let rsi = rsi_reading(prices, params.rsi_period);
    let macd = calculate_macd(prices);
    let bollinger = bollinger_reading(prices, params.bollinger_period);

    let summary = IndicatorCalculationSummary {
        sma20: sma20.value(),
        sma50: sma50.value(),
        ema12,
        ema26,
        rsi: rsi.value(),
        macd: macd.macd,
        macd_signal: macd.signal,
        bollinger: bollinger.value(),
    };

    let mut fallbacks = Vec::new();
    if !sma20.is_computed() {
        fallbacks.push(IndicatorKind::Sma20);
    }
    if !sma50.is_computed() {
        fallbacks.push(IndicatorKind::Sma50);
    }
    if !rsi.is_computed() {
        fallbacks.push(IndicatorKind::Rsi);
    }
    if !bollinger.is_computed() {
        fallbacks.push(IndicatorKind::BollingerUpper);
        fallbacks.push(IndicatorKind::BollingerLower);
    }

    let bands = summary.bollinger;
    let upper_detail = calculate_bollinger_with_details(prices, params.bollinger_period);
    let lower_detail = lower_band_detail(&upper_detail, bands.lower);

    let indicators = vec![
        indicator_from_detail(
            IndicatorKind::Sma20,
            calculate_sma_with_details(prices, 20),
            prices,
        ),
        indicator_from_detail(
            IndicatorKind::Sma50,
            calculate_sma_with_details(prices, 50),
            prices,
        ),
        indicator_from_detail(
            IndicatorKind::Rsi,
            calculate_rsi_with_details(prices, params.rsi_period),
            prices,
        ),
        indicator_from_detail(IndicatorKind::Macd, calculate_macd_with_details(prices), prices),
        band_indicator(
            IndicatorKind::BollingerUpper,
            bands.upper,
            format!("Upper resistance at {:.2}", bands.upper),
            upper_detail,
        ),
        band_indicator(
            IndicatorKind::BollingerLower,
            bands.lower,
            format!("Lower support at {:.2}", bands.lower),
            lower_detail,
        ),
    ];

    debug!(
        prices = prices.len(),
        indicators = indicators.len(),
        "computed indicator bundle"
    );
    if !fallbacks.is_empty() {
        debug!(?fallbacks, "insufficient data for some indicators");
    }

    Ok(IndicatorBundle {
        indicators,
        summary,
        fallbacks,
    })
}

/// Indicator bundle over the closes, followed by Stochastic %K and
/// Williams %R computed from the full OHLC series.
///
/// # Errors
/// `AnalysisError::EmptySeries` when the series has no closes
pub fn compute_full_analysis(
    series: &OhlcSeries,
    params: &AnalysisParameters,
) -> Result<IndicatorBundle> {
    let mut bundle = compute_indicator_bundle_with(&series.closes, params)?;
    if !params.include_oscillators {
        return Ok(bundle);
    }

    let OhlcSeries {
        highs,
        lows,
        closes,
    } = series;

    let stochastic =
        calculate_stochastic_with_details(highs, lows, closes, params.stochastic_period);
    if !stochastic_reading(highs, lows, closes, params.stochastic_period).is_computed() {
        bundle.fallbacks.push(IndicatorKind::StochasticK);
    }
    bundle
        .indicators
        .push(oscillator_indicator(IndicatorKind::StochasticK, stochastic, closes));

    let williams = calculate_williams_r_with_details(highs, lows, closes, params.williams_period);
    if !williams_r_reading(highs, lows, closes, params.williams_period).is_computed() {
        bundle.fallbacks.push(IndicatorKind::WilliamsR);
    }
    bundle
        .indicators
        .push(oscillator_indicator(IndicatorKind::WilliamsR, williams, closes));

    Ok(bundle)
}

/// Oscillator records recommend their own interpretation
fn oscillator_indicator(
    kind: IndicatorKind,
    detail: IndicatorCalculationDetail,
    prices: &[f64],
) -> TechnicalIndicator {
    TechnicalIndicator {
        recommendation: detail.interpretation.clone(),
        ..indicator_from_detail(kind, detail, prices)
    }
}

/// "<first date> to <last date>" for a bar series
fn period_label(bars: &[Bar]) -> String {
    match (bars.first(), bars.last()) {
        (Some(first), Some(last)) => format!(
            "{} to {}",
            first.timestamp.format("%Y-%m-%d"),
            last.timestamp.format("%Y-%m-%d")
        ),
        _ => String::new(),
    }
}

/// Analyse one symbol's bars
pub fn analyze_bars(
    symbol: &str,
    bars: &[Bar],
    params: &AnalysisParameters,
) -> Result<StockAnalysis> {
    let bundle = compute_full_analysis(&OhlcSeries::from_bars(bars), params)?;
    Ok(StockAnalysis {
        symbol: symbol.to_string(),
        period: period_label(bars),
        bars: bars.len(),
        bundle,
    })
}

/// Analyse many symbols in parallel; results keep the input order
pub fn analyze_batch(
    inputs: &[(String, Vec<Bar>)],
    params: &AnalysisParameters,
) -> Vec<Result<StockAnalysis>> {
    let started = Utc::now();
    let results: Vec<Result<StockAnalysis>> = inputs
        .par_iter()
        .map(|(symbol, bars)| {
            let result = analyze_bars(symbol, bars, params);
            if let Err(e) = &result {
                warn!(symbol = %symbol, error = %e, "analysis failed");
            }
            result
        })
        .collect();

    info!(
        symbols = inputs.len(),
        failed = results.iter().filter(|r| r.is_err()).count(),
        elapsed_ms = (Utc::now() - started).num_milliseconds(),
        "batch analysis complete"
    );

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{Duration, TimeZone};

    fn rising(n: usize) -> Vec<f64> {
        (0..n).map(|i| 100.0 + i as f64).collect()
    }

    fn bars_from_closes(closes: &[f64]) -> Vec<Bar> {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                Bar::new(start + Duration::days(i as i64), c, c + 1.0, c - 1.0, c, 1_000)
            })
            .collect()
    }

    #[test]
    fn test_empty_series_fails() {
        let err = compute_indicator_bundle(&[]).unwrap_err();
        assert!(matches!(err, AnalysisError::EmptySeries));
        assert_eq!(err.to_string(), "No price data available");
    }

    #[test]
    fn test_single_price_bundle() {
        let bundle = compute_indicator_bundle(&[100.0]).unwrap();

        assert_eq!(bundle.summary.sma20, 0.0);
        assert_eq!(bundle.summary.sma50, 0.0);
        assert_eq!(bundle.summary.rsi, 50.0);
        assert_eq!(bundle.summary.ema12, 100.0);
        assert_eq!(bundle.summary.macd, 0.0);
        assert!(bundle.is_fallback(IndicatorKind::Sma20));
        assert!(bundle.is_fallback(IndicatorKind::Rsi));
        assert!(!bundle.is_fallback(IndicatorKind::Macd));
    }

    #[test]
    fn test_bundle_order() {
        let bundle = compute_indicator_bundle(&rising(60)).unwrap();
        let kinds: Vec<IndicatorKind> = bundle.indicators.iter().map(|i| i.kind).collect();
        assert_eq!(
            kinds,
            vec![
                IndicatorKind::Sma20,
                IndicatorKind::Sma50,
                IndicatorKind::Rsi,
                IndicatorKind::Macd,
                IndicatorKind::BollingerUpper,
                IndicatorKind::BollingerLower,
            ]
        );
        assert!(bundle.fallbacks.is_empty());
    }

    #[test]
    fn test_bundle_signals_for_uptrend() {
        let bundle = compute_indicator_bundle(&rising(60)).unwrap();

        let sma20 = bundle.get(IndicatorKind::Sma20).unwrap();
        assert_eq!(sma20.signal, Signal::Buy);
        assert!(sma20.recommendation.contains("upward momentum"));

        let rsi = bundle.get(IndicatorKind::Rsi).unwrap();
        assert_eq!(rsi.value, 100.0);
        assert_eq!(rsi.signal, Signal::Sell);

        let macd = bundle.get(IndicatorKind::Macd).unwrap();
        assert_eq!(macd.signal, Signal::Buy);
        assert_relative_eq!(bundle.summary.macd_signal, bundle.summary.macd * 0.9);
    }

    #[test]
    fn test_bollinger_lower_derivation() {
        let prices: Vec<f64> = (0..30).map(|i| 100.0 + (i % 5) as f64).collect();
        let bundle = compute_indicator_bundle(&prices).unwrap();
        let bands = bundle.summary.bollinger;

        let upper = bundle.get(IndicatorKind::BollingerUpper).unwrap();
        let lower = bundle.get(IndicatorKind::BollingerLower).unwrap();
        let upper_calc = upper.calculation.as_ref().unwrap();
        let lower_calc = lower.calculation.as_ref().unwrap();

        assert_relative_eq!(upper_calc.result, bands.upper);
        assert_relative_eq!(lower_calc.result, bands.lower);
        assert_eq!(lower_calc.steps, upper_calc.steps);
        assert!(lower_calc.interpretation.contains("lower band"));
        assert_eq!(lower.signal, Signal::Hold);
        assert_eq!(lower.recommendation, format!("Lower support at {:.2}", bands.lower));
        assert_eq!(upper.recommendation, format!("Upper resistance at {:.2}", bands.upper));
    }

    #[test]
    fn test_bundle_is_deterministic() {
        let prices: Vec<f64> = (0..45).map(|i| 50.0 + ((i * 7) % 11) as f64).collect();
        let first = compute_indicator_bundle(&prices).unwrap();
        let second = compute_indicator_bundle(&prices).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_params_change_rsi_period() {
        let prices = rising(10);
        let default = compute_indicator_bundle(&prices).unwrap();
        let short = compute_indicator_bundle_with(
            &prices,
            &AnalysisParameters::default().with_rsi_period(5),
        )
        .unwrap();

        assert_eq!(default.summary.rsi, 50.0);
        assert_eq!(short.summary.rsi, 100.0);
    }

    #[test]
    fn test_full_analysis_appends_oscillators() {
        let bars = bars_from_closes(&rising(30));
        let series = OhlcSeries::from_bars(&bars);
        let bundle = compute_full_analysis(&series, &AnalysisParameters::default()).unwrap();

        assert_eq!(bundle.indicators.len(), 8);
        let stoch = &bundle.indicators[6];
        let williams = &bundle.indicators[7];
        assert_eq!(stoch.kind, IndicatorKind::StochasticK);
        assert_eq!(williams.kind, IndicatorKind::WilliamsR);
        assert_eq!(
            stoch.recommendation,
            stoch.calculation.as_ref().unwrap().interpretation
        );
        // close sits 1 below the top of the window
        assert_eq!(stoch.signal, Signal::Sell);
        assert_eq!(williams.signal, Signal::Sell);
    }

    #[test]
    fn test_full_analysis_without_oscillators() {
        let series = OhlcSeries::from_bars(&bars_from_closes(&rising(30)));
        let params = AnalysisParameters::default().without_oscillators();
        let bundle = compute_full_analysis(&series, &params).unwrap();
        assert_eq!(bundle.indicators.len(), 6);
    }

    #[test]
    fn test_full_analysis_empty_series() {
        let result = compute_full_analysis(&OhlcSeries::default(), &AnalysisParameters::default());
        assert!(matches!(result, Err(AnalysisError::EmptySeries)));
    }

    #[test]
    fn test_analyze_batch_keeps_order_and_isolates_failures() {
        let inputs = vec![
            ("AAA".to_string(), bars_from_closes(&rising(30))),
            ("EMPTY".to_string(), Vec::new()),
            ("BBB".to_string(), bars_from_closes(&rising(5))),
        ];
        let results = analyze_batch(&inputs, &AnalysisParameters::default());

        assert_eq!(results.len(), 3);
        let first = results[0].as_ref().unwrap();
        assert_eq!(first.symbol, "AAA");
        assert_eq!(first.bars, 30);
        assert_eq!(first.period, "2024-01-01 to 2024-01-30");
        assert!(results[1].is_err());
        assert_eq!(results[2].as_ref().unwrap().symbol, "BBB");
    }
}
