use common::IndicatorCalculationDetail;
use serde::{Deserialize, Serialize};

use super::detail::DetailBuilder;
use super::ema::calculate_ema;

pub const FAST_PERIOD: usize = 12;
pub const SLOW_PERIOD: usize = 26;

/// Signal line as a fraction of the MACD line.
///
/// A textbook signal line is a 9-period EMA of the MACD history, which would
/// require keeping a rolling MACD series; only the latest MACD is carried here.
const SIGNAL_FACTOR: f64 = 0.9;

/// MACD line and its simplified signal line
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Macd {
    pub macd: f64,
    pub signal: f64,
}

impl Macd {
    pub fn histogram(&self) -> f64 {
        self.macd - self.signal
    }
}

/// Calculate MACD as EMA12 - EMA26 with signal = MACD × 0.9
pub fn calculate_macd(prices: &[f64]) -> Macd {
    let macd = calculate_ema(prices, FAST_PERIOD) - calculate_ema(prices, SLOW_PERIOD);
    Macd {
        macd,
        signal: macd * SIGNAL_FACTOR,
    }
}

pub fn calculate_macd_with_details(prices: &[f64]) -> IndicatorCalculationDetail {
    let ema12 = calculate_ema(prices, FAST_PERIOD);
    let ema26 = calculate_ema(prices, SLOW_PERIOD);
    let Macd { macd, signal } = calculate_macd(prices);
    let histogram = macd - signal;

    let mut detail = DetailBuilder::new(
        "MACD = EMA12 - EMA26, Signal = MACD × 0.9, Histogram = MACD - Signal",
    );
    detail
        .var("EMA12", ema12)
        .var("EMA26", ema26)
        .var("MACD", macd)
        .var("Signal", signal)
        .var("Histogram", histogram)
        .step(format!("EMA12 = {:.2}", ema12))
        .step(format!("EMA26 = {:.2}", ema26))
        .step(format!("MACD = {:.2} - {:.2} = {:.4}", ema12, ema26, macd))
        .step(format!("Signal = {:.4} × 0.9 = {:.4}", macd, signal))
        .step(format!("Histogram = {:.4} - {:.4} = {:.4}", macd, signal, histogram));

    let momentum = if macd > signal {
        "MACD is above the signal line - bullish momentum"
    } else {
        "MACD is below the signal line - bearish momentum"
    };
    let trend = if macd > 0.0 {
        "MACD above zero - uptrend"
    } else {
        "MACD below zero - downtrend"
    };

    detail.finish(macd, format!("{}; {}", momentum, trend))
}
