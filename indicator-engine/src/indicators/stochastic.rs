use common::{IndicatorCalculationDetail, Reading};
use serde::{Deserialize, Serialize};

use super::detail::{trailing, DetailBuilder};

/// Neutral %K / %D returned when there are not enough bars
pub const NEUTRAL_STOCHASTIC: f64 = 50.0;

/// %D as a fraction of %K.
///
/// A textbook %D is a 3-period SMA of %K, which would require keeping a
/// rolling %K series; only the latest %K is carried here.
const D_FACTOR: f64 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stochastic {
    pub k: f64,
    pub d: f64,
}

/// Highest high and lowest low over the trailing window
pub(crate) fn price_range(highs: &[f64], lows: &[f64], period: usize) -> (f64, f64) {
    let highest = trailing(highs, period)
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);
    let lowest = trailing(lows, period)
        .iter()
        .copied()
        .fold(f64::INFINITY, f64::min);
    (highest, lowest)
}

/// Stochastic oscillator tagged with whether the window was usable.
///
/// Fewer than `period` closes, or a flat high/low range, yields the
/// neutral 50/50 reading.
pub fn stochastic_reading(
    highs: &[f64],
    lows: &[f64],
    closes: &[f64],
    period: usize,
) -> Reading<Stochastic> {
    let neutral = Stochastic {
        k: NEUTRAL_STOCHASTIC,
        d: NEUTRAL_STOCHASTIC,
    };
    if period == 0 || closes.len() < period {
        return Reading::InsufficientData(neutral);
    }

    let (highest, lowest) = price_range(highs, lows, period);
    match from_range(closes[closes.len() - 1], highest, lowest) {
        Some(stoch) => Reading::Computed(stoch),
        None => Reading::InsufficientData(neutral),
    }
}

/// %K and %D for `close` within `[lowest, highest]`; `None` for a flat or
/// unbounded range
fn from_range(close: f64, highest: f64, lowest: f64) -> Option<Stochastic> {
    let range = highest - lowest;
    if range == 0.0 || !range.is_finite() {
        return None;
    }
    let k = (close - lowest) / range * 100.0;
    Some(Stochastic { k, d: k * D_FACTOR })
}

/// Calculate Stochastic %K and %D at the latest bar
pub fn calculate_stochastic(
    highs: &[f64],
    lows: &[f64],
    closes: &[f64],
    period: usize,
) -> Stochastic {
    stochastic_reading(highs, lows, closes, period).value()
}

fn interpret(k: f64) -> String {
    if k > 80.0 {
        format!("%K {:.2} is above 80 - overbought, consider selling", k)
    } else if k < 20.0 {
        format!("%K {:.2} is below 20 - oversold, consider buying", k)
    } else {
        format!("%K {:.2} is between 20 and 80 - neutral momentum", k)
    }
}

/// Stochastic %K with the high/low range spelled out; `result` is %K
pub fn calculate_stochastic_with_details(
    highs: &[f64],
    lows: &[f64],
    closes: &[f64],
    period: usize,
) -> IndicatorCalculationDetail {
    let mut detail = DetailBuilder::new(
        "%K = (Close - Lowest Low) / (Highest High - Lowest Low) × 100, %D = %K × 0.9",
    );
    detail.var("Period (n)", period);

    if period == 0 || closes.len() < period {
        detail
            .var("Available bars", closes.len())
            .step(format!(
                "Insufficient data: need {} bars, have {}",
                period,
                closes.len()
            ))
            .step(format!("%K and %D default to {}", NEUTRAL_STOCHASTIC));
        return detail.finish(
            NEUTRAL_STOCHASTIC,
            "Not enough data to calculate Stochastic - assuming neutral momentum",
        );
    }

    let (highest, lowest) = price_range(highs, lows, period);
    let close = closes[closes.len() - 1];
    detail
        .var("Current close", close)
        .var("Highest high", highest)
        .var("Lowest low", lowest)
        .step(format!("Highest high over {} bars = {:.2}", period, highest))
        .step(format!("Lowest low over {} bars = {:.2}", period, lowest));

    let Some(stoch) = from_range(close, highest, lowest) else {
        detail.step(format!(
            "High/low range is zero - %K defaults to {}",
            NEUTRAL_STOCHASTIC
        ));
        return detail.finish(
            NEUTRAL_STOCHASTIC,
            "Price range is flat - no momentum reading",
        );
    };

    detail
        .var("%K", stoch.k)
        .var("%D", stoch.d)
        .step(format!(
            "%K = ({:.2} - {:.2}) / ({:.2} - {:.2}) × 100 = {:.2}",
            close, lowest, highest, lowest, stoch.k
        ))
        .step(format!("%D = {:.2} × 0.9 = {:.2}", stoch.k, stoch.d));

    detail.finish(stoch.k, interpret(stoch.k))
}
