use common::{IndicatorCalculationDetail, Reading};

use super::detail::DetailBuilder;
use super::stochastic::price_range;

/// Neutral %R returned when there are not enough bars
pub const NEUTRAL_WILLIAMS_R: f64 = -50.0;

/// Williams %R tagged with whether the window was usable
pub fn williams_r_reading(
    highs: &[f64],
    lows: &[f64],
    closes: &[f64],
    period: usize,
) -> Reading<f64> {
    if period == 0 || closes.len() < period {
        return Reading::InsufficientData(NEUTRAL_WILLIAMS_R);
    }

    let (highest, lowest) = price_range(highs, lows, period);
    match from_range(closes[closes.len() - 1], highest, lowest) {
        Some(r) => Reading::Computed(r),
        None => Reading::InsufficientData(NEUTRAL_WILLIAMS_R),
    }
}

/// %R for `close` within `[lowest, highest]`; `None` for a flat or
/// unbounded range
fn from_range(close: f64, highest: f64, lowest: f64) -> Option<f64> {
    let range = highest - lowest;
    if range == 0.0 || !range.is_finite() {
        return None;
    }
    Some((highest - close) / range * -100.0)
}

/// Calculate Williams %R at the latest bar
///
/// # Returns
/// %R in -100..=0; -50.0 when fewer than `period` bars are available
pub fn calculate_williams_r(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> f64 {
    williams_r_reading(highs, lows, closes, period).value()
}

fn interpret(r: f64) -> String {
    if r > -20.0 {
        format!("%R {:.2} is above -20 - overbought, consider selling", r)
    } else if r < -80.0 {
        format!("%R {:.2} is below -80 - oversold, consider buying", r)
    } else {
        format!("%R {:.2} is between -80 and -20 - neutral momentum", r)
    }
}

pub fn calculate_williams_r_with_details(
    highs: &[f64],
    lows: &[f64],
    closes: &[f64],
    period: usize,
) -> IndicatorCalculationDetail {
    let mut detail =
        DetailBuilder::new("%R = (Highest High - Close) / (Highest High - Lowest Low) × -100");
    detail.var("Period (n)", period);

    if period == 0 || closes.len() < period {
        detail
            .var("Available bars", closes.len())
            .step(format!(
                "Insufficient data: need {} bars, have {}",
                period,
                closes.len()
            ))
            .step(format!("%R defaults to {}", NEUTRAL_WILLIAMS_R));
        return detail.finish(
            NEUTRAL_WILLIAMS_R,
            "Not enough data to calculate Williams %R - assuming neutral momentum",
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

    let Some(r) = from_range(close, highest, lowest) else {
        detail.step(format!(
            "High/low range is zero - %R defaults to {}",
            NEUTRAL_WILLIAMS_R
        ));
        return detail.finish(NEUTRAL_WILLIAMS_R, "Price range is flat - no momentum reading");
    };

    detail.var("%R", r).step(format!(
        "%R = ({:.2} - {:.2}) / ({:.2} - {:.2}) × -100 = {:.2}",
        highest, close, highest, lowest, r
    ));

    detail.finish(r, interpret(r))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_williams_r_basic() {
        let highs = vec![12.0, 14.0, 13.0];
        let lows = vec![9.0, 10.0, 11.0];
        let closes = vec![10.0, 13.0, 12.0];

        // (14 - 12) / (14 - 9) * -100 = -40
        let r = calculate_williams_r(&highs, &lows, &closes, 3);
        assert_relative_eq!(r, -40.0, epsilon = 1e-9);
    }

    #[test]
    fn test_williams_r_mirrors_stochastic() {
        let highs = vec![12.0, 14.0, 13.0, 15.0];
        let lows = vec![9.0, 10.0, 11.0, 12.0];
        let closes = vec![10.0, 13.0, 12.0, 14.5];

        let k = crate::indicators::calculate_stochastic(&highs, &lows, &closes, 4).k;
        let r = calculate_williams_r(&highs, &lows, &closes, 4);
        assert_relative_eq!(r, k - 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_williams_r_insufficient_data() {
        assert_eq!(calculate_williams_r(&[1.0], &[1.0], &[1.0], 14), -50.0);
    }

    #[test]
    fn test_williams_r_details_oversold() {
        let highs = vec![20.0, 18.0, 16.0];
        let lows = vec![18.0, 15.0, 10.0];
        let closes = vec![19.0, 16.0, 10.5];

        let detail = calculate_williams_r_with_details(&highs, &lows, &closes, 3);
        // (20 - 10.5) / (20 - 10) * -100 = -95
        assert_relative_eq!(detail.result, -95.0, epsilon = 1e-9);
        assert!(detail.interpretation.contains("oversold"));
    }

    #[test]
    fn test_williams_r_details_flat_range() {
        let flat = vec![10.0; 3];
        let detail = calculate_williams_r_with_details(&flat, &flat, &flat, 3);
        assert_eq!(detail.result, -50.0);
        assert!(detail.interpretation.contains("flat"));
    }

    #[test]
    fn test_williams_r_details_agree_with_reading() {
        let cases: [(&[f64], &[f64], &[f64]); 3] = [
            (&[12.0, 14.0, 13.0], &[9.0, 10.0, 11.0], &[10.0, 13.0, 12.0]),
            (&[10.0; 3], &[10.0; 3], &[10.0; 3]),
            (&[], &[9.0], &[9.5, 9.6, 9.7]),
        ];

        for (highs, lows, closes) in cases {
            let detail = calculate_williams_r_with_details(highs, lows, closes, 3);
            assert_eq!(detail.result, calculate_williams_r(highs, lows, closes, 3));
        }
        assert_eq!(from_range(12.0, 14.0, 9.0), Some(-40.0));
        assert_eq!(from_range(10.0, 10.0, 10.0), None);
    }
}
