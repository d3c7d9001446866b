use common::{IndicatorCalculationDetail, Reading};

use super::detail::DetailBuilder;

/// Neutral RSI returned when there are not enough prices
pub const NEUTRAL_RSI: f64 = 50.0;

struct RsiComponents {
    changes: Vec<f64>,
    gains: f64,
    losses: f64,
}

// NOTE: the changes come from the first `period + 1` prices of the series,
// while every other indicator reads a trailing window. Existing RSI values
// depend on this.
fn components(prices: &[f64], period: usize) -> RsiComponents {
    let changes: Vec<f64> = (1..=period).map(|i| prices[i] - prices[i - 1]).collect();

    let mut gains = 0.0;
    let mut losses = 0.0;
    for &change in &changes {
        if change > 0.0 {
            gains += change;
        } else {
            losses -= change;
        }
    }

    RsiComponents {
        changes,
        gains,
        losses,
    }
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - (100.0 / (1.0 + rs))
}

/// RSI tagged with whether enough prices were available
pub fn rsi_reading(prices: &[f64], period: usize) -> Reading<f64> {
    if period == 0 || prices.len() <= period {
        return Reading::InsufficientData(NEUTRAL_RSI);
    }

    let c = components(prices, period);
    let n = period as f64;
    Reading::Computed(rsi_from_averages(c.gains / n, c.losses / n))
}

/// Calculate Relative Strength Index
///
/// # Arguments
/// * `prices` - Slice of closing prices, oldest first
/// * `period` - RSI period (typically 14)
///
/// # Returns
/// RSI in 0..=100; 50.0 when fewer than `period + 1` prices are available
pub fn calculate_rsi(prices: &[f64], period: usize) -> f64 {
    rsi_reading(prices, period).value()
}

fn interpret(rsi: f64) -> String {
    if rsi > 70.0 {
        format!("RSI {:.2} is above 70 - overbought, price may pull back", rsi)
    } else if rsi < 30.0 {
        format!("RSI {:.2} is below 30 - oversold, price may rebound", rsi)
    } else {
        format!("RSI {:.2} is between 30 and 70 - neutral momentum", rsi)
    }
}

/// RSI with every price change, the gain/loss totals and RS
pub fn calculate_rsi_with_details(prices: &[f64], period: usize) -> IndicatorCalculationDetail {
    let mut detail =
        DetailBuilder::new("RSI = 100 - 100 / (1 + RS), RS = Average Gain / Average Loss");
    detail.var("Period (n)", period);

    if period == 0 || prices.len() <= period {
        detail
            .var("Available prices", prices.len())
            .step(format!(
                "Insufficient data: need {} prices, have {}",
                period.saturating_add(1),
                prices.len()
            ))
            .step(format!("RSI defaults to neutral {}", NEUTRAL_RSI));
        return detail.finish(
            NEUTRAL_RSI,
            "Not enough data to calculate RSI - assuming neutral momentum",
        );
    }

    let c = components(prices, period);
    for (i, change) in c.changes.iter().enumerate() {
        detail.step(format!(
            "Change {}: {:.2} - {:.2} = {:+.2}",
            i + 1,
            prices[i + 1],
            prices[i],
            change
        ));
    }

    let n = period as f64;
    let avg_gain = c.gains / n;
    let avg_loss = c.losses / n;
    let rsi = rsi_from_averages(avg_gain, avg_loss);

    detail
        .var("Total gains", c.gains)
        .var("Total losses", c.losses)
        .var("Average gain", avg_gain)
        .var("Average loss", avg_loss)
        .step(format!("Total gains = {:.2}, total losses = {:.2}", c.gains, c.losses))
        .step(format!(
            "Average gain = {:.2} / {} = {:.4}, average loss = {:.2} / {} = {:.4}",
            c.gains, period, avg_gain, c.losses, period, avg_loss
        ));

    if avg_loss == 0.0 {
        detail.step("Average loss is 0 - RSI = 100");
    } else {
        let rs = avg_gain / avg_loss;
        detail
            .var("RS", rs)
            .step(format!("RS = {:.4} / {:.4} = {:.4}", avg_gain, avg_loss, rs))
            .step(format!("RSI = 100 - 100 / (1 + {:.4}) = {:.2}", rs, rsi));
    }
    detail.var("RSI", rsi);

    detail.finish(rsi, interpret(rsi))
}
