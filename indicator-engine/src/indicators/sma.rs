use common::{IndicatorCalculationDetail, Reading};

use super::detail::{format_prices, trailing, DetailBuilder};

/// Simple Moving Average of the last `period` prices, tagged with whether
/// the window was full.
///
/// Fewer than `period` prices (or a zero period) yields `InsufficientData(0.0)`.
pub fn sma_reading(prices: &[f64], period: usize) -> Reading<f64> {
    if period == 0 || prices.len() < period {
        return Reading::InsufficientData(0.0);
    }

    let sum: f64 = trailing(prices, period).iter().sum();
    Reading::Computed(sum / period as f64)
}

/// Calculate Simple Moving Average
///
/// # Arguments
/// * `prices` - Slice of prices, oldest first
/// * `period` - SMA period
///
/// # Returns
/// Mean of the last `period` prices, or 0.0 when there is not enough data
pub fn calculate_sma(prices: &[f64], period: usize) -> f64 {
    sma_reading(prices, period).value()
}

/// SMA with formula, summed values and a support/resistance reading
pub fn calculate_sma_with_details(prices: &[f64], period: usize) -> IndicatorCalculationDetail {
    let label = format!("SMA{}", period);
    let mut detail = DetailBuilder::new(format!(
        "{} = (P1 + P2 + ... + P{}) / {}",
        label, period, period
    ));
    detail.var("Period (n)", period);

    let reading = sma_reading(prices, period);
    let Reading::Computed(sma) = reading else {
        detail
            .var("Available prices", prices.len())
            .step(format!(
                "Insufficient data: need {} prices, have {}",
                period,
                prices.len()
            ))
            .step(format!("{} defaults to 0", label));
        return detail.finish(
            reading.value(),
            format!("Not enough data to calculate {} - no signal", label),
        );
    };

    let window = trailing(prices, period);
    let sum: f64 = window.iter().sum();
    let current_price = prices[prices.len() - 1];

    detail
        .var("Prices used", format_prices(window))
        .var("Sum", sum)
        .var("Current price", current_price)
        .step(format!(
            "Take the last {} closing prices: {}",
            period,
            format_prices(window)
        ))
        .step(format!("Sum = {:.2}", sum))
        .step(format!("{} = {:.2} / {} = {:.2}", label, sum, period, sma));

    let interpretation = if sma < current_price {
        format!(
            "Current price {:.2} is above {} ({:.2}) - the average acts as potential support",
            current_price, label, sma
        )
    } else {
        format!(
            "Current price {:.2} is below {} ({:.2}) - the average acts as potential resistance",
            current_price, label, sma
        )
    };

    detail.finish(sma, interpretation)
}
