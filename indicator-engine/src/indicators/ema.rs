use common::IndicatorCalculationDetail;

use super::detail::DetailBuilder;

/// Iterations written out step by step before the detail summarizes the rest
const LOGGED_ITERATIONS: usize = 5;

fn multiplier(period: usize) -> f64 {
    2.0 / (period as f64 + 1.0)
}

/// Calculate Exponential Moving Average
///
/// Seeded with the first price of the whole series and folded over every
/// later price; `period` only sets the multiplier, not how much history
/// is consumed.
///
/// # Returns
/// 0.0 for an empty series, the single price for a one-element series
pub fn calculate_ema(prices: &[f64], period: usize) -> f64 {
    let Some((&seed, rest)) = prices.split_first() else {
        return 0.0;
    };

    let k = multiplier(period);
    rest.iter().fold(seed, |ema, &price| price * k + ema * (1.0 - k))
}

/// EMA with the multiplier, seed and the first iterations spelled out
pub fn calculate_ema_with_details(prices: &[f64], period: usize) -> IndicatorCalculationDetail {
    let label = format!("EMA{}", period);
    let k = multiplier(period);
    let mut detail = DetailBuilder::new(format!(
        "{} = Price × k + EMA(previous) × (1 - k), k = 2 / ({} + 1)",
        label, period
    ));
    detail.var("Period (n)", period).var("Multiplier (k)", k);

    let Some((&seed, rest)) = prices.split_first() else {
        detail.step("No price data - EMA defaults to 0");
        return detail.finish(0.0, format!("Not enough data to calculate {}", label));
    };

    detail
        .var("Seed (first price)", seed)
        .step(format!("k = 2 / ({} + 1) = {:.4}", period, k))
        .step(format!("Seed EMA with the first price: {:.2}", seed));

    let mut ema = seed;
    for (i, &price) in rest.iter().enumerate() {
        let next = price * k + ema * (1.0 - k);
        if i < LOGGED_ITERATIONS {
            detail.step(format!(
                "Day {}: {:.2} × {:.4} + {:.2} × {:.4} = {:.2}",
                i + 2,
                price,
                k,
                ema,
                1.0 - k,
                next
            ));
        }
        ema = next;
    }

    if rest.len() > LOGGED_ITERATIONS {
        detail.step(format!(
            "... {} more iterations, final {} = {:.2}",
            rest.len() - LOGGED_ITERATIONS,
            label,
            ema
        ));
    }

    let current_price = prices[prices.len() - 1];
    detail.var("Current price", current_price).var(&label, ema);

    let interpretation = if current_price > ema {
        format!(
            "Price {:.2} is above {} ({:.2}) - short-term trend is bullish",
            current_price, label, ema
        )
    } else if current_price < ema {
        format!(
            "Price {:.2} is below {} ({:.2}) - short-term trend is bearish",
            current_price, label, ema
        )
    } else {
        format!("Price is at {} ({:.2}) - no clear trend", label, ema)
    };

    detail.finish(ema, interpretation)
}
