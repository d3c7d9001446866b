use chrono::{Duration, Utc};
use common::Bar;
use rand::Rng;

/// Generate synthetic daily stock bars for demos and tests
pub fn generate_synthetic_bars(days: usize, initial_price: f64) -> Vec<Bar> {
    let mut rng = rand::thread_rng();
    let mut bars = Vec::with_capacity(days);

    let mut price = initial_price;
    let start_date = Utc::now() - Duration::days(days as i64);

    // Large-cap stock parameters
    let daily_volatility = 0.02; // ~2% daily moves
    let drift = 0.0002;

    for i in 0..days {
        let date = start_date + Duration::days(i as i64);

        let random_return: f64 = rng.gen_range(-1.0..1.0);
        let daily_return = drift + daily_volatility * random_return;
        let close = price * (1.0 + daily_return);

        // Open gaps slightly from the previous close
        let open = price * (1.0 + rng.gen_range(-0.005..0.005));
        let intraday_range = price * rng.gen_range(0.005..0.02);
        let high = open.max(close) + rng.gen_range(0.0..intraday_range / 2.0);
        let low = open.min(close) - rng.gen_range(0.0..intraday_range / 2.0);

        // Volume rises on volatile days
        let base_volume = 1_000_000u64;
        let volume_multiplier = 1.0 + daily_return.abs() * 10.0;
        let volume = (base_volume as f64 * volume_multiplier * rng.gen_range(0.8..1.2)) as u64;

        bars.push(Bar::new(date, open, high, low, close, volume));

        price = close;
    }

    bars
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_synthetic_bars() {
        let bars = generate_synthetic_bars(100, 90_000.0);

        assert_eq!(bars.len(), 100);

        for bar in &bars {
            assert!(bar.high >= bar.low);
            assert!(bar.high >= bar.open);
            assert!(bar.high >= bar.close);
            assert!(bar.low <= bar.open);
            assert!(bar.low <= bar.close);
            assert!(bar.volume > 0);
        }

        for pair in bars.windows(2) {
            assert!(pair[1].timestamp > pair[0].timestamp);
        }
    }

    #[test]
    fn test_generate_zero_days() {
        assert!(generate_synthetic_bars(0, 100.0).is_empty());
    }
}
