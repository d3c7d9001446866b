use common::{IndicatorKind, Signal};

pub const RSI_OVERSOLD: f64 = 30.0;
pub const RSI_OVERBOUGHT: f64 = 70.0;
pub const STOCHASTIC_OVERSOLD: f64 = 20.0;
pub const STOCHASTIC_OVERBOUGHT: f64 = 80.0;
pub const WILLIAMS_R_OVERSOLD: f64 = -80.0;
pub const WILLIAMS_R_OVERBOUGHT: f64 = -20.0;

fn oscillator(value: f64, oversold: f64, overbought: f64) -> Signal {
    if value < oversold {
        Signal::Buy
    } else if value > overbought {
        Signal::Sell
    } else {
        Signal::Hold
    }
}

/// Classify an indicator value into a trading signal
///
/// Moving averages compare the latest price in `prices` against `value`;
/// an empty series yields `Hold` for them. Indicators without thresholds
/// (EMAs, Bollinger bands) always hold.
pub fn classify_signal(kind: IndicatorKind, value: f64, prices: &[f64]) -> Signal {
    match kind {
        IndicatorKind::Rsi => oscillator(value, RSI_OVERSOLD, RSI_OVERBOUGHT),
        IndicatorKind::Sma20 | IndicatorKind::Sma50 => match prices.last() {
            Some(&current) if current > value => Signal::Buy,
            Some(_) => Signal::Sell,
            None => Signal::Hold,
        },
        IndicatorKind::Macd => {
            if value > 0.0 {
                Signal::Buy
            } else {
                Signal::Sell
            }
        }
        IndicatorKind::StochasticK => {
            oscillator(value, STOCHASTIC_OVERSOLD, STOCHASTIC_OVERBOUGHT)
        }
        IndicatorKind::WilliamsR => oscillator(value, WILLIAMS_R_OVERSOLD, WILLIAMS_R_OVERBOUGHT),
        IndicatorKind::Ema12
        | IndicatorKind::Ema26
        | IndicatorKind::BollingerUpper
        | IndicatorKind::BollingerLower => Signal::Hold,
    }
}

/// Classify by display name; unknown names hold
pub fn classify_signal_by_name(name: &str, value: f64, prices: &[f64]) -> Signal {
    IndicatorKind::from_name(name)
        .map(|kind| classify_signal(kind, value, prices))
        .unwrap_or(Signal::Hold)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRICES: [f64; 3] = [100.0, 101.0, 102.0];

    #[test]
    fn test_rsi_thresholds() {
        assert_eq!(classify_signal(IndicatorKind::Rsi, 25.0, &PRICES), Signal::Buy);
        assert_eq!(classify_signal(IndicatorKind::Rsi, 75.0, &PRICES), Signal::Sell);
        assert_eq!(classify_signal(IndicatorKind::Rsi, 50.0, &PRICES), Signal::Hold);
        assert_eq!(classify_signal(IndicatorKind::Rsi, 30.0, &PRICES), Signal::Hold);
        assert_eq!(classify_signal(IndicatorKind::Rsi, 70.0, &PRICES), Signal::Hold);
    }

    #[test]
    fn test_moving_average_compares_latest_price() {
        assert_eq!(classify_signal(IndicatorKind::Sma20, 101.0, &PRICES), Signal::Buy);
        assert_eq!(classify_signal(IndicatorKind::Sma50, 102.0, &PRICES), Signal::Sell);
        assert_eq!(classify_signal(IndicatorKind::Sma50, 103.0, &PRICES), Signal::Sell);
        assert_eq!(classify_signal(IndicatorKind::Sma20, 101.0, &[]), Signal::Hold);
    }

    #[test]
    fn test_macd_sign() {
        assert_eq!(classify_signal(IndicatorKind::Macd, 0.5, &PRICES), Signal::Buy);
        assert_eq!(classify_signal(IndicatorKind::Macd, 0.0, &PRICES), Signal::Sell);
        assert_eq!(classify_signal(IndicatorKind::Macd, -0.5, &PRICES), Signal::Sell);
    }

    #[test]
    fn test_stochastic_thresholds() {
        let k = IndicatorKind::StochasticK;
        assert_eq!(classify_signal(k, 15.0, &PRICES), Signal::Buy);
        assert_eq!(classify_signal(k, 85.0, &PRICES), Signal::Sell);
        assert_eq!(classify_signal(k, 50.0, &PRICES), Signal::Hold);
    }

    #[test]
    fn test_williams_r_thresholds() {
        let r = IndicatorKind::WilliamsR;
        assert_eq!(classify_signal(r, -90.0, &PRICES), Signal::Buy);
        assert_eq!(classify_signal(r, -10.0, &PRICES), Signal::Sell);
        assert_eq!(classify_signal(r, -50.0, &PRICES), Signal::Hold);
    }

    #[test]
    fn test_default_holds() {
        assert_eq!(
            classify_signal(IndicatorKind::BollingerUpper, 1.0, &PRICES),
            Signal::Hold
        );
        assert_eq!(classify_signal(IndicatorKind::Ema12, 1.0, &PRICES), Signal::Hold);
        assert_eq!(classify_signal_by_name("ADX", 40.0, &PRICES), Signal::Hold);
    }

    #[test]
    fn test_classify_by_name() {
        assert_eq!(classify_signal_by_name("RSI", 25.0, &PRICES), Signal::Buy);
        assert_eq!(classify_signal_by_name("Williams %R", -5.0, &PRICES), Signal::Sell);
    }
}
