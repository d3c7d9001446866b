use common::{IndicatorKind, Signal};

const DEFAULT_DESCRIPTION: &str = "Technical indicator for market analysis";
const DEFAULT_HOLD_RECOMMENDATION: &str =
    "Indicator shows neutral conditions - monitor for changes";
const FALLBACK_RECOMMENDATION: &str = "Monitor market conditions";

/// Static description of what an indicator measures
pub fn description(kind: IndicatorKind) -> &'static str {
    match kind {
        IndicatorKind::Sma20 => {
            "20-day Simple Moving Average - shows the average price over the last 20 days"
        }
        IndicatorKind::Sma50 => {
            "50-day Simple Moving Average - shows the average price over the last 50 days"
        }
        IndicatorKind::Ema12 => {
            "12-day Exponential Moving Average - gives more weight to recent prices"
        }
        IndicatorKind::Ema26 => {
            "26-day Exponential Moving Average - gives more weight to recent prices"
        }
        IndicatorKind::Rsi => {
            "Relative Strength Index - measures overbought/oversold conditions (0-100)"
        }
        IndicatorKind::Macd => {
            "Moving Average Convergence Divergence - shows relationship between two moving averages"
        }
        IndicatorKind::BollingerUpper => "Bollinger Band upper limit - price resistance level",
        IndicatorKind::BollingerLower => "Bollinger Band lower limit - price support level",
        IndicatorKind::StochasticK => {
            "Stochastic Oscillator measures momentum by comparing closing price to the price range"
        }
        IndicatorKind::WilliamsR => {
            "Williams %R is a momentum indicator measuring overbought/oversold levels"
        }
    }
}

/// Description by display name, with a generic fallback for unknown names
pub fn description_by_name(name: &str) -> &'static str {
    IndicatorKind::from_name(name)
        .map(description)
        .unwrap_or(DEFAULT_DESCRIPTION)
}

/// Recommendation text for a signal on an indicator.
///
/// Pairs without a dedicated entry fall back to the generic hold text for
/// `Hold`, and to a generic monitoring text otherwise.
pub fn recommendation(signal: Signal, kind: IndicatorKind) -> &'static str {
    use IndicatorKind::*;

    match (signal, kind) {
        (Signal::Buy, Rsi) => "RSI below 30 suggests oversold conditions - consider buying",
        (Signal::Buy, Sma20) => {
            "Price above 20-day SMA indicates upward momentum - bullish signal"
        }
        (Signal::Buy, Sma50) => "Price above 50-day SMA indicates strong upward trend",
        (Signal::Buy, Macd) => "Positive MACD suggests bullish momentum",

        (Signal::Sell, Rsi) => "RSI above 70 suggests overbought conditions - consider selling",
        (Signal::Sell, Sma20) => {
            "Price below 20-day SMA indicates downward pressure - bearish signal"
        }
        (Signal::Sell, Sma50) => "Price below 50-day SMA indicates downward trend",
        (Signal::Sell, Macd) => "Negative MACD suggests bearish momentum",

        (Signal::Hold, Rsi) => "RSI in neutral range (30-70) - wait for clearer signals",
        (Signal::Hold, _) => DEFAULT_HOLD_RECOMMENDATION,

        _ => FALLBACK_RECOMMENDATION,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_has_description() {
        for kind in IndicatorKind::ALL {
            assert!(!description(kind).is_empty());
            assert_ne!(description(kind), DEFAULT_DESCRIPTION);
        }
    }

    #[test]
    fn test_unknown_name_description() {
        assert_eq!(description_by_name("ADX"), DEFAULT_DESCRIPTION);
        assert_eq!(description_by_name("RSI"), description(IndicatorKind::Rsi));
    }

    #[test]
    fn test_recommendation_lookup() {
        assert!(recommendation(Signal::Buy, IndicatorKind::Rsi).contains("oversold"));
        assert!(recommendation(Signal::Sell, IndicatorKind::Sma50).contains("downward trend"));
        assert!(recommendation(Signal::Hold, IndicatorKind::Rsi).contains("neutral range"));
    }

    #[test]
    fn test_recommendation_fallbacks() {
        assert_eq!(
            recommendation(Signal::Hold, IndicatorKind::Macd),
            DEFAULT_HOLD_RECOMMENDATION
        );
        assert_eq!(
            recommendation(Signal::Buy, IndicatorKind::StochasticK),
            FALLBACK_RECOMMENDATION
        );
    }
}
