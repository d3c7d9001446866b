use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// OHLCV bar data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: u64,
}

impl Bar {
    pub fn new(
        timestamp: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: u64,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

/// Aligned per-bar highs, lows and closes, oldest first.
///
/// `high >= close >= low` is assumed per bar but never checked.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OhlcSeries {
    pub highs: Vec<f64>,
    pub lows: Vec<f64>,
    pub closes: Vec<f64>,
}

impl OhlcSeries {
    pub fn new(highs: Vec<f64>, lows: Vec<f64>, closes: Vec<f64>) -> Self {
        Self {
            highs,
            lows,
            closes,
        }
    }

    pub fn from_bars(bars: &[Bar]) -> Self {
        Self {
            highs: bars.iter().map(|b| b.high).collect(),
            lows: bars.iter().map(|b| b.low).collect(),
            closes: bars.iter().map(|b| b.close).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.closes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }
}

/// Trading signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Signal::Buy => "buy",
            Signal::Sell => "sell",
            Signal::Hold => "hold",
        };
        f.pad(s)
    }
}

/// Indicators known to the signal classifier and the description tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndicatorKind {
    #[serde(rename = "SMA20")]
    Sma20,
    #[serde(rename = "SMA50")]
    Sma50,
    #[serde(rename = "EMA12")]
    Ema12,
    #[serde(rename = "EMA26")]
    Ema26,
    #[serde(rename = "RSI")]
    Rsi,
    #[serde(rename = "MACD")]
    Macd,
    #[serde(rename = "Bollinger Upper")]
    BollingerUpper,
    #[serde(rename = "Bollinger Lower")]
    BollingerLower,
    #[serde(rename = "Stochastic %K")]
    StochasticK,
    #[serde(rename = "Williams %R")]
    WilliamsR,
}

impl IndicatorKind {
    pub const ALL: [IndicatorKind; 10] = [
        IndicatorKind::Sma20,
        IndicatorKind::Sma50,
        IndicatorKind::Ema12,
        IndicatorKind::Ema26,
        IndicatorKind::Rsi,
        IndicatorKind::Macd,
        IndicatorKind::BollingerUpper,
        IndicatorKind::BollingerLower,
        IndicatorKind::StochasticK,
        IndicatorKind::WilliamsR,
    ];

    /// Display name, as rendered in indicator lists
    pub fn name(self) -> &'static str {
        match self {
            IndicatorKind::Sma20 => "SMA20",
            IndicatorKind::Sma50 => "SMA50",
            IndicatorKind::Ema12 => "EMA12",
            IndicatorKind::Ema26 => "EMA26",
            IndicatorKind::Rsi => "RSI",
            IndicatorKind::Macd => "MACD",
            IndicatorKind::BollingerUpper => "Bollinger Upper",
            IndicatorKind::BollingerLower => "Bollinger Lower",
            IndicatorKind::StochasticK => "Stochastic %K",
            IndicatorKind::WilliamsR => "Williams %R",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

impl fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Value computed either from a full look-back window or from the
/// insufficient-data fallback.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reading<T> {
    Computed(T),
    InsufficientData(T),
}

impl<T> Reading<T> {
    pub fn value(self) -> T {
        match self {
            Reading::Computed(v) | Reading::InsufficientData(v) => v,
        }
    }

    pub fn is_computed(&self) -> bool {
        matches!(self, Reading::Computed(_))
    }
}

/// Calculation variable: numeric or textual
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VariableValue {
    Number(f64),
    Text(String),
}

impl VariableValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            VariableValue::Number(n) => Some(*n),
            VariableValue::Text(_) => None,
        }
    }
}

impl fmt::Display for VariableValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariableValue::Number(n) => write!(f, "{}", n),
            VariableValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for VariableValue {
    fn from(value: f64) -> Self {
        VariableValue::Number(value)
    }
}

impl From<usize> for VariableValue {
    fn from(value: usize) -> Self {
        VariableValue::Number(value as f64)
    }
}

impl From<&str> for VariableValue {
    fn from(value: &str) -> Self {
        VariableValue::Text(value.to_string())
    }
}

impl From<String> for VariableValue {
    fn from(value: String) -> Self {
        VariableValue::Text(value)
    }
}

/// Named calculation variables in insertion order.
///
/// Serialized as a map whose key order follows insertion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Variables {
    entries: Vec<(String, VariableValue)>,
}

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a variable, replacing the value of an existing name in place
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<VariableValue>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&VariableValue> {
        self.entries.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &VariableValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for Variables {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter().map(|(k, v)| (k, v)))
    }
}

impl<'de> Deserialize<'de> for Variables {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct VariablesVisitor;

        impl<'de> Visitor<'de> for VariablesVisitor {
            type Value = Variables;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of variable names to numbers or strings")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut map: A,
            ) -> std::result::Result<Variables, A::Error> {
                let mut variables = Variables {
                    entries: Vec::with_capacity(map.size_hint().unwrap_or(0)),
                };
                while let Some((name, value)) = map.next_entry::<String, VariableValue>()? {
                    variables.insert(name, value);
                }
                Ok(variables)
            }
        }

        deserializer.deserialize_map(VariablesVisitor)
    }
}

/// Explanation of one indicator evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorCalculationDetail {
    pub formula: String,
    pub variables: Variables,
    pub steps: Vec<String>,
    pub result: f64,
    pub interpretation: String,
}

/// Indicator record rendered by list and detail screens
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalIndicator {
    #[serde(rename = "name")]
    pub kind: IndicatorKind,
    pub value: f64,
    pub signal: Signal,
    pub description: String,
    pub recommendation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formula: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calculation: Option<IndicatorCalculationDetail>,
}

impl TechnicalIndicator {
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }
}

/// Bollinger Bands values
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BollingerBands {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

/// Raw indicator numbers for chart overlays
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorCalculationSummary {
    pub sma20: f64,
    pub sma50: f64,
    pub ema12: f64,
    pub ema26: f64,
    pub rsi: f64,
    pub macd: f64,
    pub macd_signal: f64,
    pub bollinger: BollingerBands,
}

/// Aggregated indicator output for one price series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorBundle {
    pub indicators: Vec<TechnicalIndicator>,
    pub summary: IndicatorCalculationSummary,
    /// Indicators whose value is an insufficient-data fallback
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fallbacks: Vec<IndicatorKind>,
}

impl IndicatorBundle {
    pub fn get(&self, kind: IndicatorKind) -> Option<&TechnicalIndicator> {
        self.indicators.iter().find(|i| i.kind == kind)
    }

    pub fn is_fallback(&self, kind: IndicatorKind) -> bool {
        self.fallbacks.contains(&kind)
    }
}

/// Analysis result for one symbol
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockAnalysis {
    pub symbol: String,
    pub period: String,
    pub bars: usize,
    #[serde(flatten)]
    pub bundle: IndicatorBundle,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indicator_kind_names_round_trip() {
        for kind in IndicatorKind::ALL {
            assert_eq!(IndicatorKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(IndicatorKind::from_name("ADX"), None);
    }

    #[test]
    fn test_indicator_kind_serializes_as_name() {
        let json = serde_json::to_string(&IndicatorKind::BollingerLower).unwrap();
        assert_eq!(json, "\"Bollinger Lower\"");
    }

    #[test]
    fn test_signal_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Signal::Buy).unwrap(), "\"buy\"");
        assert_eq!(Signal::Hold.to_string(), "hold");
    }

    #[test]
    fn test_variables_keep_insertion_order() {
        let mut vars = Variables::new();
        vars.insert("Period (n)", 20usize);
        vars.insert("Sum", 1800.0);
        vars.insert("Prices used", "90.00, 90.00");

        let json = serde_json::to_string(&vars).unwrap();
        assert_eq!(
            json,
            r#"{"Period (n)":20.0,"Sum":1800.0,"Prices used":"90.00, 90.00"}"#
        );

        let parsed: Variables = serde_json::from_str(&json).unwrap();
        let names: Vec<&str> = parsed.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["Period (n)", "Sum", "Prices used"]);
        assert_eq!(parsed.get("Sum").and_then(VariableValue::as_number), Some(1800.0));
    }

    #[test]
    fn test_variables_insert_replaces_existing() {
        let mut vars = Variables::new();
        vars.insert("RSI", 50.0);
        vars.insert("RSI", 70.0);
        assert_eq!(vars.len(), 1);
        assert_eq!(vars.get("RSI"), Some(&VariableValue::Number(70.0)));
    }

    #[test]
    fn test_variables_deserialize_duplicate_names_once() {
        let parsed: Variables =
            serde_json::from_str(r#"{"RS":1.0,"Sum":3.0,"RS":2.0}"#).unwrap();

        assert_eq!(parsed.len(), 2);
        let names: Vec<&str> = parsed.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["RS", "Sum"]);
        assert_eq!(parsed.get("RS"), Some(&VariableValue::Number(2.0)));
    }

    #[test]
    fn test_reading_value() {
        assert_eq!(Reading::Computed(1.5).value(), 1.5);
        assert_eq!(Reading::InsufficientData(50.0).value(), 50.0);
        assert!(!Reading::InsufficientData(0.0).is_computed());
    }

    #[test]
    fn test_ohlc_from_bars() {
        let ts = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let bars = vec![
            Bar::new(ts, 10.0, 11.0, 9.0, 10.5, 100),
            Bar::new(ts, 10.5, 12.0, 10.0, 11.5, 100),
        ];
        let series = OhlcSeries::from_bars(&bars);
        assert_eq!(series.len(), 2);
        assert_eq!(series.highs, vec![11.0, 12.0]);
        assert_eq!(series.lows, vec![9.0, 10.0]);
        assert_eq!(series.closes, vec![10.5, 11.5]);
    }
}
