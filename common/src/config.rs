use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};

/// Analysis parameters
///
/// SMA20/SMA50, EMA12/EMA26 and the MACD periods are fixed by the
/// indicator names and are not part of the parameter set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisParameters {
    // Symbol
    pub symbol: String,
    // Oscillator periods
    pub rsi_period: usize,
    pub stochastic_period: usize,
    pub williams_period: usize,
    // Bands
    pub bollinger_period: usize,
    /// Append Stochastic %K and Williams %R when OHLC data is available
    pub include_oscillators: bool,
}

impl Default for AnalysisParameters {
    fn default() -> Self {
        Self {
            symbol: "FPT.VN".to_string(),
            rsi_period: 14,
            stochastic_period: 14,
            williams_period: 14,
            bollinger_period: 20,
            include_oscillators: true,
        }
    }
}

impl AnalysisParameters {
    /// Load parameters from a JSON file; missing fields take their defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| AnalysisError::DataLoadError(e.to_string()))?;
        let params: Self = serde_json::from_reader(BufReader::new(file))?;
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<()> {
        let periods = [
            ("rsi_period", self.rsi_period),
            ("stochastic_period", self.stochastic_period),
            ("williams_period", self.williams_period),
            ("bollinger_period", self.bollinger_period),
        ];

        for (name, value) in periods {
            if value == 0 {
                return Err(AnalysisError::InvalidParameter(format!(
                    "{} must be greater than 0",
                    name
                )));
            }
        }

        Ok(())
    }

    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = symbol.into();
        self
    }

    pub fn with_rsi_period(mut self, period: usize) -> Self {
        self.rsi_period = period;
        self
    }

    pub fn with_bollinger_period(mut self, period: usize) -> Self {
        self.bollinger_period = period;
        self
    }

    pub fn with_stochastic_period(mut self, period: usize) -> Self {
        self.stochastic_period = period;
        self
    }

    pub fn with_williams_period(mut self, period: usize) -> Self {
        self.williams_period = period;
        self
    }

    pub fn without_oscillators(mut self) -> Self {
        self.include_oscillators = false;
        self
    }
}
