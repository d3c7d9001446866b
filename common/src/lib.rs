pub mod config;
pub mod error;
pub mod types;

pub use config::AnalysisParameters;
pub use error::{AnalysisError, Result};
pub use types::*;
