pub mod loader;
pub mod sample;
pub mod synthetic;

pub use loader::{load_csv, load_json, read_csv};
pub use sample::{sample_bars, sample_series, SAMPLE_SYMBOL};
pub use synthetic::generate_synthetic_bars;

use std::path::Path;

use common::{AnalysisError, Bar, Result};

/// Load bars from file, detecting format from extension
pub fn load_file(path: &Path) -> Result<Vec<Bar>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        _ => Err(AnalysisError::DataLoadError(format!(
            "Unsupported file format: {}",
            ext
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_extension() {
        let err = load_file(Path::new("prices.xlsx")).unwrap_err();
        assert!(err.to_string().contains("Unsupported file format: xlsx"));
    }

    #[test]
    fn test_missing_file() {
        let err = load_file(Path::new("does-not-exist.csv")).unwrap_err();
        assert!(matches!(err, AnalysisError::DataLoadError(_)));
    }
}
