use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use common::{AnalysisError, Bar, Result};
use tracing::warn;

fn open(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).map_err(|e| AnalysisError::DataLoadError(e.to_string()))?;
    Ok(BufReader::new(file))
}

fn parse_field<T: std::str::FromStr>(value: &str, name: &str, line: usize) -> Result<T> {
    value.trim().parse().map_err(|_| {
        AnalysisError::CsvError(format!("Invalid {} on line {}: {:?}", name, line, value))
    })
}

/// Read bars from CSV data
///
/// Columns: timestamp, open, high, low, close, [volume]. Rows with fewer
/// than five columns are skipped.
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<Bar>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut bars = Vec::new();

    for (i, result) in csv_reader.records().enumerate() {
        let record = result.map_err(|e| AnalysisError::CsvError(e.to_string()))?;
        // header is line 1
        let line = i + 2;

        if record.len() < 5 {
            warn!(line, columns = record.len(), "skipping short CSV row");
            continue;
        }

        let volume = match record.get(5) {
            Some(v) if !v.is_empty() => parse_field::<f64>(v, "volume", line)? as u64,
            _ => 0,
        };

        bars.push(Bar {
            timestamp: parse_timestamp(&record[0])?,
            open: parse_field(&record[1], "open price", line)?,
            high: parse_field(&record[2], "high price", line)?,
            low: parse_field(&record[3], "low price", line)?,
            close: parse_field(&record[4], "close price", line)?,
            volume,
        });
    }

    Ok(bars)
}

/// Load bars from CSV file
pub fn load_csv(path: &Path) -> Result<Vec<Bar>> {
    read_csv(open(path)?)
}

/// Load bars from JSON file (an array of bars)
pub fn load_json(path: &Path) -> Result<Vec<Bar>> {
    let bars: Vec<Bar> = serde_json::from_reader(open(path)?)?;
    Ok(bars)
}

/// Parse timestamp from various formats
fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    // Try ISO 8601 format first
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    const DATETIME_FORMATS: [&str; 3] =
        ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y/%m/%d %H:%M:%S"];
    const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y"];

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(Utc.from_utc_datetime(&dt));
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(Utc.from_utc_datetime(&date.and_time(NaiveTime::default())));
        }
    }

    // Try Unix timestamp (seconds)
    if let Ok(ts) = s.parse::<i64>() {
        if let Some(dt) = DateTime::from_timestamp(ts, 0) {
            return Ok(dt);
        }
    }

    Err(AnalysisError::CsvError(format!(
        "Unable to parse timestamp: {}",
        s
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_timestamp_iso() {
        let ts = parse_timestamp("2024-01-15T09:30:00Z").unwrap();
        assert_eq!(ts.year(), 2024);
        assert_eq!(ts.month(), 1);
        assert_eq!(ts.day(), 15);
    }

    #[test]
    fn test_parse_timestamp_date_only() {
        let ts = parse_timestamp("2024-01-15").unwrap();
        assert_eq!(ts.day(), 15);
        assert_eq!(ts.hour(), 0);
    }

    #[test]
    fn test_parse_timestamp_day_first() {
        let ts = parse_timestamp("15/01/2024").unwrap();
        assert_eq!(ts.month(), 1);
        assert_eq!(ts.day(), 15);
    }

    #[test]
    fn test_parse_timestamp_unix() {
        let ts = parse_timestamp("1705312200").unwrap();
        assert!(ts.year() >= 2024);
    }

    #[test]
    fn test_parse_timestamp_invalid() {
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn test_read_csv() {
        let data = "\
date,open,high,low,close,volume
2024-01-02,95000,95500,94500,95000,1000000
2024-01-03,95000,94800,93800,94200,
2024-01-04,94200
2024-01-05,94200,94200,93400,93800,1200000.0
";
        let bars = read_csv(data.as_bytes()).unwrap();

        assert_eq!(bars.len(), 3);
        assert_eq!(bars[0].close, 95000.0);
        assert_eq!(bars[0].volume, 1_000_000);
        assert_eq!(bars[1].volume, 0);
        assert_eq!(bars[2].volume, 1_200_000);
    }

    #[test]
    fn test_read_csv_invalid_price() {
        let data = "date,open,high,low,close\n2024-01-02,95000,abc,94500,95000\n";
        let err = read_csv(data.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("high price"));
    }
}
