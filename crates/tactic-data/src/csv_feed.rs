//! CSV bar feed.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tactic_core::error::FeedError;
use tactic_core::traits::BarFeed;
use tactic_core::types::Bar;

/// CSV record format.
#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(alias = "Date", alias = "date", alias = "timestamp", alias = "Timestamp")]
    date: String,
    #[serde(alias = "Open", alias = "open")]
    open: f64,
    #[serde(alias = "High", alias = "high")]
    high: f64,
    #[serde(alias = "Low", alias = "low")]
    low: f64,
    #[serde(alias = "Close", alias = "close", alias = "Adj Close")]
    close: f64,
    #[serde(alias = "Volume", alias = "volume", default)]
    volume: f64,
}

/// Bar feed backed by one CSV file per instrument.
pub struct CsvBarFeed {
    paths: HashMap<String, PathBuf>,
}

impl CsvBarFeed {
    /// Create an empty feed.
    pub fn new() -> Self {
        Self {
            paths: HashMap::new(),
        }
    }

    /// Register a CSV file for an instrument.
    pub fn with_file(
        mut self,
        instrument: impl Into<String>,
        path: impl Into<PathBuf>,
    ) -> Result<Self, FeedError> {
        let path = path.into();
        if !path.exists() {
            return Err(FeedError::NoDataAvailable(path.display().to_string()));
        }
        self.paths.insert(instrument.into(), path);
        Ok(self)
    }

    /// Instruments with a registered file.
    pub fn instruments(&self) -> Vec<&String> {
        let mut names: Vec<&String> = self.paths.keys().collect();
        names.sort();
        names
    }

    fn load_path(path: &Path) -> Result<Vec<Bar>, FeedError> {
        let file = std::fs::File::open(path)
            .map_err(|e| FeedError::NoDataAvailable(format!("{}: {e}", path.display())))?;
        Self::load_reader(file)
    }

    fn load_reader(input: impl std::io::Read) -> Result<Vec<Bar>, FeedError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(input);

        let mut bars = Vec::new();
        for result in reader.deserialize() {
            let record: CsvRecord = result.map_err(|e| FeedError::ParseError(e.to_string()))?;
            let timestamp = parse_timestamp(&record.date)?;
            bars.push(Bar::new(
                timestamp,
                record.open,
                record.high,
                record.low,
                record.close,
                record.volume,
            ));
        }

        bars.sort_by_key(|b| b.timestamp);
        Ok(bars)
    }
}

impl Default for CsvBarFeed {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse the timestamp formats that show up in bar exports.
fn parse_timestamp(date_str: &str) -> Result<i64, FeedError> {
    let formats = [
        "%Y-%m-%d",
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d",
        "%m/%d/%Y",
    ];

    for format in formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, format) {
            return Ok(dt.and_utc().timestamp_millis());
        }
        if let Ok(d) = NaiveDate::parse_from_str(date_str, format) {
            let dt = d.and_hms_opt(0, 0, 0).unwrap();
            return Ok(dt.and_utc().timestamp_millis());
        }
    }

    // Unix timestamp, milliseconds when it is too large for seconds
    if let Ok(ts) = date_str.parse::<i64>() {
        if ts > 10_000_000_000 {
            return Ok(ts);
        }
        return Ok(ts * 1000);
    }

    Err(FeedError::ParseError(format!(
        "Could not parse date: {date_str}"
    )))
}

#[async_trait]
impl BarFeed for CsvBarFeed {
    async fn load(&self, instrument: &str) -> Result<Vec<Bar>, FeedError> {
        let path = self
            .paths
            .get(instrument)
            .ok_or_else(|| FeedError::NoDataAvailable(instrument.to_string()))?;
        Self::load_path(path)
    }

    fn name(&self) -> &str {
        "csv"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
            .and_utc()
            .timestamp_millis();

        assert_eq!(parse_timestamp("2024-03-05").unwrap(), expected);
        assert_eq!(parse_timestamp("2024/03/05").unwrap(), expected);
        assert_eq!(parse_timestamp("03/05/2024").unwrap(), expected);
        assert_eq!(
            parse_timestamp(&(expected / 1000).to_string()).unwrap(),
            expected
        );
        assert_eq!(parse_timestamp(&expected.to_string()).unwrap(), expected);
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn test_load_sorts_and_parses() {
        let csv = "Date,Open,High,Low,Close,Volume\n\
                   2024-01-03,102,103,101,102.5,1200\n\
                   2024-01-02,101,102,100,101.5,1100\n\
                   2024-01-01,100,101,99,100.5,1000\n";

        let bars = CsvBarFeed::load_reader(csv.as_bytes()).unwrap();

        assert_eq!(bars.len(), 3);
        assert!(bars.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
        assert!((bars[0].close - 100.5).abs() < 1e-9);
    }

    #[test]
    fn test_lowercase_headers_accepted() {
        let csv = "date,open,high,low,close,volume\n\
                   2024-01-01,100,101,99,100.5,1000\n";

        let bars = CsvBarFeed::load_reader(csv.as_bytes()).unwrap();
        assert_eq!(bars.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_file_and_instrument() {
        assert!(CsvBarFeed::new().with_file("X", "/nonexistent.csv").is_err());

        let feed = CsvBarFeed::new();
        assert!(feed.load("X").await.is_err());
    }

    #[test]
    fn test_malformed_row_is_an_error() {
        let csv = "Date,Open,High,Low,Close,Volume\n\
                   2024-01-01,abc,101,99,100.5,1000\n";

        assert!(CsvBarFeed::load_reader(csv.as_bytes()).is_err());
    }
}
