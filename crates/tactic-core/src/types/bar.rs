//! OHLCV bar types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// One OHLCV sample for one instrument at one timestamp.
///
/// Bars are immutable once produced by the feed; policies and indicators
/// consume them read-only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
    /// Opening price
    pub open: f64,
    /// Highest price
    pub high: f64,
    /// Lowest price
    pub low: f64,
    /// Closing price
    pub close: f64,
    /// Trading volume
    pub volume: f64,
}

impl Bar {
    /// Create a new bar.
    pub fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Get the timestamp as a DateTime.
    pub fn datetime(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.timestamp)
            .unwrap_or_else(|| DateTime::from_timestamp(0, 0).unwrap())
    }

    /// Calculate the true range relative to the previous close (used for ATR).
    pub fn true_range(&self, prev_close: Option<f64>) -> f64 {
        match prev_close {
            Some(pc) => {
                let hl = self.high - self.low;
                let hc = (self.high - pc).abs();
                let lc = (self.low - pc).abs();
                hl.max(hc).max(lc)
            }
            None => self.high - self.low,
        }
    }
}

/// Bounded time-series container for one instrument's bars.
///
/// The harness owns one series per instrument and pushes each new bar before
/// evaluating the policies. Offset accessors address history relative to the
/// newest bar: offset 0 is the current bar, 1 the previous, n the bar n back.
#[derive(Debug, Clone)]
pub struct BarSeries {
    /// Instrument identifier
    pub instrument: String,
    bars: VecDeque<Bar>,
    capacity: usize,
}

impl BarSeries {
    /// Create a series with a maximum capacity.
    /// When capacity is reached, the oldest bar is evicted.
    pub fn with_capacity(instrument: impl Into<String>, capacity: usize) -> Self {
        Self {
            instrument: instrument.into(),
            bars: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push a new bar, evicting the oldest if at capacity.
    pub fn push(&mut self, bar: Bar) {
        if self.capacity > 0 && self.bars.len() >= self.capacity {
            self.bars.pop_front();
        }
        self.bars.push_back(bar);
    }

    /// Number of bars currently held.
    #[inline]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Check if the series is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// The newest bar.
    pub fn last(&self) -> Option<&Bar> {
        self.bars.back()
    }

    /// The bar `offset` positions back from the newest (0 = current).
    pub fn bar_back(&self, offset: usize) -> Option<&Bar> {
        let len = self.bars.len();
        if offset >= len {
            return None;
        }
        self.bars.get(len - 1 - offset)
    }

    /// The close `offset` positions back from the newest (0 = current).
    pub fn close_back(&self, offset: usize) -> Option<f64> {
        self.bar_back(offset).map(|b| b.close)
    }

    /// Iterator over the bars, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Bar> {
        self.bars.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_true_range() {
        let bar = Bar::new(1000, 100.0, 110.0, 95.0, 105.0, 1000000.0);

        // Without previous close: plain range
        assert!((bar.true_range(None) - 15.0).abs() < 1e-9);

        // With a gapping previous close
        assert!((bar.true_range(Some(90.0)) - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_series_eviction() {
        let mut series = BarSeries::with_capacity("AAPL", 3);

        for i in 1..=4 {
            series.push(Bar::new(i, 100.0, 101.0, 99.0, 100.0 + i as f64, 1000.0));
        }

        assert_eq!(series.len(), 3);
        assert_eq!(series.bar_back(2).unwrap().timestamp, 2);
    }

    #[test]
    fn test_lookback_offsets() {
        let mut series = BarSeries::with_capacity("AAPL", 10);
        series.push(Bar::new(1, 0.0, 0.0, 0.0, 100.0, 0.0));
        series.push(Bar::new(2, 0.0, 0.0, 0.0, 101.0, 0.0));
        series.push(Bar::new(3, 0.0, 0.0, 0.0, 102.0, 0.0));

        assert_eq!(series.close_back(0), Some(102.0));
        assert_eq!(series.close_back(1), Some(101.0));
        assert_eq!(series.close_back(2), Some(100.0));
        assert_eq!(series.close_back(3), None);
    }
}
