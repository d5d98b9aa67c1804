//! Momentum indicators.

use crate::moving_average::Ema;
use serde::{Deserialize, Serialize};
use tactic_core::traits::StreamingIndicator;

/// Relative Strength Index (RSI).
///
/// Measures the speed and magnitude of recent price changes to evaluate
/// overbought or oversold conditions. Uses Wilder's smoothing; ready after
/// period + 1 inputs.
#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    prev_close: Option<f64>,
    avg_gain: f64,
    avg_loss: f64,
    changes_seen: usize,
}

impl Rsi {
    /// Create a new RSI indicator.
    ///
    /// Common periods are 14 (default) or 9.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self {
            period,
            prev_close: None,
            avg_gain: 0.0,
            avg_loss: 0.0,
            changes_seen: 0,
        }
    }
}

impl StreamingIndicator for Rsi {
    type Input = f64;
    type Output = f64;

    fn update(&mut self, close: f64) -> Option<f64> {
        let prev = self.prev_close.replace(close);
        let prev = match prev {
            Some(p) => p,
            None => return None,
        };

        let change = close - prev;
        let gain = change.max(0.0);
        let loss = (-change).max(0.0);
        let period_f64 = self.period as f64;

        if self.changes_seen < self.period {
            // Seeding phase: plain average of the first `period` changes
            self.avg_gain += gain / period_f64;
            self.avg_loss += loss / period_f64;
        } else {
            // Wilder's smoothing: avg = (prev_avg * (period-1) + value) / period
            self.avg_gain = (self.avg_gain * (period_f64 - 1.0) + gain) / period_f64;
            self.avg_loss = (self.avg_loss * (period_f64 - 1.0) + loss) / period_f64;
        }
        self.changes_seen += 1;

        self.current()
    }

    fn current(&self) -> Option<f64> {
        if self.changes_seen < self.period {
            return None;
        }
        if self.avg_loss == 0.0 {
            return Some(100.0);
        }
        Some(100.0 - (100.0 / (1.0 + self.avg_gain / self.avg_loss)))
    }

    fn is_ready(&self) -> bool {
        self.changes_seen >= self.period
    }

    fn period(&self) -> usize {
        self.period + 1
    }

    fn reset(&mut self) {
        self.prev_close = None;
        self.avg_gain = 0.0;
        self.avg_loss = 0.0;
        self.changes_seen = 0;
    }

    fn name(&self) -> &str {
        "RSI"
    }
}

/// MACD (Moving Average Convergence Divergence) value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacdValue {
    /// MACD line (fast EMA - slow EMA)
    pub macd: f64,
    /// Signal line (EMA of MACD)
    pub signal: f64,
    /// Histogram (MACD - Signal)
    pub histogram: f64,
}

/// MACD indicator.
///
/// Two EMAs over the input plus a signal EMA over the MACD line. Values are
/// produced once the signal line has seeded.
#[derive(Debug, Clone)]
pub struct Macd {
    fast: Ema,
    slow: Ema,
    signal: Ema,
    slow_period: usize,
    signal_period: usize,
    value: Option<MacdValue>,
}

impl Macd {
    /// Create a new MACD with default parameters (12, 26, 9).
    pub fn new() -> Self {
        Self::with_periods(12, 26, 9)
    }

    /// Create a MACD with custom periods.
    pub fn with_periods(fast: usize, slow: usize, signal: usize) -> Self {
        assert!(fast > 0 && slow > 0 && signal > 0);
        assert!(fast < slow, "Fast period must be less than slow period");
        Self {
            fast: Ema::new(fast),
            slow: Ema::new(slow),
            signal: Ema::new(signal),
            slow_period: slow,
            signal_period: signal,
            value: None,
        }
    }
}

impl Default for Macd {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamingIndicator for Macd {
    type Input = f64;
    type Output = MacdValue;

    fn update(&mut self, close: f64) -> Option<MacdValue> {
        let fast = self.fast.update(close);
        let slow = self.slow.update(close);

        if let (Some(fast), Some(slow)) = (fast, slow) {
            let macd = fast - slow;
            if let Some(signal) = self.signal.update(macd) {
                self.value = Some(MacdValue {
                    macd,
                    signal,
                    histogram: macd - signal,
                });
            }
        }

        self.value
    }

    fn current(&self) -> Option<MacdValue> {
        self.value
    }

    fn is_ready(&self) -> bool {
        self.value.is_some()
    }

    fn period(&self) -> usize {
        self.slow_period + self.signal_period
    }

    fn reset(&mut self) {
        self.fast.reset();
        self.slow.reset();
        self.signal.reset();
        self.value = None;
    }

    fn name(&self) -> &str {
        "MACD"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rsi_bounds() {
        let mut rsi = Rsi::new(14);
        for i in 0..60 {
            if let Some(value) = rsi.update(100.0 + (i as f64 * 0.5).sin() * 5.0) {
                assert!((0.0..=100.0).contains(&value));
            }
        }
        assert!(rsi.is_ready());
    }

    #[test]
    fn test_rsi_all_gains() {
        let mut rsi = Rsi::new(5);
        let mut last = None;
        for i in 0..7 {
            last = rsi.update(i as f64);
        }
        assert!((last.unwrap() - 100.0).abs() < 1e-10);
    }

    #[test]
    fn test_rsi_all_losses() {
        let mut rsi = Rsi::new(5);
        let mut last = None;
        for i in (0..7).rev() {
            last = rsi.update(i as f64);
        }
        assert!(last.unwrap().abs() < 1e-10);
    }

    #[test]
    fn test_rsi_hand_computed() {
        let mut rsi = Rsi::new(2);
        rsi.update(10.0);
        rsi.update(11.0);
        // Seed: avg_gain = 0.5, avg_loss = 0.25 -> RSI = 66.67
        let v = rsi.update(10.5).unwrap();
        assert!((v - 100.0 / 1.5).abs() < 1e-9);
        // Smoothed: avg_gain = 0.75, avg_loss = 0.125 -> RSI = 100 - 100/7
        let v = rsi.update(11.5).unwrap();
        assert!((v - (100.0 - 100.0 / 7.0)).abs() < 1e-9);
    }

    #[test]
    fn test_macd_warmup_then_positive_in_uptrend() {
        let mut macd = Macd::with_periods(3, 6, 4);

        let mut last = None;
        for i in 0..30 {
            last = macd.update(100.0 + i as f64);
        }

        let value = last.unwrap();
        // Fast EMA tracks a rising series more closely than the slow EMA
        assert!(value.macd > 0.0);
        assert!((value.histogram - (value.macd - value.signal)).abs() < 1e-9);
    }

    #[test]
    fn test_macd_not_ready_early() {
        let mut macd = Macd::new();
        for i in 0..10 {
            assert_eq!(macd.update(100.0 + i as f64), None);
        }
        assert!(!macd.is_ready());
    }
}
