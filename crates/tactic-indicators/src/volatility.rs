//! Volatility indicators.

use tactic_core::traits::StreamingIndicator;
use tactic_core::types::Bar;

/// Average True Range (ATR).
///
/// Wilder-smoothed true range over full bars (uses the previous close for
/// gap handling). The first bar only records the close; ready after
/// period + 1 bars.
#[derive(Debug, Clone)]
pub struct Atr {
    period: usize,
    prev_close: Option<f64>,
    value: f64,
    ranges_seen: usize,
}

impl Atr {
    /// Create a new ATR indicator.
    ///
    /// Common period is 14.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self {
            period,
            prev_close: None,
            value: 0.0,
            ranges_seen: 0,
        }
    }
}

impl StreamingIndicator for Atr {
    type Input = Bar;
    type Output = f64;

    fn update(&mut self, bar: Bar) -> Option<f64> {
        let prev = self.prev_close.replace(bar.close);
        let prev = match prev {
            Some(p) => p,
            None => return None,
        };

        let tr = bar.true_range(Some(prev));
        let period_f64 = self.period as f64;

        if self.ranges_seen < self.period {
            // Seeding phase: plain average of the first `period` true ranges
            self.value += tr / period_f64;
        } else {
            // Wilder's smoothing
            self.value = (self.value * (period_f64 - 1.0) + tr) / period_f64;
        }
        self.ranges_seen += 1;

        self.current()
    }

    fn current(&self) -> Option<f64> {
        if self.ranges_seen >= self.period {
            Some(self.value)
        } else {
            None
        }
    }

    fn is_ready(&self) -> bool {
        self.ranges_seen >= self.period
    }

    fn period(&self) -> usize {
        self.period + 1
    }

    fn reset(&mut self) {
        self.prev_close = None;
        self.value = 0.0;
        self.ranges_seen = 0;
    }

    fn name(&self) -> &str {
        "ATR"
    }
}
