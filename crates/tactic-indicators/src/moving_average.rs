//! Moving average indicators.

use std::collections::VecDeque;
use tactic_core::traits::StreamingIndicator;

/// Simple Moving Average (SMA).
///
/// Arithmetic mean of the last N inputs, maintained over a sliding window.
#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    window: VecDeque<f64>,
    sum: f64,
}

impl Sma {
    /// Create a new SMA with the specified period.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self {
            period,
            window: VecDeque::with_capacity(period + 1),
            sum: 0.0,
        }
    }
}

impl StreamingIndicator for Sma {
    type Input = f64;
    type Output = f64;

    fn update(&mut self, value: f64) -> Option<f64> {
        self.window.push_back(value);
        self.sum += value;
        if self.window.len() > self.period {
            if let Some(old) = self.window.pop_front() {
                self.sum -= old;
            }
        }
        self.current()
    }

    fn current(&self) -> Option<f64> {
        if self.window.len() == self.period {
            Some(self.sum / self.period as f64)
        } else {
            None
        }
    }

    fn is_ready(&self) -> bool {
        self.window.len() == self.period
    }

    fn period(&self) -> usize {
        self.period
    }

    fn reset(&mut self) {
        self.window.clear();
        self.sum = 0.0;
    }

    fn name(&self) -> &str {
        "SMA"
    }
}

/// Exponential Moving Average (EMA).
///
/// Seeded with the SMA of the first N inputs, then updated with
/// multiplier 2/(N+1).
#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    multiplier: f64,
    seed_sum: f64,
    seed_count: usize,
    value: Option<f64>,
}

impl Ema {
    /// Create a new EMA with the specified period.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self {
            period,
            multiplier: 2.0 / (period as f64 + 1.0),
            seed_sum: 0.0,
            seed_count: 0,
            value: None,
        }
    }
}

impl StreamingIndicator for Ema {
    type Input = f64;
    type Output = f64;

    fn update(&mut self, value: f64) -> Option<f64> {
        match self.value {
            Some(ema) => {
                self.value = Some(value * self.multiplier + ema * (1.0 - self.multiplier));
            }
            None => {
                self.seed_sum += value;
                self.seed_count += 1;
                if self.seed_count == self.period {
                    self.value = Some(self.seed_sum / self.period as f64);
                }
            }
        }
        self.value
    }

    fn current(&self) -> Option<f64> {
        self.value
    }

    fn is_ready(&self) -> bool {
        self.value.is_some()
    }

    fn period(&self) -> usize {
        self.period
    }

    fn reset(&mut self) {
        self.seed_sum = 0.0;
        self.seed_count = 0;
        self.value = None;
    }

    fn name(&self) -> &str {
        "EMA"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sma_window() {
        let mut sma = Sma::new(3);

        assert_eq!(sma.update(1.0), None);
        assert_eq!(sma.update(2.0), None);
        assert!((sma.update(3.0).unwrap() - 2.0).abs() < 1e-9);
        assert!((sma.update(4.0).unwrap() - 3.0).abs() < 1e-9);
        assert!(sma.is_ready());
    }

    #[test]
    fn test_sma_reset() {
        let mut sma = Sma::new(2);
        sma.update(1.0);
        sma.update(2.0);
        assert!(sma.is_ready());

        sma.reset();
        assert!(!sma.is_ready());
        assert_eq!(sma.current(), None);
    }

    #[test]
    fn test_ema_seed_and_update() {
        let mut ema = Ema::new(2);

        assert_eq!(ema.update(1.0), None);
        // Seed is the SMA of the first two inputs
        assert!((ema.update(2.0).unwrap() - 1.5).abs() < 1e-9);
        // Multiplier 2/3: 3*(2/3) + 1.5*(1/3) = 2.5
        assert!((ema.update(3.0).unwrap() - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_ema_converges_to_constant() {
        let mut ema = Ema::new(5);
        for _ in 0..50 {
            ema.update(42.0);
        }
        assert!((ema.current().unwrap() - 42.0).abs() < 1e-9);
    }
}
