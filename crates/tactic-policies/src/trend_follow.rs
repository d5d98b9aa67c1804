//! Trend-following policy with a ratcheting trailing stop.
//!
//! Enters when the MACD line crosses above its signal line while the
//! broader SMA trend points down (mean-reversion entry), then trails an
//! ATR-based stop that only ever moves up. Exits when the close drops
//! below the stop.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tactic_core::{
    error::PolicyError,
    traits::{DecisionPolicy, PolicyConfig, PolicyContext, PolicySnapshot, StreamingIndicator},
    types::{Decision, OrderStatus, OrderUpdate, Side},
};
use tactic_indicators::{Atr, Lookback, Macd, Sma};

/// Configuration for the trend-following policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendFollowConfig {
    /// MACD fast EMA period
    pub macd_fast: usize,
    /// MACD slow EMA period
    pub macd_slow: usize,
    /// MACD signal EMA period
    pub macd_signal: usize,
    /// ATR period for the stop distance
    pub atr_period: usize,
    /// ATR multiples between close and stop
    pub atr_multiplier: f64,
    /// SMA period for the trend filter
    pub sma_period: usize,
    /// Bars back to compare the SMA against for trend direction
    pub direction_period: usize,
}

impl Default for TrendFollowConfig {
    fn default() -> Self {
        Self {
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            atr_period: 14,
            atr_multiplier: 3.0,
            sma_period: 30,
            direction_period: 10,
        }
    }
}

impl PolicyConfig for TrendFollowConfig {
    fn validate(&self) -> Result<(), PolicyError> {
        if self.macd_fast == 0 || self.macd_slow == 0 || self.macd_signal == 0 {
            return Err(PolicyError::InvalidConfig(
                "MACD periods must be greater than 0".into(),
            ));
        }
        if self.macd_fast >= self.macd_slow {
            return Err(PolicyError::InvalidConfig(
                "MACD fast period must be less than slow period".into(),
            ));
        }
        if self.atr_period == 0 || self.sma_period == 0 || self.direction_period == 0 {
            return Err(PolicyError::InvalidConfig(
                "Indicator periods must be greater than 0".into(),
            ));
        }
        if self.atr_multiplier <= 0.0 {
            return Err(PolicyError::InvalidConfig(
                "ATR multiplier must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Candidate stop for the current bar, ratcheted against the previous stop.
/// The stop only ever moves up.
fn ratchet_stop(current: Option<f64>, close: f64, atr: f64, multiplier: f64) -> f64 {
    let candidate = close - atr * multiplier;
    match current {
        Some(stop) => stop.max(candidate),
        None => candidate,
    }
}

struct InstrumentState {
    macd: Macd,
    atr: Atr,
    sma: Sma,
    sma_history: Lookback<f64>,
    prev_macd_diff: Option<f64>,
    stop: Option<f64>,
}

impl InstrumentState {
    fn new(config: &TrendFollowConfig) -> Self {
        Self {
            macd: Macd::with_periods(config.macd_fast, config.macd_slow, config.macd_signal),
            atr: Atr::new(config.atr_period),
            sma: Sma::new(config.sma_period),
            sma_history: Lookback::new(config.direction_period + 1),
            prev_macd_diff: None,
            stop: None,
        }
    }
}

/// Trend-following policy: Flat ⇄ Holding per instrument.
pub struct TrendFollowPolicy {
    config: TrendFollowConfig,
    states: HashMap<String, InstrumentState>,
    bars_seen: usize,
    intents_emitted: usize,
}

impl TrendFollowPolicy {
    /// Create a new trend-following policy.
    pub fn new(config: TrendFollowConfig) -> Self {
        Self {
            config,
            states: HashMap::new(),
            bars_seen: 0,
            intents_emitted: 0,
        }
    }

    #[cfg(test)]
    fn stop_for(&self, instrument: &str) -> Option<f64> {
        self.states.get(instrument).and_then(|s| s.stop)
    }
}

impl DecisionPolicy for TrendFollowPolicy {
    fn name(&self) -> &str {
        "trend_follow"
    }

    fn description(&self) -> &str {
        "MACD crossover entries trailed by a ratcheting ATR stop"
    }

    fn evaluate(&mut self, ctx: &PolicyContext<'_>) -> Decision {
        self.bars_seen += 1;

        let config = self.config.clone();
        let state = self
            .states
            .entry(ctx.instrument.to_string())
            .or_insert_with(|| InstrumentState::new(&config));

        let close = ctx.bar.close;

        // Indicators absorb every bar, pending order or not
        let macd = state.macd.update(close);
        let atr = state.atr.update(*ctx.bar);
        if let Some(sma) = state.sma.update(close) {
            state.sma_history.push(sma);
        }

        let diff = macd.map(|m| m.macd - m.signal);
        let crossed_up = matches!(
            (state.prev_macd_diff, diff),
            (Some(prev), Some(d)) if prev <= 0.0 && d > 0.0
        );
        if let Some(d) = diff {
            state.prev_macd_diff = Some(d);
        }

        // An unresolved order means no transition is attempted this bar
        if ctx.order_pending {
            return Decision::Hold;
        }

        let atr = match atr {
            Some(value) => value,
            None => return Decision::Hold,
        };

        if ctx.position.is_holding() {
            match state.stop {
                Some(stop) if close < stop => {
                    tracing::debug!(instrument = ctx.instrument, close, stop, "stop hit");
                    self.intents_emitted += 1;
                    // The stop is discarded once the exit fill resolves
                    return Decision::ExitLong;
                }
                current => {
                    state.stop = Some(ratchet_stop(current, close, atr, config.atr_multiplier));
                    return Decision::Hold;
                }
            }
        }

        // Flat: enter on a bullish momentum turn during a broader downtrend
        if !state.sma_history.is_full() {
            return Decision::Hold;
        }
        let sma_now = state.sma_history.get_back(0);
        let sma_then = state.sma_history.get_back(config.direction_period);
        let downtrend = matches!((sma_now, sma_then), (Some(now), Some(then)) if now < then);

        if crossed_up && downtrend {
            let stop = close - atr * config.atr_multiplier;
            tracing::debug!(instrument = ctx.instrument, close, stop, "momentum turn in downtrend");
            state.stop = Some(stop);
            self.intents_emitted += 1;
            return Decision::EnterLong;
        }

        Decision::Hold
    }

    fn on_order_resolved(&mut self, update: &OrderUpdate) {
        let state = match self.states.get_mut(&update.handle.instrument) {
            Some(state) => state,
            None => return,
        };

        match (update.handle.side, update.status) {
            // Completed exit or failed entry: the stop no longer applies
            (Side::Sell, OrderStatus::Filled) => state.stop = None,
            (Side::Buy, status) if status != OrderStatus::Filled => state.stop = None,
            _ => {}
        }
    }

    fn warmup_bars(&self) -> usize {
        (self.config.macd_slow + self.config.macd_signal)
            .max(self.config.sma_period + self.config.direction_period)
            .max(self.config.atr_period + 1)
    }

    fn reset(&mut self) {
        self.states.clear();
        self.bars_seen = 0;
        self.intents_emitted = 0;
    }

    fn snapshot(&self) -> PolicySnapshot {
        let mut indicators = HashMap::new();
        let mut stops = HashMap::new();
        for (instrument, state) in &self.states {
            if let Some(value) = state.macd.current() {
                indicators.insert(format!("{instrument}.macd"), value.macd);
                indicators.insert(format!("{instrument}.macd_signal"), value.signal);
            }
            if let Some(value) = state.atr.current() {
                indicators.insert(format!("{instrument}.atr"), value);
            }
            if let Some(value) = state.sma.current() {
                indicators.insert(format!("{instrument}.sma"), value);
            }
            if let Some(stop) = state.stop {
                stops.insert(instrument.clone(), stop);
            }
        }

        PolicySnapshot {
            name: self.name().to_string(),
            bars_seen: self.bars_seen,
            intents_emitted: self.intents_emitted,
            indicators,
            detail: serde_json::json!({
                "atr_multiplier": self.config.atr_multiplier,
                "stops": stops,
            }),
        }
    }
}
