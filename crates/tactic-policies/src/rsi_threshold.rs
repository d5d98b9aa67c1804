//! RSI threshold policy.
//!
//! Enters a long position when RSI drops below the oversold bound while
//! flat, exits when RSI rises above the overbought bound while holding.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tactic_core::{
    error::PolicyError,
    traits::{DecisionPolicy, PolicyConfig, PolicyContext, PolicySnapshot, StreamingIndicator},
    types::Decision,
};
use tactic_indicators::Rsi;

/// Configuration for the RSI threshold policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RsiThresholdConfig {
    /// RSI calculation period
    pub period: usize,
    /// Enter long below this level while flat
    pub oversold: f64,
    /// Exit long above this level while holding
    pub overbought: f64,
}

impl Default for RsiThresholdConfig {
    fn default() -> Self {
        Self {
            period: 14,
            oversold: 30.0,
            overbought: 70.0,
        }
    }
}

impl PolicyConfig for RsiThresholdConfig {
    fn validate(&self) -> Result<(), PolicyError> {
        if self.period < 2 {
            return Err(PolicyError::InvalidConfig(
                "RSI period must be at least 2".into(),
            ));
        }
        if self.overbought <= self.oversold {
            return Err(PolicyError::InvalidConfig(
                "Overbought must be greater than oversold".into(),
            ));
        }
        if self.overbought > 100.0 || self.oversold < 0.0 {
            return Err(PolicyError::InvalidConfig(
                "RSI bounds must be between 0 and 100".into(),
            ));
        }
        Ok(())
    }
}

struct InstrumentState {
    rsi: Rsi,
}

/// RSI threshold policy.
///
/// No state is retained across bars besides the indicator itself; position
/// state alone determines which branch is eligible.
pub struct RsiThresholdPolicy {
    config: RsiThresholdConfig,
    states: HashMap<String, InstrumentState>,
    bars_seen: usize,
    intents_emitted: usize,
}

impl RsiThresholdPolicy {
    /// Create a new RSI threshold policy.
    pub fn new(config: RsiThresholdConfig) -> Self {
        Self {
            config,
            states: HashMap::new(),
            bars_seen: 0,
            intents_emitted: 0,
        }
    }
}

impl DecisionPolicy for RsiThresholdPolicy {
    fn name(&self) -> &str {
        "rsi_threshold"
    }

    fn description(&self) -> &str {
        "Enters oversold instruments, exits overbought ones"
    }

    fn evaluate(&mut self, ctx: &PolicyContext<'_>) -> Decision {
        self.bars_seen += 1;

        let period = self.config.period;
        let state = self
            .states
            .entry(ctx.instrument.to_string())
            .or_insert_with(|| InstrumentState {
                rsi: Rsi::new(period),
            });

        let rsi = match state.rsi.update(ctx.bar.close) {
            Some(value) => value,
            None => return Decision::Hold,
        };

        if ctx.order_pending {
            return Decision::Hold;
        }

        if !ctx.position.is_holding() && rsi < self.config.oversold {
            tracing::debug!(
                instrument = ctx.instrument,
                rsi,
                oversold = self.config.oversold,
                "rsi below oversold bound"
            );
            self.intents_emitted += 1;
            return Decision::EnterLong;
        }

        if ctx.position.is_holding() && rsi > self.config.overbought {
            tracing::debug!(
                instrument = ctx.instrument,
                rsi,
                overbought = self.config.overbought,
                "rsi above overbought bound"
            );
            self.intents_emitted += 1;
            return Decision::ExitLong;
        }

        Decision::Hold
    }

    fn warmup_bars(&self) -> usize {
        self.config.period + 1
    }

    fn reset(&mut self) {
        self.states.clear();
        self.bars_seen = 0;
        self.intents_emitted = 0;
    }

    fn snapshot(&self) -> PolicySnapshot {
        let indicators = self
            .states
            .iter()
            .filter_map(|(instrument, state)| {
                state
                    .rsi
                    .current()
                    .map(|value| (format!("{instrument}.rsi"), value))
            })
            .collect();

        PolicySnapshot {
            name: self.name().to_string(),
            bars_seen: self.bars_seen,
            intents_emitted: self.intents_emitted,
            indicators,
            detail: serde_json::json!({
                "oversold": self.config.oversold,
                "overbought": self.config.overbought,
            }),
        }
    }
}
