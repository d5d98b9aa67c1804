//! Momentum reversal policy.
//!
//! Enters a long position after two consecutive close-to-close declines,
//! then exits a fixed number of bars after the entry fill regardless of
//! price.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tactic_core::{
    error::PolicyError,
    traits::{DecisionPolicy, PolicyConfig, PolicyContext, PolicySnapshot},
    types::{Decision, OrderStatus, OrderUpdate, Side},
};
use tactic_indicators::Lookback;

/// Configuration for the momentum reversal policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MomentumReversalConfig {
    /// Exit after this many bars have elapsed since the entry fill
    pub hold_bars: usize,
}

impl Default for MomentumReversalConfig {
    fn default() -> Self {
        Self { hold_bars: 5 }
    }
}

impl PolicyConfig for MomentumReversalConfig {
    fn validate(&self) -> Result<(), PolicyError> {
        if self.hold_bars == 0 {
            return Err(PolicyError::InvalidConfig(
                "hold_bars must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

struct InstrumentState {
    closes: Lookback<f64>,
    /// Bars elapsed since the last entry fill; None while no fill is live
    bars_since_fill: Option<usize>,
}

impl InstrumentState {
    fn new() -> Self {
        Self {
            closes: Lookback::new(3),
            bars_since_fill: None,
        }
    }
}

/// Momentum reversal policy with a time-based exit.
pub struct MomentumReversalPolicy {
    config: MomentumReversalConfig,
    states: HashMap<String, InstrumentState>,
    bars_seen: usize,
    intents_emitted: usize,
}

impl MomentumReversalPolicy {
    /// Create a new momentum reversal policy.
    pub fn new(config: MomentumReversalConfig) -> Self {
        Self {
            config,
            states: HashMap::new(),
            bars_seen: 0,
            intents_emitted: 0,
        }
    }
}

impl DecisionPolicy for MomentumReversalPolicy {
    fn name(&self) -> &str {
        "momentum_reversal"
    }

    fn description(&self) -> &str {
        "Buys two-bar declines, exits on a fixed bar count"
    }

    fn evaluate(&mut self, ctx: &PolicyContext<'_>) -> Decision {
        self.bars_seen += 1;

        let state = self
            .states
            .entry(ctx.instrument.to_string())
            .or_insert_with(InstrumentState::new);

        state.closes.push(ctx.bar.close);

        if ctx.order_pending {
            return Decision::Hold;
        }

        if ctx.position.is_holding() {
            // Time-based exit: price plays no part
            if let Some(bars) = state.bars_since_fill.as_mut() {
                *bars += 1;
                if *bars >= self.config.hold_bars {
                    tracing::debug!(
                        instrument = ctx.instrument,
                        bars_held = *bars,
                        "holding period elapsed"
                    );
                    self.intents_emitted += 1;
                    return Decision::ExitLong;
                }
            }
            return Decision::Hold;
        }

        // Entry: the two most recent close-to-close changes are both negative
        let (c0, c1, c2) = match (
            state.closes.get_back(0),
            state.closes.get_back(1),
            state.closes.get_back(2),
        ) {
            (Some(c0), Some(c1), Some(c2)) => (c0, c1, c2),
            _ => return Decision::Hold,
        };

        if c0 < c1 && c1 < c2 {
            tracing::debug!(instrument = ctx.instrument, close = c0, "two-bar decline");
            self.intents_emitted += 1;
            return Decision::EnterLong;
        }

        Decision::Hold
    }

    fn on_order_resolved(&mut self, update: &OrderUpdate) {
        let state = self
            .states
            .entry(update.handle.instrument.clone())
            .or_insert_with(InstrumentState::new);

        match (update.handle.side, update.status) {
            // Entry fill starts the holding clock
            (Side::Buy, OrderStatus::Filled) => state.bars_since_fill = Some(0),
            // Failed entry or completed exit: back to quiescent
            (Side::Buy, _) | (Side::Sell, OrderStatus::Filled) => state.bars_since_fill = None,
            // Failed exit: still holding, keep counting
            (Side::Sell, _) => {}
        }
    }

    fn warmup_bars(&self) -> usize {
        3
    }

    fn reset(&mut self) {
        self.states.clear();
        self.bars_seen = 0;
        self.intents_emitted = 0;
    }

    fn snapshot(&self) -> PolicySnapshot {
        let held: HashMap<&String, usize> = self
            .states
            .iter()
            .filter_map(|(instrument, state)| state.bars_since_fill.map(|b| (instrument, b)))
            .collect();

        PolicySnapshot {
            name: self.name().to_string(),
            bars_seen: self.bars_seen,
            intents_emitted: self.intents_emitted,
            indicators: HashMap::new(),
            detail: serde_json::json!({
                "hold_bars": self.config.hold_bars,
                "bars_since_fill": held,
            }),
        }
    }
}
