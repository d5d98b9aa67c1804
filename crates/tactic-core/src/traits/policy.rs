//! Decision policy trait definitions.

use crate::error::PolicyError;
use crate::types::{Bar, Decision, OrderUpdate, PositionState};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Configuration trait for policies.
pub trait PolicyConfig: Send + Sync + Clone + 'static {
    /// Validate the configuration.
    fn validate(&self) -> Result<(), PolicyError>;
}

/// Everything a policy may read when evaluating one bar for one instrument.
///
/// Bars and position state are owned elsewhere (harness and gateway); the
/// context borrows them read-only for the duration of one evaluation.
#[derive(Debug, Clone, Copy)]
pub struct PolicyContext<'a> {
    /// Instrument the bar belongs to
    pub instrument: &'a str,
    /// The bar that triggered this evaluation
    pub bar: &'a Bar,
    /// Current position state for the instrument
    pub position: PositionState,
    /// Whether an order for the instrument is still unresolved
    pub order_pending: bool,
}

/// Snapshot of a policy's state for monitoring and serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicySnapshot {
    /// Policy name
    pub name: String,
    /// Number of bars evaluated
    pub bars_seen: usize,
    /// Number of non-hold decisions emitted
    pub intents_emitted: usize,
    /// Latest indicator values, keyed "<instrument>.<indicator>"
    pub indicators: HashMap<String, f64>,
    /// Policy-specific detail
    pub detail: serde_json::Value,
}

impl Default for PolicySnapshot {
    fn default() -> Self {
        Self {
            name: String::new(),
            bars_seen: 0,
            intents_emitted: 0,
            indicators: HashMap::new(),
            detail: serde_json::Value::Null,
        }
    }
}

/// Core decision-policy trait.
///
/// A policy is evaluated once per new bar per instrument and maps the
/// current indicator values, position state and pending-order state to a
/// `Decision`. Policies keep any mutable state (indicators, stop levels,
/// counters) per instrument, keyed by the instrument identifier.
///
/// Contract:
/// - While `ctx.order_pending` is set, the policy must feed its indicators
///   with the new bar but attempt no state transition and return
///   `Decision::Hold`.
/// - A policy never emits more than one non-hold decision per instrument
///   per bar.
pub trait DecisionPolicy: Send {
    /// Get the unique name of this policy.
    fn name(&self) -> &str;

    /// Evaluate one bar for one instrument.
    fn evaluate(&mut self, ctx: &PolicyContext<'_>) -> Decision;

    /// Called when an order reaches a terminal status.
    ///
    /// The update carries the order's own handle and fill data; policies
    /// must not assume it refers to the most recently submitted order.
    fn on_order_resolved(&mut self, _update: &OrderUpdate) {}

    /// Number of bars required before the policy can produce decisions.
    fn warmup_bars(&self) -> usize;

    /// Reset all per-instrument state.
    fn reset(&mut self);

    /// Get the current state for monitoring.
    fn snapshot(&self) -> PolicySnapshot;

    /// Get a description of the policy.
    fn description(&self) -> &str {
        ""
    }
}
