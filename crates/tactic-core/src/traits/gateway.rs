//! Gateway trait definition.

use crate::error::GatewayError;
use crate::types::{OrderHandle, OrderIntent, OrderUpdate, PositionState};
use async_trait::async_trait;

/// Trait for position/order gateways.
///
/// A gateway accepts direction-tagged order intents, tracks position state,
/// and reports order resolution asynchronously. Submission is
/// fire-and-forget: `submit` returns a handle immediately and the terminal
/// status arrives later through `drain_updates`, dispatched on the same
/// single-threaded event timeline as the bars.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Submit an order intent.
    ///
    /// # Returns
    /// The handle referencing the new order, carrying its side tag.
    async fn submit(&self, intent: OrderIntent) -> Result<OrderHandle, GatewayError>;

    /// Current position state for an instrument.
    async fn position(&self, instrument: &str) -> Result<PositionState, GatewayError>;

    /// Take all order updates produced since the last call.
    ///
    /// Updates are returned in the order they were produced.
    async fn drain_updates(&self) -> Vec<OrderUpdate>;

    /// Get the gateway name.
    fn name(&self) -> &str;
}
