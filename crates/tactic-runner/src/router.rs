//! Order-intent router.

use rust_decimal::Decimal;
use std::collections::HashMap;
use tactic_core::error::GatewayError;
use tactic_core::traits::Gateway;
use tactic_core::types::{
    Bar, Decision, ExecutionMode, OrderHandle, OrderIntent, OrderUpdate, Side,
};

struct PendingOrder {
    handle: OrderHandle,
    policy: String,
}

/// What the router did with a decision.
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
    /// Hold: nothing to do
    None,
    /// An order for the instrument is still unresolved
    Suppressed,
    /// Notify-only mode: logged instead of submitted
    Notified,
    /// Submitted to the gateway
    Submitted(OrderHandle),
}

/// What the router did with an order update.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    /// Non-terminal status (submitted, accepted): ignored
    Ignored,
    /// Terminal status: pending marker cleared
    Resolved {
        /// The policy that originated the order, when known
        policy: Option<String>,
        /// The leg, read off the update's own side tag
        side: Side,
    },
}

/// Translates policy decisions into gateway calls and keeps the pending
/// markers.
///
/// At most one order may be outstanding per instrument: while one is, every
/// further decision for that instrument is suppressed. Markers live in a
/// map keyed by instrument and are removed on terminal status, so the state
/// stays O(live instruments).
pub struct OrderRouter {
    mode: ExecutionMode,
    order_quantity: Decimal,
    pending: HashMap<String, PendingOrder>,
}

impl OrderRouter {
    /// Create a router.
    pub fn new(mode: ExecutionMode, order_quantity: Decimal) -> Self {
        Self {
            mode,
            order_quantity,
            pending: HashMap::new(),
        }
    }

    /// The configured execution mode.
    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    /// Whether an order for the instrument is still unresolved.
    pub fn is_pending(&self, instrument: &str) -> bool {
        self.pending.contains_key(instrument)
    }

    /// Number of instruments with an unresolved order.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Act on one policy decision for one bar.
    pub async fn dispatch(
        &mut self,
        policy: &str,
        decision: Decision,
        instrument: &str,
        bar: &Bar,
        gateway: &dyn Gateway,
    ) -> Result<Dispatch, GatewayError> {
        let side = match decision {
            Decision::Hold => return Ok(Dispatch::None),
            Decision::EnterLong => Side::Buy,
            Decision::ExitLong => Side::Sell,
        };

        if self.is_pending(instrument) {
            tracing::debug!(policy, instrument, %decision, "suppressed while order pending");
            return Ok(Dispatch::Suppressed);
        }

        if self.mode == ExecutionMode::NotifyOnly {
            tracing::info!(
                policy,
                %side,
                instrument,
                price = bar.close,
                "notify-only: would submit order"
            );
            return Ok(Dispatch::Notified);
        }

        let intent = match side {
            Side::Buy => OrderIntent::enter_long(instrument, self.order_quantity),
            Side::Sell => OrderIntent::exit_long(instrument, self.order_quantity),
        };
        let handle = gateway.submit(intent).await?;
        tracing::info!(
            policy,
            %side,
            instrument,
            price = bar.close,
            order = %handle.id,
            "order submitted"
        );
        self.pending.insert(
            instrument.to_string(),
            PendingOrder {
                handle: handle.clone(),
                policy: policy.to_string(),
            },
        );

        Ok(Dispatch::Submitted(handle))
    }

    /// Act on one order update from the gateway.
    ///
    /// Non-terminal statuses are ignored. Terminal statuses clear the
    /// pending marker for the update's instrument and are logged as the leg
    /// named by the update's own side tag; canceled, margin-rejected and
    /// rejected orders are all handled identically (no retry).
    pub fn note_update(&mut self, update: &OrderUpdate) -> UpdateOutcome {
        if !update.status.is_terminal() {
            return UpdateOutcome::Ignored;
        }

        let instrument = &update.handle.instrument;
        let policy = match self.pending.remove(instrument) {
            Some(pending) if pending.handle.id == update.handle.id => Some(pending.policy),
            Some(pending) => {
                // Stale marker for another order: keep the slot clear anyway
                tracing::warn!(
                    instrument,
                    expected = %pending.handle.id,
                    got = %update.handle.id,
                    "terminal update did not match the pending order"
                );
                None
            }
            None => None,
        };

        let side = update.handle.side;
        match update.fill_value() {
            Some(value) => tracing::info!(
                %side,
                instrument,
                status = %update.status,
                price = %update.fill_price.unwrap_or_default(),
                %value,
                "order resolved"
            ),
            None => tracing::info!(
                %side,
                instrument,
                status = %update.status,
                "order resolved without fill"
            ),
        }

        UpdateOutcome::Resolved { policy, side }
    }
}
