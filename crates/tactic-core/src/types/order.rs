//! Order intents, handles and status updates.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Order side (buy or sell).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Get the opposite side.
    pub fn opposite(&self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

/// Unique order identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderId(Uuid);

impl OrderId {
    /// Generate a fresh identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A request to enter or leave a long position.
///
/// The direction is tagged on the intent at creation time, so every
/// downstream consumer (gateway, router, log lines) can classify the leg
/// without consulting a side table of previously issued identifiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderIntent {
    /// Instrument identifier
    pub instrument: String,
    /// Buy or sell
    pub side: Side,
    /// Quantity to trade
    pub quantity: Decimal,
}

impl OrderIntent {
    /// Intent to open a long position.
    pub fn enter_long(instrument: impl Into<String>, quantity: Decimal) -> Self {
        Self {
            instrument: instrument.into(),
            side: Side::Buy,
            quantity,
        }
    }

    /// Intent to close a long position.
    pub fn exit_long(instrument: impl Into<String>, quantity: Decimal) -> Self {
        Self {
            instrument: instrument.into(),
            side: Side::Sell,
            quantity,
        }
    }
}

/// Reference to a submitted order.
///
/// Returned by `Gateway::submit` and echoed on every `OrderUpdate`, carrying
/// the side tag with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderHandle {
    /// Unique order ID
    pub id: OrderId,
    /// Instrument the order trades
    pub instrument: String,
    /// Buy or sell leg
    pub side: Side,
}

impl OrderHandle {
    /// Create a handle for a freshly submitted intent.
    pub fn for_intent(intent: &OrderIntent) -> Self {
        Self {
            id: OrderId::generate(),
            instrument: intent.instrument.clone(),
            side: intent.side,
        }
    }
}

/// Order status reported by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Order submitted to the gateway
    Submitted,
    /// Order accepted by the venue
    Accepted,
    /// Order completely filled
    Filled,
    /// Order canceled
    Canceled,
    /// Order rejected for insufficient margin
    MarginRejected,
    /// Order rejected
    Rejected,
}

impl OrderStatus {
    /// Check if the order has reached a terminal state.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, OrderStatus::Submitted | OrderStatus::Accepted)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::Submitted => write!(f, "submitted"),
            OrderStatus::Accepted => write!(f, "accepted"),
            OrderStatus::Filled => write!(f, "filled"),
            OrderStatus::Canceled => write!(f, "canceled"),
            OrderStatus::MarginRejected => write!(f, "margin_rejected"),
            OrderStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// Asynchronous order-status notification.
///
/// Delivered by the gateway on the single-threaded event timeline, after the
/// bar event that produced the order. Carries everything the notification
/// path needs; handlers must not reach back into shared "last order" state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderUpdate {
    /// The order this update refers to
    pub handle: OrderHandle,
    /// New status
    pub status: OrderStatus,
    /// Fill price, present on Filled updates
    pub fill_price: Option<Decimal>,
    /// Fill quantity, present on Filled updates
    pub fill_quantity: Option<Decimal>,
    /// When the update was produced
    pub timestamp: DateTime<Utc>,
}

impl OrderUpdate {
    /// Notional value of the fill, when price and quantity are present.
    pub fn fill_value(&self) -> Option<Decimal> {
        match (self.fill_price, self.fill_quantity) {
            (Some(price), Some(qty)) => Some(price * qty),
            _ => None,
        }
    }
}

/// Position state for one instrument: no open position, or an open long.
///
/// Owned by the gateway and mutated only by confirmed fills. There is no
/// short-selling state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PositionState {
    #[default]
    Flat,
    Holding,
}

impl PositionState {
    /// Check whether a long position is open.
    pub fn is_holding(&self) -> bool {
        matches!(self, PositionState::Holding)
    }
}

/// How the router acts on a policy decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// Submit orders to the gateway
    #[default]
    AutoExecute,
    /// Log the intended order instead of submitting it
    NotifyOnly,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_intent_sides() {
        let enter = OrderIntent::enter_long("AAPL", dec!(1));
        assert_eq!(enter.side, Side::Buy);

        let exit = OrderIntent::exit_long("AAPL", dec!(1));
        assert_eq!(exit.side, Side::Sell);
    }

    #[test]
    fn test_handle_carries_side_tag() {
        let intent = OrderIntent::exit_long("MSFT", dec!(2));
        let handle = OrderHandle::for_intent(&intent);

        assert_eq!(handle.instrument, "MSFT");
        assert_eq!(handle.side, Side::Sell);
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(!OrderStatus::Submitted.is_terminal());
        assert!(!OrderStatus::Accepted.is_terminal());
        assert!(OrderStatus::Filled.is_terminal());
        assert!(OrderStatus::Canceled.is_terminal());
        assert!(OrderStatus::MarginRejected.is_terminal());
        assert!(OrderStatus::Rejected.is_terminal());
    }

    #[test]
    fn test_fill_value() {
        let intent = OrderIntent::enter_long("AAPL", dec!(3));
        let update = OrderUpdate {
            handle: OrderHandle::for_intent(&intent),
            status: OrderStatus::Filled,
            fill_price: Some(dec!(150.00)),
            fill_quantity: Some(dec!(3)),
            timestamp: Utc::now(),
        };

        assert_eq!(update.fill_value(), Some(dec!(450.00)));
    }

    #[test]
    fn test_side_opposite() {
        assert_eq!(Side::Buy.opposite(), Side::Sell);
        assert_eq!(Side::Sell.opposite(), Side::Buy);
    }
}
