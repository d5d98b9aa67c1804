//! Paper gateway for replay and simulation.

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use tactic_core::error::GatewayError;
use tactic_core::traits::Gateway;
use tactic_core::types::{
    OrderHandle, OrderIntent, OrderStatus, OrderUpdate, PositionState, Side,
};

struct OpenOrder {
    handle: OrderHandle,
    quantity: Decimal,
}

struct Inner {
    /// Long quantity per instrument; absent means flat
    positions: HashMap<String, Decimal>,
    open_orders: Vec<OpenOrder>,
    marks: HashMap<String, f64>,
    updates: VecDeque<OrderUpdate>,
    cash: Option<Decimal>,
    forced_outcomes: HashMap<String, OrderStatus>,
}

/// Simulated gateway backing the replay harness.
///
/// Submission is fire-and-forget: `submit` records the order and queues a
/// `Submitted` update; the terminal status is produced by the next
/// `resolve_open` pump at the last marked price, so fills always arrive as
/// later, separately dispatched events.
pub struct PaperGateway {
    inner: Mutex<Inner>,
}

impl PaperGateway {
    /// Create a paper gateway with unlimited buying power.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                positions: HashMap::new(),
                open_orders: Vec::new(),
                marks: HashMap::new(),
                updates: VecDeque::new(),
                cash: None,
                forced_outcomes: HashMap::new(),
            }),
        }
    }

    /// Limit buying power; buys beyond it resolve as MarginRejected.
    pub fn with_cash(self, cash: Decimal) -> Self {
        self.inner.lock().unwrap().cash = Some(cash);
        self
    }

    /// Record the latest close for an instrument; used as the fill price.
    pub fn mark_price(&self, instrument: &str, close: f64) {
        let mut inner = self.inner.lock().unwrap();
        inner.marks.insert(instrument.to_string(), close);
    }

    /// Force the next resolution for an instrument to a given terminal
    /// status instead of a fill.
    pub fn force_outcome(&self, instrument: &str, status: OrderStatus) {
        assert!(status.is_terminal(), "forced outcome must be terminal");
        let mut inner = self.inner.lock().unwrap();
        inner.forced_outcomes.insert(instrument.to_string(), status);
    }

    /// Resolve every open order at its instrument's marked price.
    ///
    /// Orders whose instrument has no mark yet stay open for a later pump.
    pub fn resolve_open(&self) {
        let mut inner = self.inner.lock().unwrap();
        let open = std::mem::take(&mut inner.open_orders);

        for order in open {
            let instrument = order.handle.instrument.clone();

            if let Some(status) = inner.forced_outcomes.remove(&instrument) {
                tracing::debug!(%instrument, %status, "forced order outcome");
                push_update(&mut inner, order.handle, status, None, None);
                continue;
            }

            let mark = match inner.marks.get(&instrument) {
                Some(&mark) => mark,
                None => {
                    inner.open_orders.push(order);
                    continue;
                }
            };
            let price = Decimal::try_from(mark).unwrap_or(Decimal::ZERO);

            match order.handle.side {
                Side::Buy => {
                    let cost = price * order.quantity;
                    if let Some(cash) = inner.cash {
                        if cost > cash {
                            push_update(
                                &mut inner,
                                order.handle,
                                OrderStatus::MarginRejected,
                                None,
                                None,
                            );
                            continue;
                        }
                        inner.cash = Some(cash - cost);
                    }
                    *inner
                        .positions
                        .entry(instrument)
                        .or_insert(Decimal::ZERO) += order.quantity;
                    push_update(
                        &mut inner,
                        order.handle,
                        OrderStatus::Filled,
                        Some(price),
                        Some(order.quantity),
                    );
                }
                Side::Sell => {
                    // A sell closes the whole holding
                    let held = inner
                        .positions
                        .remove(&instrument)
                        .unwrap_or(Decimal::ZERO);
                    if held <= Decimal::ZERO {
                        push_update(&mut inner, order.handle, OrderStatus::Rejected, None, None);
                        continue;
                    }
                    if let Some(cash) = inner.cash {
                        inner.cash = Some(cash + price * held);
                    }
                    push_update(
                        &mut inner,
                        order.handle,
                        OrderStatus::Filled,
                        Some(price),
                        Some(held),
                    );
                }
            }
        }
    }

    /// Quantity currently held for an instrument.
    pub fn held_quantity(&self, instrument: &str) -> Decimal {
        let inner = self.inner.lock().unwrap();
        inner
            .positions
            .get(instrument)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }
}

impl Default for PaperGateway {
    fn default() -> Self {
        Self::new()
    }
}

fn push_update(
    inner: &mut Inner,
    handle: OrderHandle,
    status: OrderStatus,
    fill_price: Option<Decimal>,
    fill_quantity: Option<Decimal>,
) {
    inner.updates.push_back(OrderUpdate {
        handle,
        status,
        fill_price,
        fill_quantity,
        timestamp: Utc::now(),
    });
}

#[async_trait]
impl Gateway for PaperGateway {
    async fn submit(&self, intent: OrderIntent) -> Result<OrderHandle, GatewayError> {
        let mut inner = self.inner.lock().unwrap();

        if inner
            .open_orders
            .iter()
            .any(|o| o.handle.instrument == intent.instrument)
        {
            return Err(GatewayError::AlreadyPending {
                instrument: intent.instrument,
            });
        }

        let handle = OrderHandle::for_intent(&intent);
        push_update(&mut inner, handle.clone(), OrderStatus::Submitted, None, None);
        push_update(&mut inner, handle.clone(), OrderStatus::Accepted, None, None);
        inner.open_orders.push(OpenOrder {
            handle: handle.clone(),
            quantity: intent.quantity,
        });

        Ok(handle)
    }

    async fn position(&self, instrument: &str) -> Result<PositionState, GatewayError> {
        let inner = self.inner.lock().unwrap();
        let holding = inner
            .positions
            .get(instrument)
            .map(|qty| *qty > Decimal::ZERO)
            .unwrap_or(false);
        Ok(if holding {
            PositionState::Holding
        } else {
            PositionState::Flat
        })
    }

    async fn drain_updates(&self) -> Vec<OrderUpdate> {
        let mut inner = self.inner.lock().unwrap();
        inner.updates.drain(..).collect()
    }

    fn name(&self) -> &str {
        "paper"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_submit_then_fill() {
        let gateway = PaperGateway::new();
        gateway.mark_price("AAPL", 150.0);

        let handle = gateway
            .submit(OrderIntent::enter_long("AAPL", dec!(2)))
            .await
            .unwrap();

        // Fire-and-forget: only non-terminal statuses so far
        let updates = gateway.drain_updates().await;
        assert_eq!(updates.len(), 2);
        assert!(updates.iter().all(|u| !u.status.is_terminal()));

        gateway.resolve_open();
        let updates = gateway.drain_updates().await;
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].status, OrderStatus::Filled);
        assert_eq!(updates[0].handle.id, handle.id);
        assert_eq!(updates[0].fill_price, Some(dec!(150.0)));

        assert_eq!(
            gateway.position("AAPL").await.unwrap(),
            PositionState::Holding
        );
        assert_eq!(gateway.held_quantity("AAPL"), dec!(2));
    }

    #[tokio::test]
    async fn test_second_submission_refused_while_open() {
        let gateway = PaperGateway::new();

        gateway
            .submit(OrderIntent::enter_long("AAPL", dec!(1)))
            .await
            .unwrap();

        let err = gateway
            .submit(OrderIntent::enter_long("AAPL", dec!(1)))
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::AlreadyPending { .. }));
    }

    #[tokio::test]
    async fn test_sell_closes_whole_holding() {
        let gateway = PaperGateway::new();
        gateway.mark_price("AAPL", 100.0);

        gateway
            .submit(OrderIntent::enter_long("AAPL", dec!(3)))
            .await
            .unwrap();
        gateway.resolve_open();
        gateway.drain_updates().await;

        gateway
            .submit(OrderIntent::exit_long("AAPL", dec!(1)))
            .await
            .unwrap();
        gateway.mark_price("AAPL", 110.0);
        gateway.resolve_open();

        let updates = gateway.drain_updates().await;
        let fill = updates.iter().find(|u| u.status.is_terminal()).unwrap();
        assert_eq!(fill.status, OrderStatus::Filled);
        assert_eq!(fill.fill_quantity, Some(dec!(3)));
        assert_eq!(
            gateway.position("AAPL").await.unwrap(),
            PositionState::Flat
        );
    }

    #[tokio::test]
    async fn test_margin_rejection() {
        let gateway = PaperGateway::new().with_cash(dec!(100));
        gateway.mark_price("AAPL", 150.0);

        gateway
            .submit(OrderIntent::enter_long("AAPL", dec!(1)))
            .await
            .unwrap();
        gateway.drain_updates().await;
        gateway.resolve_open();

        let updates = gateway.drain_updates().await;
        assert_eq!(updates[0].status, OrderStatus::MarginRejected);
        assert_eq!(
            gateway.position("AAPL").await.unwrap(),
            PositionState::Flat
        );
    }

    #[tokio::test]
    async fn test_forced_outcome() {
        let gateway = PaperGateway::new();
        gateway.mark_price("AAPL", 150.0);
        gateway.force_outcome("AAPL", OrderStatus::Canceled);

        gateway
            .submit(OrderIntent::enter_long("AAPL", dec!(1)))
            .await
            .unwrap();
        gateway.drain_updates().await;
        gateway.resolve_open();

        let updates = gateway.drain_updates().await;
        assert_eq!(updates[0].status, OrderStatus::Canceled);
    }

    #[tokio::test]
    async fn test_sell_without_position_rejected() {
        let gateway = PaperGateway::new();
        gateway.mark_price("AAPL", 150.0);

        gateway
            .submit(OrderIntent::exit_long("AAPL", dec!(1)))
            .await
            .unwrap();
        gateway.drain_updates().await;
        gateway.resolve_open();

        let updates = gateway.drain_updates().await;
        assert_eq!(updates[0].status, OrderStatus::Rejected);
    }

    #[tokio::test]
    async fn test_unmarked_instrument_stays_open() {
        let gateway = PaperGateway::new();

        gateway
            .submit(OrderIntent::enter_long("MSFT", dec!(1)))
            .await
            .unwrap();
        gateway.drain_updates().await;
        gateway.resolve_open();

        // No mark yet: no terminal update, order still open
        assert!(gateway.drain_updates().await.is_empty());

        gateway.mark_price("MSFT", 50.0);
        gateway.resolve_open();
        let updates = gateway.drain_updates().await;
        assert_eq!(updates[0].status, OrderStatus::Filled);
    }
}
