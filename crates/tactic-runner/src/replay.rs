//! Bar replay harness.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tactic_core::error::TacticError;
use tactic_core::traits::{DecisionPolicy, Gateway, PolicyContext, PolicySnapshot};
use tactic_core::types::{Bar, BarSeries, ExecutionMode, OrderStatus};
use tactic_gateway::PaperGateway;

use crate::router::{OrderRouter, UpdateOutcome};

/// Replay configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayConfig {
    /// How decisions are acted on
    pub mode: ExecutionMode,
    /// Quantity per entry order
    pub order_quantity: Decimal,
    /// Optional buying-power limit for the paper gateway
    pub cash: Option<Decimal>,
    /// Bars retained per instrument series
    pub series_capacity: usize,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            mode: ExecutionMode::AutoExecute,
            order_quantity: Decimal::ONE,
            cash: None,
            series_capacity: 500,
        }
    }
}

/// Counters and final policy snapshots from one replay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplaySummary {
    /// Bar events processed
    pub bars_processed: usize,
    /// Non-hold decisions seen (including suppressed ones)
    pub intents_emitted: usize,
    /// Orders handed to the gateway
    pub orders_submitted: usize,
    /// Orders that resolved as filled
    pub orders_filled: usize,
    /// Orders that resolved canceled, margin-rejected or rejected
    pub orders_rejected: usize,
    /// Final state of each registered policy
    pub policies: Vec<PolicySnapshot>,
}

impl std::fmt::Display for ReplaySummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "bars processed:   {}", self.bars_processed)?;
        writeln!(f, "intents emitted:  {}", self.intents_emitted)?;
        writeln!(f, "orders submitted: {}", self.orders_submitted)?;
        writeln!(f, "orders filled:    {}", self.orders_filled)?;
        writeln!(f, "orders rejected:  {}", self.orders_rejected)?;
        for policy in &self.policies {
            writeln!(
                f,
                "policy {}: {} bars, {} intents",
                policy.name, policy.bars_seen, policy.intents_emitted
            )?;
        }
        Ok(())
    }
}

/// Single-threaded, cooperative replay over one or more instruments.
///
/// Bars are merged into one chronological stream and delivered one event at
/// a time; each event runs to completion before the next is dispatched.
/// Order resolution happens in a pump at the start of the following event,
/// so fills arrive as later, separately dispatched notifications.
pub struct ReplayHarness {
    config: ReplayConfig,
    policies: Vec<Box<dyn DecisionPolicy>>,
    router: OrderRouter,
    gateway: PaperGateway,
    series: HashMap<String, BarSeries>,
}

impl ReplayHarness {
    /// Create a harness from a replay configuration.
    pub fn new(config: ReplayConfig) -> Self {
        let mut gateway = PaperGateway::new();
        if let Some(cash) = config.cash {
            gateway = gateway.with_cash(cash);
        }
        let router = OrderRouter::new(config.mode, config.order_quantity);
        Self {
            config,
            policies: Vec::new(),
            router,
            gateway,
            series: HashMap::new(),
        }
    }

    /// Register a policy. Policies are evaluated in registration order.
    pub fn register(&mut self, policy: Box<dyn DecisionPolicy>) {
        tracing::info!(policy = policy.name(), "policy registered");
        self.policies.push(policy);
    }

    /// Number of registered policies.
    pub fn policy_count(&self) -> usize {
        self.policies.len()
    }

    /// Replay the given per-instrument bars through every registered policy.
    pub async fn run(
        &mut self,
        data: HashMap<String, Vec<Bar>>,
    ) -> Result<ReplaySummary, TacticError> {
        let mut events: Vec<(i64, String, Bar)> = Vec::new();
        for (instrument, bars) in data {
            for bar in bars {
                events.push((bar.timestamp, instrument.clone(), bar));
            }
        }
        // Chronological order; ties broken by instrument for determinism
        events.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));

        let mut summary = ReplaySummary {
            bars_processed: 0,
            intents_emitted: 0,
            orders_submitted: 0,
            orders_filled: 0,
            orders_rejected: 0,
            policies: Vec::new(),
        };

        for (_, instrument, bar) in events {
            // Resolve orders from earlier events at the newest price, then
            // deliver their notifications before this bar is evaluated
            self.gateway.mark_price(&instrument, bar.close);
            self.gateway.resolve_open();
            self.pump_updates(&mut summary).await;

            let capacity = self.config.series_capacity;
            let series = self
                .series
                .entry(instrument.clone())
                .or_insert_with(|| BarSeries::with_capacity(instrument.clone(), capacity));
            series.push(bar);

            let position = self.gateway.position(&instrument).await?;
            for policy in &mut self.policies {
                let ctx = PolicyContext {
                    instrument: &instrument,
                    bar: &bar,
                    position,
                    order_pending: self.router.is_pending(&instrument),
                };
                let decision = policy.evaluate(&ctx);
                if decision.is_actionable() {
                    summary.intents_emitted += 1;
                }
                let dispatch = self
                    .router
                    .dispatch(policy.name(), decision, &instrument, &bar, &self.gateway)
                    .await?;
                if matches!(dispatch, crate::router::Dispatch::Submitted(_)) {
                    summary.orders_submitted += 1;
                }
            }

            summary.bars_processed += 1;
        }

        // Orders from the final bar still resolve
        self.gateway.resolve_open();
        self.pump_updates(&mut summary).await;

        summary.policies = self.policies.iter().map(|p| p.snapshot()).collect();
        Ok(summary)
    }

    async fn pump_updates(&mut self, summary: &mut ReplaySummary) {
        for update in self.gateway.drain_updates().await {
            match self.router.note_update(&update) {
                UpdateOutcome::Ignored => {}
                UpdateOutcome::Resolved { policy, .. } => {
                    if update.status == OrderStatus::Filled {
                        summary.orders_filled += 1;
                    } else {
                        summary.orders_rejected += 1;
                    }
                    match policy {
                        Some(name) => {
                            for p in self.policies.iter_mut().filter(|p| p.name() == name) {
                                p.on_order_resolved(&update);
                            }
                        }
                        // Unknown origin: let every policy see it
                        None => {
                            for p in self.policies.iter_mut() {
                                p.on_order_resolved(&update);
                            }
                        }
                    }
                }
            }
        }
    }

    /// Reset for a fresh run: policies, series, router and gateway.
    pub fn reset(&mut self) {
        for policy in self.policies.iter_mut() {
            policy.reset();
        }
        self.series.clear();
        self.router = OrderRouter::new(self.config.mode, self.config.order_quantity);
        let mut gateway = PaperGateway::new();
        if let Some(cash) = self.config.cash {
            gateway = gateway.with_cash(cash);
        }
        self.gateway = gateway;
    }

    /// The execution mode this harness runs in.
    pub fn mode(&self) -> ExecutionMode {
        self.router.mode()
    }
}
