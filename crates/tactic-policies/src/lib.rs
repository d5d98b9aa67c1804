//! Decision policy implementations.
//!
//! This crate provides the rule-based policies evaluated once per new bar
//! per instrument:
//! - RSI threshold (oversold entry / overbought exit)
//! - Momentum reversal (two-bar decline entry, time-based exit)
//! - Trend following (MACD crossover entry, ratcheting ATR trailing stop)

mod momentum_reversal;
mod registry;
mod rsi_threshold;
mod trend_follow;

pub use momentum_reversal::{MomentumReversalConfig, MomentumReversalPolicy};
pub use registry::{PolicyInfo, PolicyRegistry};
pub use rsi_threshold::{RsiThresholdConfig, RsiThresholdPolicy};
pub use trend_follow::{TrendFollowConfig, TrendFollowPolicy};
