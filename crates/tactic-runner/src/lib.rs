//! Order-intent routing and bar replay.
//!
//! The router translates policy decisions into gateway submissions (or log
//! lines in notify-only mode) and keeps the one-pending-order-per-instrument
//! invariant. The replay harness drives registered policies over a
//! chronological bar stream, one event at a time.

mod replay;
mod router;

pub use replay::{ReplayConfig, ReplayHarness, ReplaySummary};
pub use router::{Dispatch, OrderRouter, UpdateOutcome};
