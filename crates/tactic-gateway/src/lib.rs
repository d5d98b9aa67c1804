//! Position/order gateway implementations.
//!
//! The only implementation here is the paper gateway used by the replay
//! harness; live brokerage connectivity is deliberately out of scope.

mod paper;

pub use paper::PaperGateway;
