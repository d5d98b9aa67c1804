//! Core types and traits for the decision-policy layer.
//!
//! This crate provides the foundational building blocks including:
//! - Market data types (Bar, BarSeries)
//! - Order intents, handles and status updates
//! - The `DecisionPolicy` and `Gateway` traits
//! - Error types shared across the workspace

pub mod types;
pub mod traits;
pub mod error;

pub use error::{TacticError, TacticResult};
pub use types::*;
pub use traits::*;
