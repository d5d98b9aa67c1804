//! Core traits for the decision-policy layer.

mod feed;
mod gateway;
mod indicator;
mod policy;

pub use feed::BarFeed;
pub use gateway::Gateway;
pub use indicator::StreamingIndicator;
pub use policy::{DecisionPolicy, PolicyConfig, PolicyContext, PolicySnapshot};
