//! Core data types for the decision-policy layer.

mod bar;
mod decision;
mod order;

pub use bar::{Bar, BarSeries};
pub use decision::Decision;
pub use order::{
    ExecutionMode, OrderHandle, OrderId, OrderIntent, OrderStatus, OrderUpdate, PositionState,
    Side,
};
