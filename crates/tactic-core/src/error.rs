//! Error types for the decision-policy layer.

use thiserror::Error;

/// Top-level error for the workspace.
#[derive(Error, Debug)]
pub enum TacticError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Policy error: {0}")]
    Policy(#[from] PolicyError),

    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Feed error: {0}")]
    Feed(#[from] FeedError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Policy-specific errors.
#[derive(Error, Debug)]
pub enum PolicyError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Policy not found: {0}")]
    NotFound(String),
}

/// Gateway-specific errors.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("An order is already pending for {instrument}")]
    AlreadyPending { instrument: String },

    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Submission refused: {0}")]
    SubmissionRefused(String),
}

/// Bar feed errors.
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("No data available at {0}")]
    NoDataAvailable(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Result type alias for workspace operations.
pub type TacticResult<T> = Result<T, TacticError>;
