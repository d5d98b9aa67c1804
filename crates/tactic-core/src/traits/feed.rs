//! Bar feed trait definition.

use crate::error::FeedError;
use crate::types::Bar;
use async_trait::async_trait;

/// Trait for historical bar sources.
#[async_trait]
pub trait BarFeed: Send + Sync {
    /// Load all bars for an instrument, ordered oldest to newest.
    async fn load(&self, instrument: &str) -> Result<Vec<Bar>, FeedError>;

    /// Get the feed name.
    fn name(&self) -> &str;
}
