use crate::models::{ListingRecord, Source};
use anyhow::Result;
use async_trait::async_trait;

/// Common trait for rental listing sources
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Fetch and parse the current listings
    async fn listings(&self) -> Result<Vec<ListingRecord>>;

    /// Which site the listings come from
    fn source(&self) -> Source;
}
