//! Price data sources.
//!
//! Defines the `PriceSource` trait and provides the OSRS Wiki real-time
//! price API implementation. The trait is the seam the pipeline and the
//! integration tests plug into.

pub mod wiki;

use async_trait::async_trait;
use std::collections::HashMap;

use crate::types::{ItemMeta, PricePoint, TraderError};

/// Abstraction over a price-index API.
///
/// Implementors provide the two read-only snapshots the pipeline joins:
/// item metadata (name, buy limit) and latest prices, both keyed by
/// item id.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Fetch item metadata for all tradeable items.
    async fn fetch_mapping(&self) -> Result<HashMap<u64, ItemMeta>, TraderError>;

    /// Fetch the latest instant-buy/instant-sell prices.
    async fn fetch_latest(&self) -> Result<HashMap<u64, PricePoint>, TraderError>;

    /// Source name for logging and identification.
    fn name(&self) -> &str;
}
