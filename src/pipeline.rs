//! Single-pass pipeline: fetch → join → compute → rank.
//!
//! The two endpoint fetches have no data dependency, so they run
//! concurrently and are joined before the compute step. Correctness
//! never depends on which finishes first — each snapshot is keyed by
//! item id.

use tracing::info;

use crate::api::PriceSource;
use crate::profit::ProfitCalculator;
use crate::rank::top_flips;
use crate::types::{ItemProfit, TraderError};

/// Run one full scan against `source` and return the ranked top flips.
///
/// Either fetch failing fails the run — there is no partial result.
pub async fn run_once(
    source: &dyn PriceSource,
    calculator: &ProfitCalculator,
    budget: u64,
    top_n: usize,
) -> Result<Vec<ItemProfit>, TraderError> {
    info!(source = source.name(), budget, "Starting price scan");

    let (metas, prices) = tokio::join!(source.fetch_mapping(), source.fetch_latest());
    let metas = metas?;
    let prices = prices?;

    let candidates = calculator.compute(budget, &metas, &prices);
    let ranked = top_flips(candidates, top_n);

    info!(shown = ranked.len(), "Scan complete");
    Ok(ranked)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
