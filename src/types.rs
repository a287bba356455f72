//! Core domain types shared across the crate.
//!
//! Everything is rebuilt from the two API calls on every run — none of
//! these types persist beyond a single invocation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Source records
// ---------------------------------------------------------------------------

/// Static metadata for a tradeable item, from the `/mapping` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItemMeta {
    pub id: u64,
    pub name: String,
    /// Maximum units tradeable within the GE's rolling 4-hour window.
    /// `None` means the item has no published limit (uncapped).
    pub buy_limit: Option<u64>,
    /// Members-only item flag, carried through for display/logging.
    pub members: bool,
    /// High alchemy value in gp, where published.
    pub high_alch: Option<u64>,
}

/// Latest instant-buy/instant-sell prices for one item, from `/latest`.
///
/// The live feed returns `null` prices for items with no recent trades;
/// such items are excluded from the join rather than treated as a parse
/// failure.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct PricePoint {
    /// Most recent instant-sell price (what a buyer paid).
    pub high: Option<u64>,
    pub high_time: Option<DateTime<Utc>>,
    /// Most recent instant-buy price (what a seller accepted).
    pub low: Option<u64>,
    pub low_time: Option<DateTime<Utc>>,
}

impl PricePoint {
    /// Whether both sides of the spread have been observed.
    pub fn is_complete(&self) -> bool {
        self.high.is_some() && self.low.is_some()
    }
}

// ---------------------------------------------------------------------------
// Derived records
// ---------------------------------------------------------------------------

/// A profitable flip candidate, derived by joining metadata and prices
/// for one item against the user's budget.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemProfit {
    pub id: u64,
    pub name: String,
    /// What we pay per unit (the instant-buy price).
    pub buy_price: u64,
    /// What we receive per unit before tax (the instant-sell price).
    pub sell_price: u64,
    /// Post-tax margin per unit. Always strictly positive — items with
    /// non-positive margin never become an `ItemProfit`.
    pub unit_profit: u64,
    pub buy_limit: Option<u64>,
    /// min(buy_limit, floor(budget / buy_price)); at least 1.
    pub capped_units: u64,
    /// unit_profit × capped_units.
    pub total_profit: u64,
    /// unit_profit / buy_price — profit per gp invested.
    pub profit_ratio: f64,
}

impl fmt::Display for ItemProfit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: buy={} sell={} margin={} units={} ratio={:.4}",
            self.name,
            self.buy_price,
            self.sell_price,
            self.unit_profit,
            self.capped_units,
            self.profit_ratio,
        )
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Domain-specific error taxonomy.
///
/// `Network` and `Parse` are fatal for a run; `Input` is recoverable
/// (the prompt loop reprompts). An empty result set is not an error.
#[derive(Debug, thiserror::Error)]
pub enum TraderError {
    #[error("Network error ({endpoint}): {message}")]
    Network { endpoint: String, message: String },

    #[error("Malformed response ({endpoint}): {message}")]
    Parse { endpoint: String, message: String },

    #[error("Invalid gold amount: {0}")]
    Input(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl TraderError {
    pub fn network(endpoint: &str, message: impl fmt::Display) -> Self {
        Self::Network {
            endpoint: endpoint.to_string(),
            message: message.to_string(),
        }
    }

    pub fn parse(endpoint: &str, message: impl fmt::Display) -> Self {
        Self::Parse {
            endpoint: endpoint.to_string(),
            message: message.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_point_completeness() {
        let full = PricePoint {
            high: Some(120),
            low: Some(100),
            ..Default::default()
        };
        let one_sided = PricePoint {
            high: Some(120),
            ..Default::default()
        };
        assert!(full.is_complete());
        assert!(!one_sided.is_complete());
        assert!(!PricePoint::default().is_complete());
    }

    #[test]
    fn test_item_profit_display() {
        let p = ItemProfit {
            id: 2,
            name: "Cannonball".to_string(),
            buy_price: 150,
            sell_price: 180,
            unit_profit: 29,
            buy_limit: Some(11_000),
            capped_units: 6666,
            total_profit: 193_314,
            profit_ratio: 0.1933,
        };
        let s = format!("{p}");
        assert!(s.contains("Cannonball"));
        assert!(s.contains("ratio=0.1933"));
    }

    #[test]
    fn test_error_display() {
        let e = TraderError::network("/latest", "connection refused");
        assert_eq!(e.to_string(), "Network error (/latest): connection refused");

        let e = TraderError::Input("12x".to_string());
        assert!(e.to_string().contains("12x"));
    }

    #[test]
    fn test_price_point_serde_roundtrip() {
        let p = PricePoint {
            high: Some(200),
            high_time: None,
            low: Some(150),
            low_time: None,
        };
        let json = serde_json::to_string(&p).unwrap();
        let back: PricePoint = serde_json::from_str(&json).unwrap();
        assert_eq!(p, back);
    }
}
