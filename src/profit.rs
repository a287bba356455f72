//! Profit-per-gp computation.
//!
//! Joins the metadata and price snapshots by item id and derives a flip
//! candidate per item: post-tax unit margin, affordability-capped units,
//! total profit, and the profit ratio the ranking sorts on.

use std::collections::HashMap;
use tracing::{debug, info};

use crate::config::TaxConfig;
use crate::types::{ItemMeta, ItemProfit, PricePoint};

/// Derives `ItemProfit` records from the two id-keyed snapshots.
pub struct ProfitCalculator {
    rate: f64,
    cap: u64,
}

impl ProfitCalculator {
    pub fn new(tax: &TaxConfig) -> Self {
        Self {
            rate: tax.rate,
            cap: tax.cap,
        }
    }

    /// Per-unit sale tax: `floor(sell_price × rate)`, capped.
    pub fn sale_tax(&self, sell_price: u64) -> u64 {
        let fee = (sell_price as f64 * self.rate).floor() as u64;
        fee.min(self.cap)
    }

    /// Compute flip candidates for every item present in both snapshots.
    ///
    /// Excluded, in order of checking:
    /// - items missing from either snapshot (join invariant)
    /// - items with a null buy or sell price (no recent trades)
    /// - `buy_price == 0` (invalid data, division guard)
    /// - non-positive post-tax margin
    /// - items the budget cannot afford a single unit of — a budget below
    ///   the cheapest buy price therefore yields an empty list, not an error
    pub fn compute(
        &self,
        budget: u64,
        metas: &HashMap<u64, ItemMeta>,
        prices: &HashMap<u64, PricePoint>,
    ) -> Vec<ItemProfit> {
        let mut candidates = Vec::new();
        let mut missing_price = 0usize;
        let mut incomplete = 0usize;
        let mut unprofitable = 0usize;
        let mut unaffordable = 0usize;

        for (id, meta) in metas {
            let Some(price) = prices.get(id) else {
                missing_price += 1;
                continue;
            };

            let (Some(sell_price), Some(buy_price)) = (price.high, price.low) else {
                incomplete += 1;
                continue;
            };

            if buy_price == 0 {
                incomplete += 1;
                continue;
            }

            let tax = self.sale_tax(sell_price);
            let margin = sell_price as i64 - buy_price as i64 - tax as i64;
            if margin <= 0 {
                unprofitable += 1;
                continue;
            }
            let unit_profit = margin as u64;

            let affordable_units = budget / buy_price;
            let capped_units = affordable_units.min(meta.buy_limit.unwrap_or(u64::MAX));
            if capped_units == 0 {
                unaffordable += 1;
                continue;
            }

            candidates.push(ItemProfit {
                id: *id,
                name: meta.name.clone(),
                buy_price,
                sell_price,
                unit_profit,
                buy_limit: meta.buy_limit,
                capped_units,
                // A max-size budget on an uncapped 1 gp item can push the
                // product past u64::MAX; saturate rather than panic/wrap.
                total_profit: unit_profit.saturating_mul(capped_units),
                profit_ratio: unit_profit as f64 / buy_price as f64,
            });
        }

        debug!(
            missing_price,
            incomplete, unprofitable, unaffordable, "Items excluded from join"
        );
        info!(
            budget,
            metas = metas.len(),
            prices = prices.len(),
            candidates = candidates.len(),
            "Profit computation complete"
        );

        candidates
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TaxConfig;

    fn calc() -> ProfitCalculator {
        ProfitCalculator::new(&TaxConfig::default())
    }

    fn make_meta(id: u64, name: &str, limit: Option<u64>) -> ItemMeta {
        ItemMeta {
            id,
            name: name.to_string(),
            buy_limit: limit,
            members: false,
            high_alch: None,
        }
    }

    fn make_price(high: u64, low: u64) -> PricePoint {
        PricePoint {
            high: Some(high),
            low: Some(low),
            ..Default::default()
        }
    }

    fn snapshots(
        items: Vec<(ItemMeta, PricePoint)>,
    ) -> (HashMap<u64, ItemMeta>, HashMap<u64, PricePoint>) {
        let mut metas = HashMap::new();
        let mut prices = HashMap::new();
        for (meta, price) in items {
            prices.insert(meta.id, price);
            metas.insert(meta.id, meta);
        }
        (metas, prices)
    }

    // -- Tax tests --

    #[test]
    fn test_sale_tax_one_percent() {
        let c = calc();
        assert_eq!(c.sale_tax(100), 1);
        assert_eq!(c.sale_tax(199), 1); // floor
        assert_eq!(c.sale_tax(10_000), 100);
    }

    #[test]
    fn test_sale_tax_capped() {
        let c = calc();
        // 1% of 1b is 10m, cap is 5m
        assert_eq!(c.sale_tax(1_000_000_000), 5_000_000);
    }

    #[test]
    fn test_sale_tax_custom_rate() {
        let c = ProfitCalculator::new(&TaxConfig {
            rate: 0.02,
            cap: 1000,
        });
        assert_eq!(c.sale_tax(10_000), 200);
        assert_eq!(c.sale_tax(100_000), 1000); // capped
    }

    // -- Margin tests --

    #[test]
    fn test_unit_profit_after_tax() {
        // sell 10000, buy 9000, tax 100 → margin 900, ratio 0.1
        let (metas, prices) = snapshots(vec![(
            make_meta(1, "Rune scimitar", Some(100)),
            make_price(10_000, 9_000),
        )]);
        let out = calc().compute(1_000_000, &metas, &prices);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].unit_profit, 900);
        assert!((out[0].profit_ratio - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_nonpositive_margin_excluded() {
        // sell 100, buy 100 → margin -1 after tax
        let (metas, prices) = snapshots(vec![
            (make_meta(1, "Flat", Some(100)), make_price(100, 100)),
            // sell 101, buy 100, tax 1 → margin exactly 0
            (make_meta(2, "Break-even", Some(100)), make_price(101, 100)),
        ]);
        let out = calc().compute(1_000_000, &metas, &prices);
        assert!(out.is_empty());
    }

    #[test]
    fn test_zero_buy_price_excluded() {
        let (metas, prices) = snapshots(vec![(
            make_meta(1, "Glitched", Some(100)),
            make_price(500, 0),
        )]);
        let out = calc().compute(1_000_000, &metas, &prices);
        assert!(out.is_empty());
    }

    // -- Join tests --

    #[test]
    fn test_missing_price_dropped() {
        let mut metas = HashMap::new();
        metas.insert(1, make_meta(1, "Priced", Some(10)));
        metas.insert(2, make_meta(2, "Unpriced", Some(10)));
        let mut prices = HashMap::new();
        prices.insert(1, make_price(2000, 1000));
        // Item 3 has a price but no metadata
        prices.insert(3, make_price(2000, 1000));

        let out = calc().compute(1_000_000, &metas, &prices);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, 1);
    }

    #[test]
    fn test_null_price_side_dropped() {
        let (metas, prices) = snapshots(vec![(
            make_meta(1, "Stale", Some(10)),
            PricePoint {
                high: Some(2000),
                low: None,
                ..Default::default()
            },
        )]);
        let out = calc().compute(1_000_000, &metas, &prices);
        assert!(out.is_empty());
    }

    // -- Affordability tests --

    #[test]
    fn test_budget_below_cheapest_is_empty_not_error() {
        let (metas, prices) = snapshots(vec![(
            make_meta(1, "Whip", Some(8)),
            make_price(2_000_000, 1_500_000),
        )]);
        let out = calc().compute(100, &metas, &prices);
        assert!(out.is_empty());
    }

    #[test]
    fn test_units_capped_by_budget() {
        // budget 10k, buy 3k → 3 affordable, limit 100
        let (metas, prices) = snapshots(vec![(
            make_meta(1, "Addy bar", Some(100)),
            make_price(4_000, 3_000),
        )]);
        let out = calc().compute(10_000, &metas, &prices);
        assert_eq!(out[0].capped_units, 3);
        assert_eq!(out[0].total_profit, out[0].unit_profit * 3);
    }

    #[test]
    fn test_units_capped_by_buy_limit() {
        // budget affords 1000, limit 70
        let (metas, prices) = snapshots(vec![(
            make_meta(1, "Nature rune", Some(70)),
            make_price(200, 100),
        )]);
        let out = calc().compute(100_000, &metas, &prices);
        assert_eq!(out[0].capped_units, 70);
    }

    #[test]
    fn test_no_limit_capped_by_affordability_only() {
        let (metas, prices) = snapshots(vec![(
            make_meta(1, "Unlimited", None),
            make_price(200, 100),
        )]);
        let out = calc().compute(100_000, &metas, &prices);
        assert_eq!(out[0].capped_units, 1000);
    }

    #[test]
    fn test_total_profit_saturates_at_extremes() {
        // Largest budget the parser accepts, on an uncapped 1 gp item:
        // capped_units = 2^62 and unit_profit = 9, whose product exceeds
        // u64::MAX. Must not panic or wrap.
        let budget = 1u64 << 62;
        let (metas, prices) = snapshots(vec![(
            make_meta(1, "Feather", None),
            make_price(10, 1),
        )]);
        let out = calc().compute(budget, &metas, &prices);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].unit_profit, 9);
        assert_eq!(out[0].capped_units, budget);
        assert_eq!(out[0].total_profit, u64::MAX);
    }

    #[test]
    fn test_capped_units_invariants() {
        let budget = 500_000u64;
        let (metas, prices) = snapshots(vec![
            (make_meta(1, "A", Some(25)), make_price(1_200, 1_000)),
            (make_meta(2, "B", Some(100_000)), make_price(60, 40)),
            (make_meta(3, "C", None), make_price(9_000, 7_000)),
        ]);
        for item in calc().compute(budget, &metas, &prices) {
            if let Some(limit) = item.buy_limit {
                assert!(item.capped_units <= limit);
            }
            assert!(item.capped_units <= budget / item.buy_price);
            assert!(item.capped_units >= 1);
        }
    }
}
