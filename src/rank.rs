//! Ranking of flip candidates.
//!
//! Descending by profit ratio with deterministic tie-breaks so two runs
//! over identical snapshots always produce identical output.

use std::cmp::Ordering;

use crate::types::ItemProfit;

/// Sort candidates best-first and truncate to the top `n`.
///
/// Order: profit ratio descending, then total profit descending, then
/// name ascending.
pub fn top_flips(mut candidates: Vec<ItemProfit>, n: usize) -> Vec<ItemProfit> {
    candidates.sort_by(compare);
    candidates.truncate(n);
    candidates
}

fn compare(a: &ItemProfit, b: &ItemProfit) -> Ordering {
    b.profit_ratio
        .partial_cmp(&a.profit_ratio)
        .unwrap_or(Ordering::Equal)
        .then_with(|| b.total_profit.cmp(&a.total_profit))
        .then_with(|| a.name.cmp(&b.name))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn make_flip(name: &str, ratio: f64, total: u64) -> ItemProfit {
        ItemProfit {
            id: 1,
            name: name.to_string(),
            buy_price: 100,
            sell_price: 120,
            unit_profit: 19,
            buy_limit: Some(1000),
            capped_units: 10,
            total_profit: total,
            profit_ratio: ratio,
        }
    }

    #[test]
    fn test_sorted_by_ratio_descending() {
        let out = top_flips(
            vec![
                make_flip("low", 0.05, 100),
                make_flip("high", 0.30, 100),
                make_flip("mid", 0.15, 100),
            ],
            10,
        );
        let names: Vec<_> = out.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["high", "mid", "low"]);
    }

    #[test]
    fn test_tie_broken_by_total_profit_then_name() {
        let out = top_flips(
            vec![
                make_flip("zulrah scale", 0.10, 500),
                make_flip("adamant bar", 0.10, 500),
                make_flip("bigger total", 0.10, 900),
            ],
            10,
        );
        let names: Vec<_> = out.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["bigger total", "adamant bar", "zulrah scale"]);
    }

    #[test]
    fn test_truncates_to_top_n() {
        let candidates: Vec<_> = (0..15)
            .map(|i| make_flip(&format!("item{i:02}"), 0.01 * (i + 1) as f64, 100))
            .collect();
        let out = top_flips(candidates, 10);
        assert_eq!(out.len(), 10);
        // Best ratio first
        assert_eq!(out[0].name, "item14");
        assert!(out
            .windows(2)
            .all(|w| w[0].profit_ratio >= w[1].profit_ratio));
    }

    #[test]
    fn test_deterministic_across_runs() {
        let build = || {
            vec![
                make_flip("c", 0.10, 500),
                make_flip("a", 0.10, 500),
                make_flip("b", 0.20, 100),
                make_flip("d", 0.10, 900),
            ]
        };
        let first = top_flips(build(), 10);
        let second = top_flips(build(), 10);
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_input() {
        assert!(top_flips(Vec::new(), 10).is_empty());
    }

    #[test]
    fn test_fewer_than_n_returns_all() {
        let out = top_flips(vec![make_flip("only", 0.1, 10)], 10);
        assert_eq!(out.len(), 1);
    }
}
