//! # Co-occurrence Ranker
//!
//! Which other products end up in the same baskets as a target product.
//!
//! ## Counting Rule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Purchase 1: [X, Y, Y, Z]   ─► X present ─► {Y, Z}  (Y counted once)   │
//! │  Purchase 2: [X, X, Y]      ─► X present ─► {Y}                         │
//! │  Purchase 3: [Y, Z]         ─► X absent  ─► ignored                     │
//! │                                                                         │
//! │  qualifying purchases = 2                                               │
//! │  Y: 2 / 2 = 100%     Z: 1 / 2 = 50%                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Ranking is percentage descending, then product identifier ascending, so
//! equal percentages always come out in the same order.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::warn;
use ts_rs::TS;

use super::rounded_percentage;
use crate::types::{ProductId, PurchaseId, PurchaseLineItem};

// =============================================================================
// Result Type
// =============================================================================

/// A product bought together with the target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RelatedProduct {
    pub product_id: ProductId,
    pub product_name: String,
    /// Number of qualifying purchases containing this product.
    pub occurrences: u32,
    /// `occurrences / qualifying purchases`, as a rounded percentage.
    pub percentage: u32,
}

/// Label used when a related product's name cannot be resolved.
pub fn placeholder_name(product_id: ProductId) -> String {
    format!("Product {}", product_id)
}

// =============================================================================
// Tally
// =============================================================================

/// Raw co-occurrence counts before naming and ranking.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CooccurrenceTally {
    qualifying_purchases: u32,
    /// (product, count) in the order products were first seen.
    counts: Vec<(ProductId, u32)>,
}

impl CooccurrenceTally {
    /// Counts, per other product, the qualifying purchases it appears in.
    ///
    /// A purchase qualifies if it holds at least one unit of `target`. Each
    /// qualifying purchase contributes at most one to each other product.
    pub fn count(target: ProductId, items: &[PurchaseLineItem]) -> Self {
        let mut qualifying: Vec<PurchaseId> = Vec::new();
        let mut seen_qualifying: HashSet<PurchaseId> = HashSet::new();
        let mut baskets: HashMap<PurchaseId, Vec<ProductId>> = HashMap::new();

        for item in items {
            if item.product_id == target {
                if seen_qualifying.insert(item.purchase_id) {
                    qualifying.push(item.purchase_id);
                }
            } else {
                baskets
                    .entry(item.purchase_id)
                    .or_default()
                    .push(item.product_id);
            }
        }

        let mut counts: Vec<(ProductId, u32)> = Vec::new();
        let mut slot: HashMap<ProductId, usize> = HashMap::new();

        for purchase_id in &qualifying {
            let Some(others) = baskets.get(purchase_id) else {
                continue;
            };

            let mut in_this_basket: HashSet<ProductId> = HashSet::new();
            for &product_id in others {
                if !in_this_basket.insert(product_id) {
                    continue;
                }
                match slot.get(&product_id) {
                    Some(&idx) => counts[idx].1 += 1,
                    None => {
                        slot.insert(product_id, counts.len());
                        counts.push((product_id, 1));
                    }
                }
            }
        }

        CooccurrenceTally {
            qualifying_purchases: qualifying.len() as u32,
            counts,
        }
    }

    /// Purchases that contain the target product.
    pub fn qualifying_purchases(&self) -> u32 {
        self.qualifying_purchases
    }

    /// True when no purchase contained the target.
    pub fn is_empty(&self) -> bool {
        self.qualifying_purchases == 0
    }

    /// Every co-occurring product, in discovery order.
    pub fn product_ids(&self) -> Vec<ProductId> {
        self.counts.iter().map(|(id, _)| *id).collect()
    }

    /// Names, scores and truncates the tally.
    ///
    /// Products missing from `names` get a placeholder label.
    pub fn rank(&self, names: &HashMap<ProductId, String>, limit: usize) -> Vec<RelatedProduct> {
        if self.is_empty() {
            return Vec::new();
        }

        let whole = u64::from(self.qualifying_purchases);

        let mut related: Vec<RelatedProduct> = self
            .counts
            .iter()
            .map(|&(product_id, occurrences)| {
                let product_name = match names.get(&product_id) {
                    Some(name) => name.clone(),
                    None => {
                        warn!(product_id, "Related product has no name, using placeholder");
                        placeholder_name(product_id)
                    }
                };
                RelatedProduct {
                    product_id,
                    product_name,
                    occurrences,
                    percentage: rounded_percentage(u64::from(occurrences), whole).unwrap_or(0),
                }
            })
            .collect();

        related.sort_by(|a, b| {
            b.percentage
                .cmp(&a.percentage)
                .then_with(|| a.product_id.cmp(&b.product_id))
        });
        related.truncate(limit);
        related
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn item(id: i64, purchase_id: PurchaseId, product_id: ProductId) -> PurchaseLineItem {
        PurchaseLineItem {
            id,
            purchase_id,
            product_id,
            unit_value_cents: 100,
            flyer: None,
            lot_ref: None,
        }
    }

    fn names(pairs: &[(ProductId, &str)]) -> HashMap<ProductId, String> {
        pairs.iter().map(|(id, n)| (*id, n.to_string())).collect()
    }

    #[test]
    fn test_single_basket_scores_hundred() {
        let items = vec![item(1, 10, 1), item(2, 10, 2), item(3, 10, 3)];
        let tally = CooccurrenceTally::count(1, &items);
        let ranked = tally.rank(&names(&[(2, "A"), (3, "B")]), 5);

        assert_eq!(ranked.len(), 2);
        for entry in &ranked {
            assert_eq!(entry.occurrences, 1);
            assert_eq!(entry.percentage, 100);
        }
        assert_eq!(ranked[0].product_name, "A");
        assert_eq!(ranked[1].product_name, "B");
    }

    #[test]
    fn test_duplicates_within_basket_count_once() {
        let items = vec![
            item(1, 10, 1),
            item(2, 10, 1),
            item(3, 10, 2),
            item(4, 10, 2),
            item(5, 11, 1),
        ];
        let tally = CooccurrenceTally::count(1, &items);
        assert_eq!(tally.qualifying_purchases(), 2);

        let ranked = tally.rank(&names(&[(2, "Feijão")]), 5);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].occurrences, 1);
        assert_eq!(ranked[0].percentage, 50);
    }

    #[test]
    fn test_baskets_without_target_ignored() {
        let items = vec![item(1, 10, 2), item(2, 10, 3)];
        let tally = CooccurrenceTally::count(1, &items);
        assert!(tally.is_empty());
        assert!(tally.rank(&HashMap::new(), 5).is_empty());
    }

    #[test]
    fn test_missing_name_uses_placeholder() {
        let items = vec![item(1, 10, 1), item(2, 10, 99)];
        let ranked = CooccurrenceTally::count(1, &items).rank(&HashMap::new(), 5);
        assert_eq!(ranked[0].product_name, "Product 99");
    }

    #[test]
    fn test_ties_break_by_product_id() {
        // 9 discovered first, but 4 has the smaller id
        let items = vec![item(1, 10, 1), item(2, 10, 9), item(3, 10, 4)];
        let ranked = CooccurrenceTally::count(1, &items).rank(&HashMap::new(), 5);
        let ids: Vec<_> = ranked.iter().map(|r| r.product_id).collect();
        assert_eq!(ids, vec![4, 9]);
    }

    #[test]
    fn test_truncates_to_limit_after_sorting() {
        // Product 7 appears in both baskets, the rest in one each
        let mut items = vec![item(1, 10, 1), item(2, 11, 1), item(3, 11, 7)];
        for (n, pid) in (2..=7).enumerate() {
            items.push(item(100 + n as i64, 10, pid));
        }
        let ranked = CooccurrenceTally::count(1, &items).rank(&HashMap::new(), 5);

        assert_eq!(ranked.len(), 5);
        assert_eq!(ranked[0].product_id, 7);
        assert_eq!(ranked[0].percentage, 100);
        assert!(ranked[1..].iter().all(|r| r.percentage == 50));
    }

    proptest! {
        #[test]
        fn prop_ranking_is_bounded_sorted_and_excludes_target(
            rows in prop::collection::vec((1i64..20, 1i64..12), 0..120),
            target in 1i64..12,
        ) {
            let items: Vec<_> = rows
                .iter()
                .enumerate()
                .map(|(n, (purchase, product))| item(n as i64, *purchase, *product))
                .collect();

            let ranked = CooccurrenceTally::count(target, &items).rank(&HashMap::new(), 5);

            prop_assert!(ranked.len() <= 5);
            prop_assert!(ranked.iter().all(|r| r.product_id != target));
            prop_assert!(ranked.iter().all(|r| r.percentage <= 100));
            for pair in ranked.windows(2) {
                prop_assert!(pair[0].percentage >= pair[1].percentage);
            }
        }
    }
}
