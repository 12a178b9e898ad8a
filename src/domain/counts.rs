use std::collections::BTreeMap;

use super::catalog::Catalog;

/// Per-product counts for one conversation. Absent products count as zero.
pub type ProductCounts = BTreeMap<String, u64>;

/// Everything the counter store persists: conversation id -> product counts.
pub type OrderBook = BTreeMap<String, ProductCounts>;

pub fn has_orders(counts: &ProductCounts) -> bool {
    counts.values().any(|count| *count > 0)
}

/// A conversation's non-zero counts plus the sum of every stored count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderTally {
    pub lines: Vec<(String, u64)>,
    pub total: u64,
}

impl OrderTally {
    /// Catalog products come first in display order. Stored keys the
    /// catalog no longer lists (it can be replaced through config) follow in
    /// key order, so they stay visible and are part of the total.
    pub fn from_counts(catalog: &Catalog, counts: &ProductCounts) -> Self {
        let mut lines = Vec::new();

        for product in catalog.list() {
            if let Some(&count) = counts.get(product.as_str()) {
                if count > 0 {
                    lines.push((product.as_str().to_owned(), count));
                }
            }
        }

        for (name, &count) in counts {
            let listed = catalog.list().iter().any(|p| p.as_str() == name);
            if !listed && count > 0 {
                lines.push((name.clone(), count));
            }
        }

        let total = counts
            .values()
            .fold(0u64, |sum, count| sum.saturating_add(*count));

        Self { lines, total }
    }
}
