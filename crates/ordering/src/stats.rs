use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::debug;

use m2go_catalog::Product;
use m2go_core::VariantId;

use crate::source::OrderingSource;
use crate::usage::{estimate_with_lookback, UsageEstimate};

/// Usage and on-hand of one variant, both in the variant's own unit.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VariantStats {
    pub usage: UsageEstimate,
    pub on_hand: f64,
}

/// Pass-1 output: statistics for every variant of the active products.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariantStatsTable {
    stats: HashMap<VariantId, VariantStats>,
}

impl VariantStatsTable {
    pub fn build<S>(source: &S, products: &[Product], lookback_days: i64, as_of: NaiveDate) -> Self
    where
        S: OrderingSource + ?Sized,
    {
        let mut stats = HashMap::new();
        for product in products {
            for variant in &product.variants {
                let usage = estimate_with_lookback(source, variant.id, as_of, lookback_days);
                let on_hand = source.balance(variant.id).map(|b| b.on_hand).unwrap_or(0.0);
                debug!(variant = %variant.display_name, rate = usage.rate(), on_hand, "variant stats");
                stats.insert(variant.id, VariantStats { usage, on_hand });
            }
        }
        Self { stats }
    }

    /// Stats for a variant; unknown variants read as zero usage, zero stock.
    pub fn get(&self, variant_id: VariantId) -> VariantStats {
        self.stats.get(&variant_id).copied().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.stats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }
}

impl FromIterator<(VariantId, VariantStats)> for VariantStatsTable {
    fn from_iter<T: IntoIterator<Item = (VariantId, VariantStats)>>(iter: T) -> Self {
        Self {
            stats: iter.into_iter().collect(),
        }
    }
}
