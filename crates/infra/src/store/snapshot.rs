use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, NaiveDate, Utc};

use m2go_catalog::Product;
use m2go_core::VariantId;
use m2go_inventory::{DailyCount, InventoryBalance};
use m2go_ordering::OrderingSource;

/// Immutable copy of the store taken under a single read lock.
#[derive(Debug, Clone, Default)]
pub struct StockSnapshot {
    pub(crate) products: Vec<Product>,
    pub(crate) settings: BTreeMap<String, String>,
    /// Per variant, in recording order.
    pub(crate) counts: HashMap<VariantId, Vec<DailyCount>>,
    pub(crate) balances: HashMap<VariantId, InventoryBalance>,
    pub(crate) taken_at: DateTime<Utc>,
}

impl StockSnapshot {
    pub fn taken_at(&self) -> DateTime<Utc> {
        self.taken_at
    }

    /// All products, inactive ones included.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn settings(&self) -> &BTreeMap<String, String> {
        &self.settings
    }

    pub fn count_history(&self, variant_id: VariantId) -> &[DailyCount] {
        self.counts.get(&variant_id).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl OrderingSource for StockSnapshot {
    fn active_products(&self) -> Vec<Product> {
        self.products.iter().filter(|p| p.is_active()).cloned().collect()
    }

    fn setting(&self, key: &str) -> Option<String> {
        self.settings.get(key).cloned()
    }

    fn counts_since(&self, variant_id: VariantId, since: NaiveDate) -> Vec<DailyCount> {
        let mut out: Vec<DailyCount> = self
            .count_history(variant_id)
            .iter()
            .filter(|c| c.date >= since)
            .cloned()
            .collect();
        // Stable: same-date counts stay in recording order.
        out.sort_by_key(|c| c.date);
        out
    }

    fn balance(&self, variant_id: VariantId) -> Option<InventoryBalance> {
        self.balances.get(&variant_id).cloned()
    }
}
