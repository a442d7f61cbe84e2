//! Minimal in-memory source for unit tests.

use std::collections::{BTreeMap, HashMap};

use chrono::{NaiveDate, Utc};

use m2go_catalog::Product;
use m2go_core::VariantId;
use m2go_inventory::{CountEntry, DailyCount, InventoryBalance};

use crate::source::OrderingSource;

#[derive(Debug, Default)]
pub(crate) struct FakeSource {
    pub products: Vec<Product>,
    pub settings: BTreeMap<String, String>,
    pub counts: Vec<DailyCount>,
    pub balances: HashMap<VariantId, InventoryBalance>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_setting(mut self, key: &str, value: &str) -> Self {
        self.settings.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_product(mut self, product: Product) -> Self {
        self.products.push(product);
        self
    }

    /// Record counts on consecutive days ending at `last_day`.
    pub fn count_series(&mut self, variant_id: VariantId, last_day: NaiveDate, qtys: &[f64]) {
        let n = qtys.len() as i64;
        for (i, q) in qtys.iter().enumerate() {
            let date = last_day - chrono::Duration::days(n - 1 - i as i64);
            self.count(variant_id, date, *q);
        }
    }

    pub fn count(&mut self, variant_id: VariantId, date: NaiveDate, qty: f64) {
        let balance = self
            .balances
            .entry(variant_id)
            .or_insert_with(|| InventoryBalance::empty(variant_id));
        let count = balance
            .record(&CountEntry::new(variant_id, date, qty), Utc::now())
            .unwrap();
        self.counts.push(count);
    }

    pub fn set_on_hand(&mut self, variant_id: VariantId, on_hand: f64) {
        self.balances
            .insert(variant_id, InventoryBalance { variant_id, on_hand });
    }
}

impl OrderingSource for FakeSource {
    fn active_products(&self) -> Vec<Product> {
        self.products.iter().filter(|p| p.active).cloned().collect()
    }

    fn setting(&self, key: &str) -> Option<String> {
        self.settings.get(key).cloned()
    }

    fn counts_since(&self, variant_id: VariantId, since: NaiveDate) -> Vec<DailyCount> {
        let mut out: Vec<DailyCount> = self
            .counts
            .iter()
            .filter(|c| c.variant_id == variant_id && c.date >= since)
            .cloned()
            .collect();
        out.sort_by_key(|c| c.date);
        out
    }

    fn balance(&self, variant_id: VariantId) -> Option<InventoryBalance> {
        self.balances.get(&variant_id).cloned()
    }
}

pub(crate) fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
}
