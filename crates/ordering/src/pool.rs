//! Mixed pools: products whose prepared stock is physically interchangeable.
//!
//! Eligible variants of all members are summed into one pool (base units),
//! then every member product receives `weight / Σ weights` of the pooled usage
//! and inventory. Those variants are not aggregated directly by their own
//! product.

use std::collections::{BTreeSet, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use m2go_catalog::{Product, Variant};
use m2go_core::{DomainError, DomainResult};

use crate::stats::VariantStatsTable;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolMember {
    /// Catalog name of the member product (`Product::name`).
    pub product: String,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MixPool {
    pub id: String,
    /// Variant forms that take part in the pool.
    pub forms: BTreeSet<String>,
    pub members: Vec<PoolMember>,
}

impl MixPool {
    pub fn total_weight(&self) -> f64 {
        self.members.iter().map(|m| m.weight).sum()
    }

    pub fn weight_of(&self, product_name: &str) -> Option<f64> {
        self.members
            .iter()
            .find(|m| m.product == product_name)
            .map(|m| m.weight)
    }

    /// Fraction of the pool allotted to a member product.
    pub fn share_of(&self, product_name: &str) -> Option<f64> {
        let total = self.total_weight();
        self.weight_of(product_name)
            .map(|w| if total > 0.0 { w / total } else { 0.0 })
    }

    pub fn admits(&self, product: &Product, variant: &Variant) -> bool {
        self.weight_of(&product.name).is_some() && self.forms.contains(&variant.form)
    }

    /// e.g. `2:1:1`
    pub fn ratio_label(&self) -> String {
        self.members
            .iter()
            .map(|m| m.weight.to_string())
            .collect::<Vec<_>>()
            .join(":")
    }

    fn validate(&self) -> DomainResult<()> {
        if self.id.trim().is_empty() {
            return Err(DomainError::validation("pool id cannot be empty"));
        }
        if self.forms.is_empty() {
            return Err(DomainError::validation(format!(
                "pool `{}` has no eligible forms",
                self.id
            )));
        }
        if self.members.is_empty() {
            return Err(DomainError::validation(format!("pool `{}` has no members", self.id)));
        }
        let mut seen = HashSet::new();
        for m in &self.members {
            if !(m.weight.is_finite() && m.weight > 0.0) {
                return Err(DomainError::validation(format!(
                    "pool `{}`: weight for `{}` must be a finite positive number",
                    self.id, m.product
                )));
            }
            if !seen.insert(m.product.as_str()) {
                return Err(DomainError::validation(format!(
                    "pool `{}`: `{}` listed twice",
                    self.id, m.product
                )));
            }
        }
        if self.total_weight() <= 0.0 {
            return Err(DomainError::validation(format!(
                "pool `{}`: weights must sum to a positive number",
                self.id
            )));
        }
        Ok(())
    }
}

/// Validated set of pools. A product belongs to at most one pool.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MixPoolTable {
    pools: Vec<MixPool>,
}

impl MixPoolTable {
    pub fn new(pools: Vec<MixPool>) -> DomainResult<Self> {
        let mut ids = HashSet::new();
        let mut owners: HashMap<&str, &str> = HashMap::new();
        for pool in &pools {
            pool.validate()?;
            if !ids.insert(pool.id.as_str()) {
                return Err(DomainError::validation(format!("duplicate pool id `{}`", pool.id)));
            }
            for m in &pool.members {
                if let Some(other) = owners.insert(m.product.as_str(), pool.id.as_str()) {
                    return Err(DomainError::validation(format!(
                        "`{}` belongs to pools `{}` and `{}`",
                        m.product, other, pool.id
                    )));
                }
            }
        }
        Ok(Self { pools })
    }

    pub fn empty() -> Self {
        Self { pools: Vec::new() }
    }

    /// The kitchen's shredded-vegetable mix: carrot, onion and green onion
    /// shreds at 2:1:1.
    pub fn shred_mix() -> MixPool {
        MixPool {
            id: "shred_mix".to_string(),
            forms: ["PREP_shred", "PREP_切丝"].into_iter().map(String::from).collect(),
            members: vec![
                PoolMember {
                    product: "胡萝卜".to_string(),
                    weight: 2.0,
                },
                PoolMember {
                    product: "洋葱".to_string(),
                    weight: 1.0,
                },
                PoolMember {
                    product: "青葱".to_string(),
                    weight: 1.0,
                },
            ],
        }
    }

    pub fn standard() -> Self {
        Self {
            pools: vec![Self::shred_mix()],
        }
    }

    pub fn pools(&self) -> &[MixPool] {
        &self.pools
    }

    pub fn pool_for(&self, product: &Product) -> Option<&MixPool> {
        self.pools
            .iter()
            .find(|p| p.weight_of(&product.name).is_some())
    }

    pub fn is_pooled(&self, product: &Product, variant: &Variant) -> bool {
        self.pool_for(product).is_some_and(|p| p.admits(product, variant))
    }
}

/// Pooled usage and inventory in base units.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PoolTotals {
    pub usage_base: f64,
    pub inventory_base: f64,
    /// Some member variant lacks a conversion.
    pub missing_conversion: bool,
    /// Some member variant has too few recent counts.
    pub insufficient_data: bool,
    pub variants: usize,
}

/// Pass-1 output: totals per pool id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PoolTotalsTable {
    totals: HashMap<String, PoolTotals>,
}

impl PoolTotalsTable {
    pub fn build(products: &[Product], stats: &VariantStatsTable, pools: &MixPoolTable) -> Self {
        let mut totals: HashMap<String, PoolTotals> = pools
            .pools()
            .iter()
            .map(|p| (p.id.clone(), PoolTotals::default()))
            .collect();

        for product in products {
            let Some(pool) = pools.pool_for(product) else {
                continue;
            };
            let entry = totals.entry(pool.id.clone()).or_default();

            for variant in product.variants.iter().filter(|v| pool.admits(product, v)) {
                let s = stats.get(variant.id);
                entry.variants += 1;
                match variant.conversion_to_base {
                    Some(conversion) => {
                        entry.usage_base += s.usage.rate() * conversion;
                        entry.inventory_base += s.on_hand * conversion;
                    }
                    None => entry.missing_conversion = true,
                }
                if s.usage.is_insufficient() {
                    entry.insufficient_data = true;
                }
            }
        }

        Self { totals }
    }

    pub fn get(&self, pool_id: &str) -> Option<&PoolTotals> {
        self.totals.get(pool_id)
    }
}
