use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use chrono::Utc;
use tracing::{debug, info};

use m2go_catalog::{Product, Variant};
use m2go_core::{find_mut, position_of, DomainError, Entity, OrderId, ProductId, VariantId};
use m2go_inventory::{CountEntry, DailyCount, InventoryBalance};
use m2go_ordering::{Order, SettingsUpdate};

use super::{StockSnapshot, StockStore, StoreError};

#[derive(Debug, Default)]
struct State {
    products: Vec<Product>,
    /// variant → owning product
    variant_index: HashMap<VariantId, ProductId>,
    settings: BTreeMap<String, String>,
    counts: HashMap<VariantId, Vec<DailyCount>>,
    balances: HashMap<VariantId, InventoryBalance>,
    orders: HashMap<OrderId, Order>,
}

impl State {
    fn product_mut(&mut self, product_id: ProductId) -> Result<&mut Product, StoreError> {
        find_mut(&mut self.products, product_id).ok_or(StoreError::UnknownProduct(product_id))
    }
}

/// In-memory store for tests, dev and batch runs.
///
/// One `RwLock` guards everything: count recording takes the write lock for
/// the whole read-modify-write, snapshots take the read lock once.
#[derive(Debug, Default)]
pub struct InMemoryStockStore {
    inner: RwLock<State>,
}

impl InMemoryStockStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, State>, StoreError> {
        self.inner.read().map_err(|_| StoreError::LockPoisoned)
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, State>, StoreError> {
        self.inner.write().map_err(|_| StoreError::LockPoisoned)
    }
}

impl StockStore for InMemoryStockStore {
    fn upsert_product(&self, product: Product) -> Result<(), StoreError> {
        product.validate()?;
        let mut state = self.write()?;

        for v in &product.variants {
            if let Some(owner) = state.variant_index.get(&v.id) {
                if *owner != product.id {
                    return Err(DomainError::invariant(format!(
                        "variant {} already belongs to product {owner}",
                        v.id
                    ))
                    .into());
                }
            }
        }

        let product_id = product.id;
        // Variants dropped by this version no longer belong to anyone.
        state.variant_index.retain(|variant_id, owner| {
            *owner != product_id || position_of(&product.variants, *variant_id).is_some()
        });
        for v in &product.variants {
            state.variant_index.insert(v.id, product_id);
        }
        match position_of(&state.products, product_id) {
            Some(i) => state.products[i] = product,
            None => state.products.push(product),
        }
        debug!(%product_id, "product upserted");
        Ok(())
    }

    fn add_variant(&self, variant: Variant) -> Result<(), StoreError> {
        let mut state = self.write()?;
        if state.variant_index.contains_key(&variant.id) {
            return Err(DomainError::duplicate("variant", variant.id).into());
        }
        let (variant_id, product_id) = (variant.id, variant.product_id);
        state.product_mut(product_id)?.add_variant(variant)?;
        state.variant_index.insert(variant_id, product_id);
        Ok(())
    }

    fn deactivate_product(&self, product_id: ProductId) -> Result<(), StoreError> {
        let mut state = self.write()?;
        state.product_mut(product_id)?.deactivate();
        info!(%product_id, "product deactivated");
        Ok(())
    }

    fn put_setting(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut state = self.write()?;
        state.settings.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn apply_settings(&self, update: SettingsUpdate) -> Result<(), StoreError> {
        let pairs = update.into_pairs()?;
        let mut state = self.write()?;
        state.settings.extend(pairs);
        info!("settings updated");
        Ok(())
    }

    fn record_count(&self, entry: CountEntry) -> Result<DailyCount, StoreError> {
        let mut state = self.write()?;
        if !state.variant_index.contains_key(&entry.variant_id) {
            return Err(StoreError::UnknownVariant(entry.variant_id));
        }

        let variant_id = entry.variant_id;
        let mut balance = state
            .balances
            .get(&variant_id)
            .cloned()
            .unwrap_or_else(|| InventoryBalance::empty(variant_id));
        let count = balance.record(&entry, Utc::now())?;

        state.counts.entry(variant_id).or_default().push(count.clone());
        state.balances.insert(variant_id, balance);

        debug!(
            %variant_id,
            date = %count.date,
            counted = count.counted_qty,
            adjustment = count.adjustment,
            "count recorded"
        );
        Ok(count)
    }

    fn balance(&self, variant_id: VariantId) -> Result<Option<InventoryBalance>, StoreError> {
        Ok(self.read()?.balances.get(&variant_id).cloned())
    }

    fn snapshot(&self) -> Result<StockSnapshot, StoreError> {
        let state = self.read()?;
        Ok(StockSnapshot {
            products: state.products.clone(),
            settings: state.settings.clone(),
            counts: state.counts.clone(),
            balances: state.balances.clone(),
            taken_at: Utc::now(),
        })
    }

    fn save_order(&self, order: Order) -> Result<(), StoreError> {
        let mut state = self.write()?;
        for line in order.lines() {
            if position_of(&state.products, line.product_id).is_none() {
                return Err(StoreError::UnknownProduct(line.product_id));
            }
        }
        let order_id = order.id();
        if state.orders.get(&order_id).is_some_and(Order::is_confirmed) {
            return Err(
                DomainError::invariant(format!("order {order_id} is already confirmed")).into(),
            );
        }

        info!(%order_id, status = ?order.status(), lines = order.lines().len(), "order saved");
        state.orders.insert(order_id, order);
        Ok(())
    }

    fn order(&self, order_id: OrderId) -> Result<Option<Order>, StoreError> {
        Ok(self.read()?.orders.get(&order_id).cloned())
    }
}
