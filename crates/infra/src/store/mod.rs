//! Stock storage: catalog, counts, balances, settings and drafted orders.
//!
//! Writers go through [`StockStore`]; suggestion runs read from an immutable
//! [`StockSnapshot`] so one computation never sees a half-applied write.

pub mod in_memory;
pub mod snapshot;

use thiserror::Error;

use m2go_catalog::{Product, Variant};
use m2go_core::{DomainError, OrderId, ProductId, VariantId};
use m2go_inventory::{CountEntry, DailyCount, InventoryBalance};
use m2go_ordering::{Order, SettingsUpdate};

pub use in_memory::InMemoryStockStore;
pub use snapshot::StockSnapshot;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("unknown product: {0}")]
    UnknownProduct(ProductId),

    #[error("unknown variant: {0}")]
    UnknownVariant(VariantId),

    #[error("store lock poisoned")]
    LockPoisoned,
}

pub trait StockStore: Send + Sync {
    /// Insert or replace a product (with its variants). Listing order is the
    /// order of first insertion.
    fn upsert_product(&self, product: Product) -> Result<(), StoreError>;

    fn add_variant(&self, variant: Variant) -> Result<(), StoreError>;

    /// Soft delete; history and balances are kept.
    fn deactivate_product(&self, product_id: ProductId) -> Result<(), StoreError>;

    fn put_setting(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Validate an operator update and store all of its keys.
    fn apply_settings(&self, update: SettingsUpdate) -> Result<(), StoreError>;

    /// Read balance, compute the adjustment, append the count and write the
    /// balance as one atomic step.
    fn record_count(&self, entry: CountEntry) -> Result<DailyCount, StoreError>;

    fn balance(&self, variant_id: VariantId) -> Result<Option<InventoryBalance>, StoreError>;

    /// Consistent point-in-time copy for read-only computations.
    fn snapshot(&self) -> Result<StockSnapshot, StoreError>;

    /// Insert or replace an order. Every line must name a known product, and
    /// a confirmed order cannot be replaced.
    fn save_order(&self, order: Order) -> Result<(), StoreError>;

    fn order(&self, order_id: OrderId) -> Result<Option<Order>, StoreError>;
}

impl<S> StockStore for std::sync::Arc<S>
where
    S: StockStore + ?Sized,
{
    fn upsert_product(&self, product: Product) -> Result<(), StoreError> {
        (**self).upsert_product(product)
    }

    fn add_variant(&self, variant: Variant) -> Result<(), StoreError> {
        (**self).add_variant(variant)
    }

    fn deactivate_product(&self, product_id: ProductId) -> Result<(), StoreError> {
        (**self).deactivate_product(product_id)
    }

    fn put_setting(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).put_setting(key, value)
    }

    fn apply_settings(&self, update: SettingsUpdate) -> Result<(), StoreError> {
        (**self).apply_settings(update)
    }

    fn record_count(&self, entry: CountEntry) -> Result<DailyCount, StoreError> {
        (**self).record_count(entry)
    }

    fn balance(&self, variant_id: VariantId) -> Result<Option<InventoryBalance>, StoreError> {
        (**self).balance(variant_id)
    }

    fn snapshot(&self) -> Result<StockSnapshot, StoreError> {
        (**self).snapshot()
    }

    fn save_order(&self, order: Order) -> Result<(), StoreError> {
        (**self).save_order(order)
    }

    fn order(&self, order_id: OrderId) -> Result<Option<Order>, StoreError> {
        (**self).order(order_id)
    }
}
