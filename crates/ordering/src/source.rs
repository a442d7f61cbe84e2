use chrono::NaiveDate;

use m2go_catalog::Product;
use m2go_core::VariantId;
use m2go_inventory::{DailyCount, InventoryBalance};

/// Read access to the data a suggestion computation needs.
///
/// Implementations must answer every call from the same consistent snapshot
/// for the duration of one computation. The core takes no locks of its own.
pub trait OrderingSource {
    /// Active products with their variants, in listing order.
    fn active_products(&self) -> Vec<Product>;

    /// Stored value for a settings key, without defaults applied.
    fn setting(&self, key: &str) -> Option<String>;

    /// Counts for a variant dated on or after `since`, ascending by date.
    /// Counts sharing a date keep their recording order.
    fn counts_since(&self, variant_id: VariantId, since: NaiveDate) -> Vec<DailyCount>;

    fn balance(&self, variant_id: VariantId) -> Option<InventoryBalance>;
}

impl<S> OrderingSource for &S
where
    S: OrderingSource + ?Sized,
{
    fn active_products(&self) -> Vec<Product> {
        (**self).active_products()
    }

    fn setting(&self, key: &str) -> Option<String> {
        (**self).setting(key)
    }

    fn counts_since(&self, variant_id: VariantId, since: NaiveDate) -> Vec<DailyCount> {
        (**self).counts_since(variant_id, since)
    }

    fn balance(&self, variant_id: VariantId) -> Option<InventoryBalance> {
        (**self).balance(variant_id)
    }
}
