use std::collections::BTreeMap;

use anyhow::Context;
use serde::Deserialize;

use m2go_catalog::Product;
use m2go_infra::StockStore;
use m2go_inventory::CountEntry;

/// Input document: catalog, count history and stored settings.
#[derive(Debug, Deserialize)]
pub struct SeedFile {
    pub products: Vec<Product>,
    #[serde(default)]
    pub counts: Vec<CountEntry>,
    #[serde(default)]
    pub settings: BTreeMap<String, String>,
}

/// Load a seed file through the normal write path. Counts are replayed in date
/// order (file order within a day) so balances and adjustments come out as if
/// they had been entered live. Returns the number of counts recorded.
pub fn load<S: StockStore>(store: &S, mut file: SeedFile) -> anyhow::Result<usize> {
    for product in file.products {
        let name = product.name.clone();
        store
            .upsert_product(product)
            .with_context(|| format!("loading product `{name}`"))?;
    }
    for (key, value) in &file.settings {
        store.put_setting(key, value)?;
    }

    file.counts.sort_by_key(|c| c.date);
    let recorded = file.counts.len();
    for entry in file.counts {
        let (variant_id, date) = (entry.variant_id, entry.date);
        store
            .record_count(entry)
            .with_context(|| format!("recording count for {variant_id} on {date}"))?;
    }
    Ok(recorded)
}
