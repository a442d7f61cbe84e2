use m2go_catalog::Product;

use crate::pool::{MixPoolTable, PoolTotalsTable};
use crate::stats::VariantStatsTable;

/// One product's demand and stock, summed across its variants in base units.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductDemand {
    /// Base units per day.
    pub daily_demand: f64,
    pub current_inventory: f64,
    pub missing_conversion: bool,
    pub insufficient_data: bool,
    /// Per-variant and pool-share lines for the reason payload.
    pub details: Vec<String>,
}

/// Sum a product's direct variants, then add its pool share (if any).
pub fn aggregate_product(
    product: &Product,
    stats: &VariantStatsTable,
    pools: &MixPoolTable,
    pool_totals: &PoolTotalsTable,
) -> ProductDemand {
    let mut out = ProductDemand::default();

    for variant in &product.variants {
        if pools.is_pooled(product, variant) {
            continue;
        }

        let s = stats.get(variant.id);
        let rate = s.usage.rate();
        if s.usage.is_insufficient() {
            out.insufficient_data = true;
        }

        match variant.conversion_to_base {
            Some(conversion) => {
                out.daily_demand += rate * conversion;
                out.current_inventory += s.on_hand * conversion;
                out.details.push(format!(
                    "{}: rate={rate:.2}, stock={}",
                    variant.display_name, s.on_hand
                ));
            }
            None => {
                out.missing_conversion = true;
                out.details.push(format!(
                    "{}: [no conversion] rate={rate:.2}, stock={}",
                    variant.display_name, s.on_hand
                ));
            }
        }
    }

    if let Some(pool) = pools.pool_for(product) {
        let share = pool.share_of(&product.name).unwrap_or(0.0);
        let totals = pool_totals.get(&pool.id).cloned().unwrap_or_default();

        out.daily_demand += totals.usage_base * share;
        out.current_inventory += totals.inventory_base * share;
        out.details.push(format!(
            "mix pool {} ({}) share={share:.2}",
            pool.id,
            pool.ratio_label()
        ));

        out.missing_conversion |= totals.missing_conversion;
        out.insufficient_data |= totals.insufficient_data;
    }

    out
}

/// Target stock and shortfall for one product, in base units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DemandPlan {
    pub cover_days: f64,
    pub safety_buffer_days: f64,
    pub daily_demand: f64,
    pub current_inventory: f64,
    pub target_stock: f64,
    /// Never negative.
    pub raw_quantity: f64,
}

/// `target = demand × cover + demand × buffer`; `raw = max(0, target − stock)`.
///
/// The safety buffer is measured in days of demand, so it scales with demand
/// rather than adding a flat quantity.
pub fn plan_stock(demand: &ProductDemand, cover_days: f64, safety_buffer_days: f64) -> DemandPlan {
    let d = demand.daily_demand;
    let target_stock = d * cover_days + d * safety_buffer_days;
    let raw_quantity = (target_stock - demand.current_inventory).max(0.0);

    DemandPlan {
        cover_days,
        safety_buffer_days,
        daily_demand: d,
        current_inventory: demand.current_inventory,
        target_stock,
        raw_quantity,
    }
}
