use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::demand::{aggregate_product, plan_stock};
use crate::error::OrderingError;
use crate::pool::{MixPoolTable, PoolTotalsTable};
use crate::rounding::apply_unit_policy;
use crate::settings::OrderingParams;
use crate::source::OrderingSource;
use crate::stats::VariantStatsTable;
use crate::suggestion::{assemble, OrderSuggestion};

/// Compute order suggestions for an ordering cycle (e.g. `"MONDAY"`).
///
/// `cycle` is matched case-insensitively against `cover_days_<cycle>`.
/// `as_of` anchors the usage lookback window. Either every product is
/// evaluated or the call fails; settings problems are fatal, per-product data
/// gaps become diagnostics on the lines.
///
/// The source must present one consistent snapshot for the whole call.
pub fn suggest_orders<S>(
    source: &S,
    pools: &MixPoolTable,
    cycle: &str,
    as_of: NaiveDate,
) -> Result<Vec<OrderSuggestion>, OrderingError>
where
    S: OrderingSource + ?Sized,
{
    let params = OrderingParams::resolve(source, cycle)?;
    let products = source.active_products();

    info!(
        cycle = %params.cycle,
        %as_of,
        products = products.len(),
        cover_days = params.cover_days,
        safety_buffer_days = params.safety_buffer_days,
        lookback_days = params.lookback_days,
        "computing order suggestions"
    );

    // Pass 1: immutable per-variant stats and pool totals.
    let stats = VariantStatsTable::build(source, &products, params.lookback_days, as_of);
    let pool_totals = PoolTotalsTable::build(&products, &stats, pools);

    // Pass 2: per product, read-only over pass-1 output.
    let mut suggestions = Vec::new();
    for product in &products {
        let demand = aggregate_product(product, &stats, pools, &pool_totals);
        if demand.missing_conversion {
            warn!(product = %product.name, "product has variants without a base-unit conversion");
        }

        let plan = plan_stock(&demand, params.cover_days, params.safety_buffer_days);
        let decision = apply_unit_policy(product, &demand, &plan);
        debug!(
            product = %product.name,
            daily_demand = plan.daily_demand,
            current_inventory = plan.current_inventory,
            raw_quantity = plan.raw_quantity,
            final_quantity = decision.final_quantity,
            unit = %decision.unit,
            "product evaluated"
        );

        if let Some(s) = assemble(product, demand, &plan, decision) {
            suggestions.push(s);
        }
    }

    info!(
        cycle = %params.cycle,
        variants = stats.len(),
        suggestions = suggestions.len(),
        "order suggestions computed"
    );
    Ok(suggestions)
}
