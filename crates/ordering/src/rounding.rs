use serde::{Deserialize, Serialize};
use tracing::warn;

use m2go_catalog::{Category, Product};

use crate::demand::{DemandPlan, ProductDemand};
use crate::diagnostic::Diagnostic;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderUnit {
    BaseUnit,
    Case,
}

impl OrderUnit {
    pub fn label(&self) -> &'static str {
        match self {
            OrderUnit::BaseUnit => "base unit",
            OrderUnit::Case => "case",
        }
    }
}

impl core::fmt::Display for OrderUnit {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

/// Orderable quantity for one product after the unit policy.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitDecision {
    pub final_quantity: f64,
    pub unit: OrderUnit,
    pub loading_risk: bool,
    /// In presentation order.
    pub diagnostics: Vec<Diagnostic>,
}

/// Turn a base-unit shortfall into an order quantity and unit.
///
/// - proteins are ordered in whole cases (`ceil(raw / case_size)`);
/// - everything else in base units, raised to the minimum order quantity when
///   a non-zero order falls short of it.
///
/// The loading-risk check looks at stock versus demand only and fires even
/// when nothing is ordered.
pub fn apply_unit_policy(product: &Product, demand: &ProductDemand, plan: &DemandPlan) -> UnitDecision {
    let mut diagnostics = Vec::new();

    if demand.missing_conversion {
        diagnostics.push(Diagnostic::MissingConversion);
    }
    if demand.insufficient_data {
        diagnostics.push(Diagnostic::InsufficientData);
    }

    let loading_risk =
        plan.daily_demand > 0.0 && plan.current_inventory / plan.daily_demand < plan.cover_days;
    if loading_risk {
        diagnostics.push(Diagnostic::LoadingRisk);
    }

    let raw = plan.raw_quantity;
    let mut final_quantity = raw;
    let mut unit = OrderUnit::BaseUnit;

    match product.category {
        Category::Protein => match product.case_size.filter(|c| *c > 0.0) {
            Some(case_size) => {
                let cases = (raw / case_size).ceil();
                final_quantity = cases;
                unit = OrderUnit::Case;
                diagnostics.push(Diagnostic::CaseRounded {
                    raw_quantity: raw,
                    cases,
                    case_size,
                });
            }
            None => {
                warn!(product = %product.name, "protein product has no case size; quantity left in base units");
                diagnostics.push(Diagnostic::MissingCaseSize);
            }
        },
        _ => {
            if let Some(minimum) = product.min_order_qty.filter(|m| *m > 0.0) {
                if final_quantity > 0.0 && final_quantity < minimum {
                    final_quantity = minimum;
                    diagnostics.push(Diagnostic::MinimumOrderApplied { minimum });
                }
            }
        }
    }

    UnitDecision {
        final_quantity,
        unit,
        loading_risk,
        diagnostics,
    }
}
