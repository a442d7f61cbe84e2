use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};

use m2go_catalog::{Category, Product};
use m2go_core::ProductId;

use crate::demand::{DemandPlan, ProductDemand};
use crate::diagnostic::{render_notes, Diagnostic};
use crate::rounding::{OrderUnit, UnitDecision};

/// Why a quantity was suggested (all quantities in base units).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionReason {
    pub cover_days: f64,
    pub daily_demand: f64,
    pub safety_buffer: f64,
    pub target_stock: f64,
    pub current_inventory: f64,
    pub raw_quantity: f64,
    pub details: Vec<String>,
}

/// One suggested order line. Ephemeral; persist it through an [`crate::Order`] draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSuggestion {
    pub product_id: ProductId,
    pub product_name: String,
    pub category: Category,
    pub display_order: Option<i32>,
    /// Quantity produced by the unit policy, before any operator edits.
    pub suggested_quantity: f64,
    pub final_quantity: f64,
    pub unit: OrderUnit,
    pub reason: SuggestionReason,
    pub diagnostics: Vec<Diagnostic>,
    pub notes: String,
    pub loading_risk: bool,
}

impl OrderSuggestion {
    pub fn has(&self, diagnostic: &Diagnostic) -> bool {
        self.diagnostics.contains(diagnostic)
    }

    pub fn has_missing_conversion(&self) -> bool {
        self.has(&Diagnostic::MissingConversion)
    }

    /// Line carries an error and needs review before ordering.
    pub fn needs_review(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    /// Reason payload as free-form JSON, for callers that store it as a blob.
    pub fn reason_json(&self) -> JsonValue {
        json!({
            "cover_days": self.reason.cover_days,
            "daily_demand": self.reason.daily_demand,
            "safety_buffer": self.reason.safety_buffer,
            "target_stock": self.reason.target_stock,
            "current_inventory": self.reason.current_inventory,
            "raw_quantity": self.reason.raw_quantity,
            "details": self.reason.details,
        })
    }
}

/// Build the output record, or `None` when nothing needs ordering.
///
/// Lines with a missing conversion are always emitted so the gap is visible
/// even when the computed need is zero.
pub fn assemble(
    product: &Product,
    demand: ProductDemand,
    plan: &DemandPlan,
    decision: UnitDecision,
) -> Option<OrderSuggestion> {
    if !(decision.final_quantity > 0.0 || demand.missing_conversion) {
        return None;
    }

    Some(OrderSuggestion {
        product_id: product.id,
        product_name: product.name.clone(),
        category: product.category.clone(),
        display_order: product.display_order,
        suggested_quantity: decision.final_quantity,
        final_quantity: decision.final_quantity,
        unit: decision.unit,
        reason: SuggestionReason {
            cover_days: plan.cover_days,
            daily_demand: plan.daily_demand,
            safety_buffer: plan.safety_buffer_days,
            target_stock: plan.target_stock,
            current_inventory: plan.current_inventory,
            raw_quantity: plan.raw_quantity,
            details: demand.details,
        },
        notes: render_notes(&decision.diagnostics),
        diagnostics: decision.diagnostics,
        loading_risk: decision.loading_risk,
    })
}
