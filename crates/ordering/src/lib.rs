//! `m2go-ordering`: order suggestions from count history.
//!
//! The computation is a pure, synchronous two-pass pipeline over a consistent
//! snapshot supplied through [`OrderingSource`]:
//!
//! 1. per-variant statistics ([`VariantStatsTable`]) and mixed-pool totals
//!    ([`PoolTotalsTable`]), both immutable once built;
//! 2. per product: demand/inventory aggregation, target stock, unit policy and
//!    assembly into [`OrderSuggestion`] records.
//!
//! Nothing here writes to storage. Callers decide whether to persist results,
//! typically as a draft [`Order`].

pub mod demand;
pub mod diagnostic;
pub mod engine;
pub mod error;
pub mod order;
pub mod pool;
pub mod rounding;
pub mod settings;
pub mod source;
pub mod stats;
pub mod suggestion;
pub mod usage;

#[cfg(test)]
pub(crate) mod testing;

pub use demand::{aggregate_product, plan_stock, DemandPlan, ProductDemand};
pub use diagnostic::{render_notes, Diagnostic};
pub use engine::suggest_orders;
pub use error::OrderingError;
pub use order::{Order, OrderLine, OrderStatus};
pub use pool::{MixPool, MixPoolTable, PoolMember, PoolTotals, PoolTotalsTable};
pub use rounding::{apply_unit_policy, OrderUnit, UnitDecision};
pub use settings::{resolve_setting, OrderingParams, SettingsUpdate};
pub use source::OrderingSource;
pub use stats::{VariantStats, VariantStatsTable};
pub use suggestion::{assemble, OrderSuggestion, SuggestionReason};
pub use usage::{estimate_usage, usage_from_history, UsageEstimate};
