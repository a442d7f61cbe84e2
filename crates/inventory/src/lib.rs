//! Inventory module: physical counts and on-hand balances.
//!
//! Deterministic rules only (no IO, no storage). Callers are responsible for
//! running `InventoryBalance::record` atomically with persisting its output.

pub mod count;

pub use count::{CountEntry, DailyCount, InventoryBalance};
