//! `m2go-core`: shared building blocks for the ordering workspace.
//!
//! Pure domain primitives only (no storage, no IO).

pub mod entity;
pub mod error;
pub mod id;

pub use entity::{find_mut, position_of, Entity};
pub use error::{DomainError, DomainResult};
pub use id::{CountId, OrderId, ProductId, VariantId};
