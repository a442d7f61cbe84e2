//! Catalog module: purchasable products and their stock-keeping variants.
//!
//! Plain records plus validation rules; storage lives elsewhere.

pub mod product;
pub mod variant;

pub use product::{Category, Product, StorageClass};
pub use variant::Variant;
