//! Infrastructure layer: storage adapters, configuration, service wiring.

pub mod config;
pub mod service;
pub mod store;

mod integration_tests;

pub use config::{AppConfig, AppConfigError};
pub use service::{SuggestError, SuggestionService};
pub use store::{InMemoryStockStore, StockSnapshot, StockStore, StoreError};
