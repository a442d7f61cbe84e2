use chrono::{NaiveDate, Utc};
use thiserror::Error;
use tracing::info;

use m2go_core::Entity;
use m2go_ordering::{suggest_orders, MixPoolTable, Order, OrderSuggestion, OrderingError};

use crate::store::{StockStore, StoreError};

#[derive(Debug, Error)]
pub enum SuggestError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Ordering(#[from] OrderingError),
}

/// Runs suggestion computations against a store, one snapshot per run.
#[derive(Debug)]
pub struct SuggestionService<S>
where
    S: StockStore,
{
    store: S,
    pools: MixPoolTable,
}

impl<S> SuggestionService<S>
where
    S: StockStore,
{
    pub fn new(store: S, pools: MixPoolTable) -> Self {
        Self { store, pools }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn pools(&self) -> &MixPoolTable {
        &self.pools
    }

    pub fn suggest(&self, cycle: &str, as_of: NaiveDate) -> Result<Vec<OrderSuggestion>, SuggestError> {
        let snapshot = self.store.snapshot()?;
        info!(taken_at = %snapshot.taken_at(), "snapshot taken for suggestion run");
        Ok(suggest_orders(&snapshot, &self.pools, cycle, as_of)?)
    }

    /// Suggest, then persist the result as a draft order dated `as_of`.
    pub fn draft_order(&self, cycle: &str, as_of: NaiveDate) -> Result<Order, SuggestError> {
        let suggestions = self.suggest(cycle, as_of)?;
        let order = Order::draft(cycle, as_of, suggestions, Utc::now());
        self.store.save_order(order.clone())?;
        info!(order_id = %order.id(), lines = order.lines().len(), "draft order created");
        Ok(order)
    }
}
