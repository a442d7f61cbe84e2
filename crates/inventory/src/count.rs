use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use m2go_core::{CountId, DomainError, DomainResult, Entity, VariantId};

/// Incoming physical count for one variant, in that variant's own unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountEntry {
    pub variant_id: VariantId,
    pub date: NaiveDate,
    pub counted_qty: f64,
}

impl CountEntry {
    pub fn new(variant_id: VariantId, date: NaiveDate, counted_qty: f64) -> Self {
        Self {
            variant_id,
            date,
            counted_qty,
        }
    }

    pub fn validate(&self) -> DomainResult<()> {
        if !self.counted_qty.is_finite() {
            return Err(DomainError::validation("counted_qty must be finite"));
        }
        if self.counted_qty < 0.0 {
            return Err(DomainError::validation("counted_qty cannot be negative"));
        }
        Ok(())
    }
}

/// Immutable count observation.
///
/// `prev_on_hand` and `adjustment` capture the balance the count replaced, so
/// shrinkage or deliveries can be audited later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyCount {
    pub id: CountId,
    pub date: NaiveDate,
    pub variant_id: VariantId,
    pub counted_qty: f64,
    pub prev_on_hand: f64,
    pub adjustment: f64,
    pub recorded_at: DateTime<Utc>,
}

impl Entity for DailyCount {
    type Id = CountId;

    fn id(&self) -> Self::Id {
        self.id
    }
}

/// Latest known on-hand quantity of one variant (variant units, not base units).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryBalance {
    pub variant_id: VariantId,
    pub on_hand: f64,
}

impl InventoryBalance {
    /// Balance as it exists before the first count for a variant.
    pub fn empty(variant_id: VariantId) -> Self {
        Self {
            variant_id,
            on_hand: 0.0,
        }
    }

    /// Apply a count: last write wins, no merge.
    ///
    /// Returns the count record to append. The balance is updated in place, so
    /// the pair must be persisted together.
    pub fn record(&mut self, entry: &CountEntry, recorded_at: DateTime<Utc>) -> DomainResult<DailyCount> {
        entry.validate()?;
        if entry.variant_id != self.variant_id {
            return Err(DomainError::invariant("count variant_id does not match balance"));
        }

        let prev_on_hand = self.on_hand;
        let count = DailyCount {
            id: CountId::new(),
            date: entry.date,
            variant_id: entry.variant_id,
            counted_qty: entry.counted_qty,
            prev_on_hand,
            adjustment: entry.counted_qty - prev_on_hand,
            recorded_at,
        };

        self.on_hand = entry.counted_qty;
        Ok(count)
    }
}
