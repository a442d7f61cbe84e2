//! Drafted purchase orders.
//!
//! A draft is seeded from a suggestion run. Operators adjust final quantities
//! on the draft, then confirm it; confirmed orders are frozen.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use m2go_core::{find_mut, DomainError, DomainResult, Entity, OrderId, ProductId};

use crate::rounding::OrderUnit;
use crate::suggestion::{OrderSuggestion, SuggestionReason};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Draft,
    Confirmed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub product_name: String,
    /// What the unit policy proposed. Never edited.
    pub suggested_quantity: f64,
    /// What will be ordered; starts equal to the suggestion.
    pub final_quantity: f64,
    pub unit: OrderUnit,
    pub reason: SuggestionReason,
    pub notes: String,
}

impl From<OrderSuggestion> for OrderLine {
    fn from(s: OrderSuggestion) -> Self {
        Self {
            product_id: s.product_id,
            product_name: s.product_name,
            suggested_quantity: s.suggested_quantity,
            final_quantity: s.final_quantity,
            unit: s.unit,
            reason: s.reason,
            notes: s.notes,
        }
    }
}

impl OrderLine {
    pub fn is_edited(&self) -> bool {
        self.final_quantity != self.suggested_quantity
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    order_date: NaiveDate,
    /// Ordering cycle the suggestions were computed for, e.g. `MONDAY`.
    cycle: String,
    status: OrderStatus,
    created_at: DateTime<Utc>,
    lines: Vec<OrderLine>,
}

impl Order {
    /// New draft holding one line per suggestion, in suggestion order.
    pub fn draft(
        cycle: impl Into<String>,
        order_date: NaiveDate,
        suggestions: Vec<OrderSuggestion>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: OrderId::new(),
            order_date,
            cycle: cycle.into().trim().to_uppercase(),
            status: OrderStatus::Draft,
            created_at,
            lines: suggestions.into_iter().map(OrderLine::from).collect(),
        }
    }

    pub fn order_date(&self) -> NaiveDate {
        self.order_date
    }

    pub fn cycle(&self) -> &str {
        &self.cycle
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    pub fn line(&self, product_id: ProductId) -> Option<&OrderLine> {
        self.lines.iter().find(|l| l.product_id == product_id)
    }

    pub fn is_confirmed(&self) -> bool {
        self.status == OrderStatus::Confirmed
    }

    /// Operator override of one line's quantity (in the line's unit).
    pub fn edit_final_quantity(&mut self, product_id: ProductId, quantity: f64) -> DomainResult<()> {
        self.ensure_draft()?;
        if !(quantity.is_finite() && quantity >= 0.0) {
            return Err(DomainError::validation(
                "final quantity must be a finite non-negative number",
            ));
        }
        let line = find_mut(&mut self.lines, product_id).ok_or_else(|| {
            DomainError::validation(format!("order has no line for product {product_id}"))
        })?;
        line.final_quantity = quantity;
        Ok(())
    }

    pub fn confirm(&mut self) -> DomainResult<()> {
        self.ensure_draft()?;
        if self.lines.is_empty() {
            return Err(DomainError::validation("cannot confirm an order without lines"));
        }
        self.status = OrderStatus::Confirmed;
        Ok(())
    }

    fn ensure_draft(&self) -> DomainResult<()> {
        if self.status != OrderStatus::Draft {
            return Err(DomainError::invariant("only draft orders can be changed"));
        }
        Ok(())
    }
}

impl Entity for Order {
    type Id = OrderId;

    fn id(&self) -> OrderId {
        self.id
    }
}

impl Entity for OrderLine {
    type Id = ProductId;

    fn id(&self) -> ProductId {
        self.product_id
    }
}
