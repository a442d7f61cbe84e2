use serde::{Deserialize, Serialize};

use m2go_core::{DomainError, DomainResult, Entity, ProductId, VariantId};

/// A stock-keeping unit of a product, distinguished by form and container.
///
/// `conversion_to_base` is the number of product base units in one unit of this
/// variant's container. A variant without it is still counted, but it cannot
/// be folded into demand or inventory totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    pub id: VariantId,
    pub product_id: ProductId,
    /// e.g. `RAW`, `COOKED_CHILL`, `PREP_shred`, `PREP_chunk`.
    pub form: String,
    /// e.g. `case`, `bag`, `box_4inch`.
    pub container: String,
    #[serde(default)]
    pub conversion_to_base: Option<f64>,
    pub display_name: String,
    #[serde(default)]
    pub display_order: Option<i32>,
}

impl Variant {
    pub fn new(
        product_id: ProductId,
        form: impl Into<String>,
        container: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            id: VariantId::new(),
            product_id,
            form: form.into(),
            container: container.into(),
            conversion_to_base: None,
            display_name: display_name.into(),
            display_order: None,
        }
    }

    pub fn with_id(mut self, id: VariantId) -> Self {
        self.id = id;
        self
    }

    pub fn with_conversion(mut self, conversion_to_base: f64) -> Self {
        self.conversion_to_base = Some(conversion_to_base);
        self
    }

    pub fn with_display_order(mut self, order: i32) -> Self {
        self.display_order = Some(order);
        self
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.form.trim().is_empty() {
            return Err(DomainError::validation("variant form cannot be empty"));
        }
        if self.container.trim().is_empty() {
            return Err(DomainError::validation("variant container cannot be empty"));
        }
        if self.display_name.trim().is_empty() {
            return Err(DomainError::validation("variant display name cannot be empty"));
        }
        if let Some(c) = self.conversion_to_base {
            if !(c.is_finite() && c > 0.0) {
                return Err(DomainError::invariant(format!(
                    "conversion_to_base must be a finite positive number (got {c})"
                )));
            }
        }
        Ok(())
    }
}

impl Entity for Variant {
    type Id = VariantId;

    fn id(&self) -> Self::Id {
        self.id
    }
}
