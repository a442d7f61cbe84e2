use serde::{Deserialize, Serialize};

use m2go_core::{position_of, DomainError, DomainResult, Entity, ProductId};

use crate::variant::Variant;

/// Product category. Drives the unit policy at ordering time.
///
/// The set is open-ended: unknown categories are kept verbatim and ordered in
/// base units like `veg`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Protein,
    Veg,
    Frozen,
    Other(String),
}

impl Category {
    pub fn as_str(&self) -> &str {
        match self {
            Category::Protein => "protein",
            Category::Veg => "veg",
            Category::Frozen => "frozen",
            Category::Other(s) => s,
        }
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        match value.as_str() {
            "protein" => Category::Protein,
            "veg" => Category::Veg,
            "frozen" => Category::Frozen,
            _ => Category::Other(value),
        }
    }
}

impl From<&str> for Category {
    fn from(value: &str) -> Self {
        Category::from(value.to_string())
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        match value {
            Category::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl core::fmt::Display for Category {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the product is kept (`room` / `chill` / `frozen`, open-ended).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StorageClass {
    Room,
    Chill,
    Frozen,
    Other(String),
}

impl From<String> for StorageClass {
    fn from(value: String) -> Self {
        match value.as_str() {
            "room" => StorageClass::Room,
            "chill" => StorageClass::Chill,
            "frozen" => StorageClass::Frozen,
            _ => StorageClass::Other(value),
        }
    }
}

impl From<&str> for StorageClass {
    fn from(value: &str) -> Self {
        StorageClass::from(value.to_string())
    }
}

impl From<StorageClass> for String {
    fn from(value: StorageClass) -> Self {
        match value {
            StorageClass::Room => "room".to_string(),
            StorageClass::Chill => "chill".to_string(),
            StorageClass::Frozen => "frozen".to_string(),
            StorageClass::Other(s) => s,
        }
    }
}

fn default_active() -> bool {
    true
}

/// A purchasable item together with its variants.
///
/// `name` is the catalog name used by kitchen staff; mixed pools refer to
/// products by it. Products are never deleted, only deactivated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub name_en: String,
    pub category: Category,
    pub storage: StorageClass,
    #[serde(default)]
    pub supplier: Option<String>,
    /// Items per case, used for case rounding.
    #[serde(default)]
    pub case_size: Option<f64>,
    #[serde(default)]
    pub min_order_qty: Option<f64>,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub display_order: Option<i32>,
    #[serde(default)]
    pub variants: Vec<Variant>,
}

impl Product {
    pub fn new(
        name: impl Into<String>,
        name_en: impl Into<String>,
        category: impl Into<Category>,
        storage: impl Into<StorageClass>,
    ) -> Self {
        Self {
            id: ProductId::new(),
            name: name.into(),
            name_en: name_en.into(),
            category: category.into(),
            storage: storage.into(),
            supplier: None,
            case_size: None,
            min_order_qty: None,
            active: true,
            display_order: None,
            variants: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: ProductId) -> Self {
        self.id = id;
        self
    }

    pub fn with_supplier(mut self, supplier: impl Into<String>) -> Self {
        self.supplier = Some(supplier.into());
        self
    }

    pub fn with_case_size(mut self, case_size: f64) -> Self {
        self.case_size = Some(case_size);
        self
    }

    pub fn with_min_order_qty(mut self, min_order_qty: f64) -> Self {
        self.min_order_qty = Some(min_order_qty);
        self
    }

    pub fn with_display_order(mut self, order: i32) -> Self {
        self.display_order = Some(order);
        self
    }

    /// Start a variant owned by this product (not yet attached).
    pub fn variant(
        &self,
        form: impl Into<String>,
        container: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Variant {
        Variant::new(self.id, form, container, display_name)
    }

    /// Attach a variant, rejecting one that belongs to another product or
    /// reuses an existing variant id.
    pub fn add_variant(&mut self, variant: Variant) -> DomainResult<()> {
        if variant.product_id != self.id {
            return Err(DomainError::invariant("variant product_id mismatch"));
        }
        if position_of(&self.variants, variant.id).is_some() {
            return Err(DomainError::duplicate("variant", variant.id));
        }
        variant.validate()?;
        self.variants.push(variant);
        Ok(())
    }

    pub fn with_variant(mut self, variant: Variant) -> DomainResult<Self> {
        self.add_variant(variant)?;
        Ok(self)
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Soft delete.
    pub fn deactivate(&mut self) {
        self.active = false;
    }

    pub fn activate(&mut self) {
        self.active = true;
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        if self.name_en.trim().is_empty() {
            return Err(DomainError::validation("name_en cannot be empty"));
        }
        if let Some(c) = self.case_size {
            if !(c.is_finite() && c > 0.0) {
                return Err(DomainError::validation(format!(
                    "case_size must be a finite positive number (got {c})"
                )));
            }
        }
        if let Some(m) = self.min_order_qty {
            if !(m.is_finite() && m >= 0.0) {
                return Err(DomainError::validation(format!(
                    "min_order_qty must be a finite non-negative number (got {m})"
                )));
            }
        }
        for v in &self.variants {
            if v.product_id != self.id {
                return Err(DomainError::invariant("variant product_id mismatch"));
            }
            v.validate()?;
        }
        Ok(())
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> Self::Id {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn chicken() -> Product {
        Product::new("鸡腿", "Chicken thigh", "protein", "chill").with_case_size(10.0)
    }

    #[test]
    fn category_parses_known_and_keeps_unknown() {
        assert_eq!(Category::from("protein"), Category::Protein);
        assert_eq!(Category::from("veg"), Category::Veg);
        assert_eq!(Category::from("dry goods"), Category::Other("dry goods".to_string()));
        assert_eq!(String::from(Category::Other("dry goods".into())), "dry goods");
    }

    #[test]
    fn category_serializes_as_plain_string() {
        let json = serde_json::to_string(&Category::Frozen).unwrap();
        assert_eq!(json, "\"frozen\"");
        let back: Category = serde_json::from_str("\"sauce\"").unwrap();
        assert_eq!(back, Category::Other("sauce".to_string()));
    }

    #[test]
    fn add_variant_rejects_foreign_product() {
        let mut p = chicken();
        let other = Product::new("牛肉", "Beef", "protein", "chill");
        let v = other.variant("RAW", "case", "Beef case");

        let err = p.add_variant(v).unwrap_err();
        match err {
            DomainError::InvariantViolation(_) => {}
            _ => panic!("Expected InvariantViolation for foreign variant"),
        }
    }

    #[test]
    fn add_variant_rejects_same_id_twice() {
        let mut p = chicken();
        let v = p.variant("RAW", "case", "Chicken case");
        p.add_variant(v.clone()).unwrap();

        let err = p.add_variant(v).unwrap_err();
        assert!(matches!(err, DomainError::Duplicate { kind: "variant", .. }));
        assert_eq!(p.variants.len(), 1);
    }

    #[test]
    fn add_variant_rejects_non_positive_conversion() {
        let mut p = chicken();
        let v = p.variant("RAW", "case", "Chicken case").with_conversion(0.0);
        assert!(p.add_variant(v).is_err());
        assert!(p.variants.is_empty());
    }

    #[test]
    fn variant_without_conversion_is_allowed() {
        let mut p = chicken();
        let v = p.variant("RAW", "box", "Chicken box");
        p.add_variant(v).unwrap();
        assert_eq!(p.variants.len(), 1);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_name() {
        let p = Product::new("  ", "Chicken", "protein", "chill");
        match p.validate().unwrap_err() {
            DomainError::Validation(_) => {}
            _ => panic!("Expected Validation error for empty name"),
        }
    }

    #[test]
    fn deactivate_is_a_soft_flag() {
        let mut p = chicken();
        let v = p.variant("RAW", "case", "Chicken case").with_conversion(10.0);
        p.add_variant(v).unwrap();
        p.deactivate();

        assert!(!p.is_active());
        assert_eq!(p.variants.len(), 1);
    }

    #[test]
    fn product_json_defaults_to_active() {
        let json = r#"{
            "id": "0190a0a0-0000-7000-8000-000000000001",
            "name": "胡萝卜",
            "name_en": "Carrot",
            "category": "veg",
            "storage": "room"
        }"#;
        let p: Product = serde_json::from_str(json).unwrap();
        assert!(p.active);
        assert!(p.variants.is_empty());
        assert_eq!(p.storage, StorageClass::Room);
    }

    #[test]
    fn supplier_survives_json() {
        let p = chicken().with_supplier("Sysco");
        let json = serde_json::to_string(&p).unwrap();
        let back: Product = serde_json::from_str(&json).unwrap();
        assert_eq!(back.supplier.as_deref(), Some("Sysco"));
        assert_eq!(back, p);
    }

    proptest! {
        #[test]
        fn validate_accepts_any_positive_case_size(case_size in 0.001f64..10_000.0) {
            let p = chicken().with_case_size(case_size);
            prop_assert!(p.validate().is_ok());
        }

        #[test]
        fn validate_rejects_non_positive_case_size(case_size in -10_000.0f64..=0.0) {
            let p = chicken().with_case_size(case_size);
            prop_assert!(p.validate().is_err());
        }
    }
}
