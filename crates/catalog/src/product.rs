//! Product entity and write-side inputs.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockroom_core::{BrandId, CategoryId, ProductId, ValidationErrors};

/// A catalog entry as stored.
///
/// `created_at` and `updated_at` are maintained by the storage layer; callers
/// never supply them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub category: Option<CategoryId>,
    pub brand: Option<BrandId>,
    pub serie_number: Option<String>,
    pub cost_price: Decimal,
    pub selling_price: Decimal,
    pub quantity: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields a caller supplies when creating or fully replacing a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub title: String,
    #[serde(default)]
    pub category: Option<CategoryId>,
    #[serde(default)]
    pub brand: Option<BrandId>,
    #[serde(default)]
    pub serie_number: Option<String>,
    pub cost_price: Decimal,
    pub selling_price: Decimal,
    pub quantity: i64,
}

impl ProductDraft {
    /// Field-keyed validation shared by every write surface.
    ///
    /// Referential checks (does the category exist?) belong to storage; this
    /// covers value rules only.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.title.trim().is_empty() {
            errors.add("title", "must not be empty");
        }
        if self.cost_price < Decimal::ZERO {
            errors.add("cost_price", "must not be negative");
        }
        if self.selling_price < Decimal::ZERO {
            errors.add("selling_price", "must not be negative");
        }
        if self.quantity < 0 {
            errors.add("quantity", "must not be negative");
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Partial update; absent fields keep their stored values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProductPatch {
    pub title: Option<String>,
    pub category: Option<CategoryId>,
    pub brand: Option<BrandId>,
    pub serie_number: Option<String>,
    pub cost_price: Option<Decimal>,
    pub selling_price: Option<Decimal>,
    pub quantity: Option<i64>,
}

impl ProductPatch {
    /// Merge onto an existing product, producing the replacement draft.
    ///
    /// `category`, `brand`, and `serie_number` cannot be cleared through a
    /// patch; send a full update to drop them.
    pub fn apply_to(&self, product: &Product) -> ProductDraft {
        ProductDraft {
            title: self.title.clone().unwrap_or_else(|| product.title.clone()),
            category: self.category.or(product.category),
            brand: self.brand.or(product.brand),
            serie_number: self
                .serie_number
                .clone()
                .or_else(|| product.serie_number.clone()),
            cost_price: self.cost_price.unwrap_or(product.cost_price),
            selling_price: self.selling_price.unwrap_or(product.selling_price),
            quantity: self.quantity.unwrap_or(product.quantity),
        }
    }
}
