//! Storage traits for the catalog.

use async_trait::async_trait;
use thiserror::Error;

use stockroom_catalog::{Brand, CatalogPage, Category, PageRequest, Product, ProductDraft, ProductFilter};
use stockroom_core::{BrandId, CategoryId, ProductId};

/// Failures surfaced by catalog backends.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("product {0} not found")]
    NotFound(ProductId),

    /// A write referenced a category that does not exist.
    #[error("unknown category {0}")]
    UnknownCategory(CategoryId),

    /// A write referenced a brand that does not exist.
    #[error("unknown brand {0}")]
    UnknownBrand(BrandId),

    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Persistence boundary for products.
///
/// Backends assign ids and maintain `created_at`/`updated_at` themselves.
/// Listing results come back in ascending id order.
#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn insert(&self, draft: ProductDraft) -> Result<Product, StoreError>;

    async fn get(&self, id: ProductId) -> Result<Product, StoreError>;

    /// Full replacement of every caller-supplied field. `created_at` is kept,
    /// `updated_at` is advanced.
    async fn update(&self, id: ProductId, draft: ProductDraft) -> Result<Product, StoreError>;

    async fn delete(&self, id: ProductId) -> Result<(), StoreError>;

    /// One page of products matching `filter`.
    async fn query(&self, filter: &ProductFilter, page: PageRequest) -> Result<CatalogPage, StoreError>;

    /// Every product, unpaginated. Used by the spreadsheet export and the
    /// metrics computation.
    async fn list_all(&self) -> Result<Vec<Product>, StoreError>;
}

/// Read access to the externally owned category and brand tables.
#[async_trait]
pub trait LookupDirectory: Send + Sync {
    async fn categories(&self) -> Result<Vec<Category>, StoreError>;

    async fn brands(&self) -> Result<Vec<Brand>, StoreError>;

    async fn category(&self, id: CategoryId) -> Result<Option<Category>, StoreError>;

    async fn brand(&self, id: BrandId) -> Result<Option<Brand>, StoreError>;
}
