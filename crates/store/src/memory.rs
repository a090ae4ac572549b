//! In-memory catalog backend.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::Utc;

use stockroom_catalog::{Brand, CatalogPage, Category, PageRequest, Product, ProductDraft, ProductFilter};
use stockroom_core::{BrandId, CategoryId, ProductId};

use crate::catalog_store::{LookupDirectory, ProductStore, StoreError};

/// Catalog backend used by tests and the default server wiring.
///
/// Ids come from per-table monotonic counters and are never reused within a
/// process. Reads always observe fully committed writes.
pub struct InMemoryCatalog {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    products: BTreeMap<ProductId, Product>,
    categories: BTreeMap<CategoryId, Category>,
    brands: BTreeMap<BrandId, Brand>,
    next_product_id: i64,
    next_category_id: i64,
    next_brand_id: i64,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
        }
    }

    /// Seed a category row, standing in for the externally owned table.
    pub fn add_category(&self, name: impl Into<String>) -> Result<Category, StoreError> {
        let mut inner = self.write()?;
        inner.next_category_id += 1;
        let category = Category {
            id: CategoryId::new(inner.next_category_id),
            name: name.into(),
        };
        inner.categories.insert(category.id, category.clone());
        Ok(category)
    }

    /// Seed a brand row, standing in for the externally owned table.
    pub fn add_brand(&self, name: impl Into<String>) -> Result<Brand, StoreError> {
        let mut inner = self.write()?;
        inner.next_brand_id += 1;
        let brand = Brand {
            id: BrandId::new(inner.next_brand_id),
            name: name.into(),
        };
        inner.brands.insert(brand.id, brand.clone());
        Ok(brand)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Inner>, StoreError> {
        self.inner
            .read()
            .map_err(|_| StoreError::Backend("catalog lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Inner>, StoreError> {
        self.inner
            .write()
            .map_err(|_| StoreError::Backend("catalog lock poisoned".to_string()))
    }
}

impl Default for InMemoryCatalog {
    fn default() -> Self {
        Self::new()
    }
}

fn check_references(inner: &Inner, draft: &ProductDraft) -> Result<(), StoreError> {
    if let Some(category) = draft.category {
        if !inner.categories.contains_key(&category) {
            return Err(StoreError::UnknownCategory(category));
        }
    }
    if let Some(brand) = draft.brand {
        if !inner.brands.contains_key(&brand) {
            return Err(StoreError::UnknownBrand(brand));
        }
    }
    Ok(())
}

#[async_trait]
impl ProductStore for InMemoryCatalog {
    async fn insert(&self, draft: ProductDraft) -> Result<Product, StoreError> {
        let mut inner = self.write()?;
        check_references(&inner, &draft)?;

        inner.next_product_id += 1;
        let now = Utc::now();
        let product = Product {
            id: ProductId::new(inner.next_product_id),
            title: draft.title,
            category: draft.category,
            brand: draft.brand,
            serie_number: draft.serie_number,
            cost_price: draft.cost_price,
            selling_price: draft.selling_price,
            quantity: draft.quantity,
            created_at: now,
            updated_at: now,
        };
        inner.products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn get(&self, id: ProductId) -> Result<Product, StoreError> {
        let inner = self.read()?;
        inner.products.get(&id).cloned().ok_or(StoreError::NotFound(id))
    }

    async fn update(&self, id: ProductId, draft: ProductDraft) -> Result<Product, StoreError> {
        let mut guard = self.write()?;
        let inner = &mut *guard;
        if !inner.products.contains_key(&id) {
            return Err(StoreError::NotFound(id));
        }
        check_references(inner, &draft)?;

        let existing = inner.products.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        existing.title = draft.title;
        existing.category = draft.category;
        existing.brand = draft.brand;
        existing.serie_number = draft.serie_number;
        existing.cost_price = draft.cost_price;
        existing.selling_price = draft.selling_price;
        existing.quantity = draft.quantity;
        existing.updated_at = Utc::now();
        Ok(existing.clone())
    }

    async fn delete(&self, id: ProductId) -> Result<(), StoreError> {
        let mut inner = self.write()?;
        inner
            .products
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }

    async fn query(&self, filter: &ProductFilter, page: PageRequest) -> Result<CatalogPage, StoreError> {
        let inner = self.read()?;
        // BTreeMap iteration gives ascending id order.
        let matches: Vec<Product> = inner
            .products
            .values()
            .filter(|product| filter.matches(product))
            .cloned()
            .collect();
        Ok(CatalogPage::from_matches(matches, page))
    }

    async fn list_all(&self) -> Result<Vec<Product>, StoreError> {
        let inner = self.read()?;
        Ok(inner.products.values().cloned().collect())
    }
}

#[async_trait]
impl LookupDirectory for InMemoryCatalog {
    async fn categories(&self) -> Result<Vec<Category>, StoreError> {
        let inner = self.read()?;
        Ok(inner.categories.values().cloned().collect())
    }

    async fn brands(&self) -> Result<Vec<Brand>, StoreError> {
        let inner = self.read()?;
        Ok(inner.brands.values().cloned().collect())
    }

    async fn category(&self, id: CategoryId) -> Result<Option<Category>, StoreError> {
        let inner = self.read()?;
        Ok(inner.categories.get(&id).cloned())
    }

    async fn brand(&self, id: BrandId) -> Result<Option<Brand>, StoreError> {
        let inner = self.read()?;
        Ok(inner.brands.get(&id).cloned())
    }
}
