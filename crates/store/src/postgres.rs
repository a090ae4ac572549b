//! Postgres catalog backend.
//!
//! Expects the following schema:
//!
//! ```sql
//! CREATE TABLE categories ( id BIGSERIAL PRIMARY KEY, name TEXT NOT NULL );
//! CREATE TABLE brands     ( id BIGSERIAL PRIMARY KEY, name TEXT NOT NULL );
//! CREATE TABLE products (
//!     id            BIGSERIAL PRIMARY KEY,
//!     title         TEXT NOT NULL,
//!     category_id   BIGINT REFERENCES categories(id),
//!     brand_id      BIGINT REFERENCES brands(id),
//!     serie_number  TEXT,
//!     cost_price    NUMERIC NOT NULL,
//!     selling_price NUMERIC NOT NULL,
//!     quantity      BIGINT NOT NULL,
//!     created_at    TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     updated_at    TIMESTAMPTZ NOT NULL DEFAULT NOW()
//! );
//! ```
//!
//! Timestamps are assigned by the database so that application clocks never
//! disagree with stored rows.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::{QueryBuilder, Row};
use tracing::instrument;

use stockroom_catalog::{
    Brand, CatalogPage, Category, PageRequest, Product, ProductDraft, ProductFilter, PAGE_SIZE,
};
use stockroom_core::{BrandId, CategoryId, ProductId};

use crate::catalog_store::{LookupDirectory, ProductStore, StoreError};

const PRODUCT_COLUMNS: &str =
    "id, title, category_id, brand_id, serie_number, cost_price, selling_price, quantity, created_at, updated_at";

/// Postgres-backed catalog store.
///
/// Uses an SQLx connection pool (thread-safe, `Arc + Send + Sync`).
/// Referential integrity for category/brand ids is enforced by the database
/// foreign keys and mapped back onto [`StoreError`].
#[derive(Debug, Clone)]
pub struct PostgresCatalog {
    pool: Arc<PgPool>,
}

impl PostgresCatalog {
    /// Create a new PostgresCatalog with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Connect a small pool to `url` and wrap it.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(url)
            .await
            .map_err(|e| StoreError::Backend(format!("connect: {e}")))?;
        Ok(Self::new(pool))
    }
}

#[derive(Debug)]
struct ProductRow {
    id: i64,
    title: String,
    category_id: Option<i64>,
    brand_id: Option<i64>,
    serie_number: Option<String>,
    cost_price: Decimal,
    selling_price: Decimal,
    quantity: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl<'r> sqlx::FromRow<'r, PgRow> for ProductRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(ProductRow {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            category_id: row.try_get("category_id")?,
            brand_id: row.try_get("brand_id")?,
            serie_number: row.try_get("serie_number")?,
            cost_price: row.try_get("cost_price")?,
            selling_price: row.try_get("selling_price")?,
            quantity: row.try_get("quantity")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: ProductId::new(row.id),
            title: row.title,
            category: row.category_id.map(CategoryId::new),
            brand: row.brand_id.map(BrandId::new),
            serie_number: row.serie_number,
            cost_price: row.cost_price,
            selling_price: row.selling_price,
            quantity: row.quantity,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

fn product_from_row(row: &PgRow) -> Result<Product, StoreError> {
    use sqlx::FromRow;
    ProductRow::from_row(row)
        .map(Product::from)
        .map_err(|e| StoreError::Backend(format!("decode product row: {e}")))
}

fn backend(operation: &str, e: sqlx::Error) -> StoreError {
    StoreError::Backend(format!("{operation}: {e}"))
}

/// Map a write failure, turning foreign key violations into the referential
/// errors the in-memory backend raises directly.
fn map_write_error(operation: &str, e: sqlx::Error, draft: &ProductDraft) -> StoreError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.code().as_deref() == Some("23503") {
            let constraint = db_err.constraint().unwrap_or_default();
            if constraint.contains("category") {
                if let Some(id) = draft.category {
                    return StoreError::UnknownCategory(id);
                }
            }
            if constraint.contains("brand") {
                if let Some(id) = draft.brand {
                    return StoreError::UnknownBrand(id);
                }
            }
        }
    }
    backend(operation, e)
}

/// Escape LIKE wildcards so user input matches literally.
fn like_pattern(needle: &str) -> String {
    let escaped = needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

fn push_filter(builder: &mut QueryBuilder<'_, sqlx::Postgres>, filter: &ProductFilter) {
    builder.push(" WHERE 1 = 1");
    if let Some(title) = &filter.title {
        builder.push(" AND title ILIKE ").push_bind(like_pattern(title));
    }
    if let Some(serie) = &filter.serie_number {
        builder
            .push(" AND serie_number ILIKE ")
            .push_bind(like_pattern(serie));
    }
    if let Some(category) = filter.category {
        builder.push(" AND category_id = ").push_bind(category.value());
    }
    if let Some(brand) = filter.brand {
        builder.push(" AND brand_id = ").push_bind(brand.value());
    }
}

#[async_trait]
impl ProductStore for PostgresCatalog {
    #[instrument(skip(self, draft), err)]
    async fn insert(&self, draft: ProductDraft) -> Result<Product, StoreError> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO products (title, category_id, brand_id, serie_number, cost_price, selling_price, quantity)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(&draft.title)
        .bind(draft.category.map(|c| c.value()))
        .bind(draft.brand.map(|b| b.value()))
        .bind(&draft.serie_number)
        .bind(draft.cost_price)
        .bind(draft.selling_price)
        .bind(draft.quantity)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_write_error("insert product", e, &draft))?;

        product_from_row(&row)
    }

    #[instrument(skip(self), err)]
    async fn get(&self, id: ProductId) -> Result<Product, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id.value())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| backend("get product", e))?;

        match row {
            Some(row) => product_from_row(&row),
            None => Err(StoreError::NotFound(id)),
        }
    }

    #[instrument(skip(self, draft), err)]
    async fn update(&self, id: ProductId, draft: ProductDraft) -> Result<Product, StoreError> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE products
            SET title = $1,
                category_id = $2,
                brand_id = $3,
                serie_number = $4,
                cost_price = $5,
                selling_price = $6,
                quantity = $7,
                updated_at = NOW()
            WHERE id = $8
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(&draft.title)
        .bind(draft.category.map(|c| c.value()))
        .bind(draft.brand.map(|b| b.value()))
        .bind(&draft.serie_number)
        .bind(draft.cost_price)
        .bind(draft.selling_price)
        .bind(draft.quantity)
        .bind(id.value())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_write_error("update product", e, &draft))?;

        match row {
            Some(row) => product_from_row(&row),
            None => Err(StoreError::NotFound(id)),
        }
    }

    #[instrument(skip(self), err)]
    async fn delete(&self, id: ProductId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.value())
            .execute(&*self.pool)
            .await
            .map_err(|e| backend("delete product", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    #[instrument(skip(self, filter), err)]
    async fn query(&self, filter: &ProductFilter, page: PageRequest) -> Result<CatalogPage, StoreError> {
        let mut count_query: QueryBuilder<'_, sqlx::Postgres> =
            QueryBuilder::new("SELECT COUNT(*) AS total FROM products");
        push_filter(&mut count_query, filter);
        let total: i64 = count_query
            .build()
            .fetch_one(&*self.pool)
            .await
            .map_err(|e| backend("count products", e))?
            .try_get("total")
            .map_err(|e| backend("count products", e))?;

        let mut select: QueryBuilder<'_, sqlx::Postgres> =
            QueryBuilder::new(format!("SELECT {PRODUCT_COLUMNS} FROM products"));
        push_filter(&mut select, filter);
        select
            .push(" ORDER BY id ASC LIMIT ")
            .push_bind(PAGE_SIZE as i64)
            .push(" OFFSET ")
            .push_bind(page.offset() as i64);

        let rows = select
            .build()
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| backend("query products", e))?;

        let products = rows
            .iter()
            .map(product_from_row)
            .collect::<Result<Vec<Product>, StoreError>>()?;

        let has_more = page.offset() + products.len() < total as usize;
        Ok(CatalogPage {
            products,
            page: page.number(),
            page_size: PAGE_SIZE,
            total: total as u64,
            has_more,
        })
    }

    #[instrument(skip(self), err)]
    async fn list_all(&self) -> Result<Vec<Product>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id ASC"
        ))
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| backend("list products", e))?;

        rows.iter().map(product_from_row).collect()
    }
}

#[async_trait]
impl LookupDirectory for PostgresCatalog {
    async fn categories(&self) -> Result<Vec<Category>, StoreError> {
        let rows = sqlx::query("SELECT id, name FROM categories ORDER BY id ASC")
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| backend("list categories", e))?;

        rows.iter()
            .map(|row| {
                Ok(Category {
                    id: CategoryId::new(row.try_get("id").map_err(|e| backend("decode category", e))?),
                    name: row.try_get("name").map_err(|e| backend("decode category", e))?,
                })
            })
            .collect()
    }

    async fn brands(&self) -> Result<Vec<Brand>, StoreError> {
        let rows = sqlx::query("SELECT id, name FROM brands ORDER BY id ASC")
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| backend("list brands", e))?;

        rows.iter()
            .map(|row| {
                Ok(Brand {
                    id: BrandId::new(row.try_get("id").map_err(|e| backend("decode brand", e))?),
                    name: row.try_get("name").map_err(|e| backend("decode brand", e))?,
                })
            })
            .collect()
    }

    async fn category(&self, id: CategoryId) -> Result<Option<Category>, StoreError> {
        let row = sqlx::query("SELECT id, name FROM categories WHERE id = $1")
            .bind(id.value())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| backend("get category", e))?;

        row.map(|row| {
            Ok(Category {
                id: CategoryId::new(row.try_get("id").map_err(|e| backend("decode category", e))?),
                name: row.try_get("name").map_err(|e| backend("decode category", e))?,
            })
        })
        .transpose()
    }

    async fn brand(&self, id: BrandId) -> Result<Option<Brand>, StoreError> {
        let row = sqlx::query("SELECT id, name FROM brands WHERE id = $1")
            .bind(id.value())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| backend("get brand", e))?;

        row.map(|row| {
            Ok(Brand {
                id: BrandId::new(row.try_get("id").map_err(|e| backend("decode brand", e))?),
                name: row.try_get("name").map_err(|e| backend("decode brand", e))?,
            })
        })
        .transpose()
    }
}
