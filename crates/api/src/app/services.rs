use std::sync::Arc;

use stockroom_catalog::{
    Brand, CatalogPage, Category, MetricsProvider, PageRequest, Product, ProductDraft,
    ProductFilter, ProductMetrics, SalesMetrics,
};
use stockroom_core::{BrandId, CategoryId, ProductId};
use stockroom_store::{InMemoryCatalog, LookupDirectory, ProductStore, StoreError, StoreMetrics};

#[cfg(feature = "postgres")]
use stockroom_store::PostgresCatalog;

/// Storage and metrics wiring behind one cloneable handle.
#[derive(Clone)]
pub enum AppServices {
    InMemory {
        catalog: Arc<InMemoryCatalog>,
        metrics: Arc<StoreMetrics<InMemoryCatalog>>,
    },
    #[cfg(feature = "postgres")]
    Postgres {
        catalog: Arc<PostgresCatalog>,
        metrics: Arc<StoreMetrics<PostgresCatalog>>,
    },
}

pub async fn build_services() -> AppServices {
    let use_persistent = std::env::var("USE_PERSISTENT_STORES")
        .unwrap_or_else(|_| "false".to_string())
        .parse::<bool>()
        .unwrap_or(false);

    if use_persistent {
        #[cfg(feature = "postgres")]
        {
            return build_postgres_services().await;
        }
        #[cfg(not(feature = "postgres"))]
        {
            tracing::warn!(
                "USE_PERSISTENT_STORES=true but postgres feature not enabled, falling back to in-memory"
            );
            return AppServices::in_memory();
        }
    }

    AppServices::in_memory()
}

#[cfg(feature = "postgres")]
async fn build_postgres_services() -> AppServices {
    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set when USE_PERSISTENT_STORES=true");

    let catalog = Arc::new(
        PostgresCatalog::connect(&database_url)
            .await
            .expect("failed to connect to Postgres"),
    );
    let metrics = Arc::new(StoreMetrics::new(catalog.clone()));

    AppServices::Postgres { catalog, metrics }
}

impl AppServices {
    pub fn in_memory() -> Self {
        let catalog = Arc::new(InMemoryCatalog::new());
        let metrics = Arc::new(StoreMetrics::new(catalog.clone()));
        AppServices::InMemory { catalog, metrics }
    }

    /// Direct handle to the in-memory backend, when that is what is wired.
    /// Tests use this to seed categories, brands, and products.
    pub fn in_memory_catalog(&self) -> Option<Arc<InMemoryCatalog>> {
        match self {
            AppServices::InMemory { catalog, .. } => Some(catalog.clone()),
            #[cfg(feature = "postgres")]
            AppServices::Postgres { .. } => None,
        }
    }

    pub async fn product_insert(&self, draft: ProductDraft) -> Result<Product, StoreError> {
        match self {
            AppServices::InMemory { catalog, .. } => catalog.insert(draft).await,
            #[cfg(feature = "postgres")]
            AppServices::Postgres { catalog, .. } => catalog.insert(draft).await,
        }
    }

    pub async fn product_get(&self, id: ProductId) -> Result<Product, StoreError> {
        match self {
            AppServices::InMemory { catalog, .. } => catalog.get(id).await,
            #[cfg(feature = "postgres")]
            AppServices::Postgres { catalog, .. } => catalog.get(id).await,
        }
    }

    pub async fn product_update(&self, id: ProductId, draft: ProductDraft) -> Result<Product, StoreError> {
        match self {
            AppServices::InMemory { catalog, .. } => catalog.update(id, draft).await,
            #[cfg(feature = "postgres")]
            AppServices::Postgres { catalog, .. } => catalog.update(id, draft).await,
        }
    }

    pub async fn product_delete(&self, id: ProductId) -> Result<(), StoreError> {
        match self {
            AppServices::InMemory { catalog, .. } => catalog.delete(id).await,
            #[cfg(feature = "postgres")]
            AppServices::Postgres { catalog, .. } => catalog.delete(id).await,
        }
    }

    pub async fn product_query(
        &self,
        filter: &ProductFilter,
        page: PageRequest,
    ) -> Result<CatalogPage, StoreError> {
        match self {
            AppServices::InMemory { catalog, .. } => catalog.query(filter, page).await,
            #[cfg(feature = "postgres")]
            AppServices::Postgres { catalog, .. } => catalog.query(filter, page).await,
        }
    }

    pub async fn product_list_all(&self) -> Result<Vec<Product>, StoreError> {
        match self {
            AppServices::InMemory { catalog, .. } => catalog.list_all().await,
            #[cfg(feature = "postgres")]
            AppServices::Postgres { catalog, .. } => catalog.list_all().await,
        }
    }

    pub async fn categories(&self) -> Result<Vec<Category>, StoreError> {
        match self {
            AppServices::InMemory { catalog, .. } => catalog.categories().await,
            #[cfg(feature = "postgres")]
            AppServices::Postgres { catalog, .. } => catalog.categories().await,
        }
    }

    pub async fn brands(&self) -> Result<Vec<Brand>, StoreError> {
        match self {
            AppServices::InMemory { catalog, .. } => catalog.brands().await,
            #[cfg(feature = "postgres")]
            AppServices::Postgres { catalog, .. } => catalog.brands().await,
        }
    }

    pub async fn category(&self, id: CategoryId) -> Result<Option<Category>, StoreError> {
        match self {
            AppServices::InMemory { catalog, .. } => catalog.category(id).await,
            #[cfg(feature = "postgres")]
            AppServices::Postgres { catalog, .. } => catalog.category(id).await,
        }
    }

    pub async fn brand(&self, id: BrandId) -> Result<Option<Brand>, StoreError> {
        match self {
            AppServices::InMemory { catalog, .. } => catalog.brand(id).await,
            #[cfg(feature = "postgres")]
            AppServices::Postgres { catalog, .. } => catalog.brand(id).await,
        }
    }

    pub async fn product_metrics(&self) -> anyhow::Result<ProductMetrics> {
        match self {
            AppServices::InMemory { metrics, .. } => metrics.product_metrics().await,
            #[cfg(feature = "postgres")]
            AppServices::Postgres { metrics, .. } => metrics.product_metrics().await,
        }
    }

    pub async fn sales_metrics(&self) -> anyhow::Result<SalesMetrics> {
        match self {
            AppServices::InMemory { metrics, .. } => metrics.sales_metrics().await,
            #[cfg(feature = "postgres")]
            AppServices::Postgres { metrics, .. } => metrics.sales_metrics().await,
        }
    }
}
