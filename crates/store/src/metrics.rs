//! Metrics computed from the product store.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use rust_decimal::Decimal;

use stockroom_catalog::{MetricsProvider, Product, ProductMetrics, SalesMetrics};

use crate::catalog_store::ProductStore;

/// Computes product aggregates on demand and holds the latest sales snapshot.
///
/// Product figures always reflect current store contents. Sales figures come
/// from whichever system owns sales; they stay zero until one publishes.
pub struct StoreMetrics<S> {
    store: Arc<S>,
    sales: RwLock<SalesMetrics>,
}

impl<S> StoreMetrics<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            sales: RwLock::new(SalesMetrics::default()),
        }
    }

    /// Replace the sales snapshot.
    pub fn publish_sales(&self, snapshot: SalesMetrics) {
        if let Ok(mut guard) = self.sales.write() {
            *guard = snapshot;
        }
    }
}

#[async_trait]
impl<S: ProductStore> MetricsProvider for StoreMetrics<S> {
    async fn product_metrics(&self) -> anyhow::Result<ProductMetrics> {
        let products = self.store.list_all().await?;

        // Validation caps neither prices nor quantities, so the totals can
        // exceed their numeric range on an extreme catalog.
        let mut metrics = ProductMetrics::default();
        for product in &products {
            let quantity = Decimal::from(product.quantity);
            let cost = product.cost_price.checked_mul(quantity);
            let retail = product.selling_price.checked_mul(quantity);

            metrics.product_count += 1;
            metrics.units_in_stock = metrics
                .units_in_stock
                .checked_add(product.quantity)
                .ok_or_else(|| overflow(product))?;
            metrics.stock_cost = cost
                .and_then(|value| metrics.stock_cost.checked_add(value))
                .ok_or_else(|| overflow(product))?;
            metrics.stock_retail_value = retail
                .and_then(|value| metrics.stock_retail_value.checked_add(value))
                .ok_or_else(|| overflow(product))?;
        }
        metrics.projected_margin = metrics
            .stock_retail_value
            .checked_sub(metrics.stock_cost)
            .ok_or_else(|| anyhow::anyhow!("projected margin out of range"))?;
        Ok(metrics)
    }

    async fn sales_metrics(&self) -> anyhow::Result<SalesMetrics> {
        self.sales
            .read()
            .map(|guard| guard.clone())
            .map_err(|_| anyhow::anyhow!("sales snapshot lock poisoned"))
    }
}

fn overflow(product: &Product) -> anyhow::Error {
    anyhow::anyhow!("catalog totals overflow at product {}", product.id)
}
