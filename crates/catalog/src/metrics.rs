//! Catalog-wide aggregates shown on listing screens.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Aggregates over the entire catalog.
///
/// Listing screens show these next to filtered results deliberately: the
/// cards summarise the whole catalog, never the current filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductMetrics {
    /// Number of products in the catalog.
    pub product_count: u64,
    /// Sum of quantities across all products.
    pub units_in_stock: i64,
    /// Total cost of stock on hand (`cost_price * quantity` summed).
    pub stock_cost: Decimal,
    /// Total retail value of stock on hand (`selling_price * quantity` summed).
    pub stock_retail_value: Decimal,
    /// `stock_retail_value - stock_cost`.
    pub projected_margin: Decimal,
}

/// Aggregates over recorded sales.
///
/// The catalog does not own sales; figures stay zero until a sales feed
/// publishes a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesMetrics {
    pub sale_count: u64,
    pub units_sold: i64,
    pub gross_revenue: Decimal,
    pub net_profit: Decimal,
}

/// Read-side metrics collaborator.
#[async_trait]
pub trait MetricsProvider: Send + Sync {
    async fn product_metrics(&self) -> anyhow::Result<ProductMetrics>;
    async fn sales_metrics(&self) -> anyhow::Result<SalesMetrics>;
}
