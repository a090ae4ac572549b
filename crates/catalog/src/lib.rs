//! `stockroom-catalog` — product catalog domain.
//!
//! Defines the product entity, the filter and pagination rules for listings,
//! the category/brand lookup mirror types, and the metrics contract shown on
//! listing screens. Storage and HTTP live in other crates.

pub mod directory;
pub mod filter;
pub mod metrics;
pub mod product;

pub use directory::{Brand, Category};
pub use filter::{CatalogPage, PageRequest, ProductFilter, PAGE_SIZE};
pub use metrics::{MetricsProvider, ProductMetrics, SalesMetrics};
pub use product::{Product, ProductDraft, ProductPatch};
