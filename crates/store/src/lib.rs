//! `stockroom-store` — catalog persistence boundary.
//!
//! The traits in [`catalog_store`] make no storage assumptions. The default
//! backend keeps everything in process memory; a Postgres backend is available
//! behind the `postgres` feature.

pub mod catalog_store;
pub mod memory;
pub mod metrics;

#[cfg(feature = "postgres")]
pub mod postgres;

pub use catalog_store::{LookupDirectory, ProductStore, StoreError};
pub use memory::InMemoryCatalog;
pub use metrics::StoreMetrics;

#[cfg(feature = "postgres")]
pub use postgres::PostgresCatalog;
