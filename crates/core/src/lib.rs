//! `stockroom-core` — shared domain foundation.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod error;
pub mod id;

pub use error::{DomainError, ValidationErrors};
pub use id::{BrandId, CategoryId, ProductId};
