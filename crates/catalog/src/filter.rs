//! Listing filters and pagination.

use serde::{Deserialize, Serialize};

use stockroom_core::{BrandId, CategoryId};

use crate::product::Product;

/// Number of products on a listing page.
pub const PAGE_SIZE: u32 = 10;

/// Conjunctive filter criteria for catalog listings.
///
/// Text criteria match case-insensitive substrings; identifier criteria match
/// exactly. A product with no serie number never matches a serie criterion.
/// The empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductFilter {
    pub title: Option<String>,
    pub serie_number: Option<String>,
    pub category: Option<CategoryId>,
    pub brand: Option<BrandId>,
}

impl ProductFilter {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.serie_number.is_none()
            && self.category.is_none()
            && self.brand.is_none()
    }

    /// Whether `product` satisfies every criterion present.
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(needle) = &self.title {
            if !contains_ci(&product.title, needle) {
                return false;
            }
        }
        if let Some(needle) = &self.serie_number {
            match &product.serie_number {
                Some(serie) if contains_ci(serie, needle) => {}
                _ => return false,
            }
        }
        if let Some(category) = self.category {
            if product.category != Some(category) {
                return false;
            }
        }
        if let Some(brand) = self.brand {
            if product.brand != Some(brand) {
                return false;
            }
        }
        true
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// 1-based page selector. Numbers below 1 clamp to the first page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    number: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { number: 1 }
    }
}

impl PageRequest {
    pub fn new(number: Option<u32>) -> Self {
        Self {
            number: number.unwrap_or(1).max(1),
        }
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    /// Items to skip before this page starts.
    pub fn offset(&self) -> usize {
        (self.number as usize - 1) * PAGE_SIZE as usize
    }
}

/// One page of results plus the totals listing screens show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogPage {
    pub products: Vec<Product>,
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
    pub has_more: bool,
}

impl CatalogPage {
    /// Slice an already-filtered, already-ordered result set down to one page.
    ///
    /// A page past the end of the results is empty rather than an error.
    pub fn from_matches(matches: Vec<Product>, request: PageRequest) -> Self {
        let total = matches.len() as u64;
        let offset = request.offset();
        let products: Vec<Product> = matches
            .into_iter()
            .skip(offset)
            .take(PAGE_SIZE as usize)
            .collect();
        let has_more = offset + products.len() < total as usize;
        Self {
            products,
            page: request.number(),
            page_size: PAGE_SIZE,
            total,
            has_more,
        }
    }
}
