use std::collections::BTreeMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;

use stockroom_catalog::{
    Brand, CatalogPage, Category, PageRequest, Product, ProductDraft, ProductFilter,
    ProductMetrics, SalesMetrics,
};
use stockroom_core::{BrandId, CategoryId, ValidationErrors};

// -------------------------
// Query-string DTOs
// -------------------------

/// Raw listing query parameters.
///
/// Everything arrives as text. Blank criteria mean "no filter" and malformed
/// numeric ids are dropped rather than rejected, so a bad dropdown value
/// degrades to an unfiltered listing instead of an error page.
#[derive(Debug, Default, Deserialize)]
pub struct ProductListQuery {
    pub title: Option<String>,
    pub serie_number: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub page: Option<String>,
}

impl ProductListQuery {
    pub fn filter(&self) -> ProductFilter {
        ProductFilter {
            title: non_empty(&self.title),
            serie_number: non_empty(&self.serie_number),
            category: parse_lenient(&self.category),
            brand: parse_lenient(&self.brand),
        }
    }

    pub fn page(&self) -> PageRequest {
        let number = self.page.as_deref().and_then(|p| p.trim().parse::<u32>().ok());
        PageRequest::new(number)
    }
}

/// Keep a criterion only when it is a non-empty string.
fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_deref().filter(|v| !v.is_empty()).map(str::to_string)
}

fn parse_lenient<T: FromStr>(value: &Option<String>) -> Option<T> {
    value.as_deref().and_then(|v| v.parse().ok())
}

// -------------------------
// Form DTOs
// -------------------------

/// Create/update form fields, all optional text.
///
/// [`ProductForm::into_draft`] reports missing and malformed fields together,
/// keyed by field name, so a client can annotate its form in one pass.
#[derive(Debug, Default, Deserialize)]
pub struct ProductForm {
    pub title: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub serie_number: Option<String>,
    pub cost_price: Option<String>,
    pub selling_price: Option<String>,
    pub quantity: Option<String>,
}

impl ProductForm {
    pub fn into_draft(self) -> Result<ProductDraft, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let category = match parse_reference(&self.category) {
            Ok(id) => id.map(CategoryId::new),
            Err(()) => {
                errors.add("category", "select a valid category");
                None
            }
        };
        let brand = match parse_reference(&self.brand) {
            Ok(id) => id.map(BrandId::new),
            Err(()) => {
                errors.add("brand", "select a valid brand");
                None
            }
        };
        let cost_price = parse_price(&self.cost_price, "cost_price", &mut errors);
        let selling_price = parse_price(&self.selling_price, "selling_price", &mut errors);
        let quantity = parse_quantity(&self.quantity, &mut errors);

        let draft = ProductDraft {
            title: self.title.unwrap_or_default(),
            category,
            brand,
            serie_number: self.serie_number.filter(|s| !s.trim().is_empty()),
            cost_price,
            selling_price,
            quantity,
        };

        if let Err(semantic) = draft.validate() {
            errors.merge(semantic);
        }

        if errors.is_empty() { Ok(draft) } else { Err(errors) }
    }
}

/// An absent or blank reference field means "none"; anything else must parse.
fn parse_reference(value: &Option<String>) -> Result<Option<i64>, ()> {
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw.parse().map(Some).map_err(|_| ()),
    }
}

fn parse_price(value: &Option<String>, field: &str, errors: &mut ValidationErrors) -> Decimal {
    match value.as_deref().map(str::trim) {
        None | Some("") => {
            errors.add(field, "this field is required");
            Decimal::ZERO
        }
        Some(raw) => match Decimal::from_str(raw) {
            Ok(price) => price,
            Err(_) => {
                errors.add(field, "enter a number");
                Decimal::ZERO
            }
        },
    }
}

fn parse_quantity(value: &Option<String>, errors: &mut ValidationErrors) -> i64 {
    match value.as_deref().map(str::trim) {
        None | Some("") => {
            errors.add("quantity", "this field is required");
            0
        }
        Some(raw) => match raw.parse() {
            Ok(quantity) => quantity,
            Err(_) => {
                errors.add("quantity", "enter a whole number");
                0
            }
        },
    }
}

// -------------------------
// Response bodies
// -------------------------

/// One product with its category/brand names resolved for display.
pub fn product_body(
    product: &Product,
    category_name: Option<&str>,
    brand_name: Option<&str>,
) -> serde_json::Value {
    json!({
        "id": product.id,
        "title": product.title,
        "category": product.category,
        "category_name": category_name,
        "brand": product.brand,
        "brand_name": brand_name,
        "serie_number": product.serie_number,
        "cost_price": product.cost_price,
        "selling_price": product.selling_price,
        "quantity": product.quantity,
        "created_at": product.created_at,
        "updated_at": product.updated_at,
    })
}

/// Listing screen payload: one page of products plus the filter dropdown
/// options and the whole-catalog metric cards.
pub fn listing_body(
    page: &CatalogPage,
    categories: &[Category],
    brands: &[Brand],
    product_metrics: &ProductMetrics,
    sales_metrics: &SalesMetrics,
) -> serde_json::Value {
    let category_names: BTreeMap<_, _> = categories
        .iter()
        .map(|category| (category.id, category.name.as_str()))
        .collect();
    let brand_names: BTreeMap<_, _> = brands
        .iter()
        .map(|brand| (brand.id, brand.name.as_str()))
        .collect();

    let products: Vec<serde_json::Value> = page
        .products
        .iter()
        .map(|product| {
            product_body(
                product,
                product.category.and_then(|id| category_names.get(&id).copied()),
                product.brand.and_then(|id| brand_names.get(&id).copied()),
            )
        })
        .collect();

    json!({
        "products": products,
        "page": page.page,
        "page_size": page.page_size,
        "total": page.total,
        "has_more": page.has_more,
        "product_metrics": product_metrics,
        "sales_metrics": sales_metrics,
        "categories": categories,
        "brands": brands,
    })
}
