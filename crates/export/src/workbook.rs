//! Whole-catalog XLSX snapshot.
//!
//! The export always covers every product regardless of any listing filters
//! in effect, one data row per record. Category and brand columns carry the
//! referenced display name, or an empty cell when the reference is unset.

use std::collections::BTreeMap;
use std::io::Cursor;

use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::prelude::ToPrimitive;
use thiserror::Error;

use stockroom_catalog::{Brand, Category, Product};

/// Worksheet title of the produced workbook.
pub const SHEET_TITLE: &str = "Products";

/// Header row, one entry per exported column.
pub const HEADERS: [&str; 10] = [
    "ID",
    "Title",
    "Category",
    "Brand",
    "Serial Number",
    "Cost Price",
    "Selling Price",
    "Quantity",
    "Created At",
    "Updated At",
];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("new workbook is missing its default sheet")]
    MissingSheet,
    #[error("product {id}: {column} does not fit a spreadsheet number cell")]
    Numeric { id: i64, column: &'static str },
    #[error("failed to serialize workbook: {0}")]
    Write(String),
}

/// Render the catalog into a finished `.xlsx` byte buffer.
///
/// Nothing is returned on failure; a partially written workbook never leaves
/// this function. A value that cannot be represented exactly in a number
/// cell fails the export rather than rounding silently.
pub fn write_catalog(
    products: &[Product],
    categories: &[Category],
    brands: &[Brand],
) -> Result<Vec<u8>, ExportError> {
    let category_names: BTreeMap<_, _> = categories
        .iter()
        .map(|category| (category.id, category.name.as_str()))
        .collect();
    let brand_names: BTreeMap<_, _> = brands
        .iter()
        .map(|brand| (brand.id, brand.name.as_str()))
        .collect();

    let mut book = umya_spreadsheet::new_file();
    let sheet = book
        .get_sheet_by_name_mut("Sheet1")
        .ok_or(ExportError::MissingSheet)?;
    sheet.set_name(SHEET_TITLE);

    for (index, header) in HEADERS.iter().enumerate() {
        sheet
            .get_cell_mut(format!("{}1", column_letter(index as u32 + 1)))
            .set_value(*header);
    }

    for (index, product) in products.iter().enumerate() {
        let row = index as u32 + 2;
        let id = product.id.value();
        let category = product
            .category
            .and_then(|id| category_names.get(&id).copied())
            .unwrap_or("");
        let brand = product
            .brand
            .and_then(|id| brand_names.get(&id).copied())
            .unwrap_or("");

        let id_cell = int_cell(id).ok_or(ExportError::Numeric { id, column: "ID" })?;
        let quantity_cell = int_cell(product.quantity)
            .ok_or(ExportError::Numeric { id, column: "Quantity" })?;
        let cost_cell = product
            .cost_price
            .to_f64()
            .ok_or(ExportError::Numeric { id, column: "Cost Price" })?;
        let selling_cell = product
            .selling_price
            .to_f64()
            .ok_or(ExportError::Numeric { id, column: "Selling Price" })?;

        sheet.get_cell_mut(format!("A{row}")).set_value_number(id_cell);
        sheet
            .get_cell_mut(format!("B{row}"))
            .set_value(product.title.as_str());
        sheet.get_cell_mut(format!("C{row}")).set_value(category);
        sheet.get_cell_mut(format!("D{row}")).set_value(brand);
        sheet
            .get_cell_mut(format!("E{row}"))
            .set_value(product.serie_number.as_deref().unwrap_or(""));
        sheet.get_cell_mut(format!("F{row}")).set_value_number(cost_cell);
        sheet.get_cell_mut(format!("G{row}")).set_value_number(selling_cell);
        sheet
            .get_cell_mut(format!("H{row}"))
            .set_value_number(quantity_cell);
        sheet
            .get_cell_mut(format!("I{row}"))
            .set_value(timestamp(product.created_at));
        sheet
            .get_cell_mut(format!("J{row}"))
            .set_value(timestamp(product.updated_at));
    }

    let mut cursor = Cursor::new(Vec::new());
    umya_spreadsheet::writer::xlsx::write_writer(&book, &mut cursor)
        .map_err(|e| ExportError::Write(e.to_string()))?;
    Ok(cursor.into_inner())
}

fn timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Secs, true)
}

// Number cells are IEEE doubles; integers stay exact only up to 2^53.
const MAX_EXACT_CELL_INT: u64 = 1 << 53;

fn int_cell(value: i64) -> Option<f64> {
    (value.unsigned_abs() <= MAX_EXACT_CELL_INT).then_some(value as f64)
}

/// Spreadsheet column letters for a 1-based column index (1 = A, 27 = AA).
fn column_letter(index: u32) -> String {
    let mut index = index;
    let mut letters = String::new();
    while index > 0 {
        let rem = ((index - 1) % 26) as u8;
        letters.insert(0, (b'A' + rem) as char);
        index = (index - 1) / 26;
    }
    letters
}
