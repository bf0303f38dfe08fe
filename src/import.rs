//! CSV text to [`BulkRow`]s for the bulk product import.
//!
//! Header row required. Columns: `name,unit,category,qty_dom_mie,qty_jue,qty_vie`
//! plus an optional `price`, with Spanish aliases accepted. Cells are split on
//! commas with quotes stripped; quoted commas are not supported.

use crate::error::{AppError, AppResult};
use crate::models::BulkRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Name,
    Unit,
    Category,
    Price,
    QtyWindowA,
    QtyWindowB,
    QtyWindowC,
}

impl Field {
    fn from_header(header: &str) -> Option<Self> {
        match header.to_lowercase().as_str() {
            "name" | "nombre" => Some(Field::Name),
            "unit" | "unidad" => Some(Field::Unit),
            "category" | "categoria" | "categoría" => Some(Field::Category),
            "price" | "precio" => Some(Field::Price),
            "qty_dom_mie" | "cantidad_dom_mie" => Some(Field::QtyWindowA),
            "qty_jue" | "cantidad_jue" => Some(Field::QtyWindowB),
            "qty_vie" | "cantidad_vie" => Some(Field::QtyWindowC),
            _ => None,
        }
    }
}

fn cells(line: &str) -> Vec<String> {
    line.split(',')
        .map(|cell| cell.trim().replace('"', ""))
        .collect()
}

/// Parses bulk import text. Rows whose cell count differs from the header are
/// skipped; a header without a name column fails the whole upload.
pub fn parse_products_csv(text: &str) -> AppResult<Vec<BulkRow>> {
    let lines: Vec<&str> = text
        .trim()
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect();

    let Some((header, body)) = lines.split_first() else {
        return Ok(Vec::new());
    };
    if body.is_empty() {
        return Ok(Vec::new());
    }

    let columns: Vec<Option<Field>> = cells(header)
        .iter()
        .map(|h| Field::from_header(h))
        .collect();
    if !columns.contains(&Some(Field::Name)) {
        tracing::warn!(header = %header, "Bulk upload header has no name column");
        return Err(AppError::Parse);
    }

    let mut rows = Vec::with_capacity(body.len());
    for line in body {
        let values = cells(line);
        if values.len() != columns.len() {
            tracing::debug!(line = %line, "Skipping row with wrong column count");
            continue;
        }

        let mut row = BulkRow::default();
        for (field, value) in columns.iter().zip(values) {
            match field {
                Some(Field::Name) => row.name = value,
                Some(Field::Unit) => row.unit = value,
                Some(Field::Category) => row.category = value,
                Some(Field::Price) => row.price = Some(value),
                Some(Field::QtyWindowA) => row.qty_window_a = Some(value),
                Some(Field::QtyWindowB) => row.qty_window_b = Some(value),
                Some(Field::QtyWindowC) => row.qty_window_c = Some(value),
                None => {}
            }
        }
        rows.push(row);
    }

    Ok(rows)
}
