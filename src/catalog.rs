use chrono::{DateTime, Datelike, NaiveDate, Utc};
use chrono_tz::Tz;
use std::sync::Arc;
use uuid::Uuid;

use crate::clock::Clock;
use crate::db::{Collection, Store, StoreExt};
use crate::error::{AppError, AppResult, RowError};
use crate::models::{BulkRow, DeliveryWindow, NewProduct, Product, ProductPatch};

/// Suggested quantity for `product` on `date`, picked by delivery window.
pub fn suggested_quantity(product: &Product, date: NaiveDate) -> u32 {
    match DeliveryWindow::for_weekday(date.weekday()) {
        DeliveryWindow::A => product.qty_window_a,
        DeliveryWindow::B => product.qty_window_b,
        DeliveryWindow::C => product.qty_window_c,
    }
}

/// Product catalog over the `products` collection.
#[derive(Clone)]
pub struct ProductCatalog {
    store: Arc<dyn Store>,
    clock: Arc<dyn Clock>,
}

impl ProductCatalog {
    pub fn new(store: Arc<dyn Store>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub fn list(&self) -> AppResult<Vec<Product>> {
        Ok(self.store.load(Collection::Products)?)
    }

    pub fn get(&self, id: Uuid) -> AppResult<Product> {
        self.list()?
            .into_iter()
            .find(|p| p.id == id)
            .ok_or_else(|| AppError::not_found("product", id))
    }

    pub fn create(&self, product: NewProduct) -> AppResult<Product> {
        validate_fields(&product.name, &product.unit, &product.category, product.price)?;

        let mut products: Vec<Product> = self.store.load(Collection::Products)?;
        let product = Product {
            id: Uuid::new_v4(),
            name: product.name.trim().to_string(),
            unit: product.unit.trim().to_string(),
            category: product.category.trim().to_string(),
            price: product.price,
            qty_window_a: product.qty_window_a,
            qty_window_b: product.qty_window_b,
            qty_window_c: product.qty_window_c,
            created_by: product.created_by,
            created_at: self.clock.now(),
        };
        products.push(product.clone());
        self.store.save(Collection::Products, &products)?;

        tracing::info!(product_id = %product.id, name = %product.name, "Product created");
        Ok(product)
    }

    pub fn update(&self, id: Uuid, patch: ProductPatch) -> AppResult<Product> {
        let mut products: Vec<Product> = self.store.load(Collection::Products)?;
        let product = products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| AppError::not_found("product", id))?;

        let mut updated = product.clone();
        if let Some(name) = patch.name {
            updated.name = name.trim().to_string();
        }
        if let Some(unit) = patch.unit {
            updated.unit = unit.trim().to_string();
        }
        if let Some(category) = patch.category {
            updated.category = category.trim().to_string();
        }
        if let Some(price) = patch.price {
            updated.price = price;
        }
        if let Some(qty) = patch.qty_window_a {
            updated.qty_window_a = qty;
        }
        if let Some(qty) = patch.qty_window_b {
            updated.qty_window_b = qty;
        }
        if let Some(qty) = patch.qty_window_c {
            updated.qty_window_c = qty;
        }
        validate_fields(&updated.name, &updated.unit, &updated.category, updated.price)?;

        *product = updated.clone();
        self.store.save(Collection::Products, &products)?;

        tracing::info!(product_id = %id, "Product updated");
        Ok(updated)
    }

    /// Removes the product; unknown ids are ignored.
    pub fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut products: Vec<Product> = self.store.load(Collection::Products)?;
        let before = products.len();
        products.retain(|p| p.id != id);

        if products.len() != before {
            self.store.save(Collection::Products, &products)?;
            tracing::info!(product_id = %id, "Product deleted");
        }
        Ok(())
    }

    /// Validates every row, then inserts all of them or none.
    pub fn bulk_create(&self, rows: &[BulkRow], created_by: Uuid) -> AppResult<Vec<Product>> {
        let mut errors = Vec::new();
        let mut drafts = Vec::with_capacity(rows.len());

        for (index, row) in rows.iter().enumerate() {
            match validate_row(row) {
                Ok(draft) => drafts.push(draft),
                Err(messages) => errors.push(RowError { index, messages }),
            }
        }

        if !errors.is_empty() {
            tracing::warn!(
                rows = rows.len(),
                invalid = errors.len(),
                "Bulk product import rejected"
            );
            return Err(AppError::InvalidRows(errors));
        }

        let now = self.clock.now();
        let created: Vec<Product> = drafts
            .into_iter()
            .map(|draft| Product {
                id: Uuid::new_v4(),
                name: draft.name,
                unit: draft.unit,
                category: draft.category,
                price: draft.price,
                qty_window_a: draft.qty_window_a,
                qty_window_b: draft.qty_window_b,
                qty_window_c: draft.qty_window_c,
                created_by,
                created_at: now,
            })
            .collect();

        if !created.is_empty() {
            let mut products: Vec<Product> = self.store.load(Collection::Products)?;
            products.extend(created.iter().cloned());
            self.store.save(Collection::Products, &products)?;
        }

        tracing::info!(count = created.len(), "Bulk product import committed");
        Ok(created)
    }

    /// Every product with its suggested quantity for the local date of `now` in `tz`.
    pub fn suggestions(&self, now: DateTime<Utc>, tz: Tz) -> AppResult<Vec<(Product, u32)>> {
        let today = now.with_timezone(&tz).date_naive();
        Ok(self
            .list()?
            .into_iter()
            .map(|p| {
                let qty = suggested_quantity(&p, today);
                (p, qty)
            })
            .collect())
    }
}

fn validate_fields(name: &str, unit: &str, category: &str, price: f64) -> AppResult<()> {
    let mut errors = required_text(name, unit, category);
    if !price.is_finite() || price < 0.0 {
        errors.push("El precio no puede ser negativo".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(errors))
    }
}

fn required_text(name: &str, unit: &str, category: &str) -> Vec<String> {
    let mut errors = Vec::new();
    if name.trim().is_empty() {
        errors.push("El nombre del producto es requerido".to_string());
    }
    if unit.trim().is_empty() {
        errors.push("La unidad es requerida".to_string());
    }
    if category.trim().is_empty() {
        errors.push("La categoría es requerida".to_string());
    }
    errors
}

struct RowDraft {
    name: String,
    unit: String,
    category: String,
    price: f64,
    qty_window_a: u32,
    qty_window_b: u32,
    qty_window_c: u32,
}

fn validate_row(row: &BulkRow) -> Result<RowDraft, Vec<String>> {
    let mut errors = required_text(&row.name, &row.unit, &row.category);

    // An absent price column imports as 0; a given one must be a positive number.
    let price = match blank_to_none(row.price.as_deref()) {
        None => Some(0.0),
        Some(raw) => raw
            .parse::<f64>()
            .ok()
            .filter(|p| p.is_finite() && *p > 0.0),
    };
    if price.is_none() {
        errors.push("El precio debe ser un número mayor a 0".to_string());
    }

    let mut quantity = |raw: Option<&String>, field: &str| -> u32 {
        match blank_to_none(raw.map(String::as_str)) {
            None => 0,
            Some(raw) => raw.parse::<u32>().unwrap_or_else(|_| {
                errors.push(format!(
                    "La cantidad {field} debe ser un entero mayor o igual a 0"
                ));
                0
            }),
        }
    };
    let qty_window_a = quantity(row.qty_window_a.as_ref(), "qty_dom_mie");
    let qty_window_b = quantity(row.qty_window_b.as_ref(), "qty_jue");
    let qty_window_c = quantity(row.qty_window_c.as_ref(), "qty_vie");

    match price {
        Some(price) if errors.is_empty() => Ok(RowDraft {
            name: row.name.trim().to_string(),
            unit: row.unit.trim().to_string(),
            category: row.category.trim().to_string(),
            price,
            qty_window_a,
            qty_window_b,
            qty_window_c,
        }),
        _ => Err(errors),
    }
}

fn blank_to_none(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}
