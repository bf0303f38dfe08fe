use uuid::Uuid;

use super::require_admin;
use crate::import;
use crate::models::{BulkRow, NewProduct, Product, ProductPatch, User};
use crate::state::AppState;

pub fn get_products(app: &AppState) -> Result<Vec<Product>, String> {
    app.catalog().list().map_err(|e| e.to_string())
}

/// Products with today's suggested quantity, for pre-filling an order.
pub fn get_today_suggestions(app: &AppState) -> Result<Vec<(Product, u32)>, String> {
    app.catalog()
        .suggestions(app.clock.now(), app.timezone)
        .map_err(|e| e.to_string())
}

pub fn create_product(
    app: &AppState,
    session: &User,
    mut product: NewProduct,
) -> Result<Product, String> {
    require_admin(session)?;
    product.created_by = session.id;
    app.catalog().create(product).map_err(|e| e.to_string())
}

pub fn update_product(
    app: &AppState,
    session: &User,
    id: Uuid,
    patch: ProductPatch,
) -> Result<Product, String> {
    require_admin(session)?;
    app.catalog().update(id, patch).map_err(|e| e.to_string())
}

pub fn delete_product(app: &AppState, session: &User, id: Uuid) -> Result<(), String> {
    require_admin(session)?;
    app.catalog().delete(id).map_err(|e| e.to_string())
}

/// Parses uploaded CSV text for preview; nothing is stored.
pub fn preview_bulk_upload(session: &User, csv: &str) -> Result<Vec<BulkRow>, String> {
    require_admin(session)?;
    import::parse_products_csv(csv).map_err(|e| e.to_string())
}

pub fn bulk_create_products(
    app: &AppState,
    session: &User,
    rows: Vec<BulkRow>,
) -> Result<Vec<Product>, String> {
    require_admin(session)?;
    app.catalog()
        .bulk_create(&rows, session.id)
        .map_err(|e| e.to_string())
}
