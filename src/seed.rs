//! First-run data: default accounts, a starter catalog and settings.
//! Collections that already hold records are left alone.

use uuid::Uuid;

use crate::db::{Collection, Store};
use crate::error::AppResult;
use crate::models::{AppSettings, NewProduct, NewUser, Role};
use crate::state::AppState;

pub fn ensure_defaults(app: &AppState) -> AppResult<()> {
    let users = app.users();
    if users.list()?.is_empty() {
        users.create(NewUser {
            email: "admin@empresa.com".into(),
            password: "admin123".into(),
            name: "Administrador".into(),
            role: Role::Admin,
        })?;
        users.create(NewUser {
            email: "usuario@empresa.com".into(),
            password: "user123".into(),
            name: "Usuario Demo".into(),
            role: Role::User,
        })?;
        tracing::info!("Seeded default accounts");
    }

    let catalog = app.catalog();
    if catalog.list()?.is_empty() {
        let created_by = users
            .list()?
            .iter()
            .find(|u| u.is_admin())
            .map(|u| u.id)
            .unwrap_or_else(Uuid::nil);

        let starters = [
            ("Tomates", "kg", "Verduras", 2500.0, 5, 8, 10),
            ("Lechuga", "unidades", "Verduras", 1200.0, 3, 5, 7),
            ("Pan", "barras", "Panadería", 800.0, 10, 15, 20),
        ];
        for (name, unit, category, price, qty_a, qty_b, qty_c) in starters {
            catalog.create(NewProduct {
                name: name.into(),
                unit: unit.into(),
                category: category.into(),
                price,
                qty_window_a: qty_a,
                qty_window_b: qty_b,
                qty_window_c: qty_c,
                created_by,
            })?;
        }
        tracing::info!("Seeded starter catalog");
    }

    if app.store.read(Collection::Settings)?.is_empty() {
        app.settings().save(AppSettings {
            default_supplier_email: "proveedor@ejemplo.com".into(),
            company_name: "Mi Empresa".into(),
            currency: "ARS".into(),
        })?;
        tracing::info!("Seeded default settings");
    }

    Ok(())
}
