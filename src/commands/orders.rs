use uuid::Uuid;

use super::require_admin;
use crate::error::AppError;
use crate::mail::{self, MailDraft};
use crate::models::{NewOrder, Order, OrderLine, OrderStats, OrderStatus, User};
use crate::state::AppState;

/// Submits the session user's order and returns it with its mail draft.
pub fn create_order(
    app: &AppState,
    session: &User,
    lines: Vec<OrderLine>,
    supplier_email: Option<String>,
    notes: Option<String>,
) -> Result<(Order, MailDraft), String> {
    let order = app
        .orders()
        .submit(NewOrder {
            user_id: session.id,
            user_name: session.name.clone(),
            lines,
            supplier_email,
            notes,
        })
        .map_err(|e| e.to_string())?;

    let settings = app.settings().get().map_err(|e| e.to_string())?;
    let draft = mail::compose(&order, &settings, app.timezone);

    Ok((order, draft))
}

pub fn get_orders(app: &AppState, session: &User) -> Result<Vec<Order>, String> {
    app.orders().list_for(session).map_err(|e| e.to_string())
}

pub fn get_order_stats(app: &AppState, session: &User) -> Result<OrderStats, String> {
    app.orders()
        .stats(session, app.timezone)
        .map_err(|e| e.to_string())
}

/// Plain-text order summary for copying to the clipboard.
pub fn get_order_text(app: &AppState, session: &User, id: Uuid) -> Result<String, String> {
    let order = app.orders().get(id).map_err(|e| e.to_string())?;
    if !session.is_admin() && order.user_id != session.id {
        return Err(AppError::not_found("order", id).to_string());
    }
    Ok(mail::order_text(&order, app.timezone))
}

pub fn update_order_status(
    app: &AppState,
    session: &User,
    id: Uuid,
    status: OrderStatus,
) -> Result<Order, String> {
    require_admin(session)?;
    app.orders().set_status(id, status).map_err(|e| e.to_string())
}
