//! Caller boundary for the UI shell: session-aware functions that enforce the
//! admin role and flatten errors to display strings.

pub mod notifications;
pub mod orders;
pub mod products;
pub mod reminders;
pub mod settings;
pub mod users;

use crate::error::AppError;
use crate::models::User;

fn require_admin(session: &User) -> Result<(), String> {
    if session.is_admin() {
        Ok(())
    } else {
        tracing::warn!(user_id = %session.id, "Admin-only command refused");
        Err(AppError::Forbidden.to_string())
    }
}
