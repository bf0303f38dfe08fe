use uuid::Uuid;

use super::require_admin;
use crate::models::{NewUser, User};
use crate::state::AppState;

/// Signs in and returns the session user.
pub fn login(app: &AppState, email: &str, password: &str) -> Result<User, String> {
    app.users()
        .authenticate(email, password)
        .map_err(|e| e.to_string())
}

pub fn get_users(app: &AppState, session: &User) -> Result<Vec<User>, String> {
    require_admin(session)?;
    app.users().list().map_err(|e| e.to_string())
}

pub fn create_user(app: &AppState, session: &User, user: NewUser) -> Result<User, String> {
    require_admin(session)?;
    app.users().create(user).map_err(|e| e.to_string())
}

pub fn approve_user(app: &AppState, session: &User, id: Uuid) -> Result<User, String> {
    require_admin(session)?;
    app.users().approve(id, session.id).map_err(|e| e.to_string())
}

pub fn reject_user(app: &AppState, session: &User, id: Uuid) -> Result<User, String> {
    require_admin(session)?;
    app.users().reject(id).map_err(|e| e.to_string())
}

pub fn delete_user(app: &AppState, session: &User, id: Uuid) -> Result<(), String> {
    require_admin(session)?;
    if id == session.id {
        return Err("No puede eliminar su propia cuenta".to_string());
    }
    app.users().delete(id).map_err(|e| e.to_string())
}
