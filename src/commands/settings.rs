use super::require_admin;
use crate::models::{AppSettings, User};
use crate::state::AppState;

pub fn get_settings(app: &AppState) -> Result<AppSettings, String> {
    app.settings().get().map_err(|e| e.to_string())
}

pub fn save_settings(
    app: &AppState,
    session: &User,
    settings: AppSettings,
) -> Result<AppSettings, String> {
    require_admin(session)?;
    app.settings().save(settings).map_err(|e| e.to_string())
}
