use uuid::Uuid;

use super::require_admin;
use crate::models::{NewReminder, Reminder, ReminderPatch, User};
use crate::state::AppState;

pub fn get_reminders(app: &AppState) -> Result<Vec<Reminder>, String> {
    app.reminders().list().map_err(|e| e.to_string())
}

pub fn get_active_reminders(app: &AppState) -> Result<Vec<Reminder>, String> {
    app.reminders()
        .active_reminders(app.clock.now(), app.timezone)
        .map_err(|e| e.to_string())
}

pub fn create_reminder(
    app: &AppState,
    session: &User,
    mut reminder: NewReminder,
) -> Result<Reminder, String> {
    require_admin(session)?;
    reminder.created_by = session.id;
    app.reminders().create(reminder).map_err(|e| e.to_string())
}

pub fn update_reminder(
    app: &AppState,
    session: &User,
    id: Uuid,
    patch: ReminderPatch,
) -> Result<Reminder, String> {
    require_admin(session)?;
    app.reminders().update(id, patch).map_err(|e| e.to_string())
}

pub fn delete_reminder(app: &AppState, session: &User, id: Uuid) -> Result<(), String> {
    require_admin(session)?;
    app.reminders().delete(id).map_err(|e| e.to_string())
}
