use uuid::Uuid;

use crate::models::Notification;
use crate::state::AppState;

pub fn get_notifications(app: &AppState) -> Result<Vec<Notification>, String> {
    app.notifications().list().map_err(|e| e.to_string())
}

pub fn get_unread_count(app: &AppState) -> Result<usize, String> {
    app.notifications().unread_count().map_err(|e| e.to_string())
}

pub fn mark_notification_read(app: &AppState, id: Uuid) -> Result<Notification, String> {
    app.notifications().mark_read(id).map_err(|e| e.to_string())
}

pub fn mark_all_notifications_read(app: &AppState) -> Result<usize, String> {
    app.notifications().mark_all_read().map_err(|e| e.to_string())
}

pub fn delete_notification(app: &AppState, id: Uuid) -> Result<(), String> {
    app.notifications().delete(id).map_err(|e| e.to_string())
}
