use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

use crate::clock::Clock;
use crate::db::{Collection, Store, StoreExt};
use crate::error::{AppError, AppResult};
use crate::models::{Notification, NotificationKind};

/// Notification inbox over the `notifications` collection. Newest first.
#[derive(Clone)]
pub struct NotificationCenter {
    store: Arc<dyn Store>,
    clock: Arc<dyn Clock>,
}

impl NotificationCenter {
    pub fn new(store: Arc<dyn Store>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub fn list(&self) -> AppResult<Vec<Notification>> {
        Ok(self.store.load(Collection::Notifications)?)
    }

    pub fn unread_count(&self) -> AppResult<usize> {
        Ok(self.list()?.iter().filter(|n| !n.read).count())
    }

    pub fn create(
        &self,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
        subject: Option<Uuid>,
    ) -> AppResult<Notification> {
        self.create_with_payload(kind, title, message, subject, None)
    }

    pub fn create_with_payload(
        &self,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
        subject: Option<Uuid>,
        payload: Option<Value>,
    ) -> AppResult<Notification> {
        let mut notifications: Vec<Notification> = self.store.load(Collection::Notifications)?;
        let notification = Notification {
            id: Uuid::new_v4(),
            kind,
            title: title.into(),
            message: message.into(),
            subject,
            created_at: self.clock.now(),
            read: false,
            payload,
        };
        notifications.insert(0, notification.clone());
        self.store.save(Collection::Notifications, &notifications)?;

        tracing::info!(notification_id = %notification.id, ?kind, "Notification created");
        Ok(notification)
    }

    pub fn mark_read(&self, id: Uuid) -> AppResult<Notification> {
        let mut notifications: Vec<Notification> = self.store.load(Collection::Notifications)?;
        let notification = notifications
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| AppError::not_found("notification", id))?;
        notification.read = true;
        let notification = notification.clone();

        self.store.save(Collection::Notifications, &notifications)?;
        Ok(notification)
    }

    pub fn mark_all_read(&self) -> AppResult<usize> {
        let mut notifications: Vec<Notification> = self.store.load(Collection::Notifications)?;
        let mut changed = 0;
        for notification in notifications.iter_mut().filter(|n| !n.read) {
            notification.read = true;
            changed += 1;
        }

        if changed > 0 {
            self.store.save(Collection::Notifications, &notifications)?;
        }
        Ok(changed)
    }

    /// Removes the notification; unknown ids are ignored.
    pub fn delete(&self, id: Uuid) -> AppResult<()> {
        self.remove_where(|n| n.id == id)?;
        Ok(())
    }

    /// Drops the `user_registration` notifications about `user_id`.
    /// Returns how many were removed; zero is fine.
    pub fn dismiss_registration(&self, user_id: Uuid) -> AppResult<usize> {
        let removed = self.remove_where(|n| {
            n.kind == NotificationKind::UserRegistration && n.subject == Some(user_id)
        })?;
        if removed > 0 {
            tracing::debug!(%user_id, removed, "Dismissed registration notification");
        }
        Ok(removed)
    }

    fn remove_where(&self, doomed: impl Fn(&Notification) -> bool) -> AppResult<usize> {
        let mut notifications: Vec<Notification> = self.store.load(Collection::Notifications)?;
        let before = notifications.len();
        notifications.retain(|n| !doomed(n));

        let removed = before - notifications.len();
        if removed > 0 {
            self.store.save(Collection::Notifications, &notifications)?;
        }
        Ok(removed)
    }
}
