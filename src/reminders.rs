use chrono::{DateTime, Datelike, Utc};
use chrono_tz::Tz;
use serde_json::json;
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use uuid::Uuid;

use crate::clock::Clock;
use crate::db::{Collection, Store, StoreExt};
use crate::error::{AppError, AppResult};
use crate::models::{NewReminder, Notification, NotificationKind, Reminder, ReminderPatch};
use crate::notifications::NotificationCenter;

const DEFAULT_REMINDER_MESSAGE: &str = "Es hora de hacer tu pedido";

/// Reminders whose weekday and `[start_time, end_time]` window contain `now`
/// as seen on the wall clock of `tz`.
///
/// Times compare as zero-padded `HH:MM` strings. A window with
/// `end_time < start_time` never matches.
pub fn active_at(reminders: &[Reminder], now: DateTime<Utc>, tz: Tz) -> Vec<Reminder> {
    let local = now.with_timezone(&tz);
    let weekday = local.weekday().num_days_from_sunday() as u8;
    let time = local.format("%H:%M").to_string();

    reminders
        .iter()
        .filter(|r| r.active)
        .filter(|r| r.weekdays.contains(&weekday))
        .filter(|r| time.as_str() >= r.start_time.as_str() && time.as_str() <= r.end_time.as_str())
        .cloned()
        .collect()
}

/// Reminder definitions over the `reminders` collection.
#[derive(Clone)]
pub struct ReminderScheduler {
    store: Arc<dyn Store>,
    clock: Arc<dyn Clock>,
}

impl ReminderScheduler {
    pub fn new(store: Arc<dyn Store>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub fn list(&self) -> AppResult<Vec<Reminder>> {
        Ok(self.store.load(Collection::Reminders)?)
    }

    pub fn create(&self, reminder: NewReminder) -> AppResult<Reminder> {
        validate(
            &reminder.title,
            &reminder.weekdays,
            &reminder.start_time,
            &reminder.end_time,
            reminder.active,
        )?;

        let mut reminders = self.list()?;
        let reminder = Reminder {
            id: Uuid::new_v4(),
            title: reminder.title.trim().to_string(),
            description: reminder.description,
            weekdays: reminder.weekdays,
            start_time: reminder.start_time,
            end_time: reminder.end_time,
            active: reminder.active,
            created_by: reminder.created_by,
            created_at: self.clock.now(),
        };
        reminders.push(reminder.clone());
        self.store.save(Collection::Reminders, &reminders)?;

        tracing::info!(reminder_id = %reminder.id, title = %reminder.title, "Reminder created");
        Ok(reminder)
    }

    pub fn update(&self, id: Uuid, patch: ReminderPatch) -> AppResult<Reminder> {
        let mut reminders = self.list()?;
        let reminder = reminders
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| AppError::not_found("reminder", id))?;

        let mut updated = reminder.clone();
        if let Some(title) = patch.title {
            updated.title = title.trim().to_string();
        }
        if let Some(description) = patch.description {
            updated.description = description;
        }
        if let Some(weekdays) = patch.weekdays {
            updated.weekdays = weekdays;
        }
        if let Some(start_time) = patch.start_time {
            updated.start_time = start_time;
        }
        if let Some(end_time) = patch.end_time {
            updated.end_time = end_time;
        }
        if let Some(active) = patch.active {
            updated.active = active;
        }
        validate(
            &updated.title,
            &updated.weekdays,
            &updated.start_time,
            &updated.end_time,
            updated.active,
        )?;

        *reminder = updated.clone();
        self.store.save(Collection::Reminders, &reminders)?;

        tracing::info!(reminder_id = %id, "Reminder updated");
        Ok(updated)
    }

    /// Removes the reminder; unknown ids are ignored.
    pub fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut reminders = self.list()?;
        let before = reminders.len();
        reminders.retain(|r| r.id != id);

        if reminders.len() != before {
            self.store.save(Collection::Reminders, &reminders)?;
            tracing::info!(reminder_id = %id, "Reminder deleted");
        }
        Ok(())
    }

    pub fn active_reminders(&self, now: DateTime<Utc>, tz: Tz) -> AppResult<Vec<Reminder>> {
        Ok(active_at(&self.list()?, now, tz))
    }
}

/// Edge-triggered view of the active reminder set.
///
/// Each [`tick`](Self::tick) compares the active set with the previous one and
/// creates one `order_reminder` notification per reminder that just became
/// active. Reminders that stay active stay quiet; one that leaves and comes
/// back fires again.
pub struct ReminderWatcher {
    scheduler: ReminderScheduler,
    notifications: NotificationCenter,
    clock: Arc<dyn Clock>,
    tz: Tz,
    previous: HashSet<Uuid>,
}

impl ReminderWatcher {
    pub fn new(store: Arc<dyn Store>, clock: Arc<dyn Clock>, tz: Tz) -> Self {
        Self {
            scheduler: ReminderScheduler::new(store.clone(), clock.clone()),
            notifications: NotificationCenter::new(store, clock.clone()),
            clock,
            tz,
            previous: HashSet::new(),
        }
    }

    pub fn tick(&mut self) -> AppResult<Vec<Notification>> {
        let active = self.scheduler.active_reminders(self.clock.now(), self.tz)?;

        self.previous.retain(|id| active.iter().any(|r| r.id == *id));
        let newcomers: Vec<&Reminder> = active
            .iter()
            .filter(|r| !self.previous.contains(&r.id))
            .collect();

        let mut fired = Vec::new();
        for reminder in newcomers {
            let message = if reminder.description.trim().is_empty() {
                DEFAULT_REMINDER_MESSAGE.to_string()
            } else {
                reminder.description.clone()
            };
            let notification = self.notifications.create_with_payload(
                NotificationKind::OrderReminder,
                format!("⏰ {}", reminder.title),
                message,
                None,
                Some(json!({ "reminderId": reminder.id })),
            )?;
            // Stored notifications must not fire again if a later one fails
            self.previous.insert(reminder.id);
            fired.push(notification);
        }

        self.previous = active.iter().map(|r| r.id).collect();
        tracing::debug!(active = self.previous.len(), fired = fired.len(), "Reminder tick");
        Ok(fired)
    }

    /// Ids considered active as of the last tick.
    pub fn active_ids(&self) -> &HashSet<Uuid> {
        &self.previous
    }
}

fn validate(
    title: &str,
    weekdays: &BTreeSet<u8>,
    start_time: &str,
    end_time: &str,
    active: bool,
) -> AppResult<()> {
    let mut errors = Vec::new();
    if title.trim().is_empty() {
        errors.push("El título es requerido".to_string());
    }
    if weekdays.iter().any(|d| *d > 6) {
        errors.push("Los días deben estar entre 0 (domingo) y 6 (sábado)".to_string());
    }
    if active && weekdays.is_empty() {
        errors.push("Seleccione al menos un día".to_string());
    }
    if !is_hh_mm(start_time) {
        errors.push("La hora de inicio debe tener formato HH:MM".to_string());
    }
    if !is_hh_mm(end_time) {
        errors.push("La hora de fin debe tener formato HH:MM".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(errors))
    }
}

fn is_hh_mm(raw: &str) -> bool {
    let Some((hours, minutes)) = raw.split_once(':') else {
        return false;
    };
    let two_digits = |s: &str| s.len() == 2 && s.bytes().all(|b| b.is_ascii_digit());
    if !two_digits(hours) || !two_digits(minutes) {
        return false;
    }
    matches!((hours.parse::<u8>(), minutes.parse::<u8>()), (Ok(h), Ok(m)) if h < 24 && m < 60)
}
