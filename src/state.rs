use chrono_tz::Tz;
use std::sync::Arc;

use crate::catalog::ProductCatalog;
use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::credentials::{Argon2Hasher, PasswordHasher};
use crate::db::{Database, Store};
use crate::error::AppResult;
use crate::notifications::NotificationCenter;
use crate::orders::OrderWorkflow;
use crate::reminders::{ReminderScheduler, ReminderWatcher};
use crate::settings::SettingsStore;
use crate::users::UserDirectory;

/// Shared handles the caller boundary works against. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub clock: Arc<dyn Clock>,
    pub hasher: Arc<dyn PasswordHasher>,
    pub timezone: Tz,
}

impl AppState {
    pub fn new(
        store: Arc<dyn Store>,
        clock: Arc<dyn Clock>,
        hasher: Arc<dyn PasswordHasher>,
        timezone: Tz,
    ) -> Self {
        Self {
            store,
            clock,
            hasher,
            timezone,
        }
    }

    /// Opens the SQLite database named in `config` with the production clock and hasher.
    pub fn open(config: &Config) -> AppResult<Self> {
        let db = Database::open(&config.db_path)?;
        db.initialize()?;

        Ok(Self::new(
            Arc::new(db),
            Arc::new(SystemClock),
            Arc::new(Argon2Hasher),
            config.timezone,
        ))
    }

    pub fn catalog(&self) -> ProductCatalog {
        ProductCatalog::new(self.store.clone(), self.clock.clone())
    }

    pub fn orders(&self) -> OrderWorkflow {
        OrderWorkflow::new(self.store.clone(), self.clock.clone())
    }

    pub fn users(&self) -> UserDirectory {
        UserDirectory::new(self.store.clone(), self.clock.clone(), self.hasher.clone())
    }

    pub fn reminders(&self) -> ReminderScheduler {
        ReminderScheduler::new(self.store.clone(), self.clock.clone())
    }

    pub fn notifications(&self) -> NotificationCenter {
        NotificationCenter::new(self.store.clone(), self.clock.clone())
    }

    pub fn settings(&self) -> SettingsStore {
        SettingsStore::new(self.store.clone())
    }

    /// Fresh edge-trigger state for one session's reminder poll.
    pub fn reminder_watcher(&self) -> ReminderWatcher {
        ReminderWatcher::new(self.store.clone(), self.clock.clone(), self.timezone)
    }
}
