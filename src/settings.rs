use std::sync::Arc;

use crate::db::{Collection, Store, StoreExt};
use crate::error::AppResult;
use crate::models::AppSettings;

/// Singleton settings record, overwritten in place.
#[derive(Clone)]
pub struct SettingsStore {
    store: Arc<dyn Store>,
}

impl SettingsStore {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub fn get(&self) -> AppResult<AppSettings> {
        let settings: Vec<AppSettings> = self.store.load(Collection::Settings)?;
        Ok(settings.into_iter().next().unwrap_or_default())
    }

    pub fn save(&self, settings: AppSettings) -> AppResult<AppSettings> {
        self.store
            .save(Collection::Settings, std::slice::from_ref(&settings))?;
        tracing::info!(company = %settings.company_name, "Settings saved");
        Ok(settings)
    }
}
