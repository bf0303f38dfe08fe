use rusqlite::{Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Mutex;

use crate::error::StoreError;

/// Named record collections. Each one is read and written as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    Products,
    Orders,
    Settings,
    Notifications,
    Reminders,
}

impl Collection {
    pub fn as_str(self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Products => "products",
            Collection::Orders => "orders",
            Collection::Settings => "settings",
            Collection::Notifications => "notifications",
            Collection::Reminders => "reminders",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persistence for named collections of records.
///
/// A missing collection reads as empty. `write` replaces the whole snapshot;
/// there are no transactions, so callers own the read-modify-write ordering.
pub trait Store: Send + Sync {
    fn read(&self, collection: Collection) -> Result<Vec<Value>, StoreError>;
    fn write(&self, collection: Collection, records: Vec<Value>) -> Result<(), StoreError>;
}

/// Typed access on top of any [`Store`].
pub trait StoreExt {
    fn load<T: DeserializeOwned>(&self, collection: Collection) -> Result<Vec<T>, StoreError>;
    fn save<T: Serialize>(&self, collection: Collection, records: &[T]) -> Result<(), StoreError>;
}

impl<S: Store + ?Sized> StoreExt for S {
    fn load<T: DeserializeOwned>(&self, collection: Collection) -> Result<Vec<T>, StoreError> {
        self.read(collection)?
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|source| StoreError::Codec {
                collection: collection.as_str(),
                source,
            })
    }

    fn save<T: Serialize>(&self, collection: Collection, records: &[T]) -> Result<(), StoreError> {
        let values = records
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|source| StoreError::Codec {
                collection: collection.as_str(),
                source,
            })?;
        self.write(collection, values)
    }
}

/// SQLite-backed store: one row per collection holding its JSON snapshot.
pub struct Database {
    pub conn: Mutex<Connection>,
}

impl Database {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            if let Err(e) = std::fs::create_dir_all(dir) {
                tracing::warn!(dir = %dir.display(), error = %e, "Failed to create data directory");
            }
        }

        let conn = Connection::open(path)?;
        tracing::info!(path = %path.display(), "Opened order database");

        Ok(Database {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Ok(Database {
            conn: Mutex::new(Connection::open_in_memory()?),
        })
    }

    pub fn initialize(&self) -> Result<(), StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;

        conn.execute_batch(
            "
            -- One JSON snapshot per named collection
            CREATE TABLE IF NOT EXISTS collections (
                name TEXT PRIMARY KEY,
                records TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            ",
        )?;

        Ok(())
    }
}

impl Store for Database {
    fn read(&self, collection: Collection) -> Result<Vec<Value>, StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;

        let raw: Option<String> = conn
            .query_row(
                "SELECT records FROM collections WHERE name = ?1",
                [collection.as_str()],
                |row| row.get(0),
            )
            .optional()?;

        let Some(raw) = raw else {
            return Ok(Vec::new());
        };

        let records: Vec<Value> =
            serde_json::from_str(&raw).map_err(|source| StoreError::Codec {
                collection: collection.as_str(),
                source,
            })?;
        tracing::debug!(%collection, count = records.len(), "Read collection");
        Ok(records)
    }

    fn write(&self, collection: Collection, records: Vec<Value>) -> Result<(), StoreError> {
        let raw = serde_json::to_string(&records).map_err(|source| StoreError::Codec {
            collection: collection.as_str(),
            source,
        })?;
        let updated_at = chrono::Utc::now().to_rfc3339();

        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        conn.execute(
            "INSERT INTO collections (name, records, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(name) DO UPDATE SET records = excluded.records, updated_at = excluded.updated_at",
            rusqlite::params![collection.as_str(), raw, updated_at],
        )?;

        tracing::debug!(%collection, count = records.len(), "Wrote collection");
        Ok(())
    }
}

/// In-memory store, used by tests and as a throwaway backend.
#[derive(Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<Collection, Vec<Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn read(&self, collection: Collection) -> Result<Vec<Value>, StoreError> {
        let collections = self.collections.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(collections.get(&collection).cloned().unwrap_or_default())
    }

    fn write(&self, collection: Collection, records: Vec<Value>) -> Result<(), StoreError> {
        let mut collections = self.collections.lock().map_err(|_| StoreError::Poisoned)?;
        collections.insert(collection, records);
        Ok(())
    }
}
