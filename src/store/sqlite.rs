//! SQLite-backed store for VisualStash.
//!
//! Persists the stash document and the scalar preferences as rows of a
//! single `kv_store` table, one JSON value per key. Runs schema
//! migrations on open.

use std::path::Path;
use std::sync::{Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::{params, Connection, OptionalExtension};

use super::migrations;
use super::{StoreTrait, Subscriber, SubscriberSet, SubscriptionId};
use crate::platform;
use crate::types::errors::StoreError;
use crate::types::prefs::{PanelPrefs, Theme, ViewMode};
use crate::types::record::{StashRecord, STORAGE_KEY};

const VIEW_MODE_KEY: &str = "viewMode";
const THEME_KEY: &str = "theme";

/// Store backed by a SQLite database file.
pub struct SqliteStore {
    conn: Mutex<Connection>,
    subscribers: SubscriberSet,
}

impl SqliteStore {
    /// Opens (or creates) the store at the given file path and runs migrations.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|e| StoreError::DatabaseError(e.to_string()))?;
        Self::from_connection(conn)
    }

    /// Opens an in-memory store and runs migrations.
    ///
    /// Useful for testing — the data is discarded when the store is dropped.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn =
            Connection::open_in_memory().map_err(|e| StoreError::DatabaseError(e.to_string()))?;
        Self::from_connection(conn)
    }

    /// Opens the store at the platform data directory, creating it if needed.
    pub fn open_default() -> Result<Self, StoreError> {
        let dir = platform::get_data_dir();
        std::fs::create_dir_all(&dir).map_err(|e| StoreError::DatabaseError(e.to_string()))?;
        Self::open(dir.join("stash.db"))
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        migrations::run_all(&conn).map_err(|e| StoreError::DatabaseError(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
            subscribers: SubscriberSet::new(),
        })
    }

    fn now() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64
    }

    fn get_value(&self, key: &str) -> Result<Option<String>, StoreError> {
        let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        conn.query_row(
            "SELECT value FROM kv_store WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| StoreError::DatabaseError(e.to_string()))
    }

    fn set_value(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        conn.execute(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3) \
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, Self::now()],
        )
        .map_err(|e| StoreError::DatabaseError(e.to_string()))?;
        Ok(())
    }

    fn get_pref<T: serde::de::DeserializeOwned + Default>(
        &self,
        key: &str,
    ) -> Result<T, StoreError> {
        match self.get_value(key)? {
            Some(json) => serde_json::from_str(&json)
                .map_err(|e| StoreError::SerializationError(e.to_string())),
            None => Ok(T::default()),
        }
    }
}

impl StoreTrait for SqliteStore {
    /// Reads the stash document, returning first-run defaults when absent.
    fn read(&self) -> Result<StashRecord, StoreError> {
        match self.get_value(STORAGE_KEY)? {
            Some(json) => serde_json::from_str(&json)
                .map_err(|e| StoreError::SerializationError(e.to_string())),
            None => Ok(StashRecord::default()),
        }
    }

    /// Replaces the whole stash document and notifies every subscriber.
    fn write(&self, record: &StashRecord) -> Result<(), StoreError> {
        let json = serde_json::to_string(record)
            .map_err(|e| StoreError::SerializationError(e.to_string()))?;
        self.set_value(STORAGE_KEY, &json)?;
        self.subscribers.notify(record);
        Ok(())
    }

    fn read_prefs(&self) -> Result<PanelPrefs, StoreError> {
        let view_mode: ViewMode = self.get_pref(VIEW_MODE_KEY)?;
        let theme: Theme = self.get_pref(THEME_KEY)?;
        Ok(PanelPrefs { view_mode, theme })
    }

    fn write_prefs(&self, prefs: &PanelPrefs) -> Result<(), StoreError> {
        let view_mode = serde_json::to_string(&prefs.view_mode)
            .map_err(|e| StoreError::SerializationError(e.to_string()))?;
        let theme = serde_json::to_string(&prefs.theme)
            .map_err(|e| StoreError::SerializationError(e.to_string()))?;
        self.set_value(VIEW_MODE_KEY, &view_mode)?;
        self.set_value(THEME_KEY, &theme)
    }

    fn subscribe(&self, callback: Subscriber) -> SubscriptionId {
        self.subscribers.add(callback)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.subscribers.remove(id)
    }
}
