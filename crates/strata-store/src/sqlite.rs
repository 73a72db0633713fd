use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{Connection, OptionalExtension, params};
use serde_json::Value;
use strata_common::{Error, Result};
use tracing::info;

use crate::settings::{Scope, SettingsStore};

/// SQLite-backed settings store.
///
/// One row per `(scope, key)` pair; values are stored as JSON text.
pub struct SqliteSettings {
    conn: Mutex<Connection>,
}

impl SqliteSettings {
    pub fn open(db_path: &Path) -> Result<Self> {
        info!("opening settings store at {}", db_path.display());
        let conn = Connection::open(db_path)
            .map_err(|e| Error::Settings(format!("failed to open database: {e}")))?;

        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .map_err(|e| Error::Settings(format!("failed to set pragmas: {e}")))?;

        let store = Self {
            conn: Mutex::new(conn),
        };
        store.bootstrap()?;
        Ok(store)
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| Error::Settings(format!("failed to open in-memory database: {e}")))?;

        let store = Self {
            conn: Mutex::new(conn),
        };
        store.bootstrap()?;
        Ok(store)
    }

    fn connection(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| Error::Settings("settings store lock poisoned".into()))
    }

    fn bootstrap(&self) -> Result<()> {
        let conn = self.connection()?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS settings (
                scope TEXT NOT NULL,
                key TEXT NOT NULL,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (datetime('now')),
                PRIMARY KEY (scope, key)
            );",
        )
        .map_err(|e| Error::Settings(format!("settings bootstrap failed: {e}")))?;

        Ok(())
    }
}

impl SettingsStore for SqliteSettings {
    fn get(&self, scope: Scope, key: &str) -> Result<Option<Value>> {
        let conn = self.connection()?;
        let raw: Option<String> = conn
            .query_row(
                "SELECT value FROM settings WHERE scope = ?1 AND key = ?2",
                params![scope.as_str(), key],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| Error::Settings(format!("failed to read setting {key}: {e}")))?;

        match raw {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }

    fn set(&self, scope: Scope, key: &str, value: Value) -> Result<()> {
        let text = serde_json::to_string(&value)?;
        let conn = self.connection()?;
        conn.execute(
            "INSERT INTO settings (scope, key, value, updated_at)
             VALUES (?1, ?2, ?3, datetime('now'))
             ON CONFLICT (scope, key)
             DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![scope.as_str(), key, text],
        )
        .map_err(|e| Error::Settings(format!("failed to write setting {key}: {e}")))?;
        Ok(())
    }

    fn delete(&self, scope: Scope, key: &str) -> Result<()> {
        let conn = self.connection()?;
        conn.execute(
            "DELETE FROM settings WHERE scope = ?1 AND key = ?2",
            params![scope.as_str(), key],
        )
        .map_err(|e| Error::Settings(format!("failed to delete setting {key}: {e}")))?;
        Ok(())
    }
}
