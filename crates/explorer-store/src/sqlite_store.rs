use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use explorer_common::{Error, Result};
use rusqlite::{Connection, OptionalExtension, params};
use tracing::info;

use crate::store::SettingsStore;

/// Durable settings storage backed by a single SQLite table.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

/// A stored setting with its last write time.
#[derive(Debug, Clone)]
pub struct SettingRecord {
    pub key: String,
    pub value: String,
    pub updated_at: DateTime<Utc>,
}

impl SqliteStore {
    pub fn open(db_path: &Path) -> Result<Self> {
        info!("opening settings store at {}", db_path.display());
        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(db_path)
            .map_err(|e| Error::Storage(format!("failed to open database: {e}")))?;

        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .map_err(|e| Error::Storage(format!("failed to set pragmas: {e}")))?;

        let store = Self {
            conn: Mutex::new(conn),
        };
        store.ensure_schema()?;
        Ok(store)
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| Error::Storage(format!("failed to open in-memory database: {e}")))?;

        let store = Self {
            conn: Mutex::new(conn),
        };
        store.ensure_schema()?;
        Ok(store)
    }

    fn connection(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| Error::Storage("settings store lock poisoned".into()))
    }

    fn ensure_schema(&self) -> Result<()> {
        let conn = self.connection()?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS settings (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            );",
        )
        .map_err(|e| Error::Storage(format!("schema setup failed: {e}")))?;

        Ok(())
    }

    /// All stored settings, ordered by key.
    pub fn entries(&self) -> Result<Vec<SettingRecord>> {
        let conn = self.connection()?;
        let mut stmt = conn
            .prepare("SELECT key, value, updated_at FROM settings ORDER BY key ASC")
            .map_err(|e| Error::Storage(format!("failed to prepare query: {e}")))?;

        let rows = stmt
            .query_map([], |row| {
                Ok(SettingRecord {
                    key: row.get(0)?,
                    value: row.get(1)?,
                    updated_at: parse_datetime(row.get::<_, String>(2)?),
                })
            })
            .map_err(|e| Error::Storage(format!("failed to query settings: {e}")))?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row.map_err(|e| Error::Storage(format!("failed to read setting row: {e}")))?);
        }
        Ok(records)
    }
}

impl SettingsStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.connection()?;
        conn.query_row(
            "SELECT value FROM settings WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| Error::Storage(format!("failed to read {key}: {e}")))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.connection()?;
        conn.execute(
            "INSERT INTO settings (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = datetime('now')",
            params![key, value],
        )
        .map_err(|e| Error::Storage(format!("failed to write {key}: {e}")))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let conn = self.connection()?;
        conn.execute("DELETE FROM settings WHERE key = ?1", params![key])
            .map_err(|e| Error::Storage(format!("failed to delete {key}: {e}")))?;
        Ok(())
    }
}

fn parse_datetime(s: String) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| {
            // SQLite datetime('now') produces "YYYY-MM-DD HH:MM:SS"
            chrono::NaiveDateTime::parse_from_str(&s, "%Y-%m-%d %H:%M:%S")
                .map(|naive| naive.and_utc())
                .unwrap_or_else(|_| Utc::now())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_get_round_trip() {
        let store = SqliteStore::in_memory().unwrap();
        store.set("language", "en-GB").unwrap();
        assert_eq!(store.get("language").unwrap().as_deref(), Some("en-GB"));
    }

    #[test]
    fn get_missing_key_returns_none() {
        let store = SqliteStore::in_memory().unwrap();
        assert!(store.get("nonexistent").unwrap().is_none());
    }

    #[test]
    fn set_overwrites_existing_value() {
        let store = SqliteStore::in_memory().unwrap();
        store.set("priceChartPeriod", "day").unwrap();
        store.set("priceChartPeriod", "week").unwrap();
        assert_eq!(store.get("priceChartPeriod").unwrap().as_deref(), Some("week"));
        assert_eq!(store.entries().unwrap().len(), 1);
    }

    #[test]
    fn remove_is_idempotent() {
        let store = SqliteStore::in_memory().unwrap();
        store.set("priceChart", "true").unwrap();
        store.remove("priceChart").unwrap();
        store.remove("priceChart").unwrap();
        assert!(store.get("priceChart").unwrap().is_none());
    }

    #[test]
    fn entries_are_ordered_by_key() {
        let store = SqliteStore::in_memory().unwrap();
        store.set("priceChartOptions", "{}").unwrap();
        store.set("language", "en-GB").unwrap();

        let keys: Vec<_> = store.entries().unwrap().into_iter().map(|r| r.key).collect();
        assert_eq!(keys, vec!["language", "priceChartOptions"]);
    }

    #[test]
    fn values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.db");

        {
            let store = SqliteStore::open(&path).unwrap();
            store.set("language", "pt-BR").unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(store.get("language").unwrap().as_deref(), Some("pt-BR"));
    }

    #[test]
    fn parses_sqlite_datetime_format() {
        let dt = parse_datetime("2026-03-01 12:30:00".to_string());
        assert_eq!(dt.to_rfc3339(), "2026-03-01T12:30:00+00:00");
    }
}
