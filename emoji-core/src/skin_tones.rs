//! Persisted skin-tone store
//!
//! The map of emoji description → skin-tone identifier is the only durable
//! state the picker owns. `SqliteSkinToneStore` keeps it under a fixed
//! namespace key in a small key/value table; `MemorySkinToneStore` keeps it for
//! the life of the process.

use std::collections::HashMap;
use std::path::Path;

use chrono::{DateTime, TimeZone, Utc};
use parking_lot::RwLock;
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, OptionalExtension};
use thiserror::Error;

use crate::interface::{PickerError, SkinTone, SkinToneStore};

/// Namespace key of the persisted map
pub const SKIN_TONES_KEY: &str = "emoji_picker.skin_tones";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Effective tone for a toned emoji given its persisted entry.
///
/// A recognized identifier wins. The empty string forces the default yellow
/// even when a default tone is configured. Absent or unrecognized entries
/// fall back to the configured default.
pub fn resolve_skin_tone(persisted: Option<&str>, default: Option<SkinTone>) -> Option<SkinTone> {
    match persisted {
        Some("") => None,
        Some(identifier) => SkinTone::from_identifier(identifier).or(default),
        None => default,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// IN-MEMORY STORE
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct MemorySkinToneStore {
    tones: RwLock<HashMap<String, String>>,
}

impl MemorySkinToneStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tones(tones: HashMap<String, String>) -> Self {
        Self { tones: RwLock::new(tones) }
    }
}

impl SkinToneStore for MemorySkinToneStore {
    fn get(&self) -> Result<HashMap<String, String>, PickerError> {
        Ok(self.tones.read().clone())
    }

    fn set(&self, tones: HashMap<String, String>) -> Result<(), PickerError> {
        *self.tones.write() = tones;
        Ok(())
    }

    fn clear(&self) -> Result<(), PickerError> {
        self.tones.write().clear();
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// SQLITE STORE
// ─────────────────────────────────────────────────────────────────────────────

/// Thread-safe SQLite-backed store using connection pooling
pub struct SqliteSkinToneStore {
    pool: Pool<SqliteConnectionManager>,
}

impl SqliteSkinToneStore {
    /// Open or create a store at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let manager = SqliteConnectionManager::file(path)
            .with_init(|conn| {
                conn.execute_batch("
                    PRAGMA journal_mode=WAL;
                    PRAGMA synchronous=NORMAL;
                ")?;
                Ok(())
            });

        let pool = Pool::builder()
            .max_size(4)
            .build(manager)?;

        let store = Self { pool };
        store.setup_schema()?;
        Ok(store)
    }

    /// Open an in-memory store (for testing)
    #[cfg(test)]
    pub fn open_in_memory() -> StoreResult<Self> {
        let manager = SqliteConnectionManager::memory();

        // In-memory needs single connection to maintain state
        let pool = Pool::builder()
            .max_size(1)
            .build(manager)?;

        let store = Self { pool };
        store.setup_schema()?;
        Ok(store)
    }

    fn get_conn(&self) -> StoreResult<PooledConnection<SqliteConnectionManager>> {
        Ok(self.pool.get()?)
    }

    fn setup_schema(&self) -> StoreResult<()> {
        let conn = self.get_conn()?;
        conn.execute_batch(r#"
            CREATE TABLE IF NOT EXISTS key_value (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updatedAt TEXT NOT NULL
            );
        "#)?;
        Ok(())
    }

    fn read_value(&self) -> StoreResult<Option<(String, String)>> {
        let conn = self.get_conn()?;
        let row = conn
            .query_row(
                "SELECT value, updatedAt FROM key_value WHERE key = ?1",
                params![SKIN_TONES_KEY],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;
        Ok(row)
    }

    /// Read the persisted map. A corrupt value reads as empty.
    pub fn load(&self) -> StoreResult<HashMap<String, String>> {
        let Some((value, _)) = self.read_value()? else {
            return Ok(HashMap::new());
        };
        match serde_json::from_str(&value) {
            Ok(tones) => Ok(tones),
            Err(e) => {
                tracing::warn!(error = %e, "persisted skin tones are corrupt, ignoring");
                Ok(HashMap::new())
            }
        }
    }

    /// Replace the persisted map
    pub fn save(&self, tones: &HashMap<String, String>) -> StoreResult<()> {
        let value = serde_json::to_string(tones)?;
        let now = Utc::now().format("%Y-%m-%d %H:%M:%S%.f").to_string();
        let conn = self.get_conn()?;
        conn.execute(
            r#"INSERT INTO key_value (key, value, updatedAt) VALUES (?1, ?2, ?3)
               ON CONFLICT(key) DO UPDATE SET value = excluded.value, updatedAt = excluded.updatedAt"#,
            params![SKIN_TONES_KEY, value, now],
        )?;
        Ok(())
    }

    pub fn remove(&self) -> StoreResult<()> {
        let conn = self.get_conn()?;
        conn.execute("DELETE FROM key_value WHERE key = ?1", params![SKIN_TONES_KEY])?;
        Ok(())
    }

    /// When the map was last written, if ever
    pub fn updated_at(&self) -> StoreResult<Option<DateTime<Utc>>> {
        Ok(self.read_value()?.and_then(|(_, ts)| parse_db_timestamp(&ts)))
    }

    #[cfg(test)]
    fn write_raw(&self, value: &str) -> StoreResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT OR REPLACE INTO key_value (key, value, updatedAt) VALUES (?1, ?2, '')",
            params![SKIN_TONES_KEY, value],
        )?;
        Ok(())
    }
}

impl SkinToneStore for SqliteSkinToneStore {
    fn get(&self) -> Result<HashMap<String, String>, PickerError> {
        Ok(self.load()?)
    }

    fn set(&self, tones: HashMap<String, String>) -> Result<(), PickerError> {
        Ok(self.save(&tones)?)
    }

    fn clear(&self) -> Result<(), PickerError> {
        Ok(self.remove()?)
    }
}

fn parse_db_timestamp(timestamp_str: &str) -> Option<DateTime<Utc>> {
    chrono::NaiveDateTime::parse_from_str(timestamp_str, "%Y-%m-%d %H:%M:%S%.f")
        .ok()
        .map(|dt| Utc.from_utc_datetime(&dt))
}
