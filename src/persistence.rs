use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::path::Path;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;

/// Key the entry list is stored under.
pub const ENTRIES_KEY: &str = "spinwheel.entries";

/// Stored lists older than this are discarded on read (milliseconds).
pub const ENTRIES_TTL_MS: i64 = 7 * 24 * 60 * 60 * 1000;

/// Durable string key-value medium the store writes through.
pub trait KeyValueMedium {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn delete(&self, key: &str) -> Result<()>;
}

/// Millisecond wall clock, swappable for tests.
pub trait Clock {
    fn now_ms(&self) -> i64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<i64>,
}

impl ManualClock {
    pub fn new(now_ms: i64) -> Self {
        Self {
            now: Cell::new(now_ms),
        }
    }

    pub fn set(&self, now_ms: i64) {
        self.now.set(now_ms);
    }

    pub fn advance(&self, delta_ms: i64) {
        self.now.set(self.now.get() + delta_ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> i64 {
        (**self).now_ms()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoredEntryList {
    pub entries: Vec<String>,
    pub saved_at_timestamp: i64,
}

/// In-process medium. Used by tests and as a fallback when no database can be opened.
#[derive(Debug, Default)]
pub struct MemoryMedium {
    values: RefCell<HashMap<String, String>>,
}

impl MemoryMedium {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueMedium for MemoryMedium {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values
            .borrow_mut()
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.values.borrow_mut().remove(key);
        Ok(())
    }
}

impl<M: KeyValueMedium + ?Sized> KeyValueMedium for &M {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn delete(&self, key: &str) -> Result<()> {
        (**self).delete(key)
    }
}

impl<M: KeyValueMedium + ?Sized> KeyValueMedium for Box<M> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn delete(&self, key: &str) -> Result<()> {
        (**self).delete(key)
    }
}

/// SQLite-backed medium: a single `kv` table.
#[derive(Debug)]
pub struct SqliteMedium {
    conn: Connection,
}

impl SqliteMedium {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        Self::with_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )
            "#,
            [],
        )?;
        Ok(Self { conn })
    }
}

impl KeyValueMedium for SqliteMedium {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.conn.execute("DELETE FROM kv WHERE key = ?1", [key])?;
        Ok(())
    }
}

/// Remembers the entry list across sessions, forgetting it after [`ENTRIES_TTL_MS`].
pub struct PersistenceStore<M: KeyValueMedium, C: Clock = SystemClock> {
    medium: M,
    clock: C,
    ttl_ms: i64,
}

impl<M: KeyValueMedium> PersistenceStore<M, SystemClock> {
    pub fn new(medium: M) -> Self {
        Self::with_clock(medium, SystemClock)
    }
}

impl<M: KeyValueMedium, C: Clock> PersistenceStore<M, C> {
    pub fn with_clock(medium: M, clock: C) -> Self {
        Self {
            medium,
            clock,
            ttl_ms: ENTRIES_TTL_MS,
        }
    }

    pub fn ttl_ms(&self) -> i64 {
        self.ttl_ms
    }

    /// Overwrites any previous record. Returns the timestamp written.
    pub fn save(&self, entries: &[String]) -> Result<i64> {
        let record = StoredEntryList {
            entries: entries.to_vec(),
            saved_at_timestamp: self.clock.now_ms(),
        };
        let json = serde_json::to_string(&record)?;
        self.medium.set(ENTRIES_KEY, &json)?;
        debug!(count = entries.len(), "saved entry list");
        Ok(record.saved_at_timestamp)
    }

    /// Stored entries, or an empty list when nothing usable is stored.
    /// Expired and unreadable records are purged. Never fails.
    pub fn load(&self) -> Vec<String> {
        self.live_record()
            .map(|record| record.entries)
            .unwrap_or_default()
    }

    /// The whole live record. Same purge rules as [`load`](Self::load).
    pub fn load_record(&self) -> Option<StoredEntryList> {
        self.live_record()
    }

    pub fn clear(&self) -> Result<()> {
        self.medium.delete(ENTRIES_KEY)
    }

    fn live_record(&self) -> Option<StoredEntryList> {
        let raw = match self.medium.get(ENTRIES_KEY) {
            Ok(raw) => raw?,
            Err(err) => {
                warn!(error = %err, "could not read stored entry list");
                return None;
            }
        };

        let record = match serde_json::from_str::<StoredEntryList>(&raw) {
            Ok(record) => record,
            Err(err) => {
                warn!(error = %err, "discarding unreadable stored entry list");
                self.purge();
                return None;
            }
        };

        let age = self.clock.now_ms() - record.saved_at_timestamp;
        if age >= self.ttl_ms {
            debug!(age_ms = age, "stored entry list expired");
            self.purge();
            return None;
        }

        Some(record)
    }

    fn purge(&self) {
        if let Err(err) = self.medium.delete(ENTRIES_KEY) {
            warn!(error = %err, "could not delete stored entry list");
        }
    }
}
