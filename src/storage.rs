use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

/// A key-value store of text values, one value per key. Writes replace the
/// whole value.
pub trait Slots {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Slots saved in the `slot` table of a SQLite database.
pub struct SqliteSlots {
    db: Connection,
}

impl SqliteSlots {
    /// Get a connection to the slot database, creating it if it does
    /// not exist.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory {}.", parent.display()))?;
            }
        }
        let db = Connection::open(path)
            .with_context(|| format!("Failed to open store file {}.", path.display()))?;
        init_slots(&db)?;
        info!(path = %path.display(), "opened store");
        Ok(SqliteSlots { db })
    }

    #[cfg(test)]
    pub(crate) fn in_memory() -> Result<Self> {
        let db = Connection::open_in_memory().context("Failed to open in-memory store.")?;
        init_slots(&db)?;
        Ok(SqliteSlots { db })
    }
}

/// Initialize the slot table.
fn init_slots(db: &Connection) -> Result<()> {
    db.execute(
        "CREATE TABLE if not exists slot (
                  key             TEXT PRIMARY KEY,
                  value           TEXT NOT NULL,
                  updated_at      TEXT NOT NULL
                  )",
        [],
    )
    .context("Failed to create slot table.")?;
    Ok(())
}

impl Slots for SqliteSlots {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .db
            .query_row(
                "SELECT value FROM slot WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .with_context(|| format!("Failed to read slot '{}' from database.", key))?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.db
            .execute(
                "INSERT OR REPLACE INTO slot (key, value, updated_at) VALUES (?1, ?2, CURRENT_TIMESTAMP)",
                params![key, value],
            )
            .with_context(|| format!("Failed to write slot '{}' to database.", key))?;
        debug!(key, bytes = value.len(), "slot written");
        Ok(())
    }
}

/// Slots kept in memory only. Counts writes so callers can check which
/// operations persisted.
#[derive(Debug, Default)]
pub struct MemorySlots {
    values: HashMap<String, String>,
    writes: usize,
}

impl MemorySlots {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(key: &str, value: &str) -> Self {
        let mut values = HashMap::new();
        values.insert(key.to_string(), value.to_string());
        MemorySlots { values, writes: 0 }
    }

    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl Slots for MemorySlots {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_sqlite_missing_key() {
        let slots = SqliteSlots::in_memory().unwrap();
        assert_eq!(slots.get("todo_tasks_v1").unwrap(), None);
    }

    #[test]
    fn test_sqlite_set_overwrites() {
        let mut slots = SqliteSlots::in_memory().unwrap();
        slots.set("k", "[1]").unwrap();
        slots.set("k", "[2]").unwrap();
        assert_eq!(slots.get("k").unwrap().as_deref(), Some("[2]"));
        let rows: u32 = slots
            .db
            .query_row("SELECT count(*) FROM slot", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn test_sqlite_keys_are_independent() {
        let mut slots = SqliteSlots::in_memory().unwrap();
        slots.set("a", "1").unwrap();
        slots.set("b", "2").unwrap();
        assert_eq!(slots.get("a").unwrap().as_deref(), Some("1"));
        assert_eq!(slots.get("b").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn test_sqlite_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("store.sqlite");
        {
            let mut slots = SqliteSlots::open(&path).unwrap();
            slots.set("todo_tasks_v1", "[]").unwrap();
        }
        assert!(path.exists());
        let slots = SqliteSlots::open(&path).unwrap();
        assert_eq!(slots.get("todo_tasks_v1").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_memory_counts_writes() {
        let mut slots = MemorySlots::with_value("k", "old");
        assert_eq!(slots.writes(), 0);
        assert_eq!(slots.get("k").unwrap().as_deref(), Some("old"));
        slots.set("k", "new").unwrap();
        assert_eq!(slots.writes(), 1);
        assert_eq!(slots.get("k").unwrap().as_deref(), Some("new"));
    }
}
