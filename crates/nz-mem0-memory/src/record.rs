//! SQLite-backed record store, the authoritative side of the memory system.

use crate::error::MemoryError;
use chrono::{DateTime, Utc};
use log::debug;
use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;

/// Raw persisted row. The value is kept serialized; deserialization happens
/// at the orchestration layer.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordRow {
    /// Session the row belongs to.
    pub session_id: String,
    /// Row key, unique within the session.
    pub key: String,
    /// JSON-serialized value.
    pub value: String,
    /// Set once on first insert.
    pub created_at: DateTime<Utc>,
    /// Set on every write.
    pub updated_at: DateTime<Utc>,
}

/// Timestamps resulting from an upsert.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecordTimestamps {
    /// Original insert time.
    pub created_at: DateTime<Utc>,
    /// Time of this write.
    pub updated_at: DateTime<Utc>,
}

/// Durable table of memory records keyed by `(session_id, key)`.
///
/// Every operation acquires the connection, runs in its own statement scope,
/// and releases it before returning. No lock is held across the paired
/// vector index write.
pub struct RecordStore {
    conn: Mutex<Connection>,
}

impl RecordStore {
    /// Open (or create) the store at the given SQLite path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, MemoryError> {
        let conn = Connection::open(path.as_ref())?;
        Self::with_connection(conn)
    }

    /// Open an in-process store, mostly for tests and local development.
    pub fn open_in_memory() -> Result<Self, MemoryError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, MemoryError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS memories (
                session_id TEXT NOT NULL,
                key        TEXT NOT NULL,
                value      TEXT NOT NULL,
                embedding  TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                PRIMARY KEY (session_id, key)
            );
            CREATE INDEX IF NOT EXISTS idx_memories_recent
                ON memories (session_id, updated_at DESC);",
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Upsert a row. `created_at` is preserved across overwrites while
    /// `updated_at` always reflects this write.
    pub fn put(
        &self,
        session_id: &str,
        key: &str,
        value_json: &str,
        embedding_json: Option<&str>,
    ) -> Result<RecordTimestamps, MemoryError> {
        let now = Utc::now();
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO memories (session_id, key, value, embedding, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5)
             ON CONFLICT (session_id, key) DO UPDATE SET
                 value = excluded.value,
                 embedding = excluded.embedding,
                 updated_at = excluded.updated_at",
            params![session_id, key, value_json, embedding_json, now],
        )?;
        let (created_at, updated_at) = conn.query_row(
            "SELECT created_at, updated_at FROM memories
             WHERE session_id = ?1 AND key = ?2",
            params![session_id, key],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        debug!("stored record (session_id={}, key={})", session_id, key);
        Ok(RecordTimestamps {
            created_at,
            updated_at,
        })
    }

    /// Fetch a single row, or `None` if absent.
    pub fn get(&self, session_id: &str, key: &str) -> Result<Option<RecordRow>, MemoryError> {
        let conn = self.conn.lock();
        let row = conn
            .query_row(
                "SELECT session_id, key, value, created_at, updated_at FROM memories
                 WHERE session_id = ?1 AND key = ?2",
                params![session_id, key],
                row_from_sql,
            )
            .optional()?;
        Ok(row)
    }

    /// List a session's rows ordered by `updated_at` descending, ties broken
    /// by key so the order stays stable.
    pub fn list_recent(
        &self,
        session_id: &str,
        limit: usize,
    ) -> Result<Vec<RecordRow>, MemoryError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT session_id, key, value, created_at, updated_at FROM memories
             WHERE session_id = ?1
             ORDER BY updated_at DESC, key ASC
             LIMIT ?2",
        )?;
        let rows = stmt
            .query_map(params![session_id, limit as i64], row_from_sql)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Delete a row, reporting whether anything was removed.
    pub fn delete(&self, session_id: &str, key: &str) -> Result<bool, MemoryError> {
        let conn = self.conn.lock();
        let removed = conn.execute(
            "DELETE FROM memories WHERE session_id = ?1 AND key = ?2",
            params![session_id, key],
        )?;
        Ok(removed > 0)
    }

    /// Scan rows for index reconciliation, optionally limited to one session.
    pub fn scan(&self, session_id: Option<&str>) -> Result<Vec<RecordRow>, MemoryError> {
        let conn = self.conn.lock();
        let rows = match session_id {
            Some(session_id) => {
                let mut stmt = conn.prepare(
                    "SELECT session_id, key, value, created_at, updated_at FROM memories
                     WHERE session_id = ?1",
                )?;
                let rows = stmt
                    .query_map(params![session_id], row_from_sql)?
                    .collect::<Result<Vec<_>, _>>()?;
                rows
            }
            None => {
                let mut stmt = conn.prepare(
                    "SELECT session_id, key, value, created_at, updated_at FROM memories",
                )?;
                let rows = stmt
                    .query_map([], row_from_sql)?
                    .collect::<Result<Vec<_>, _>>()?;
                rows
            }
        };
        Ok(rows)
    }
}

fn row_from_sql(row: &rusqlite::Row<'_>) -> rusqlite::Result<RecordRow> {
    Ok(RecordRow {
        session_id: row.get(0)?,
        key: row.get(1)?,
        value: row.get(2)?,
        created_at: row.get(3)?,
        updated_at: row.get(4)?,
    })
}

#[cfg(test)]
mod tests {
    use super::RecordStore;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn pause() {
        // Timestamps carry sub-millisecond precision; a short pause keeps
        // ordering assertions unambiguous.
        std::thread::sleep(Duration::from_millis(5));
    }

    #[test]
    fn upsert_preserves_created_at() {
        let store = RecordStore::open_in_memory().expect("store");
        let first = store.put("s1", "k1", r#"{"v":1}"#, None).expect("put");
        pause();
        let second = store.put("s1", "k1", r#"{"v":2}"#, None).expect("put");

        assert_eq!(first.created_at, second.created_at);
        assert!(second.updated_at > first.updated_at);

        let row = store.get("s1", "k1").expect("get").expect("row");
        assert_eq!(row.value, r#"{"v":2}"#);
        assert_eq!(store.list_recent("s1", 10).expect("list").len(), 1);
    }

    #[test]
    fn get_missing_returns_none() {
        let store = RecordStore::open_in_memory().expect("store");
        assert_eq!(store.get("s1", "missing").expect("get"), None);
    }

    #[test]
    fn delete_reports_removal() {
        let store = RecordStore::open_in_memory().expect("store");
        store.put("s1", "k1", "{}", None).expect("put");

        assert!(store.delete("s1", "k1").expect("delete"));
        assert_eq!(store.get("s1", "k1").expect("get"), None);
        assert!(!store.delete("s1", "k1").expect("second delete"));
    }

    #[test]
    fn recent_orders_newest_first() {
        let store = RecordStore::open_in_memory().expect("store");
        for key in ["k1", "k2", "k3"] {
            store.put("s1", key, "{}", None).expect("put");
            pause();
        }

        let rows = store.list_recent("s1", 2).expect("list");
        let keys: Vec<&str> = rows.iter().map(|row| row.key.as_str()).collect();
        assert_eq!(keys, vec!["k3", "k2"]);
    }

    #[test]
    fn recent_is_scoped_by_session() {
        let store = RecordStore::open_in_memory().expect("store");
        store.put("s1", "k1", "{}", None).expect("put");
        store.put("s2", "k2", "{}", None).expect("put");

        let rows = store.list_recent("s1", 10).expect("list");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].key, "k1");
    }

    #[test]
    fn scan_filters_by_session() {
        let store = RecordStore::open_in_memory().expect("store");
        store.put("s1", "k1", "{}", None).expect("put");
        store.put("s2", "k2", "{}", None).expect("put");

        assert_eq!(store.scan(None).expect("scan").len(), 2);
        let scoped = store.scan(Some("s2")).expect("scan");
        assert_eq!(scoped.len(), 1);
        assert_eq!(scoped[0].key, "k2");
    }

    #[test]
    fn survives_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("mem0.db");
        {
            let store = RecordStore::open(&path).expect("store");
            store.put("s1", "k1", r#"{"kept":true}"#, None).expect("put");
        }
        let store = RecordStore::open(&path).expect("reopen");
        let row = store.get("s1", "k1").expect("get").expect("row");
        assert_eq!(row.value, r#"{"kept":true}"#);
    }
}
