//! SQLite storage for memory records

use rusqlite::{params, Connection, OptionalExtension};
use std::path::PathBuf;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::memory::MemoryRecord;

/// SQLite storage backend.
///
/// Only the database path is held; every operation opens its own short-lived
/// connection scoped to that single call, so nothing is shared across
/// actions and the storage is trivially `Send + Sync`. Writes are single
/// statements, which is all the atomicity the record schema needs: the
/// UNIQUE(username, key) constraint plus `ON CONFLICT .. DO UPDATE` turns a
/// concurrent double-store into one upsert winning, never two rows.
pub struct SqliteStorage {
    db_path: PathBuf,
}

impl SqliteStorage {
    /// Create a new SQLite storage, initializing the schema if needed
    pub fn new(config: &Config) -> Result<Self> {
        let conn = Connection::open(&config.db_path)?;
        conn.execute_batch(include_str!("schema.sql"))?;

        Ok(Self {
            db_path: config.db_path.clone(),
        })
    }

    fn connect(&self) -> Result<Connection> {
        Connection::open(&self.db_path).map_err(Error::from)
    }

    /// Insert or overwrite the record for (username, key).
    ///
    /// `created_at` is only written on first insert; on conflict the existing
    /// row keeps it and takes the new value, tags, and `updated_at`.
    pub fn upsert(
        &self,
        username: &str,
        key: &str,
        value: &[u8],
        tags_json: &str,
        now: &str,
    ) -> Result<()> {
        let conn = self.connect()?;

        conn.execute(
            r#"
            INSERT INTO memories (username, key, value, tags, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?5)
            ON CONFLICT(username, key) DO UPDATE SET
                value = excluded.value,
                tags = excluded.tags,
                updated_at = excluded.updated_at
            "#,
            params![username, key, value, tags_json, now],
        )?;

        Ok(())
    }

    /// Exact-match lookup on (username, key)
    pub fn get(&self, username: &str, key: &str) -> Result<Option<MemoryRecord>> {
        let conn = self.connect()?;

        let result = conn
            .query_row(
                r#"
                SELECT key, value, tags, created_at, updated_at
                FROM memories
                WHERE username = ?1 AND key = ?2
                "#,
                params![username, key],
                MemoryRow::from_row,
            )
            .optional()?;

        result.map(|row| row.into_record()).transpose()
    }

    /// All records for a username, in storage order
    pub fn list(&self, username: &str) -> Result<Vec<MemoryRecord>> {
        let conn = self.connect()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT key, value, tags, created_at, updated_at
            FROM memories
            WHERE username = ?1
            "#,
        )?;

        let rows = stmt.query_map(params![username], MemoryRow::from_row)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?.into_record()?);
        }

        Ok(records)
    }

    /// Records whose key contains `query` as a substring, for a username.
    ///
    /// Matching is case-insensitive for ASCII (SQLite's default LIKE
    /// collation). LIKE metacharacters in the query are escaped so they
    /// match literally.
    pub fn search(&self, username: &str, query: &str) -> Result<Vec<MemoryRecord>> {
        let conn = self.connect()?;

        let pattern = format!("%{}%", escape_like(query));
        let mut stmt = conn.prepare(
            r#"
            SELECT key, value, tags, created_at, updated_at
            FROM memories
            WHERE username = ?1 AND key LIKE ?2 ESCAPE '\'
            "#,
        )?;

        let rows = stmt.query_map(params![username, pattern], MemoryRow::from_row)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?.into_record()?);
        }

        Ok(records)
    }

    /// Remove the record for (username, key); returns whether a row existed
    pub fn delete(&self, username: &str, key: &str) -> Result<bool> {
        let conn = self.connect()?;

        let deleted = conn.execute(
            "DELETE FROM memories WHERE username = ?1 AND key = ?2",
            params![username, key],
        )?;

        Ok(deleted > 0)
    }
}

/// Escape LIKE metacharacters so a query matches as a literal substring
fn escape_like(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len());
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Intermediate struct for reading from SQLite
struct MemoryRow {
    key: String,
    value: Vec<u8>,
    tags: Option<String>,
    created_at: String,
    updated_at: String,
}

impl MemoryRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(MemoryRow {
            key: row.get(0)?,
            value: row.get(1)?,
            tags: row.get(2)?,
            created_at: row.get(3)?,
            updated_at: row.get(4)?,
        })
    }

    fn into_record(self) -> Result<MemoryRecord> {
        let value = serde_json::from_slice(&self.value).map_err(|e| {
            Error::serialization(format!("stored value for key '{}' is not valid JSON: {e}", self.key))
        })?;

        let tags = match self.tags.as_deref() {
            None | Some("") => Vec::new(),
            Some(json) => serde_json::from_str(json).map_err(|e| {
                Error::serialization(format!("stored tags for key '{}' are not valid JSON: {e}", self.key))
            })?,
        };

        Ok(MemoryRecord {
            key: self.key,
            value,
            tags,
            created_at: chrono::DateTime::parse_from_rfc3339(&self.created_at)
                .map(|dt| dt.with_timezone(&chrono::Utc))
                .map_err(|e| Error::storage(e.to_string()))?,
            updated_at: chrono::DateTime::parse_from_rfc3339(&self.updated_at)
                .map(|dt| dt.with_timezone(&chrono::Utc))
                .map_err(|e| Error::storage(e.to_string()))?,
        })
    }
}
