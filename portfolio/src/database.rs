use crate::models::Collection;
use rusqlite::{Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Database error: {0}")]
    DbError(#[from] rusqlite::Error),
    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
    #[error("Cache lock poisoned")]
    Poisoned,
    #[error("Cache task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// The mirrored body of one collection as it was last saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub body: String,
    /// Hex SHA-256 of `body`.
    pub digest: String,
    pub saved_at: String,
}

/// Durable key-value mirror of the last successful fetch of each collection.
///
/// Entries are replaced wholesale on save and never expire; a newer save or an
/// explicit clear is the only invalidation.
pub struct CacheMirror {
    conn: Mutex<Connection>,
}

impl CacheMirror {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CacheError> {
        let conn = Connection::open(path)?;

        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;

        Self::init(conn)
    }

    pub fn in_memory() -> Result<Self, CacheError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, CacheError> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS mirror (
                name TEXT PRIMARY KEY,
                body TEXT NOT NULL,
                digest TEXT NOT NULL,
                saved_at TEXT NOT NULL
            )",
            [],
        )?;

        Ok(CacheMirror {
            conn: Mutex::new(conn),
        })
    }

    /// Runs `op` against the mirror on tokio's blocking pool.
    pub async fn run_blocking<F, R>(mirror: &Arc<CacheMirror>, op: F) -> Result<R, CacheError>
    where
        F: FnOnce(&CacheMirror) -> Result<R, CacheError> + Send + 'static,
        R: Send + 'static,
    {
        let mirror = Arc::clone(mirror);
        tokio::task::spawn_blocking(move || op(&mirror)).await?
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, CacheError> {
        self.conn.lock().map_err(|_| CacheError::Poisoned)
    }

    /// Replaces the mirrored content of `collection` with `records`.
    pub fn save<T: Serialize>(&self, collection: Collection, records: &[T]) -> Result<(), CacheError> {
        let body = serde_json::to_string(records)?;
        let digest = hex::encode(Sha256::digest(body.as_bytes()));
        let now = chrono::Utc::now().to_rfc3339();

        self.conn()?.execute(
            "INSERT OR REPLACE INTO mirror (name, body, digest, saved_at) VALUES (?1, ?2, ?3, ?4)",
            (collection.as_str(), &body, &digest, &now),
        )?;

        debug!(%collection, count = records.len(), "Mirrored collection");
        Ok(())
    }

    /// Mirrored records of `collection`; empty when nothing was saved or the
    /// stored body no longer parses.
    pub fn load<T: DeserializeOwned>(&self, collection: Collection) -> Vec<T> {
        let snapshot = match self.snapshot(collection) {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(%collection, error = %e, "Failed to read mirror");
                return Vec::new();
            }
        };

        serde_json::from_str(&snapshot.body).unwrap_or_else(|e| {
            warn!(%collection, error = %e, "Discarding corrupt mirror entry");
            Vec::new()
        })
    }

    pub fn snapshot(&self, collection: Collection) -> Result<Option<Snapshot>, CacheError> {
        let snapshot = self
            .conn()?
            .query_row(
                "SELECT body, digest, saved_at FROM mirror WHERE name = ?1",
                [collection.as_str()],
                |row| {
                    Ok(Snapshot {
                        body: row.get(0)?,
                        digest: row.get(1)?,
                        saved_at: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(snapshot)
    }

    pub fn clear(&self, collection: Collection) -> Result<(), CacheError> {
        self.conn()?
            .execute("DELETE FROM mirror WHERE name = ?1", [collection.as_str()])?;
        Ok(())
    }

    pub fn clear_all(&self) -> Result<(), CacheError> {
        self.conn()?.execute("DELETE FROM mirror", [])?;
        Ok(())
    }
}
