//! SQLite-backed catalog store.
//!
//! Base catalogs are stored as the JSON document they were imported from.
//! Overlay entries get one row each so that a write touches only the entry
//! being created or deleted; rows are read back in insertion order.

use crate::error::{StorageError, StorageResult};
use crate::store::CatalogStore;
use async_trait::async_trait;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use sigcat_model::{ModelRecord, Node, OverlayMap};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

/// Persistent catalog store backed by SQLite.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Opens (or creates) a store at the given path.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        info!("opened catalog store at {}", path.display());
        Self::with_connection(conn)
    }

    /// Opens an in-memory store (for testing).
    pub fn open_in_memory() -> StorageResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> StorageResult<Self> {
        conn.execute_batch(
            "
            PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS models (
                model_id TEXT PRIMARY KEY,
                main_api TEXT NOT NULL,
                base_catalog TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS overlay_entries (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                model_id TEXT NOT NULL REFERENCES models(model_id) ON DELETE CASCADE,
                parent_path TEXT NOT NULL,
                leaf_name TEXT NOT NULL,
                node TEXT NOT NULL,
                UNIQUE(model_id, parent_path, leaf_name)
            );
            ",
        )?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Runs `f` against the connection on the blocking pool.
    async fn with_conn<T, F>(&self, f: F) -> StorageResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> StorageResult<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut guard = conn
                .lock()
                .map_err(|_| StorageError::Transient("connection lock poisoned".into()))?;
            f(&mut guard)
        })
        .await
        .map_err(|e| StorageError::Transient(format!("storage task failed: {e}")))?
    }
}

/// Maps SQLite failures onto the retry/conflict taxonomy.
fn classify(err: rusqlite::Error, what: &str) -> StorageError {
    match err.sqlite_error_code() {
        Some(ErrorCode::ConstraintViolation) => StorageError::Conflict(what.to_string()),
        Some(ErrorCode::DatabaseBusy) | Some(ErrorCode::DatabaseLocked) => {
            StorageError::Transient(format!("{what}: {err}"))
        }
        _ => StorageError::Database(err),
    }
}

fn model_exists(conn: &Connection, model_id: &str) -> StorageResult<bool> {
    let found: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM models WHERE model_id = ?1",
            params![model_id],
            |row| row.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}

#[async_trait]
impl CatalogStore for SqliteStore {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    async fn load_model(&self, model_id: &str) -> StorageResult<ModelRecord> {
        let model_id = model_id.to_string();
        self.with_conn(move |conn| {
            let header: Option<(String, String)> = conn
                .query_row(
                    "SELECT main_api, base_catalog FROM models WHERE model_id = ?1",
                    params![model_id],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .optional()?;
            let (main_api, base_catalog_json) =
                header.ok_or_else(|| StorageError::NotFound(format!("model {model_id}")))?;

            let mut stmt = conn.prepare(
                "SELECT parent_path, leaf_name, node FROM overlay_entries
                 WHERE model_id = ?1 ORDER BY id",
            )?;
            let rows = stmt.query_map(params![model_id], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })?;

            let mut overlay = OverlayMap::new();
            for row in rows {
                let (parent, leaf, json) = row?;
                let node: Node = serde_json::from_str(&json)?;
                overlay.insert(parent, leaf, node);
            }
            debug!("loaded model {model_id} with {} overlay entries", overlay.len());

            Ok(ModelRecord {
                main_api,
                base_catalog_json,
                overlay,
            })
        })
        .await
    }

    async fn create_model(&self, model_id: &str, record: &ModelRecord) -> StorageResult<()> {
        let model_id = model_id.to_string();
        let record = record.clone();
        let mut entries = Vec::with_capacity(record.overlay.len());
        for entry in record.overlay.entries() {
            entries.push((
                entry.parent.to_string(),
                entry.leaf.to_string(),
                serde_json::to_string(entry.node)?,
            ));
        }

        self.with_conn(move |conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT INTO models (model_id, main_api, base_catalog) VALUES (?1, ?2, ?3)",
                params![model_id, record.main_api, record.base_catalog_json],
            )
            .map_err(|e| classify(e, &format!("model {model_id} already exists")))?;
            for (parent, leaf, json) in &entries {
                tx.execute(
                    "INSERT INTO overlay_entries (model_id, parent_path, leaf_name, node)
                     VALUES (?1, ?2, ?3, ?4)",
                    params![model_id, parent, leaf, json],
                )?;
            }
            tx.commit()?;
            info!("created model {model_id} ({} overlay entries)", entries.len());
            Ok(())
        })
        .await
    }

    async fn list_models(&self) -> StorageResult<Vec<String>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT model_id FROM models ORDER BY model_id")?;
            let ids = stmt
                .query_map([], |row| row.get::<_, String>(0))?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(ids)
        })
        .await
    }

    async fn save_overlay_entry(
        &self,
        model_id: &str,
        parent_path: &str,
        leaf_name: &str,
        node: &Node,
    ) -> StorageResult<()> {
        let json = serde_json::to_string(node)?;
        let (model_id, parent, leaf) = (
            model_id.to_string(),
            parent_path.to_string(),
            leaf_name.to_string(),
        );
        self.with_conn(move |conn| {
            if !model_exists(conn, &model_id)? {
                return Err(StorageError::NotFound(format!("model {model_id}")));
            }
            conn.execute(
                "INSERT INTO overlay_entries (model_id, parent_path, leaf_name, node)
                 VALUES (?1, ?2, ?3, ?4)",
                params![model_id, parent, leaf, json],
            )
            .map_err(|e| classify(e, &format!("{parent}.{leaf} already persisted")))?;
            Ok(())
        })
        .await
    }

    async fn delete_overlay_entry(
        &self,
        model_id: &str,
        parent_path: &str,
        leaf_name: &str,
    ) -> StorageResult<()> {
        let (model_id, parent, leaf) = (
            model_id.to_string(),
            parent_path.to_string(),
            leaf_name.to_string(),
        );
        self.with_conn(move |conn| {
            let removed = conn
                .execute(
                    "DELETE FROM overlay_entries
                     WHERE model_id = ?1 AND parent_path = ?2 AND leaf_name = ?3",
                    params![model_id, parent, leaf],
                )
                .map_err(|e| classify(e, "delete overlay entry"))?;
            if removed == 0 {
                return Err(StorageError::NotFound(format!("{parent}.{leaf}")));
            }
            Ok(())
        })
        .await
    }
}
