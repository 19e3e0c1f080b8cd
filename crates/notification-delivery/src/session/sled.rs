//! Sled database backed session queue

use super::SessionStore;
use crate::error::{Error, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::path::Path;
use tracing::{debug, info, warn};

/// Persistent session queue
///
/// Records are keyed by ids from [`sled::Db::generate_id`], stored big-endian
/// so tree order is push order.
pub struct SledSessionStore {
    /// Database instance
    db: sled::Db,
    /// Queue tree
    queue: sled::Tree,
}

impl SledSessionStore {
    /// Open a queue in the database at `path`
    pub async fn new(path: impl AsRef<Path>, session_key: &str) -> Result<Self> {
        let path = path.as_ref();
        check_session_key(session_key)?;

        // Ensure the directory exists
        if let Some(parent) = path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        info!("Opening session queue '{}' at {:?}", session_key, path);

        let db = sled::open(path)?;
        let queue = db.open_tree(session_key)?;

        Ok(Self { db, queue })
    }

    /// Create a temporary queue (for testing)
    pub async fn in_memory(session_key: &str) -> Result<Self> {
        check_session_key(session_key)?;
        info!("Creating in-memory session queue '{}'", session_key);

        let db = sled::Config::new().temporary(true).open()?;
        let queue = db.open_tree(session_key)?;

        Ok(Self { db, queue })
    }
}

// Queue trees are named after the session key
fn check_session_key(session_key: &str) -> Result<()> {
    if session_key.trim().is_empty() {
        return Err(Error::session("session key cannot be empty"));
    }
    Ok(())
}

#[async_trait]
impl SessionStore for SledSessionStore {
    async fn push(&self, record: Value) -> Result<()> {
        let id = self.db.generate_id()?;
        debug!("Queueing session record {}", id);

        self.queue.insert(id.to_be_bytes(), serde_json::to_vec(&record)?)?;
        self.queue.flush_async().await?;

        Ok(())
    }

    async fn drain(&self) -> Result<Vec<Value>> {
        let mut raw = Vec::new();
        while let Some((_, bytes)) = self.queue.pop_min()? {
            raw.push(bytes);
        }
        self.queue.flush_async().await?;

        // Parse after the queue is cleared so one bad entry cannot wedge it
        let mut records = Vec::with_capacity(raw.len());
        for bytes in raw {
            match serde_json::from_slice(&bytes) {
                Ok(record) => records.push(record),
                Err(e) => warn!("Dropping unreadable session record: {}", e),
            }
        }

        debug!("Drained {} session records", records.len());
        Ok(records)
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.queue.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[smol_potat::test]
    async fn test_empty_session_key_rejected() {
        assert!(matches!(
            SledSessionStore::in_memory(" ").await,
            Err(Error::Session(_))
        ));

        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            SledSessionStore::new(dir.path().join("session.db"), "").await,
            Err(Error::Session(_))
        ));
    }

    #[smol_potat::test]
    async fn test_drain_preserves_order() {
        let store = SledSessionStore::in_memory("notifications").await.unwrap();
        for i in 0..5 {
            store.push(json!({ "id": format!("n{}", i) })).await.unwrap();
        }

        let ids: Vec<Value> = store
            .drain()
            .await
            .unwrap()
            .into_iter()
            .map(|record| record["id"].clone())
            .collect();
        assert_eq!(ids, vec![json!("n0"), json!("n1"), json!("n2"), json!("n3"), json!("n4")]);

        assert!(store.drain().await.unwrap().is_empty());
    }

    #[smol_potat::test]
    async fn test_persistence() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("session.db");

        {
            let store = SledSessionStore::new(&db_path, "notifications").await.unwrap();
            store.push(json!({ "id": "kept" })).await.unwrap();
        }

        {
            let store = SledSessionStore::new(&db_path, "notifications").await.unwrap();
            assert_eq!(store.len().await.unwrap(), 1);
            assert_eq!(store.drain().await.unwrap(), vec![json!({ "id": "kept" })]);
        }
    }

    #[smol_potat::test]
    async fn test_unreadable_record_is_dropped() {
        let store = SledSessionStore::in_memory("notifications").await.unwrap();
        store.push(json!({ "id": "a" })).await.unwrap();
        let id = store.db.generate_id().unwrap();
        store.queue.insert(id.to_be_bytes(), b"not json".to_vec()).unwrap();
        store.push(json!({ "id": "b" })).await.unwrap();

        let drained = store.drain().await.unwrap();
        assert_eq!(drained, vec![json!({ "id": "a" }), json!({ "id": "b" })]);
        assert!(store.is_empty().await.unwrap());
    }
}
