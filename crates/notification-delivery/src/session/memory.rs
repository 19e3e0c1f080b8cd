//! In-memory session queue

use super::SessionStore;
use crate::error::Result;
use async_trait::async_trait;
use futures::lock::Mutex;
use serde_json::Value;
use std::collections::VecDeque;

/// In-memory session queue
#[derive(Default)]
pub struct MemorySessionStore {
    queue: Mutex<VecDeque<Value>>,
}

impl MemorySessionStore {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn push(&self, record: Value) -> Result<()> {
        self.queue.lock().await.push_back(record);
        Ok(())
    }

    async fn drain(&self) -> Result<Vec<Value>> {
        let mut queue = self.queue.lock().await;
        Ok(queue.drain(..).collect())
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.queue.lock().await.len())
    }
}
