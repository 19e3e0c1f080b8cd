//! Session queues that hand notifications to the next page load

pub mod memory;
pub mod sled;

use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;

pub use self::memory::MemorySessionStore;
pub use self::sled::SledSessionStore;

/// Trait for session queue backends
///
/// The delivery controller only ever drains; producers push.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Append a notification record to the queue
    async fn push(&self, record: Value) -> Result<()>;

    /// Remove and return every queued record, oldest first
    async fn drain(&self) -> Result<Vec<Value>>;

    /// Number of queued records
    async fn len(&self) -> Result<usize>;

    /// Whether the queue is empty
    async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }
}
