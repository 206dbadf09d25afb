use async_trait::async_trait;

use crate::StoreResult;

/// Durable string-keyed storage.
///
/// Implementations must survive process restarts (except the in-memory
/// backend) and apply last-write-wins per key.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a value. Missing keys are `Ok(None)`.
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Insert or overwrite a value.
    async fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Remove a key. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> StoreResult<()>;

    /// Drop every key.
    async fn clear(&self) -> StoreResult<()>;

    /// Remove several keys.
    async fn multi_remove(&self, keys: &[&str]) -> StoreResult<()> {
        for key in keys {
            self.remove(key).await?;
        }
        Ok(())
    }
}
