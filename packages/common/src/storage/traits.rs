use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};

use super::error::StorageError;

/// Type alias for a boxed async reader.
pub type BoxReader = Box<dyn AsyncRead + Unpin + Send>;

/// Name-keyed blob storage.
///
/// The store owns name generation: `store` derives a fresh unique name from a
/// random identifier plus the suggested name's extension and returns it. The
/// caller persists that name and uses it as the sole key for later reads.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Write `data` under a freshly generated name and return that name.
    ///
    /// Never overwrites an existing blob.
    async fn store(&self, data: &[u8], suggested_name: &str) -> Result<String, StorageError>;

    /// Retrieve all bytes of a blob.
    async fn get(&self, stored_name: &str) -> Result<Vec<u8>, StorageError> {
        let mut reader = self.get_stream(stored_name).await?;
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).await?;
        Ok(buf)
    }

    /// Retrieve a blob as a streaming async reader.
    async fn get_stream(&self, stored_name: &str) -> Result<BoxReader, StorageError>;

    /// Check whether a blob exists.
    async fn exists(&self, stored_name: &str) -> Result<bool, StorageError>;

    /// Delete a blob.
    ///
    /// Returns `true` if the blob was deleted, `false` if it did not exist.
    /// A missing blob is not an error: callers deleting records treat blob
    /// removal as best-effort cleanup.
    async fn delete(&self, stored_name: &str) -> Result<bool, StorageError>;
}
