use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tokio::io::BufReader;

use super::error::StorageError;
use super::name::{generate_stored_name, validate_stored_name};
use super::traits::{BlobStore, BoxReader};

/// Filesystem-backed blob store.
///
/// Blobs live as a flat directory of files named by their generated identifier
/// plus the original extension. Writes go through `.tmp/` and are moved into
/// place with a rename.
pub struct FilesystemBlobStore {
    base_path: PathBuf,
}

impl FilesystemBlobStore {
    /// Create a new filesystem blob store, creating the directory tree if needed.
    pub async fn new(base_path: PathBuf) -> Result<Self, StorageError> {
        fs::create_dir_all(&base_path).await?;
        fs::create_dir_all(base_path.join(".tmp")).await?;
        Ok(Self { base_path })
    }

    fn blob_path(&self, stored_name: &str) -> PathBuf {
        self.base_path.join(stored_name)
    }

    /// Path for a temporary file during writes.
    fn temp_path(&self) -> PathBuf {
        self.base_path
            .join(".tmp")
            .join(uuid::Uuid::new_v4().to_string())
    }
}

#[async_trait]
impl BlobStore for FilesystemBlobStore {
    async fn store(&self, data: &[u8], suggested_name: &str) -> Result<String, StorageError> {
        let stored_name = generate_stored_name(suggested_name);
        let blob_path = self.blob_path(&stored_name);

        let temp_path = self.temp_path();
        if let Err(e) = fs::write(&temp_path, data).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        if let Err(e) = fs::rename(&temp_path, &blob_path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        Ok(stored_name)
    }

    async fn get_stream(&self, stored_name: &str) -> Result<BoxReader, StorageError> {
        validate_stored_name(stored_name)?;
        match fs::File::open(self.blob_path(stored_name)).await {
            Ok(file) => Ok(Box::new(BufReader::new(file))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(stored_name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn exists(&self, stored_name: &str) -> Result<bool, StorageError> {
        validate_stored_name(stored_name)?;
        Ok(fs::try_exists(self.blob_path(stored_name)).await?)
    }

    async fn delete(&self, stored_name: &str) -> Result<bool, StorageError> {
        validate_stored_name(stored_name)?;
        match fs::remove_file(self.blob_path(stored_name)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
