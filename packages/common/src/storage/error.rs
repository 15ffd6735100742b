/// Errors that can occur during blob storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// No blob exists under the given stored name.
    #[error("blob not found: {0}")]
    NotFound(String),

    /// The stored name is not one this store could have generated.
    #[error("invalid stored name: {0}")]
    InvalidName(String),

    #[error("storage IO error: {0}")]
    Io(#[from] std::io::Error),
}
