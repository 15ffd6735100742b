pub mod storage;

pub use storage::{BlobStore, BoxReader, StorageError};
