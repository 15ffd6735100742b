mod error;
mod name;
mod traits;

pub mod filesystem;

pub use error::StorageError;
pub use name::generate_stored_name;
pub use traits::{BlobStore, BoxReader};
