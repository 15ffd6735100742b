use rand::Rng;

use super::error::StorageError;

/// Maximum extension length carried over from the suggested name, dot included.
const MAX_EXTENSION_LEN: usize = 16;

/// Generate a fresh stored name: 128 random bits as 32 lowercase hex characters,
/// plus the extension of `suggested_name` when it has a usable one.
///
/// The random namespace makes collisions with existing blobs negligible, so
/// callers never retry.
pub fn generate_stored_name(suggested_name: &str) -> String {
    let id: [u8; 16] = rand::rng().random();
    match extension_of(suggested_name) {
        Some(ext) => format!("{}.{ext}", hex::encode(id)),
        None => hex::encode(id),
    }
}

/// Extract a safe extension from a client-supplied name, if any.
///
/// Only ASCII alphanumeric extensions are kept; anything else is dropped rather
/// than carried into a filesystem path.
fn extension_of(name: &str) -> Option<&str> {
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() || ext.len() > MAX_EXTENSION_LEN - 1 {
        return None;
    }
    if !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext)
}

/// Check that a stored name is one this store could have generated.
///
/// Stored names come back from the database, but rejecting separators and
/// traversal here keeps the store safe against any caller.
pub(crate) fn validate_stored_name(stored_name: &str) -> Result<(), StorageError> {
    let valid = !stored_name.is_empty()
        && stored_name != ".."
        && !stored_name.starts_with('.')
        && stored_name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.');

    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidName(stored_name.to_string()))
    }
}
