use std::io::{Cursor, Write};

use alienshot_common::{BlobStore, StorageError};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::entity::photo;
use crate::error::AppError;

/// Build an in-memory zip archive from a set of photo records.
///
/// Entries are named by each photo's display name, falling back to
/// `photo_<id>` when the name is empty. Photos whose blob has gone missing are
/// skipped, so the archive may hold fewer entries than records; callers reject
/// empty photo sets upstream.
pub async fn build_zip(
    photos: &[photo::Model],
    blob_store: &dyn BlobStore,
) -> Result<Vec<u8>, AppError> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for photo in photos {
        let bytes = match blob_store.get(&photo.stored_name).await {
            Ok(bytes) => bytes,
            Err(StorageError::NotFound(name)) => {
                tracing::warn!("Skipping photo {} with missing blob {name}", photo.id);
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        let entry_name = if photo.original_name.is_empty() {
            format!("photo_{}", photo.id)
        } else {
            photo.original_name.clone()
        };

        writer
            .start_file(entry_name, options)
            .map_err(|e| AppError::Internal(format!("Zip entry failed: {e}")))?;
        writer
            .write_all(&bytes)
            .map_err(|e| AppError::Internal(format!("Zip write failed: {e}")))?;
    }

    let cursor = writer
        .finish()
        .map_err(|e| AppError::Internal(format!("Zip finalize failed: {e}")))?;

    Ok(cursor.into_inner())
}
