use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::photo;

/// Response DTO for a single photo.
///
/// The server-side `stored_name` is deliberately not exposed.
#[derive(Serialize, utoipa::ToSchema)]
pub struct PhotoResponse {
    #[schema(example = 1)]
    pub id: i32,
    /// Sanitized display name from the original upload.
    #[schema(example = "alien.jpg")]
    pub original_name: String,
    pub created_at: DateTime<Utc>,
}

impl From<photo::Model> for PhotoResponse {
    fn from(model: photo::Model) -> Self {
        Self {
            id: model.id,
            original_name: model.original_name,
            created_at: model.created_at,
        }
    }
}

/// Request body for bulk photo deletion.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct DeletePhotosRequest {
    /// Photo IDs to delete. Unknown IDs are silently ignored.
    pub photo_ids: Vec<i32>,
}

/// Response DTO for bulk photo deletion.
#[derive(Serialize, utoipa::ToSchema)]
pub struct DeletedPhotosResponse {
    /// IDs of the photos actually deleted.
    pub deleted: Vec<i32>,
}
