use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::photo::PhotoResponse;

/// Request body for creating a share link.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateShareRequest {
    /// Photos to include. Duplicates collapse to one membership.
    pub photo_ids: Vec<i32>,
}

/// Response DTO for a newly created share link.
#[derive(Serialize, utoipa::ToSchema)]
pub struct CreateShareResponse {
    /// 32 lowercase hex characters.
    #[schema(example = "3f2a9c4be1d84f60a7c5d9e2b8f01c6d")]
    pub token: String,
    /// Public URL for the share page.
    #[schema(example = "http://localhost:5173/share/3f2a9c4be1d84f60a7c5d9e2b8f01c6d")]
    pub share_url: String,
    /// Payload to encode as a QR code; identical to `share_url`.
    pub qr_payload: String,
    pub photos: Vec<PhotoResponse>,
}

/// Response DTO for fetching an existing share link.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ShareResponse {
    pub token: String,
    pub created_at: DateTime<Utc>,
    /// Member photos, newest first.
    pub photos: Vec<PhotoResponse>,
}

/// Optional request body for the zip download of a share.
#[derive(Default, Deserialize, utoipa::ToSchema)]
pub struct DownloadSelectionRequest {
    /// Subset of member photo IDs; all members are used when omitted.
    #[serde(default)]
    pub photo_ids: Vec<i32>,
}
