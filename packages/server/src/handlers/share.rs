use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use rand::Rng;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait};
use tracing::instrument;

use crate::entity::{photo, share_link, share_photo};
use crate::error::{AppError, ErrorBody};
use crate::extractors::admin::AdminUser;
use crate::extractors::json::AppJson;
use crate::handlers::photo::{build_photo_response, find_photo};
use crate::models::photo::PhotoResponse;
use crate::models::share::{
    CreateShareRequest, CreateShareResponse, DownloadSelectionRequest, ShareResponse,
};
use crate::state::AppState;
use crate::utils::archive;

#[utoipa::path(
    post,
    path = "/shares",
    tag = "Shares",
    operation_id = "createShare",
    summary = "Create a share link for selected photos",
    description = "Creates an immutable share link over the resolved photos. Unknown IDs \
        are dropped; duplicates collapse to one membership. The returned token grants \
        unauthenticated read access.",
    request_body = CreateShareRequest,
    responses(
        (status = 201, description = "Share created", body = CreateShareResponse),
        (status = 400, description = "Empty photo_ids (VALIDATION_ERROR)", body = ErrorBody),
        (status = 403, description = "Admin check failed (FORBIDDEN)", body = ErrorBody),
        (status = 404, description = "No listed photo exists (NOT_FOUND)", body = ErrorBody),
    ),
    security(("admin_password" = [])),
)]
#[instrument(skip(state, _admin, body))]
pub async fn create_share(
    _admin: AdminUser,
    State(state): State<AppState>,
    AppJson(body): AppJson<CreateShareRequest>,
) -> Result<impl IntoResponse, AppError> {
    if body.photo_ids.is_empty() {
        return Err(AppError::Validation("photo_ids must not be empty".into()));
    }

    let photos = photo::Entity::find()
        .filter(photo::Column::Id.is_in(body.photo_ids))
        .order_by_desc(photo::Column::CreatedAt)
        .order_by_desc(photo::Column::Id)
        .all(&state.db)
        .await?;
    if photos.is_empty() {
        return Err(AppError::NotFound("No matching photos".into()));
    }

    let token = generate_token();
    let now = Utc::now();

    let txn = state.db.begin().await?;
    share_link::ActiveModel {
        token: Set(token.clone()),
        created_at: Set(now),
    }
    .insert(&txn)
    .await?;

    let memberships: Vec<share_photo::ActiveModel> = photos
        .iter()
        .map(|p| share_photo::ActiveModel {
            share_token: Set(token.clone()),
            photo_id: Set(p.id),
        })
        .collect();
    share_photo::Entity::insert_many(memberships).exec(&txn).await?;
    txn.commit().await?;

    let share_url = share_url(&state.config.share.base_url, &token);

    Ok((
        StatusCode::CREATED,
        Json(CreateShareResponse {
            token,
            share_url: share_url.clone(),
            qr_payload: share_url,
            photos: photos.into_iter().map(PhotoResponse::from).collect(),
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/shares/{token}",
    tag = "Shares",
    operation_id = "getShare",
    summary = "Fetch a share link",
    params(("token" = String, Path, description = "Share token")),
    responses(
        (status = 200, description = "Share with member photos, newest first", body = ShareResponse),
        (status = 404, description = "Unknown token (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_share(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<ShareResponse>, AppError> {
    let share = find_share(&state.db, &token).await?;
    let photos = share_member_photos(&state.db, &share.token).await?;

    Ok(Json(ShareResponse {
        token: share.token,
        created_at: share.created_at,
        photos: photos.into_iter().map(PhotoResponse::from).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/shares/{token}/files/{photo_id}",
    tag = "Shares",
    operation_id = "downloadSharedPhoto",
    summary = "Download a single photo from a share",
    params(
        ("token" = String, Path, description = "Share token"),
        ("photo_id" = i32, Path, description = "Photo ID; must be a member of the share"),
    ),
    responses(
        (status = 200, description = "Photo content"),
        (status = 404, description = "Unknown token or non-member photo (NOT_FOUND)", body = ErrorBody),
        (status = 410, description = "File missing from storage (GONE)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(token, photo_id))]
pub async fn download_shared_photo(
    State(state): State<AppState>,
    Path((token, photo_id)): Path<(String, i32)>,
) -> Result<Response, AppError> {
    let share = find_share(&state.db, &token).await?;
    let photo = member_photo(&state.db, &share.token, photo_id).await?;
    build_photo_response(&photo, &*state.blob_store).await
}

#[utoipa::path(
    post,
    path = "/shares/{token}/download",
    tag = "Shares",
    operation_id = "downloadSharedSelection",
    summary = "Download a selection of shared photos as a zip archive",
    description = "Streams a zip of the requested member photos, or of every member when \
        the body is omitted. Members whose file has gone missing are skipped.",
    params(("token" = String, Path, description = "Share token")),
    request_body(content = DownloadSelectionRequest, description = "Optional photo selection"),
    responses(
        (status = 200, description = "Zip archive", content_type = "application/zip"),
        (status = 404, description = "Unknown token, non-member photo, or empty selection (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, body), fields(token))]
pub async fn download_selection(
    State(state): State<AppState>,
    Path(token): Path<String>,
    body: Option<AppJson<DownloadSelectionRequest>>,
) -> Result<Response, AppError> {
    let share = find_share(&state.db, &token).await?;
    let requested = body.map(|AppJson(b)| b.photo_ids).unwrap_or_default();

    let photos = if requested.is_empty() {
        share_member_photos(&state.db, &share.token).await?
    } else {
        let mut selected = Vec::with_capacity(requested.len());
        for photo_id in requested {
            selected.push(member_photo(&state.db, &share.token, photo_id).await?);
        }
        selected
    };

    if photos.is_empty() {
        return Err(AppError::NotFound("No photos available".into()));
    }

    let data = archive::build_zip(&photos, &*state.blob_store).await?;
    let filename = format!("alienshot_{}.zip", share.token);

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/zip")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        )
        .body(Body::from(data))
        .map_err(|e| AppError::Internal(format!("Failed to build response: {e}")))?;

    Ok(response)
}

/// Token generation: 128 random bits as 32 lowercase hex characters. The
/// keyspace makes duplicate-key conflicts practically impossible, so creation
/// never retries.
fn generate_token() -> String {
    let bytes: [u8; 16] = rand::rng().random();
    hex::encode(bytes)
}

fn share_url(base_url: &str, token: &str) -> String {
    format!("{}/share/{token}", base_url.trim_end_matches('/'))
}

async fn find_share<C: sea_orm::ConnectionTrait>(
    db: &C,
    token: &str,
) -> Result<share_link::Model, AppError> {
    share_link::Entity::find_by_id(token.to_owned())
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Share not found".into()))
}

/// Query the fully materialized member list of a share in one pass,
/// ordered by photo creation time descending.
async fn share_member_photos<C: sea_orm::ConnectionTrait>(
    db: &C,
    token: &str,
) -> Result<Vec<photo::Model>, AppError> {
    let memberships = share_photo::Entity::find()
        .filter(share_photo::Column::ShareToken.eq(token))
        .all(db)
        .await?;
    let ids: Vec<i32> = memberships.iter().map(|m| m.photo_id).collect();
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    Ok(photo::Entity::find()
        .filter(photo::Column::Id.is_in(ids))
        .order_by_desc(photo::Column::CreatedAt)
        .order_by_desc(photo::Column::Id)
        .all(db)
        .await?)
}

/// Resolve a photo through its share membership; a photo outside the share is
/// not found here even when it exists globally.
async fn member_photo<C: sea_orm::ConnectionTrait>(
    db: &C,
    token: &str,
    photo_id: i32,
) -> Result<photo::Model, AppError> {
    share_photo::Entity::find_by_id((token.to_owned(), photo_id))
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Photo is not part of this share".into()))?;

    find_photo(db, photo_id).await
}
