use alienshot_common::BlobStore;
use axum::extract::{Multipart, Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::{Json, body::Body};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait};
use tokio_util::io::ReaderStream;
use tracing::instrument;

use crate::entity::{photo, share_photo};
use crate::error::{AppError, ErrorBody};
use crate::extractors::admin::AdminUser;
use crate::extractors::json::AppJson;
use crate::models::photo::{DeletePhotosRequest, DeletedPhotosResponse, PhotoResponse};
use crate::state::AppState;
use crate::utils::filename::sanitize_filename;

/// Multipart field names accepted for uploads, single- and multi-file clients alike.
const UPLOAD_FIELD_NAMES: [&str; 5] = ["photo", "file", "photos", "photos[]", "files"];

#[utoipa::path(
    post,
    path = "/images/add",
    tag = "Photos",
    operation_id = "uploadPhotos",
    summary = "Upload one or more photos",
    description = "Ingests photos from a multipart form. File parts are accepted under the \
        field names `photo`, `file`, `photos`, `photos[]`, or `files`; parts without a \
        filename are ignored. Filenames are sanitized before storage.",
    request_body(content_type = "multipart/form-data", description = "Photo files"),
    responses(
        (status = 201, description = "Photos created", body = Vec<PhotoResponse>),
        (status = 400, description = "No usable file part (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, multipart))]
pub async fn upload_photos(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut incoming: Vec<(String, Vec<u8>)> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };
        if !UPLOAD_FIELD_NAMES.contains(&name.as_str()) {
            continue;
        }
        let Some(file_name) = field.file_name().map(str::to_owned) else {
            continue;
        };
        if file_name.is_empty() {
            continue;
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Upload read error: {e}")))?;
        incoming.push((sanitize_filename(&file_name), data.to_vec()));
    }

    if incoming.is_empty() {
        return Err(AppError::Validation("No file provided".into()));
    }

    // Blobs first, records second; a crash in between leaves orphan blobs,
    // never a record without bytes.
    let mut stored: Vec<(String, String)> = Vec::with_capacity(incoming.len());
    for (original_name, data) in &incoming {
        let stored_name = state.blob_store.store(data, original_name).await?;
        stored.push((original_name.clone(), stored_name));
    }

    let txn = state.db.begin().await?;
    let mut created = Vec::with_capacity(stored.len());
    for (original_name, stored_name) in stored {
        let model = photo::ActiveModel {
            original_name: Set(original_name),
            stored_name: Set(stored_name),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        created.push(model);
    }
    txn.commit().await?;

    let photos: Vec<PhotoResponse> = created.into_iter().map(PhotoResponse::from).collect();
    Ok((StatusCode::CREATED, Json(photos)))
}

#[utoipa::path(
    get,
    path = "/photos",
    tag = "Photos",
    operation_id = "listPhotos",
    summary = "List all photos",
    description = "Returns every photo, newest first.",
    responses(
        (status = 200, description = "Photo list", body = Vec<PhotoResponse>),
        (status = 403, description = "Admin check failed (FORBIDDEN)", body = ErrorBody),
    ),
    security(("admin_password" = [])),
)]
#[instrument(skip(state, _admin))]
pub async fn list_photos(
    _admin: AdminUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<PhotoResponse>>, AppError> {
    let photos = photo::Entity::find()
        .order_by_desc(photo::Column::CreatedAt)
        .order_by_desc(photo::Column::Id)
        .all(&state.db)
        .await?;

    Ok(Json(photos.into_iter().map(PhotoResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/photos/{id}/file",
    tag = "Photos",
    operation_id = "downloadPhoto",
    summary = "Download a photo's file",
    params(("id" = i32, Path, description = "Photo ID")),
    responses(
        (status = 200, description = "Photo content"),
        (status = 403, description = "Admin check failed (FORBIDDEN)", body = ErrorBody),
        (status = 404, description = "Photo not found (NOT_FOUND)", body = ErrorBody),
        (status = 410, description = "File missing from storage (GONE)", body = ErrorBody),
    ),
    security(("admin_password" = [])),
)]
#[instrument(skip(state, _admin), fields(photo_id))]
pub async fn download_photo(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(photo_id): Path<i32>,
) -> Result<Response, AppError> {
    let photo = find_photo(&state.db, photo_id).await?;
    build_photo_response(&photo, &*state.blob_store).await
}

#[utoipa::path(
    delete,
    path = "/photos",
    tag = "Photos",
    operation_id = "deletePhotos",
    summary = "Delete photos by ID",
    description = "Removes the listed photos and their files. Unknown IDs are silently \
        ignored; repeating a delete is a no-op.",
    request_body = DeletePhotosRequest,
    responses(
        (status = 200, description = "Photos deleted", body = DeletedPhotosResponse),
        (status = 204, description = "No listed photo exists"),
        (status = 400, description = "Empty photo_ids (VALIDATION_ERROR)", body = ErrorBody),
        (status = 403, description = "Admin check failed (FORBIDDEN)", body = ErrorBody),
    ),
    security(("admin_password" = [])),
)]
#[instrument(skip(state, _admin, body))]
pub async fn delete_photos(
    _admin: AdminUser,
    State(state): State<AppState>,
    AppJson(body): AppJson<DeletePhotosRequest>,
) -> Result<Response, AppError> {
    if body.photo_ids.is_empty() {
        return Err(AppError::Validation("photo_ids must not be empty".into()));
    }

    let photos = photo::Entity::find()
        .filter(photo::Column::Id.is_in(body.photo_ids))
        .all(&state.db)
        .await?;
    if photos.is_empty() {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    let txn = state.db.begin().await?;
    let mut deleted = Vec::with_capacity(photos.len());
    for photo in &photos {
        // Blob removal is best-effort; a file already gone must not block the delete.
        if let Err(e) = state.blob_store.delete(&photo.stored_name).await {
            tracing::warn!("Failed to remove blob {}: {e}", photo.stored_name);
        }

        share_photo::Entity::delete_many()
            .filter(share_photo::Column::PhotoId.eq(photo.id))
            .exec(&txn)
            .await?;
        photo::Entity::delete_by_id(photo.id).exec(&txn).await?;
        deleted.push(photo.id);
    }
    txn.commit().await?;

    Ok(Json(DeletedPhotosResponse { deleted }).into_response())
}

pub(crate) async fn find_photo<C: sea_orm::ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<photo::Model, AppError> {
    photo::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Photo not found".into()))
}

/// Build a streaming file response for a photo record.
pub(crate) async fn build_photo_response(
    photo: &photo::Model,
    blob_store: &dyn BlobStore,
) -> Result<Response, AppError> {
    // A record whose blob has vanished surfaces as 410 via the storage error.
    let reader = blob_store.get_stream(&photo.stored_name).await?;
    let stream = ReaderStream::new(reader);
    let body = Body::from_stream(stream);

    let content_type = mime_guess::from_path(&photo.original_name)
        .first()
        .map(|m| m.to_string())
        .unwrap_or_else(|| "application/octet-stream".to_string());

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition_value(&photo.original_name),
        )
        .body(body)
        .map_err(|e| AppError::Internal(format!("Failed to build response: {e}")))?;

    Ok(response)
}

/// Build a `Content-Disposition` value. Display names are already sanitized to
/// ASCII, so a plain quoted filename is safe.
fn content_disposition_value(filename: &str) -> String {
    let name = if filename.is_empty() { "download" } else { filename };
    format!("inline; filename=\"{name}\"")
}
