//! Employee image routes.
//!
//! Uploads go to the configured blob store; the database keeps one row per
//! upload and the newest row is the employee's profile image.

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    routing::{get, post},
};
use bytes::Bytes;
use chrono::Utc;
use kaizen_core::storage::{BlobStore, image_storage_key};
use kaizen_db::{EmployeeRepository, ImageRepository, repositories::CreateImageInput};
use kaizen_shared::AppError;
use kaizen_shared::types::EmployeeId;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    extract::Path,
    middleware::AuthUser,
};

/// Room for multipart framing on top of the file itself.
const MULTIPART_OVERHEAD: u64 = 64 * 1024;

/// Creates the image routes. Request bodies are capped just above `max_file_size`.
pub fn routes(max_file_size: u64) -> Router<AppState> {
    let body_limit = usize::try_from(max_file_size.saturating_add(MULTIPART_OVERHEAD))
        .unwrap_or(usize::MAX);
    Router::new()
        .route(
            "/employees/{work_permit_number}/images",
            post(upload_image).layer(DefaultBodyLimit::max(body_limit)),
        )
        .route(
            "/employees/{work_permit_number}/images/profile",
            get(profile_image),
        )
}

/// An uploaded or resolved employee image.
#[derive(Debug, Serialize)]
pub struct ImageResponse {
    /// Image row id; absent for the placeholder.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Employee the image belongs to.
    pub employee_id: String,
    /// Public URL.
    pub url: String,
    /// True when no image was uploaded and the placeholder is returned.
    pub placeholder: bool,
    /// Upload time (RFC 3339).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uploaded_at: Option<String>,
}

struct UploadedFile {
    filename: String,
    content_type: String,
    data: Bytes,
}

async fn read_file_field(mut multipart: Multipart) -> ApiResult<UploadedFile> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("malformed multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("failed to read upload: {e}")))?;
        return Ok(UploadedFile {
            filename,
            content_type,
            data,
        });
    }
    Err(AppError::Validation("multipart field 'file' is required".to_string()).into())
}

fn storage(state: &AppState) -> ApiResult<Arc<dyn BlobStore>> {
    state.storage.clone().ok_or_else(|| {
        ApiError::from(AppError::Unavailable(
            "image storage is not configured".to_string(),
        ))
    })
}

/// POST `/employees/{work_permit_number}/images` - Upload an image (multipart field `file`).
async fn upload_image(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(work_permit_number): Path<String>,
    multipart: Multipart,
) -> ApiResult<(StatusCode, Json<ImageResponse>)> {
    let store = storage(&state)?;
    let file = read_file_field(multipart).await?;

    let size = u64::try_from(file.data.len()).unwrap_or(u64::MAX);
    state.upload_policy.validate(&file.content_type, size)?;

    let employees = EmployeeRepository::new((*state.db).clone());
    if !employees.exists(&work_permit_number).await? {
        return Err(AppError::NotFound(format!("Employee not found: {work_permit_number}")).into());
    }

    let key = image_storage_key(
        &EmployeeId::new(work_permit_number.clone()),
        &file.filename,
        Utc::now(),
    );
    let stored = store.put(&key, file.data, &file.content_type).await?;

    let images = ImageRepository::new((*state.db).clone());
    let row = match images
        .create(CreateImageInput {
            employee_id: work_permit_number,
            url: stored.url,
            storage_key: stored.key.clone(),
            content_type: file.content_type,
        })
        .await
    {
        Ok(row) => row,
        Err(e) => {
            if let Err(cleanup) = store.delete(&stored.key).await {
                warn!(key = %stored.key, error = %cleanup, "failed to remove orphaned image");
            }
            return Err(e.into());
        }
    };

    info!(
        id = row.id,
        employee_id = %row.employee_id,
        size,
        uploaded_by = auth.subject(),
        "employee image uploaded"
    );
    Ok((
        StatusCode::CREATED,
        Json(ImageResponse {
            id: Some(row.id),
            employee_id: row.employee_id,
            url: row.url,
            placeholder: false,
            uploaded_at: Some(row.uploaded_at.to_rfc3339()),
        }),
    ))
}

/// GET `/employees/{work_permit_number}/images/profile` - Newest image or the placeholder.
async fn profile_image(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(work_permit_number): Path<String>,
) -> ApiResult<Json<ImageResponse>> {
    let images = ImageRepository::new((*state.db).clone());
    if let Some(row) = images.find_profile(&work_permit_number).await? {
        return Ok(Json(ImageResponse {
            id: Some(row.id),
            employee_id: row.employee_id,
            url: row.url,
            placeholder: false,
            uploaded_at: Some(row.uploaded_at.to_rfc3339()),
        }));
    }

    match &state.placeholder_image_url {
        Some(url) => Ok(Json(ImageResponse {
            id: None,
            employee_id: work_permit_number,
            url: url.clone(),
            placeholder: true,
            uploaded_at: None,
        })),
        None => Err(AppError::NotFound(format!("no image for employee {work_permit_number}")).into()),
    }
}
