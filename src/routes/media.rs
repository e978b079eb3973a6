use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Serialize;

use crate::auth::Caller;
use crate::error::AppError;
use crate::media::{self, MediaFolder, MediaUrls};
use crate::middleware::audit;
use crate::state::SharedState;
use crate::validation::FieldErrors;

#[derive(Serialize)]
pub struct UploadResponse {
    pub path: String,
    pub url: String,
}

/// Store a single image and hand back the path to reference from other records.
pub async fn upload(
    caller: Caller,
    State(state): State<SharedState>,
    urls: MediaUrls,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<UploadResponse>), AppError> {
    caller.require_authenticated()?;

    if !media::upload::is_multipart(&headers) {
        return Err(AppError::BadRequest(
            "Expected a multipart/form-data body".to_string(),
        ));
    }
    let mut form = media::upload::parse_multipart(&headers, body)
        .await
        .map_err(AppError::BadRequest)?;

    let mut errors = FieldErrors::new();
    let folder = match form.field("folder").filter(|f| !f.is_empty()) {
        Some(raw) => MediaFolder::parse(raw).or_else(|| {
            errors.add("folder", format!("\"{raw}\" is not a valid choice."));
            None
        }),
        None => Some(MediaFolder::ProjectImages),
    };
    let file = form.take_file("file");
    match &file {
        None => errors.add("file", "No file was submitted."),
        Some(f) if !f.is_image() => errors.add(
            "file",
            "Upload a valid image. The file you uploaded was either not an image or a corrupted image.",
        ),
        Some(f) if f.data.is_empty() => errors.add("file", "The submitted file is empty."),
        Some(_) => {}
    }
    errors.into_result()?;

    let (Some(folder), Some(file)) = (folder, file) else {
        return Err(AppError::Internal("upload validated without file".to_string()));
    };

    let size = file.data.len();
    let path = state
        .media
        .save(folder, &file.filename, file.data)
        .await
        .map_err(AppError::Internal)?;

    audit::log_event(
        &state.pool,
        &caller,
        "media.uploaded",
        "media",
        None,
        Some(serde_json::json!({ "path": path, "bytes": size })),
    )
    .await;

    let url = urls.url(&path);
    Ok((StatusCode::CREATED, Json(UploadResponse { path, url })))
}
