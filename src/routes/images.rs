//! Project images. Writes accept either JSON carrying an already-stored media
//! path or a multipart form whose `image` part is uploaded on the fly.

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::Caller;
use crate::db;
use crate::db::project_images::ProjectImageDraft;
use crate::error::AppError;
use crate::media::{self, MediaFolder, MediaUrls, UploadedFile};
use crate::middleware::audit;
use crate::models::{ProjectImage, ProjectImageView};
use crate::routes::id::Id;
use crate::routes::input;
use crate::state::SharedState;
use crate::validation::FieldErrors;

const FOREIGN: &[(&str, &str)] = &[("project_images_project_id_fkey", "project")];

#[derive(Deserialize)]
pub struct ListParams {
    pub project: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ImageInput {
    pub project: Option<Uuid>,
    pub image: Option<String>,
    pub order: Option<i32>,
}

/// A decoded write body: the fields plus the file part, if one was sent.
struct ImageWrite {
    input: ImageInput,
    upload: Option<UploadedFile>,
}

impl ImageWrite {
    fn or_stored(self, stored: &ProjectImage) -> Self {
        let input = self.input;
        let image = match &self.upload {
            Some(_) => None,
            None => input.image.or(Some(stored.image.clone())),
        };
        Self {
            input: ImageInput {
                project: input.project.or(Some(stored.project_id)),
                image,
                order: input.order.or(Some(stored.display_order)),
            },
            upload: self.upload,
        }
    }

    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        input::reference("project", self.input.project, &mut errors);
        input::order("order", self.input.order, &mut errors);

        match &self.upload {
            Some(file) if !file.is_image() => errors.add(
                "image",
                "Upload a valid image. The file you uploaded was either not an image or a corrupted image.",
            ),
            Some(file) if file.data.is_empty() => {
                errors.add("image", "The submitted file is empty.")
            }
            Some(_) => {}
            None => {
                if input::image_path("image", self.input.image.clone(), &mut errors).is_none() {
                    errors.add("image", "No file was submitted.");
                }
            }
        }

        errors.into_result()
    }

    /// Store the uploaded file, if any, and produce the row values.
    async fn into_draft(self, state: &SharedState) -> Result<ProjectImageDraft, AppError> {
        self.validate()?;

        let image = match self.upload {
            Some(file) => state
                .media
                .save(MediaFolder::ProjectImages, &file.filename, file.data)
                .await
                .map_err(AppError::Internal)?,
            None => self.input.image.unwrap_or_default(),
        };

        Ok(ProjectImageDraft {
            project_id: self.input.project.unwrap_or_default(),
            image,
            display_order: self.input.order.unwrap_or(0),
        })
    }
}

async fn read_body(headers: &HeaderMap, body: Bytes) -> Result<ImageWrite, AppError> {
    if !media::upload::is_multipart(headers) {
        let input: ImageInput = serde_json::from_slice(&body)
            .map_err(|e| AppError::BadRequest(format!("Invalid JSON body: {e}")))?;
        return Ok(ImageWrite {
            input,
            upload: None,
        });
    }

    let mut form = media::upload::parse_multipart(headers, body)
        .await
        .map_err(AppError::BadRequest)?;

    let mut errors = FieldErrors::new();
    let project = input::id_filter("project", form.field("project"), &mut errors);
    let order = match form.field("order").filter(|o| !o.is_empty()) {
        Some(raw) => match raw.parse() {
            Ok(order) => Some(order),
            Err(_) => {
                errors.add("order", "A valid integer is required.");
                None
            }
        },
        None => None,
    };
    errors.into_result()?;

    Ok(ImageWrite {
        input: ImageInput {
            project,
            image: form.field("image").map(str::to_string),
            order,
        },
        upload: form.take_file("image"),
    })
}

/// Unlink a project image file once nothing references it. Paths outside
/// `project_images/` were not uploaded through this resource and are left alone.
pub(crate) async fn release_file(state: &SharedState, path: &str) {
    let folder = MediaFolder::ProjectImages.as_str();
    if !path
        .strip_prefix(folder)
        .is_some_and(|rest| rest.starts_with('/'))
    {
        return;
    }

    match db::project_images::path_in_use(&state.pool, path).await {
        Ok(false) => {}
        Ok(true) => return,
        Err(e) => {
            tracing::warn!(path, "Failed to check media references, keeping file: {e}");
            return;
        }
    }

    if let Err(e) = state.media.remove(path).await {
        tracing::warn!(path, "Failed to remove project image file: {e}");
    }
}

pub async fn list(
    State(state): State<SharedState>,
    urls: MediaUrls,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<ProjectImageView>>, AppError> {
    let mut errors = FieldErrors::new();
    let project = input::id_filter("project", params.project.as_deref(), &mut errors);
    errors.into_result()?;

    let images = db::project_images::list(&state.pool, project).await?;
    Ok(Json(images.into_iter().map(|i| i.view(&urls)).collect()))
}

async fn find(state: &SharedState, id: Uuid) -> Result<ProjectImage, AppError> {
    db::project_images::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Project image not found".to_string()))
}

pub async fn get(
    State(state): State<SharedState>,
    urls: MediaUrls,
    Id(id): Id,
) -> Result<Json<ProjectImageView>, AppError> {
    Ok(Json(find(&state, id).await?.view(&urls)))
}

pub async fn create(
    caller: Caller,
    State(state): State<SharedState>,
    urls: MediaUrls,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<ProjectImageView>), AppError> {
    caller.require_authenticated()?;
    let write = read_body(&headers, body).await?;
    let uploaded = write.upload.is_some();
    let draft = write.into_draft(&state).await?;

    let image = match db::project_images::create(&state.pool, &draft).await {
        Ok(image) => image,
        Err(e) => {
            if uploaded {
                release_file(&state, &draft.image).await;
            }
            return Err(AppError::from_write(e, "project image", &[], FOREIGN));
        }
    };

    audit::log_event(
        &state.pool,
        &caller,
        "project_image.created",
        "project_image",
        Some(image.id),
        Some(serde_json::json!({ "project": image.project_id, "image": image.image })),
    )
    .await;

    Ok((StatusCode::CREATED, Json(image.view(&urls))))
}

pub async fn replace(
    caller: Caller,
    State(state): State<SharedState>,
    urls: MediaUrls,
    Id(id): Id,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ProjectImageView>, AppError> {
    caller.require_authenticated()?;
    let stored = find(&state, id).await?;
    let write = read_body(&headers, body).await?;
    store(&state, &caller, &urls, stored, write).await
}

pub async fn update(
    caller: Caller,
    State(state): State<SharedState>,
    urls: MediaUrls,
    Id(id): Id,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ProjectImageView>, AppError> {
    caller.require_authenticated()?;
    let stored = find(&state, id).await?;
    let write = read_body(&headers, body).await?.or_stored(&stored);
    store(&state, &caller, &urls, stored, write).await
}

async fn store(
    state: &SharedState,
    caller: &Caller,
    urls: &MediaUrls,
    stored: ProjectImage,
    write: ImageWrite,
) -> Result<Json<ProjectImageView>, AppError> {
    let uploaded = write.upload.is_some();
    let draft = write.into_draft(state).await?;

    let image = match db::project_images::update(&state.pool, stored.id, &draft).await {
        Ok(Some(image)) => image,
        Ok(None) => return Err(AppError::NotFound("Project image not found".to_string())),
        Err(e) => {
            if uploaded {
                release_file(state, &draft.image).await;
            }
            return Err(AppError::from_write(e, "project image", &[], FOREIGN));
        }
    };

    if image.image != stored.image && uploaded {
        release_file(state, &stored.image).await;
    }

    audit::log_event(
        &state.pool,
        caller,
        "project_image.updated",
        "project_image",
        Some(image.id),
        None,
    )
    .await;

    Ok(Json(image.view(urls)))
}

pub async fn delete(
    caller: Caller,
    State(state): State<SharedState>,
    Id(id): Id,
) -> Result<StatusCode, AppError> {
    caller.require_authenticated()?;
    let image = db::project_images::delete(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Project image not found".to_string()))?;

    release_file(&state, &image.image).await;

    audit::log_event(
        &state.pool,
        &caller,
        "project_image.deleted",
        "project_image",
        Some(id),
        None,
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(name: &str, data: &'static [u8]) -> Option<UploadedFile> {
        Some(UploadedFile {
            field: "image".into(),
            filename: name.into(),
            data: Bytes::from_static(data),
        })
    }

    #[test]
    fn json_write_needs_a_path() {
        let write = ImageWrite {
            input: ImageInput {
                project: Some(Uuid::now_v7()),
                image: None,
                order: None,
            },
            upload: None,
        };
        let errors = write.validate().unwrap_err();
        assert!(errors.get("image").is_some());
        assert!(errors.get("project").is_none());
    }

    #[test]
    fn uploads_must_look_like_images() {
        let write = ImageWrite {
            input: ImageInput {
                project: Some(Uuid::now_v7()),
                image: None,
                order: Some(1),
            },
            upload: upload("notes.pdf", b"%PDF"),
        };
        assert!(write.validate().unwrap_err().get("image").is_some());

        let write = ImageWrite {
            upload: upload("well.png", b"png"),
            ..write
        };
        assert!(write.validate().is_ok());
    }

    #[test]
    fn partial_write_keeps_stored_values() {
        let stored = ProjectImage {
            id: Uuid::now_v7(),
            project_id: Uuid::now_v7(),
            image: "project_images/a.jpg".into(),
            display_order: 3,
            created_at: chrono::Utc::now(),
        };
        let write = ImageWrite {
            input: ImageInput {
                order: Some(1),
                ..ImageInput::default()
            },
            upload: None,
        }
        .or_stored(&stored);

        assert_eq!(write.input.project, Some(stored.project_id));
        assert_eq!(write.input.image.as_deref(), Some("project_images/a.jpg"));
        assert_eq!(write.input.order, Some(1));
        assert!(write.validate().is_ok());
    }
}
