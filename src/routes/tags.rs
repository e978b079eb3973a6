use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::auth::Caller;
use crate::db;
use crate::db::tags::TagDraft;
use crate::error::AppError;
use crate::middleware::audit;
use crate::models::Tag;
use crate::routes::input;
use crate::slug;
use crate::state::SharedState;
use crate::validation::FieldErrors;

const UNIQUE: &[(&str, &str)] = &[("tags_name_key", "name"), ("tags_slug_key", "slug")];

#[derive(Deserialize)]
pub struct ListParams {
    pub search: Option<String>,
    pub ordering: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TagInput {
    pub name: Option<String>,
    pub slug: Option<String>,
}

impl TagInput {
    fn or_stored(self, stored: Tag) -> Self {
        Self {
            name: self.name.or(Some(stored.name)),
            slug: self.slug.or(Some(stored.slug)),
        }
    }

    fn validate(self) -> Result<TagDraft, FieldErrors> {
        let mut errors = FieldErrors::new();

        let name = input::text("name", self.name, Some(100), &mut errors);
        let slug = slug::resolve(self.slug.as_deref(), &name);
        if !name.is_empty() || self.slug.is_some() {
            slug::validate("slug", &slug, 100, &mut errors);
        }

        errors.into_result()?;
        Ok(TagDraft { name, slug })
    }
}

pub async fn list(
    State(state): State<SharedState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Tag>>, AppError> {
    let tags = db::tags::list(
        &state.pool,
        params.search.as_deref(),
        params.ordering.as_deref(),
    )
    .await?;
    Ok(Json(tags))
}

async fn find(state: &SharedState, slug: &str) -> Result<Tag, AppError> {
    db::tags::find_by_slug(&state.pool, slug)
        .await?
        .ok_or_else(|| AppError::NotFound("Tag not found".to_string()))
}

pub async fn get(
    State(state): State<SharedState>,
    Path(slug): Path<String>,
) -> Result<Json<Tag>, AppError> {
    Ok(Json(find(&state, &slug).await?))
}

pub async fn create(
    caller: Caller,
    State(state): State<SharedState>,
    Json(req): Json<TagInput>,
) -> Result<(StatusCode, Json<Tag>), AppError> {
    caller.require_authenticated()?;
    let draft = req.validate()?;

    let tag = db::tags::create(&state.pool, &draft)
        .await
        .map_err(|e| AppError::from_write(e, "tag", UNIQUE, &[]))?;

    audit::log_event(&state.pool, &caller, "tag.created", "tag", Some(tag.id), None).await;

    Ok((StatusCode::CREATED, Json(tag)))
}

pub async fn replace(
    caller: Caller,
    State(state): State<SharedState>,
    Path(slug): Path<String>,
    Json(req): Json<TagInput>,
) -> Result<Json<Tag>, AppError> {
    caller.require_authenticated()?;
    let stored = find(&state, &slug).await?;
    store(&state, &caller, stored, req.validate()?).await
}

pub async fn update(
    caller: Caller,
    State(state): State<SharedState>,
    Path(slug): Path<String>,
    Json(req): Json<TagInput>,
) -> Result<Json<Tag>, AppError> {
    caller.require_authenticated()?;
    let stored = find(&state, &slug).await?;
    let draft = req.or_stored(stored.clone()).validate()?;
    store(&state, &caller, stored, draft).await
}

async fn store(
    state: &SharedState,
    caller: &Caller,
    stored: Tag,
    draft: TagDraft,
) -> Result<Json<Tag>, AppError> {
    let tag = db::tags::update(&state.pool, stored.id, &draft)
        .await
        .map_err(|e| AppError::from_write(e, "tag", UNIQUE, &[]))?
        .ok_or_else(|| AppError::NotFound("Tag not found".to_string()))?;

    audit::log_event(&state.pool, caller, "tag.updated", "tag", Some(tag.id), None).await;

    Ok(Json(tag))
}

pub async fn delete(
    caller: Caller,
    State(state): State<SharedState>,
    Path(slug): Path<String>,
) -> Result<StatusCode, AppError> {
    caller.require_authenticated()?;
    let tag = find(&state, &slug).await?;
    if !db::tags::delete(&state.pool, tag.id).await? {
        return Err(AppError::NotFound("Tag not found".to_string()));
    }

    audit::log_event(&state.pool, &caller, "tag.deleted", "tag", Some(tag.id), None).await;

    Ok(StatusCode::NO_CONTENT)
}
