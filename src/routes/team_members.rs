use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::Caller;
use crate::db;
use crate::db::team_members::{TeamMemberDraft, TeamMemberFilter};
use crate::error::AppError;
use crate::media::MediaUrls;
use crate::middleware::audit;
use crate::models::{TeamMember, TeamMemberView};
use crate::routes::id::Id;
use crate::routes::input;
use crate::state::SharedState;
use crate::validation::FieldErrors;

#[derive(Deserialize)]
pub struct ListParams {
    pub role: Option<String>,
    pub is_active: Option<String>,
    pub search: Option<String>,
    pub ordering: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TeamMemberInput {
    pub name: Option<String>,
    pub designation: Option<String>,
    pub role: Option<String>,
    pub bio: Option<String>,
    pub image: Option<String>,
    pub email: Option<String>,
    pub linkedin_profile: Option<String>,
    pub order: Option<i32>,
    pub is_active: Option<bool>,
}

impl TeamMemberInput {
    fn or_stored(self, stored: TeamMember) -> Self {
        Self {
            name: self.name.or(Some(stored.name)),
            designation: self.designation.or(Some(stored.designation)),
            role: self.role.or(Some(stored.role)),
            bio: self.bio.or(Some(stored.bio)),
            image: self.image.or(stored.image),
            email: self.email.or(stored.email),
            linkedin_profile: self.linkedin_profile.or(stored.linkedin_profile),
            order: self.order.or(Some(stored.display_order)),
            is_active: self.is_active.or(Some(stored.is_active)),
        }
    }

    fn validate(self) -> Result<TeamMemberDraft, FieldErrors> {
        let mut errors = FieldErrors::new();

        let name = input::text("name", self.name, Some(100), &mut errors);
        let designation = input::text("designation", self.designation, Some(100), &mut errors);
        let role = input::text("role", self.role, Some(50), &mut errors);
        let bio = input::blank_ok("bio", self.bio, None, &mut errors);
        let image = input::image_path("image", self.image, &mut errors);

        let email = input::nullable(self.email);
        if let Some(email) = &email {
            errors.email("email", email);
        }
        let linkedin_profile = input::nullable(self.linkedin_profile);
        if let Some(url) = &linkedin_profile {
            errors.url("linkedin_profile", url);
        }

        let display_order = input::order("order", self.order, &mut errors);

        errors.into_result()?;
        Ok(TeamMemberDraft {
            name,
            designation,
            role,
            bio,
            image,
            email,
            linkedin_profile,
            display_order,
            is_active: self.is_active.unwrap_or(true),
        })
    }
}

pub async fn list(
    caller: Caller,
    State(state): State<SharedState>,
    urls: MediaUrls,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<TeamMemberView>>, AppError> {
    let mut errors = FieldErrors::new();
    let filter = TeamMemberFilter {
        role: input::text_filter(params.role),
        is_active: input::flag_filter("is_active", params.is_active.as_deref(), &mut errors),
        search: params.search,
        ordering: params.ordering,
    };
    errors.into_result()?;

    let members = db::team_members::list(&state.pool, caller.visibility(), &filter).await?;
    Ok(Json(members.into_iter().map(|m| m.view(&urls)).collect()))
}

/// Inactive members do not exist as far as non-staff callers are concerned.
async fn visible(state: &SharedState, caller: &Caller, id: Uuid) -> Result<TeamMember, AppError> {
    db::team_members::find_by_id(&state.pool, id, caller.visibility())
        .await?
        .ok_or_else(|| AppError::NotFound("Team member not found".to_string()))
}

pub async fn get(
    caller: Caller,
    State(state): State<SharedState>,
    urls: MediaUrls,
    Id(id): Id,
) -> Result<Json<TeamMemberView>, AppError> {
    let member = visible(&state, &caller, id).await?;
    Ok(Json(member.view(&urls)))
}

pub async fn create(
    caller: Caller,
    State(state): State<SharedState>,
    urls: MediaUrls,
    Json(req): Json<TeamMemberInput>,
) -> Result<(StatusCode, Json<TeamMemberView>), AppError> {
    caller.require_authenticated()?;
    let draft = req.validate()?;

    let member = db::team_members::create(&state.pool, &draft).await?;

    audit::log_event(
        &state.pool,
        &caller,
        "team_member.created",
        "team_member",
        Some(member.id),
        None,
    )
    .await;

    Ok((StatusCode::CREATED, Json(member.view(&urls))))
}

pub async fn replace(
    caller: Caller,
    State(state): State<SharedState>,
    urls: MediaUrls,
    Id(id): Id,
    Json(req): Json<TeamMemberInput>,
) -> Result<Json<TeamMemberView>, AppError> {
    caller.require_authenticated()?;
    visible(&state, &caller, id).await?;
    store(&state, &caller, &urls, id, req.validate()?).await
}

pub async fn update(
    caller: Caller,
    State(state): State<SharedState>,
    urls: MediaUrls,
    Id(id): Id,
    Json(req): Json<TeamMemberInput>,
) -> Result<Json<TeamMemberView>, AppError> {
    caller.require_authenticated()?;
    let stored = visible(&state, &caller, id).await?;
    store(&state, &caller, &urls, id, req.or_stored(stored).validate()?).await
}

async fn store(
    state: &SharedState,
    caller: &Caller,
    urls: &MediaUrls,
    id: Uuid,
    draft: TeamMemberDraft,
) -> Result<Json<TeamMemberView>, AppError> {
    let member = db::team_members::update(&state.pool, id, &draft)
        .await?
        .ok_or_else(|| AppError::NotFound("Team member not found".to_string()))?;

    audit::log_event(
        &state.pool,
        caller,
        "team_member.updated",
        "team_member",
        Some(member.id),
        None,
    )
    .await;

    Ok(Json(member.view(urls)))
}

pub async fn delete(
    caller: Caller,
    State(state): State<SharedState>,
    Id(id): Id,
) -> Result<StatusCode, AppError> {
    caller.require_authenticated()?;
    visible(&state, &caller, id).await?;
    if !db::team_members::delete(&state.pool, id).await? {
        return Err(AppError::NotFound("Team member not found".to_string()));
    }

    audit::log_event(
        &state.pool,
        &caller,
        "team_member.deleted",
        "team_member",
        Some(id),
        None,
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}
