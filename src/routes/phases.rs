use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::Caller;
use crate::db;
use crate::db::project_phases::ProjectPhaseDraft;
use crate::error::AppError;
use crate::middleware::audit;
use crate::models::ProjectPhase;
use crate::routes::id::Id;
use crate::routes::input;
use crate::state::SharedState;
use crate::validation::FieldErrors;

const FOREIGN: &[(&str, &str)] = &[("project_phases_project_id_fkey", "project")];

#[derive(Deserialize)]
pub struct ListParams {
    pub project: Option<String>,
    pub complete: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PhaseInput {
    pub project: Option<Uuid>,
    pub name: Option<String>,
    pub duration: Option<String>,
    pub complete: Option<bool>,
    pub order: Option<i32>,
}

impl PhaseInput {
    fn or_stored(self, stored: ProjectPhase) -> Self {
        Self {
            project: self.project.or(Some(stored.project_id)),
            name: self.name.or(Some(stored.name)),
            duration: self.duration.or(Some(stored.duration)),
            complete: self.complete.or(Some(stored.complete)),
            order: self.order.or(Some(stored.display_order)),
        }
    }

    fn validate(self) -> Result<ProjectPhaseDraft, FieldErrors> {
        let mut errors = FieldErrors::new();

        let project_id = input::reference("project", self.project, &mut errors);
        let name = input::text("name", self.name, Some(255), &mut errors);
        let duration = input::text("duration", self.duration, Some(255), &mut errors);
        let display_order = input::order("order", self.order, &mut errors);

        errors.into_result()?;
        Ok(ProjectPhaseDraft {
            project_id,
            name,
            duration,
            complete: self.complete.unwrap_or(false),
            display_order,
        })
    }
}

pub async fn list(
    State(state): State<SharedState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<ProjectPhase>>, AppError> {
    let mut errors = FieldErrors::new();
    let project = input::id_filter("project", params.project.as_deref(), &mut errors);
    let complete = input::flag_filter("complete", params.complete.as_deref(), &mut errors);
    errors.into_result()?;

    Ok(Json(db::project_phases::list(&state.pool, project, complete).await?))
}

async fn find(state: &SharedState, id: Uuid) -> Result<ProjectPhase, AppError> {
    db::project_phases::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Project phase not found".to_string()))
}

pub async fn get(
    State(state): State<SharedState>,
    Id(id): Id,
) -> Result<Json<ProjectPhase>, AppError> {
    Ok(Json(find(&state, id).await?))
}

pub async fn create(
    caller: Caller,
    State(state): State<SharedState>,
    Json(req): Json<PhaseInput>,
) -> Result<(StatusCode, Json<ProjectPhase>), AppError> {
    caller.require_authenticated()?;
    let draft = req.validate()?;

    let phase = db::project_phases::create(&state.pool, &draft)
        .await
        .map_err(|e| AppError::from_write(e, "project phase", &[], FOREIGN))?;

    audit::log_event(
        &state.pool,
        &caller,
        "project_phase.created",
        "project_phase",
        Some(phase.id),
        None,
    )
    .await;

    Ok((StatusCode::CREATED, Json(phase)))
}

pub async fn replace(
    caller: Caller,
    State(state): State<SharedState>,
    Id(id): Id,
    Json(req): Json<PhaseInput>,
) -> Result<Json<ProjectPhase>, AppError> {
    caller.require_authenticated()?;
    find(&state, id).await?;
    store(&state, &caller, id, req.validate()?).await
}

pub async fn update(
    caller: Caller,
    State(state): State<SharedState>,
    Id(id): Id,
    Json(req): Json<PhaseInput>,
) -> Result<Json<ProjectPhase>, AppError> {
    caller.require_authenticated()?;
    let stored = find(&state, id).await?;
    store(&state, &caller, id, req.or_stored(stored).validate()?).await
}

async fn store(
    state: &SharedState,
    caller: &Caller,
    id: Uuid,
    draft: ProjectPhaseDraft,
) -> Result<Json<ProjectPhase>, AppError> {
    let phase = db::project_phases::update(&state.pool, id, &draft)
        .await
        .map_err(|e| AppError::from_write(e, "project phase", &[], FOREIGN))?
        .ok_or_else(|| AppError::NotFound("Project phase not found".to_string()))?;

    audit::log_event(
        &state.pool,
        caller,
        "project_phase.updated",
        "project_phase",
        Some(phase.id),
        None,
    )
    .await;

    Ok(Json(phase))
}

pub async fn delete(
    caller: Caller,
    State(state): State<SharedState>,
    Id(id): Id,
) -> Result<StatusCode, AppError> {
    caller.require_authenticated()?;
    if !db::project_phases::delete(&state.pool, id).await? {
        return Err(AppError::NotFound("Project phase not found".to_string()));
    }

    audit::log_event(
        &state.pool,
        &caller,
        "project_phase.deleted",
        "project_phase",
        Some(id),
        None,
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}
