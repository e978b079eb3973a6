use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::Caller;
use crate::db;
use crate::db::project_outcomes::ProjectOutcomeDraft;
use crate::error::AppError;
use crate::middleware::audit;
use crate::models::ProjectOutcome;
use crate::routes::id::Id;
use crate::routes::input;
use crate::state::SharedState;
use crate::validation::FieldErrors;

const FOREIGN: &[(&str, &str)] = &[("project_outcomes_project_id_fkey", "project")];

#[derive(Deserialize)]
pub struct ListParams {
    pub project: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct OutcomeInput {
    pub project: Option<Uuid>,
    pub description: Option<String>,
    pub order: Option<i32>,
}

impl OutcomeInput {
    fn or_stored(self, stored: ProjectOutcome) -> Self {
        Self {
            project: self.project.or(Some(stored.project_id)),
            description: self.description.or(Some(stored.description)),
            order: self.order.or(Some(stored.display_order)),
        }
    }

    fn validate(self) -> Result<ProjectOutcomeDraft, FieldErrors> {
        let mut errors = FieldErrors::new();

        let project_id = input::reference("project", self.project, &mut errors);
        let description = input::text("description", self.description, None, &mut errors);
        let display_order = input::order("order", self.order, &mut errors);

        errors.into_result()?;
        Ok(ProjectOutcomeDraft {
            project_id,
            description,
            display_order,
        })
    }
}

pub async fn list(
    State(state): State<SharedState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<ProjectOutcome>>, AppError> {
    let mut errors = FieldErrors::new();
    let project = input::id_filter("project", params.project.as_deref(), &mut errors);
    errors.into_result()?;

    Ok(Json(db::project_outcomes::list(&state.pool, project).await?))
}

async fn find(state: &SharedState, id: Uuid) -> Result<ProjectOutcome, AppError> {
    db::project_outcomes::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Project outcome not found".to_string()))
}

pub async fn get(
    State(state): State<SharedState>,
    Id(id): Id,
) -> Result<Json<ProjectOutcome>, AppError> {
    Ok(Json(find(&state, id).await?))
}

pub async fn create(
    caller: Caller,
    State(state): State<SharedState>,
    Json(req): Json<OutcomeInput>,
) -> Result<(StatusCode, Json<ProjectOutcome>), AppError> {
    caller.require_authenticated()?;
    let draft = req.validate()?;

    let outcome = db::project_outcomes::create(&state.pool, &draft)
        .await
        .map_err(|e| AppError::from_write(e, "project outcome", &[], FOREIGN))?;

    audit::log_event(
        &state.pool,
        &caller,
        "project_outcome.created",
        "project_outcome",
        Some(outcome.id),
        None,
    )
    .await;

    Ok((StatusCode::CREATED, Json(outcome)))
}

pub async fn replace(
    caller: Caller,
    State(state): State<SharedState>,
    Id(id): Id,
    Json(req): Json<OutcomeInput>,
) -> Result<Json<ProjectOutcome>, AppError> {
    caller.require_authenticated()?;
    find(&state, id).await?;
    store(&state, &caller, id, req.validate()?).await
}

pub async fn update(
    caller: Caller,
    State(state): State<SharedState>,
    Id(id): Id,
    Json(req): Json<OutcomeInput>,
) -> Result<Json<ProjectOutcome>, AppError> {
    caller.require_authenticated()?;
    let stored = find(&state, id).await?;
    store(&state, &caller, id, req.or_stored(stored).validate()?).await
}

async fn store(
    state: &SharedState,
    caller: &Caller,
    id: Uuid,
    draft: ProjectOutcomeDraft,
) -> Result<Json<ProjectOutcome>, AppError> {
    let outcome = db::project_outcomes::update(&state.pool, id, &draft)
        .await
        .map_err(|e| AppError::from_write(e, "project outcome", &[], FOREIGN))?
        .ok_or_else(|| AppError::NotFound("Project outcome not found".to_string()))?;

    audit::log_event(
        &state.pool,
        caller,
        "project_outcome.updated",
        "project_outcome",
        Some(outcome.id),
        None,
    )
    .await;

    Ok(Json(outcome))
}

pub async fn delete(
    caller: Caller,
    State(state): State<SharedState>,
    Id(id): Id,
) -> Result<StatusCode, AppError> {
    caller.require_authenticated()?;
    if !db::project_outcomes::delete(&state.pool, id).await? {
        return Err(AppError::NotFound("Project outcome not found".to_string()));
    }

    audit::log_event(
        &state.pool,
        &caller,
        "project_outcome.deleted",
        "project_outcome",
        Some(id),
        None,
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}
