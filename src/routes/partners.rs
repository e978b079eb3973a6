use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::Caller;
use crate::db;
use crate::db::partners::{PartnerDraft, PartnerRow};
use crate::error::AppError;
use crate::middleware::audit;
use crate::models::PartnerView;
use crate::routes::id::Id;
use crate::routes::input;
use crate::state::SharedState;
use crate::validation::FieldErrors;

const FOREIGN: &[(&str, &str)] = &[("partner_projects_project_id_fkey", "project_ids")];

#[derive(Deserialize)]
pub struct ListParams {
    pub project: Option<String>,
    pub search: Option<String>,
    pub ordering: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PartnerInput {
    pub name: Option<String>,
    pub project_ids: Option<Vec<Uuid>>,
}

impl PartnerInput {
    fn or_stored(self, stored: PartnerRow) -> Self {
        Self {
            name: self.name.or(Some(stored.partner.name)),
            project_ids: self.project_ids.or(Some(stored.project_ids)),
        }
    }

    fn validate(self) -> Result<PartnerDraft, FieldErrors> {
        let mut errors = FieldErrors::new();
        let name = input::text("name", self.name, Some(255), &mut errors);

        let mut project_ids = self.project_ids.unwrap_or_default();
        project_ids.sort();
        project_ids.dedup();

        errors.into_result()?;
        Ok(PartnerDraft { name, project_ids })
    }
}

fn view(row: PartnerRow) -> PartnerView {
    PartnerView {
        partner: row.partner,
        projects: row.project_ids,
    }
}

pub async fn list(
    State(state): State<SharedState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<PartnerView>>, AppError> {
    let mut errors = FieldErrors::new();
    let project = input::id_filter("project", params.project.as_deref(), &mut errors);
    errors.into_result()?;

    let partners = db::partners::list(
        &state.pool,
        project,
        params.search.as_deref(),
        params.ordering.as_deref(),
    )
    .await?;
    Ok(Json(partners.into_iter().map(view).collect()))
}

async fn find(state: &SharedState, id: Uuid) -> Result<PartnerRow, AppError> {
    db::partners::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Partner not found".to_string()))
}

pub async fn get(
    State(state): State<SharedState>,
    Id(id): Id,
) -> Result<Json<PartnerView>, AppError> {
    Ok(Json(view(find(&state, id).await?)))
}

pub async fn create(
    caller: Caller,
    State(state): State<SharedState>,
    Json(req): Json<PartnerInput>,
) -> Result<(StatusCode, Json<PartnerView>), AppError> {
    caller.require_authenticated()?;
    let draft = req.validate()?;

    let row = db::partners::create(&state.pool, &draft)
        .await
        .map_err(|e| AppError::from_write(e, "partner", &[], FOREIGN))?;

    audit::log_event(
        &state.pool,
        &caller,
        "partner.created",
        "partner",
        Some(row.partner.id),
        None,
    )
    .await;

    Ok((StatusCode::CREATED, Json(view(row))))
}

pub async fn replace(
    caller: Caller,
    State(state): State<SharedState>,
    Id(id): Id,
    Json(req): Json<PartnerInput>,
) -> Result<Json<PartnerView>, AppError> {
    caller.require_authenticated()?;
    find(&state, id).await?;
    store(&state, &caller, id, req.validate()?).await
}

pub async fn update(
    caller: Caller,
    State(state): State<SharedState>,
    Id(id): Id,
    Json(req): Json<PartnerInput>,
) -> Result<Json<PartnerView>, AppError> {
    caller.require_authenticated()?;
    let stored = find(&state, id).await?;
    store(&state, &caller, id, req.or_stored(stored).validate()?).await
}

async fn store(
    state: &SharedState,
    caller: &Caller,
    id: Uuid,
    draft: PartnerDraft,
) -> Result<Json<PartnerView>, AppError> {
    let row = db::partners::update(&state.pool, id, &draft)
        .await
        .map_err(|e| AppError::from_write(e, "partner", &[], FOREIGN))?
        .ok_or_else(|| AppError::NotFound("Partner not found".to_string()))?;

    audit::log_event(
        &state.pool,
        caller,
        "partner.updated",
        "partner",
        Some(row.partner.id),
        None,
    )
    .await;

    Ok(Json(view(row)))
}

pub async fn delete(
    caller: Caller,
    State(state): State<SharedState>,
    Id(id): Id,
) -> Result<StatusCode, AppError> {
    caller.require_authenticated()?;
    if !db::partners::delete(&state.pool, id).await? {
        return Err(AppError::NotFound("Partner not found".to_string()));
    }

    audit::log_event(&state.pool, &caller, "partner.deleted", "partner", Some(id), None).await;

    Ok(StatusCode::NO_CONTENT)
}
