use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::auth::{password, Caller};
use crate::db;
use crate::error::AppError;
use crate::middleware::audit;
use crate::models::{AuditEvent, User};
use crate::routes::id::Id;
use crate::state::SharedState;
use crate::validation::FieldErrors;

#[derive(Deserialize)]
pub struct CreateUser {
    pub email: String,
    pub password: String,
    pub name: String,
    #[serde(default)]
    pub is_staff: bool,
}

#[derive(Deserialize)]
pub struct SetStaff {
    pub is_staff: bool,
}

#[derive(Deserialize)]
pub struct AuditParams {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

#[derive(Serialize)]
pub struct AuditPage {
    pub events: Vec<AuditEvent>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
}

pub async fn list_users(
    caller: Caller,
    State(state): State<SharedState>,
) -> Result<Json<Vec<User>>, AppError> {
    caller.require_staff()?;
    Ok(Json(db::users::list_all(&state.pool).await?))
}

pub async fn create_user(
    caller: Caller,
    State(state): State<SharedState>,
    Json(req): Json<CreateUser>,
) -> Result<(StatusCode, Json<User>), AppError> {
    caller.require_staff()?;

    let mut errors = FieldErrors::new();
    errors.required("name", &req.name);
    errors.max_len("name", &req.name, 255);
    errors.email("email", req.email.trim());
    password::check_strength("password", &req.password, &mut errors);
    errors.into_result()?;

    let pw_hash = password::hash(&req.password).map_err(AppError::Internal)?;

    let user = db::users::create(
        &state.pool,
        req.email.trim(),
        &pw_hash,
        req.name.trim(),
        req.is_staff,
    )
    .await
    .map_err(|e| AppError::from_write(e, "user", &[("users_email_key", "email")], &[]))?;

    audit::log_event(
        &state.pool,
        &caller,
        "user.created",
        "user",
        Some(user.id),
        Some(json!({ "is_staff": user.is_staff })),
    )
    .await;

    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn set_staff(
    caller: Caller,
    State(state): State<SharedState>,
    Id(id): Id,
    Json(req): Json<SetStaff>,
) -> Result<Json<User>, AppError> {
    let admin = caller.require_staff()?;
    if admin.user_id == id && !req.is_staff {
        return Err(AppError::BadRequest(
            "You cannot revoke your own staff access".to_string(),
        ));
    }

    let user = db::users::set_staff(&state.pool, id, req.is_staff)
        .await
        .map_err(|e| AppError::from_write(e, "user", &[], &[]))?;

    audit::log_event(
        &state.pool,
        &caller,
        "user.staff_changed",
        "user",
        Some(user.id),
        Some(json!({ "is_staff": user.is_staff })),
    )
    .await;

    Ok(Json(user))
}

pub async fn delete_user(
    caller: Caller,
    State(state): State<SharedState>,
    Id(id): Id,
) -> Result<StatusCode, AppError> {
    let admin = caller.require_staff()?;
    if admin.user_id == id {
        return Err(AppError::BadRequest(
            "You cannot delete your own account".to_string(),
        ));
    }

    if !db::users::delete(&state.pool, id).await? {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    audit::log_event(&state.pool, &caller, "user.deleted", "user", Some(id), None).await;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn audit_log(
    caller: Caller,
    State(state): State<SharedState>,
    Query(params): Query<AuditParams>,
) -> Result<Json<AuditPage>, AppError> {
    caller.require_staff()?;

    let page = params.page.unwrap_or(1).max(1);
    let per_page = params.per_page.unwrap_or(50).clamp(1, 200);
    let offset = (page - 1) * per_page;

    let events = db::audit::list(&state.pool, per_page, offset).await?;
    let total = db::audit::count(&state.pool).await?;

    Ok(Json(AuditPage {
        events,
        total,
        page,
        per_page,
    }))
}
