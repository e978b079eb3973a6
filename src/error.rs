use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::validation::FieldErrors;

#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    Unauthorized(String),
    Forbidden(String),
    BadRequest(String),
    Validation(FieldErrors),
    Conflict(String),
    RateLimited(String),
    Internal(String),
    Database(sqlx::Error),
}

impl AppError {
    pub fn not_authenticated() -> Self {
        AppError::Unauthorized("Authentication credentials were not provided.".to_string())
    }

    pub fn staff_required() -> Self {
        AppError::Forbidden("You do not have permission to perform this action.".to_string())
    }

    /// Translate a failed write into a field error where the database names the culprit.
    ///
    /// `unique` maps unique constraint names to the JSON field they guard; `foreign`
    /// does the same for foreign keys.
    pub fn from_write(
        err: sqlx::Error,
        entity: &str,
        unique: &[(&str, &str)],
        foreign: &[(&str, &str)],
    ) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            let constraint = db_err.constraint().unwrap_or_default();
            if db_err.is_unique_violation() {
                if let Some((_, field)) = unique.iter().find(|(name, _)| *name == constraint) {
                    return AppError::Validation(FieldErrors::single(
                        field,
                        format!("{entity} with this {field} already exists."),
                    ));
                }
                return AppError::Conflict(format!("{entity} already exists"));
            }
            if db_err.is_foreign_key_violation() {
                if let Some((_, field)) = foreign.iter().find(|(name, _)| *name == constraint) {
                    return AppError::Validation(FieldErrors::single(
                        field,
                        "Invalid pk - object does not exist.",
                    ));
                }
                return AppError::BadRequest("Referenced object does not exist".to_string());
            }
        }
        if let sqlx::Error::RowNotFound = err {
            return AppError::NotFound(format!("{entity} not found"));
        }
        AppError::Database(err)
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not Found: {msg}"),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {msg}"),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {msg}"),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {msg}"),
            AppError::Validation(errors) => write!(f, "Validation failed: {errors:?}"),
            AppError::Conflict(msg) => write!(f, "Conflict: {msg}"),
            AppError::RateLimited(msg) => write!(f, "Rate Limited: {msg}"),
            AppError::Internal(msg) => write!(f, "Internal Error: {msg}"),
            AppError::Database(err) => write!(f, "Database Error: {err}"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Validation(errors) => {
                let body = json!({ "error": "Validation failed", "fields": errors });
                return (StatusCode::BAD_REQUEST, axum::Json(body)).into_response();
            }
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::RateLimited(msg) => (StatusCode::TOO_MANY_REQUESTS, msg),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::Database(err) => {
                tracing::error!("Database error: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(err)
    }
}

impl From<FieldErrors> for AppError {
    fn from(errors: FieldErrors) -> Self {
        AppError::Validation(errors)
    }
}
