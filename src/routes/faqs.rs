//! Handlers shared by `/contact-faqs` and `/membership-faqs`. The collection
//! is picked by the [`FaqKind`] extension installed on each router.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::Caller;
use crate::db;
use crate::db::faqs::{FaqDraft, FaqFilter};
use crate::error::AppError;
use crate::middleware::audit;
use crate::models::{Faq, FaqKind};
use crate::routes::id::Id;
use crate::routes::input;
use crate::state::SharedState;
use crate::validation::FieldErrors;

#[derive(Deserialize)]
pub struct ListParams {
    pub category: Option<String>,
    pub is_published: Option<String>,
    pub search: Option<String>,
    pub ordering: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FaqInput {
    pub question: Option<String>,
    pub answer: Option<String>,
    pub category: Option<String>,
    pub order: Option<i32>,
    pub is_published: Option<bool>,
}

impl FaqInput {
    fn or_stored(self, stored: Faq) -> Self {
        Self {
            question: self.question.or(Some(stored.question)),
            answer: self.answer.or(Some(stored.answer)),
            category: self.category.or(Some(stored.category)),
            order: self.order.or(Some(stored.display_order)),
            is_published: self.is_published.or(Some(stored.is_published)),
        }
    }

    fn validate(self) -> Result<FaqDraft, FieldErrors> {
        let mut errors = FieldErrors::new();

        let question = input::text("question", self.question, Some(255), &mut errors);
        let answer = input::text("answer", self.answer, None, &mut errors);
        let category = input::blank_ok("category", self.category, Some(50), &mut errors);
        let display_order = input::order("order", self.order, &mut errors);

        errors.into_result()?;
        Ok(FaqDraft {
            question,
            answer,
            category,
            display_order,
            is_published: self.is_published.unwrap_or(true),
        })
    }
}

pub async fn list(
    caller: Caller,
    State(state): State<SharedState>,
    Extension(kind): Extension<FaqKind>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Faq>>, AppError> {
    let mut errors = FieldErrors::new();
    let filter = FaqFilter {
        category: input::text_filter(params.category),
        is_published: input::flag_filter("is_published", params.is_published.as_deref(), &mut errors),
        search: params.search,
        ordering: params.ordering,
    };
    errors.into_result()?;

    let faqs = db::faqs::list(&state.pool, kind, caller.visibility(), &filter).await?;
    Ok(Json(faqs))
}

/// Unpublished entries are hidden from non-staff callers.
async fn visible(
    state: &SharedState,
    caller: &Caller,
    kind: FaqKind,
    id: Uuid,
) -> Result<Faq, AppError> {
    db::faqs::find_by_id(&state.pool, kind, id, caller.visibility())
        .await?
        .ok_or_else(|| AppError::NotFound("FAQ not found".to_string()))
}

pub async fn get(
    caller: Caller,
    State(state): State<SharedState>,
    Extension(kind): Extension<FaqKind>,
    Id(id): Id,
) -> Result<Json<Faq>, AppError> {
    Ok(Json(visible(&state, &caller, kind, id).await?))
}

pub async fn create(
    caller: Caller,
    State(state): State<SharedState>,
    Extension(kind): Extension<FaqKind>,
    Json(req): Json<FaqInput>,
) -> Result<(StatusCode, Json<Faq>), AppError> {
    caller.require_authenticated()?;
    let draft = req.validate()?;

    let faq = db::faqs::create(&state.pool, kind, &draft).await?;

    audit::log_event(
        &state.pool,
        &caller,
        &format!("{}.created", kind.resource_type()),
        kind.resource_type(),
        Some(faq.id),
        None,
    )
    .await;

    Ok((StatusCode::CREATED, Json(faq)))
}

pub async fn replace(
    caller: Caller,
    State(state): State<SharedState>,
    Extension(kind): Extension<FaqKind>,
    Id(id): Id,
    Json(req): Json<FaqInput>,
) -> Result<Json<Faq>, AppError> {
    caller.require_authenticated()?;
    visible(&state, &caller, kind, id).await?;
    store(&state, &caller, kind, id, req.validate()?).await
}

pub async fn update(
    caller: Caller,
    State(state): State<SharedState>,
    Extension(kind): Extension<FaqKind>,
    Id(id): Id,
    Json(req): Json<FaqInput>,
) -> Result<Json<Faq>, AppError> {
    caller.require_authenticated()?;
    let stored = visible(&state, &caller, kind, id).await?;
    store(&state, &caller, kind, id, req.or_stored(stored).validate()?).await
}

async fn store(
    state: &SharedState,
    caller: &Caller,
    kind: FaqKind,
    id: Uuid,
    draft: FaqDraft,
) -> Result<Json<Faq>, AppError> {
    let faq = db::faqs::update(&state.pool, kind, id, &draft)
        .await?
        .ok_or_else(|| AppError::NotFound("FAQ not found".to_string()))?;

    audit::log_event(
        &state.pool,
        caller,
        &format!("{}.updated", kind.resource_type()),
        kind.resource_type(),
        Some(faq.id),
        None,
    )
    .await;

    Ok(Json(faq))
}

pub async fn delete(
    caller: Caller,
    State(state): State<SharedState>,
    Extension(kind): Extension<FaqKind>,
    Id(id): Id,
) -> Result<StatusCode, AppError> {
    caller.require_authenticated()?;
    visible(&state, &caller, kind, id).await?;
    if !db::faqs::delete(&state.pool, kind, id).await? {
        return Err(AppError::NotFound("FAQ not found".to_string()));
    }

    audit::log_event(
        &state.pool,
        &caller,
        &format!("{}.deleted", kind.resource_type()),
        kind.resource_type(),
        Some(id),
        None,
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}
