use std::net::SocketAddr;

use axum::extract::{ConnectInfo, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::auth::Caller;
use crate::db;
use crate::db::contacts::{ContactDraft, ContactFilter};
use crate::error::AppError;
use crate::middleware::audit;
use crate::models::{Contact, ContactView, InquiryType};
use crate::rate_limit::client_ip;
use crate::routes::id::Id;
use crate::routes::input;
use crate::state::SharedState;
use crate::validation::FieldErrors;

#[derive(Deserialize)]
pub struct ListParams {
    pub inquiry_type: Option<String>,
    pub responded: Option<String>,
    pub search: Option<String>,
    pub ordering: Option<String>,
}

/// `responded` and `response_notes` are not writable through here.
#[derive(Debug, Default, Deserialize)]
pub struct ContactInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub inquiry_type: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MarkRespondedRequest {
    pub response_notes: Option<String>,
}

impl ContactInput {
    fn or_stored(self, stored: Contact) -> Self {
        Self {
            first_name: self.first_name.or(Some(stored.first_name)),
            last_name: self.last_name.or(Some(stored.last_name)),
            email: self.email.or(Some(stored.email)),
            phone_number: self.phone_number.or(Some(stored.phone_number)),
            inquiry_type: self
                .inquiry_type
                .or(Some(stored.inquiry_type.as_str().to_string())),
            message: self.message.or(Some(stored.message)),
        }
    }

    fn validate(self) -> Result<ContactDraft, FieldErrors> {
        let mut errors = FieldErrors::new();

        let first_name = input::text("first_name", self.first_name, Some(24), &mut errors);
        let last_name = input::text("last_name", self.last_name, Some(24), &mut errors);

        let email = input::text("email", self.email, Some(254), &mut errors);
        if !email.is_empty() {
            errors.email("email", &email);
        }

        let phone_number = input::blank_ok("phone_number", self.phone_number, Some(20), &mut errors);
        errors.phone("phone_number", &phone_number);

        let inquiry_type = input::choice(
            "inquiry_type",
            self.inquiry_type.as_deref(),
            Some(InquiryType::General),
            InquiryType::parse,
            &mut errors,
        );
        let message = input::text("message", self.message, None, &mut errors);

        errors.into_result()?;
        Ok(ContactDraft {
            first_name,
            last_name,
            email,
            phone_number,
            inquiry_type: inquiry_type.unwrap_or(InquiryType::General),
            message,
        })
    }
}

pub async fn list(
    caller: Caller,
    State(state): State<SharedState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<ContactView>>, AppError> {
    caller.require_staff()?;

    let mut errors = FieldErrors::new();
    let inquiry_type = match input::text_filter(params.inquiry_type) {
        Some(raw) => input::choice("inquiry_type", Some(&raw), None, InquiryType::parse, &mut errors),
        None => None,
    };
    let filter = ContactFilter {
        inquiry_type,
        responded: input::flag_filter("responded", params.responded.as_deref(), &mut errors),
        search: params.search,
        ordering: params.ordering,
    };
    errors.into_result()?;

    let contacts = db::contacts::list(&state.pool, &filter).await?;
    Ok(Json(contacts.into_iter().map(Contact::view).collect()))
}

async fn find(state: &SharedState, id: Uuid) -> Result<Contact, AppError> {
    db::contacts::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Contact not found".to_string()))
}

pub async fn get(
    caller: Caller,
    State(state): State<SharedState>,
    Id(id): Id,
) -> Result<Json<ContactView>, AppError> {
    caller.require_staff()?;
    Ok(Json(find(&state, id).await?.view()))
}

/// Open to anyone. Non-staff submissions count against the per-IP limit.
pub async fn create(
    caller: Caller,
    State(state): State<SharedState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(req): Json<ContactInput>,
) -> Result<(StatusCode, Json<ContactView>), AppError> {
    if !caller.is_staff() {
        let ip = client_ip(&headers, addr.ip(), &state.config.trusted_proxies);
        if let Err(retry_after) = state.contact_limiter.check(
            ip,
            state.config.contact_rate_limit,
            state.config.contact_rate_window,
        ) {
            tracing::warn!(%ip, retry_after, "Contact submission rate limited");
            return Err(AppError::RateLimited(format!(
                "Too many submissions. Try again in {retry_after} seconds."
            )));
        }
    }

    let draft = req.validate()?;
    let contact = db::contacts::create(&state.pool, &draft).await?;

    audit::log_event(
        &state.pool,
        &caller,
        "contact.created",
        "contact",
        Some(contact.id),
        Some(json!({ "inquiry_type": contact.inquiry_type.as_str() })),
    )
    .await;

    Ok((StatusCode::CREATED, Json(contact.view())))
}

pub async fn replace(
    caller: Caller,
    State(state): State<SharedState>,
    Id(id): Id,
    Json(req): Json<ContactInput>,
) -> Result<Json<ContactView>, AppError> {
    caller.require_staff()?;
    find(&state, id).await?;
    store(&state, &caller, id, req.validate()?).await
}

pub async fn update(
    caller: Caller,
    State(state): State<SharedState>,
    Id(id): Id,
    Json(req): Json<ContactInput>,
) -> Result<Json<ContactView>, AppError> {
    caller.require_staff()?;
    let stored = find(&state, id).await?;
    store(&state, &caller, id, req.or_stored(stored).validate()?).await
}

async fn store(
    state: &SharedState,
    caller: &Caller,
    id: Uuid,
    draft: ContactDraft,
) -> Result<Json<ContactView>, AppError> {
    let contact = db::contacts::update(&state.pool, id, &draft)
        .await?
        .ok_or_else(|| AppError::NotFound("Contact not found".to_string()))?;

    audit::log_event(
        &state.pool,
        caller,
        "contact.updated",
        "contact",
        Some(contact.id),
        None,
    )
    .await;

    Ok(Json(contact.view()))
}

pub async fn delete(
    caller: Caller,
    State(state): State<SharedState>,
    Id(id): Id,
) -> Result<StatusCode, AppError> {
    caller.require_staff()?;
    if !db::contacts::delete(&state.pool, id).await? {
        return Err(AppError::NotFound("Contact not found".to_string()));
    }

    audit::log_event(&state.pool, &caller, "contact.deleted", "contact", Some(id), None).await;

    Ok(StatusCode::NO_CONTENT)
}

/// Idempotent: repeating it only overwrites the notes.
pub async fn mark_responded(
    caller: Caller,
    State(state): State<SharedState>,
    Id(id): Id,
    body: Option<Json<MarkRespondedRequest>>,
) -> Result<Json<serde_json::Value>, AppError> {
    caller.require_staff()?;
    let req = body.map(|Json(req)| req).unwrap_or_default();

    let contact = db::contacts::mark_responded(&state.pool, id, req.response_notes.as_deref())
        .await?
        .ok_or_else(|| AppError::NotFound("Contact not found".to_string()))?;

    audit::log_event(
        &state.pool,
        &caller,
        "contact.responded",
        "contact",
        Some(contact.id),
        None,
    )
    .await;

    Ok(Json(json!({ "status": "contact marked as responded" })))
}
