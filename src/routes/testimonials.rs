use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::Caller;
use crate::db;
use crate::db::testimonials::{TestimonialDraft, TestimonialFilter};
use crate::error::AppError;
use crate::media::MediaUrls;
use crate::middleware::audit;
use crate::models::{Rating, Testimonial, TestimonialView};
use crate::routes::id::Id;
use crate::routes::input;
use crate::state::SharedState;
use crate::validation::FieldErrors;

#[derive(Deserialize)]
pub struct ListParams {
    pub rating: Option<String>,
    pub is_featured: Option<String>,
    pub search: Option<String>,
    pub ordering: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TestimonialInput {
    pub name: Option<String>,
    pub designation: Option<String>,
    pub company: Option<String>,
    pub message: Option<String>,
    pub image: Option<String>,
    pub is_featured: Option<bool>,
    pub rating: Option<i32>,
}

impl TestimonialInput {
    fn or_stored(self, stored: Testimonial) -> Self {
        Self {
            name: self.name.or(Some(stored.name)),
            designation: self.designation.or(Some(stored.designation)),
            company: self.company.or(Some(stored.company)),
            message: self.message.or(Some(stored.message)),
            image: self.image.or(stored.image),
            is_featured: self.is_featured.or(Some(stored.is_featured)),
            rating: self.rating.or(Some(stored.rating.stars())),
        }
    }

    fn validate(self) -> Result<TestimonialDraft, FieldErrors> {
        let mut errors = FieldErrors::new();

        let name = input::text("name", self.name, Some(100), &mut errors);
        let designation = input::blank_ok("designation", self.designation, Some(100), &mut errors);
        let company = input::blank_ok("company", self.company, Some(100), &mut errors);
        let message = input::text("message", self.message, None, &mut errors);
        let image = input::image_path("image", self.image, &mut errors);

        let rating = match self.rating {
            Some(stars) => Rating::try_from(stars)
                .map_err(|msg| errors.add("rating", msg))
                .ok(),
            None => Some(Rating::Five),
        };

        errors.into_result()?;
        Ok(TestimonialDraft {
            name,
            designation,
            company,
            message,
            image,
            is_featured: self.is_featured.unwrap_or(false),
            rating: rating.unwrap_or(Rating::Five),
        })
    }
}

pub async fn list(
    caller: Caller,
    State(state): State<SharedState>,
    urls: MediaUrls,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<TestimonialView>>, AppError> {
    let mut errors = FieldErrors::new();
    let rating = match input::text_filter(params.rating) {
        Some(raw) => input::choice(
            "rating",
            Some(&raw),
            None,
            |r| r.parse::<i32>().ok().and_then(|n| Rating::try_from(n).ok()),
            &mut errors,
        ),
        None => None,
    };
    let filter = TestimonialFilter {
        rating,
        is_featured: input::flag_filter("is_featured", params.is_featured.as_deref(), &mut errors),
        search: params.search,
        ordering: params.ordering,
    };
    errors.into_result()?;

    let testimonials = db::testimonials::list(&state.pool, caller.visibility(), &filter).await?;
    Ok(Json(testimonials.into_iter().map(|t| t.view(&urls)).collect()))
}

/// Non-featured testimonials are hidden from non-staff callers.
async fn visible(state: &SharedState, caller: &Caller, id: Uuid) -> Result<Testimonial, AppError> {
    db::testimonials::find_by_id(&state.pool, id, caller.visibility())
        .await?
        .ok_or_else(|| AppError::NotFound("Testimonial not found".to_string()))
}

pub async fn get(
    caller: Caller,
    State(state): State<SharedState>,
    urls: MediaUrls,
    Id(id): Id,
) -> Result<Json<TestimonialView>, AppError> {
    Ok(Json(visible(&state, &caller, id).await?.view(&urls)))
}

pub async fn create(
    caller: Caller,
    State(state): State<SharedState>,
    urls: MediaUrls,
    Json(req): Json<TestimonialInput>,
) -> Result<(StatusCode, Json<TestimonialView>), AppError> {
    caller.require_authenticated()?;
    let draft = req.validate()?;

    let testimonial = db::testimonials::create(&state.pool, &draft).await?;

    audit::log_event(
        &state.pool,
        &caller,
        "testimonial.created",
        "testimonial",
        Some(testimonial.id),
        None,
    )
    .await;

    Ok((StatusCode::CREATED, Json(testimonial.view(&urls))))
}

pub async fn replace(
    caller: Caller,
    State(state): State<SharedState>,
    urls: MediaUrls,
    Id(id): Id,
    Json(req): Json<TestimonialInput>,
) -> Result<Json<TestimonialView>, AppError> {
    caller.require_authenticated()?;
    visible(&state, &caller, id).await?;
    store(&state, &caller, &urls, id, req.validate()?).await
}

pub async fn update(
    caller: Caller,
    State(state): State<SharedState>,
    urls: MediaUrls,
    Id(id): Id,
    Json(req): Json<TestimonialInput>,
) -> Result<Json<TestimonialView>, AppError> {
    caller.require_authenticated()?;
    let stored = visible(&state, &caller, id).await?;
    store(&state, &caller, &urls, id, req.or_stored(stored).validate()?).await
}

async fn store(
    state: &SharedState,
    caller: &Caller,
    urls: &MediaUrls,
    id: Uuid,
    draft: TestimonialDraft,
) -> Result<Json<TestimonialView>, AppError> {
    let testimonial = db::testimonials::update(&state.pool, id, &draft)
        .await?
        .ok_or_else(|| AppError::NotFound("Testimonial not found".to_string()))?;

    audit::log_event(
        &state.pool,
        caller,
        "testimonial.updated",
        "testimonial",
        Some(testimonial.id),
        None,
    )
    .await;

    Ok(Json(testimonial.view(urls)))
}

pub async fn delete(
    caller: Caller,
    State(state): State<SharedState>,
    Id(id): Id,
) -> Result<StatusCode, AppError> {
    caller.require_authenticated()?;
    visible(&state, &caller, id).await?;
    if !db::testimonials::delete(&state.pool, id).await? {
        return Err(AppError::NotFound("Testimonial not found".to_string()));
    }

    audit::log_event(
        &state.pool,
        &caller,
        "testimonial.deleted",
        "testimonial",
        Some(id),
        None,
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}
