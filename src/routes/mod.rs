pub mod admin;
pub mod auth;
pub mod contacts;
pub mod faqs;
pub mod images;
pub mod id;
pub mod input;
pub mod media;
pub mod outcomes;
pub mod partners;
pub mod phases;
pub mod projects;
pub mod tags;
pub mod team_members;
pub mod testimonials;

use axum::routing::{get, post, put};
use axum::{Extension, Router};

use crate::models::FaqKind;
use crate::state::SharedState;

pub fn api_routes() -> Router<SharedState> {
    Router::new()
        // Auth
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/refresh", post(auth::refresh))
        .route("/api/v1/auth/logout", post(auth::logout))
        .route("/api/v1/auth/change-password", post(auth::change_password))
        .route("/api/v1/auth/me", get(auth::me))
        // Team
        .route(
            "/api/v1/team-members",
            get(team_members::list).post(team_members::create),
        )
        .route(
            "/api/v1/team-members/{id}",
            get(team_members::get)
                .put(team_members::replace)
                .patch(team_members::update)
                .delete(team_members::delete),
        )
        // Contact
        .route("/api/v1/contact", get(contacts::list).post(contacts::create))
        .route(
            "/api/v1/contact/{id}",
            get(contacts::get)
                .put(contacts::replace)
                .patch(contacts::update)
                .delete(contacts::delete),
        )
        .route(
            "/api/v1/contact/{id}/mark_responded",
            post(contacts::mark_responded),
        )
        // Testimonials
        .route(
            "/api/v1/testimonials",
            get(testimonials::list).post(testimonials::create),
        )
        .route(
            "/api/v1/testimonials/{id}",
            get(testimonials::get)
                .put(testimonials::replace)
                .patch(testimonials::update)
                .delete(testimonials::delete),
        )
        // FAQs
        .nest("/api/v1/contact-faqs", faq_routes(FaqKind::Contact))
        .nest("/api/v1/membership-faqs", faq_routes(FaqKind::Membership))
        // Projects
        .route("/api/v1/projects", get(projects::list).post(projects::create))
        .route("/api/v1/projects/categories", get(projects::categories))
        .route("/api/v1/projects/years", get(projects::years))
        .route("/api/v1/projects/tags", get(projects::tags))
        .route(
            "/api/v1/projects/{slug}",
            get(projects::get)
                .put(projects::replace)
                .patch(projects::update)
                .delete(projects::delete),
        )
        .route("/api/v1/projects/{slug}/related", get(projects::related))
        // Tags
        .route("/api/v1/tags", get(tags::list).post(tags::create))
        .route(
            "/api/v1/tags/{slug}",
            get(tags::get)
                .put(tags::replace)
                .patch(tags::update)
                .delete(tags::delete),
        )
        // Partners
        .route("/api/v1/partners", get(partners::list).post(partners::create))
        .route(
            "/api/v1/partners/{id}",
            get(partners::get)
                .put(partners::replace)
                .patch(partners::update)
                .delete(partners::delete),
        )
        // Project images, phases, outcomes
        .route("/api/v1/images", get(images::list).post(images::create))
        .route(
            "/api/v1/images/{id}",
            get(images::get)
                .put(images::replace)
                .patch(images::update)
                .delete(images::delete),
        )
        .route("/api/v1/phases", get(phases::list).post(phases::create))
        .route(
            "/api/v1/phases/{id}",
            get(phases::get)
                .put(phases::replace)
                .patch(phases::update)
                .delete(phases::delete),
        )
        .route("/api/v1/outcomes", get(outcomes::list).post(outcomes::create))
        .route(
            "/api/v1/outcomes/{id}",
            get(outcomes::get)
                .put(outcomes::replace)
                .patch(outcomes::update)
                .delete(outcomes::delete),
        )
        // Media
        .route("/api/v1/media", post(media::upload))
        // Admin
        .route(
            "/api/v1/admin/users",
            get(admin::list_users).post(admin::create_user),
        )
        .route(
            "/api/v1/admin/users/{id}",
            axum::routing::delete(admin::delete_user),
        )
        .route("/api/v1/admin/users/{id}/staff", put(admin::set_staff))
        .route("/api/v1/admin/audit", get(admin::audit_log))
}

/// Both FAQ collections share handlers; the extension decides which table they hit.
fn faq_routes(kind: FaqKind) -> Router<SharedState> {
    Router::new()
        .route("/", get(faqs::list).post(faqs::create))
        .route(
            "/{id}",
            get(faqs::get)
                .put(faqs::replace)
                .patch(faqs::update)
                .delete(faqs::delete),
        )
        .layer(Extension(kind))
}
