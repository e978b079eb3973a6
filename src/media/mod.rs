//! Uploaded media: where files go and how their paths turn into URLs.

pub mod store;
pub mod upload;

use std::path::{Component, Path};

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::state::SharedState;

pub use store::{LocalMediaStore, MediaStore};
pub use upload::{UploadForm, UploadedFile, is_image_name};

/// Sub-directories uploads may be filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaFolder {
    Team,
    Testimonials,
    ProjectImages,
}

impl MediaFolder {
    pub fn as_str(self) -> &'static str {
        match self {
            MediaFolder::Team => "team",
            MediaFolder::Testimonials => "testimonials",
            MediaFolder::ProjectImages => "project_images",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "team" => Some(MediaFolder::Team),
            "testimonials" => Some(MediaFolder::Testimonials),
            "project_images" => Some(MediaFolder::ProjectImages),
            _ => None,
        }
    }
}

/// A relative path of plain segments filed under one of the [`MediaFolder`]s.
pub fn is_media_path(path: &str) -> bool {
    let mut components = Path::new(path).components();
    let in_folder = match components.next() {
        Some(Component::Normal(first)) => first.to_str().and_then(MediaFolder::parse).is_some(),
        _ => false,
    };
    let mut rest = 0;
    for component in components {
        if !matches!(component, Component::Normal(_)) {
            return false;
        }
        rest += 1;
    }
    in_folder && rest > 0
}

/// Builds public URLs for stored media paths.
///
/// Absolute: the request's own host when it named one, the configured base URL otherwise.
#[derive(Debug, Clone)]
pub struct MediaUrls {
    origin: Option<String>,
    prefix: String,
}

impl MediaUrls {
    pub fn new(origin: Option<String>, prefix: &str) -> Self {
        Self {
            origin: origin.map(|o| o.trim_end_matches('/').to_string()),
            prefix: prefix.trim_end_matches('/').to_string(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        match &self.origin {
            Some(origin) => format!("{origin}{}/{path}", self.prefix),
            None => format!("{}/{path}", self.prefix),
        }
    }

    pub fn optional(&self, path: Option<&str>) -> Option<String> {
        path.filter(|p| !p.is_empty()).map(|p| self.url(p))
    }
}

fn request_origin(parts: &Parts) -> Option<String> {
    let host = parts
        .headers
        .get("host")
        .and_then(|v| v.to_str().ok())
        .filter(|h| !h.is_empty())?;
    let scheme = parts
        .headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .filter(|p| matches!(*p, "http" | "https"))
        .unwrap_or("http");
    Some(format!("{scheme}://{host}"))
}

impl FromRequestParts<SharedState> for MediaUrls {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        let origin = request_origin(parts).unwrap_or_else(|| state.config.base_url.clone());
        Ok(MediaUrls::new(Some(origin), &state.config.media_url))
    }
}
