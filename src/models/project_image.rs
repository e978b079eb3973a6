use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::media::MediaUrls;

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct ProjectImage {
    pub id: Uuid,
    #[serde(rename = "project")]
    pub project_id: Uuid,
    pub image: String,
    #[serde(rename = "order")]
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ProjectImageView {
    #[serde(flatten)]
    pub image: ProjectImage,
    pub image_url: Option<String>,
}

impl ProjectImage {
    pub fn view(self, urls: &MediaUrls) -> ProjectImageView {
        let image_url = urls.optional(Some(self.image.as_str()));
        ProjectImageView {
            image: self,
            image_url,
        }
    }
}
