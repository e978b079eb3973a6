use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::media::MediaUrls;

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct TeamMember {
    pub id: Uuid,
    pub name: String,
    pub designation: String,
    pub role: String,
    pub bio: String,
    #[serde(skip)]
    pub image: Option<String>,
    pub email: Option<String>,
    pub linkedin_profile: Option<String>,
    #[serde(rename = "order")]
    pub display_order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Wire form of a team member: the stored image path becomes a URL.
#[derive(Debug, Serialize)]
pub struct TeamMemberView {
    #[serde(flatten)]
    pub member: TeamMember,
    pub image: Option<String>,
}

impl TeamMember {
    pub fn view(self, urls: &MediaUrls) -> TeamMemberView {
        let image = urls.optional(self.image.as_deref());
        TeamMemberView {
            member: self,
            image,
        }
    }
}
