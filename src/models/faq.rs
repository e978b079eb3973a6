use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// The two FAQ collections share one shape but live in separate tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaqKind {
    Contact,
    Membership,
}

impl FaqKind {
    pub fn table(self) -> &'static str {
        match self {
            FaqKind::Contact => "contact_faqs",
            FaqKind::Membership => "membership_faqs",
        }
    }

    pub fn resource_type(self) -> &'static str {
        match self {
            FaqKind::Contact => "contact_faq",
            FaqKind::Membership => "membership_faq",
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Faq {
    pub id: Uuid,
    pub question: String,
    pub answer: String,
    pub category: String,
    #[serde(rename = "order")]
    pub display_order: i32,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
