use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct ProjectOutcome {
    pub id: Uuid,
    #[serde(rename = "project")]
    pub project_id: Uuid,
    pub description: String,
    #[serde(rename = "order")]
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
}
