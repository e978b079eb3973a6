use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct ProjectPhase {
    pub id: Uuid,
    #[serde(rename = "project")]
    pub project_id: Uuid,
    pub name: String,
    pub duration: String,
    pub complete: bool,
    #[serde(rename = "order")]
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
}
