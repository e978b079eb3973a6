use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

/// Tag joined to one of the projects carrying it.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProjectTag {
    pub project_id: Uuid,
    #[sqlx(flatten)]
    pub tag: Tag,
}
