use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

use crate::models::ProjectOutcome;

#[derive(Debug, Clone)]
pub struct ProjectOutcomeDraft {
    pub project_id: Uuid,
    pub description: String,
    pub display_order: i32,
}

pub async fn list(pool: &PgPool, project: Option<Uuid>) -> Result<Vec<ProjectOutcome>, sqlx::Error> {
    let mut query = QueryBuilder::new("SELECT * FROM project_outcomes WHERE 1=1");
    if let Some(project) = project {
        query.push(" AND project_id = ");
        query.push_bind(project);
    }
    query.push(" ORDER BY display_order ASC, created_at ASC, id ASC");

    query.build_query_as::<ProjectOutcome>().fetch_all(pool).await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<ProjectOutcome>, sqlx::Error> {
    sqlx::query_as::<_, ProjectOutcome>("SELECT * FROM project_outcomes WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn create(pool: &PgPool, draft: &ProjectOutcomeDraft) -> Result<ProjectOutcome, sqlx::Error> {
    sqlx::query_as::<_, ProjectOutcome>(
        "INSERT INTO project_outcomes (id, project_id, description, display_order)
         VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(Uuid::now_v7())
    .bind(draft.project_id)
    .bind(&draft.description)
    .bind(draft.display_order)
    .fetch_one(pool)
    .await
}

pub async fn update(
    pool: &PgPool,
    id: Uuid,
    draft: &ProjectOutcomeDraft,
) -> Result<Option<ProjectOutcome>, sqlx::Error> {
    sqlx::query_as::<_, ProjectOutcome>(
        "UPDATE project_outcomes SET project_id = $2, description = $3, display_order = $4
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(draft.project_id)
    .bind(&draft.description)
    .bind(draft.display_order)
    .fetch_optional(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM project_outcomes WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
