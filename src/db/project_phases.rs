use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

use crate::models::ProjectPhase;

#[derive(Debug, Clone)]
pub struct ProjectPhaseDraft {
    pub project_id: Uuid,
    pub name: String,
    pub duration: String,
    pub complete: bool,
    pub display_order: i32,
}

pub async fn list(
    pool: &PgPool,
    project: Option<Uuid>,
    complete: Option<bool>,
) -> Result<Vec<ProjectPhase>, sqlx::Error> {
    let mut query = QueryBuilder::new("SELECT * FROM project_phases WHERE 1=1");
    if let Some(project) = project {
        query.push(" AND project_id = ");
        query.push_bind(project);
    }
    if let Some(complete) = complete {
        query.push(" AND complete = ");
        query.push_bind(complete);
    }
    query.push(" ORDER BY display_order ASC, created_at ASC, id ASC");

    query.build_query_as::<ProjectPhase>().fetch_all(pool).await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<ProjectPhase>, sqlx::Error> {
    sqlx::query_as::<_, ProjectPhase>("SELECT * FROM project_phases WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn create(pool: &PgPool, draft: &ProjectPhaseDraft) -> Result<ProjectPhase, sqlx::Error> {
    sqlx::query_as::<_, ProjectPhase>(
        "INSERT INTO project_phases (id, project_id, name, duration, complete, display_order)
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
    )
    .bind(Uuid::now_v7())
    .bind(draft.project_id)
    .bind(&draft.name)
    .bind(&draft.duration)
    .bind(draft.complete)
    .bind(draft.display_order)
    .fetch_one(pool)
    .await
}

pub async fn update(
    pool: &PgPool,
    id: Uuid,
    draft: &ProjectPhaseDraft,
) -> Result<Option<ProjectPhase>, sqlx::Error> {
    sqlx::query_as::<_, ProjectPhase>(
        "UPDATE project_phases SET project_id = $2, name = $3, duration = $4, complete = $5,
            display_order = $6
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(draft.project_id)
    .bind(&draft.name)
    .bind(&draft.duration)
    .bind(draft.complete)
    .bind(draft.display_order)
    .fetch_optional(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM project_phases WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
