use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

use crate::models::ProjectImage;

#[derive(Debug, Clone)]
pub struct ProjectImageDraft {
    pub project_id: Uuid,
    pub image: String,
    pub display_order: i32,
}

pub async fn list(pool: &PgPool, project: Option<Uuid>) -> Result<Vec<ProjectImage>, sqlx::Error> {
    let mut query = QueryBuilder::new("SELECT * FROM project_images WHERE 1=1");
    if let Some(project) = project {
        query.push(" AND project_id = ");
        query.push_bind(project);
    }
    query.push(" ORDER BY display_order ASC, created_at ASC, id ASC");

    query.build_query_as::<ProjectImage>().fetch_all(pool).await
}

/// Whether any image column in the site still points at `path`.
pub async fn path_in_use(pool: &PgPool, path: &str) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT EXISTS (
             SELECT 1 FROM project_images WHERE image = $1
             UNION ALL SELECT 1 FROM team_members WHERE image = $1
             UNION ALL SELECT 1 FROM testimonials WHERE image = $1
         )",
    )
    .bind(path)
    .fetch_one(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<ProjectImage>, sqlx::Error> {
    sqlx::query_as::<_, ProjectImage>("SELECT * FROM project_images WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn create(pool: &PgPool, draft: &ProjectImageDraft) -> Result<ProjectImage, sqlx::Error> {
    sqlx::query_as::<_, ProjectImage>(
        "INSERT INTO project_images (id, project_id, image, display_order)
         VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(Uuid::now_v7())
    .bind(draft.project_id)
    .bind(&draft.image)
    .bind(draft.display_order)
    .fetch_one(pool)
    .await
}

pub async fn update(
    pool: &PgPool,
    id: Uuid,
    draft: &ProjectImageDraft,
) -> Result<Option<ProjectImage>, sqlx::Error> {
    sqlx::query_as::<_, ProjectImage>(
        "UPDATE project_images SET project_id = $2, image = $3, display_order = $4
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(draft.project_id)
    .bind(&draft.image)
    .bind(draft.display_order)
    .fetch_optional(pool)
    .await
}

/// Returns the deleted row so its file can be cleaned up.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<Option<ProjectImage>, sqlx::Error> {
    sqlx::query_as::<_, ProjectImage>("DELETE FROM project_images WHERE id = $1 RETURNING *")
        .bind(id)
        .fetch_optional(pool)
        .await
}
