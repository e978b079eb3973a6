use sqlx::{PgConnection, PgPool, QueryBuilder};
use uuid::Uuid;

use crate::db::listing;
use crate::models::{Project, ProjectCategory, ProjectImage, ProjectTag, TaggedProject};

const SEARCH_COLUMNS: &[&str] = &["title", "description", "location"];
const ORDERING: &[(&str, &str)] = &[
    ("created_at", "created_at"),
    ("title", "title"),
    ("year", "year"),
];
const DEFAULT_ORDER: &str = "created_at DESC";

#[derive(Debug, Clone)]
pub struct ProjectDraft {
    pub title: String,
    pub slug: String,
    pub category: ProjectCategory,
    pub year: String,
    pub description: String,
    pub full_description: String,
    pub location: String,
    pub beneficiaries: String,
    pub duration: String,
    pub tag_ids: Vec<Uuid>,
}

#[derive(Debug, Default)]
pub struct ProjectFilter {
    pub category: Option<ProjectCategory>,
    pub year: Option<String>,
    pub tag: Option<Uuid>,
    pub search: Option<String>,
    pub ordering: Option<String>,
}

pub async fn list(pool: &PgPool, filter: &ProjectFilter) -> Result<Vec<Project>, sqlx::Error> {
    let mut query = QueryBuilder::new("SELECT * FROM projects WHERE 1=1");

    if let Some(category) = filter.category {
        query.push(" AND category = ");
        query.push_bind(category);
    }
    if let Some(year) = &filter.year {
        query.push(" AND year = ");
        query.push_bind(year.clone());
    }
    if let Some(tag) = filter.tag {
        query.push(
            " AND EXISTS (SELECT 1 FROM project_tags pt WHERE pt.project_id = projects.id AND pt.tag_id = ",
        );
        query.push_bind(tag);
        query.push(")");
    }
    listing::push_search(&mut query, SEARCH_COLUMNS, filter.search.as_deref());
    query.push(listing::order_by(
        filter.ordering.as_deref(),
        ORDERING,
        DEFAULT_ORDER,
    ));

    query.build_query_as::<Project>().fetch_all(pool).await
}

pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Project>, sqlx::Error> {
    sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE slug = $1")
        .bind(slug)
        .fetch_optional(pool)
        .await
}

pub async fn find_tagged_by_slug(
    pool: &PgPool,
    slug: &str,
) -> Result<Option<TaggedProject>, sqlx::Error> {
    sqlx::query_as::<_, TaggedProject>(
        "SELECT p.*, COALESCE(
                (SELECT array_agg(pt.tag_id ORDER BY pt.tag_id) FROM project_tags pt WHERE pt.project_id = p.id),
                '{}'
            ) AS tag_ids
         FROM projects p WHERE p.slug = $1",
    )
    .bind(slug)
    .fetch_optional(pool)
    .await
}

/// Every other project sharing the subject's category or at least one of its tags,
/// newest first, each with its tag ids.
pub async fn related_candidates(
    pool: &PgPool,
    subject: &TaggedProject,
) -> Result<Vec<TaggedProject>, sqlx::Error> {
    sqlx::query_as::<_, TaggedProject>(
        "SELECT p.*, COALESCE(
                (SELECT array_agg(pt.tag_id ORDER BY pt.tag_id) FROM project_tags pt WHERE pt.project_id = p.id),
                '{}'
            ) AS tag_ids
         FROM projects p
         WHERE p.id <> $1
           AND (p.category = $2
                OR EXISTS (SELECT 1 FROM project_tags pt
                           WHERE pt.project_id = p.id AND pt.tag_id = ANY($3)))
         ORDER BY p.created_at DESC, p.id ASC",
    )
    .bind(subject.project.id)
    .bind(subject.project.category)
    .bind(&subject.tag_ids)
    .fetch_all(pool)
    .await
}

pub async fn create(pool: &PgPool, draft: &ProjectDraft) -> Result<Project, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let project = sqlx::query_as::<_, Project>(
        "INSERT INTO projects
            (id, title, slug, category, year, description, full_description, location,
             beneficiaries, duration)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING *",
    )
    .bind(Uuid::now_v7())
    .bind(&draft.title)
    .bind(&draft.slug)
    .bind(draft.category)
    .bind(&draft.year)
    .bind(&draft.description)
    .bind(&draft.full_description)
    .bind(&draft.location)
    .bind(&draft.beneficiaries)
    .bind(&draft.duration)
    .fetch_one(&mut *tx)
    .await?;

    set_tags(&mut tx, project.id, &draft.tag_ids).await?;
    tx.commit().await?;

    Ok(project)
}

pub async fn update(
    pool: &PgPool,
    id: Uuid,
    draft: &ProjectDraft,
) -> Result<Option<Project>, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let project = sqlx::query_as::<_, Project>(
        "UPDATE projects SET title = $2, slug = $3, category = $4, year = $5, description = $6,
            full_description = $7, location = $8, beneficiaries = $9, duration = $10,
            updated_at = now()
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(&draft.title)
    .bind(&draft.slug)
    .bind(draft.category)
    .bind(&draft.year)
    .bind(&draft.description)
    .bind(&draft.full_description)
    .bind(&draft.location)
    .bind(&draft.beneficiaries)
    .bind(&draft.duration)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(project) = project else {
        return Ok(None);
    };

    set_tags(&mut tx, project.id, &draft.tag_ids).await?;
    tx.commit().await?;

    Ok(Some(project))
}

async fn set_tags(conn: &mut PgConnection, project_id: Uuid, tag_ids: &[Uuid]) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM project_tags WHERE project_id = $1")
        .bind(project_id)
        .execute(&mut *conn)
        .await?;

    if tag_ids.is_empty() {
        return Ok(());
    }

    sqlx::query(
        "INSERT INTO project_tags (project_id, tag_id)
         SELECT $1, tag_id FROM UNNEST($2::uuid[]) AS t(tag_id)
         ON CONFLICT DO NOTHING",
    )
    .bind(project_id)
    .bind(tag_ids)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

/// Owned images, phases and outcomes go with the project via ON DELETE CASCADE.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM projects WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn tags_for(pool: &PgPool, project_ids: &[Uuid]) -> Result<Vec<ProjectTag>, sqlx::Error> {
    sqlx::query_as::<_, ProjectTag>(
        "SELECT pt.project_id, t.id, t.name, t.slug
         FROM project_tags pt JOIN tags t ON t.id = pt.tag_id
         WHERE pt.project_id = ANY($1)
         ORDER BY t.name ASC",
    )
    .bind(project_ids)
    .fetch_all(pool)
    .await
}

/// Lowest-ordered image of each listed project.
pub async fn first_images(pool: &PgPool, project_ids: &[Uuid]) -> Result<Vec<ProjectImage>, sqlx::Error> {
    sqlx::query_as::<_, ProjectImage>(
        "SELECT DISTINCT ON (project_id) *
         FROM project_images
         WHERE project_id = ANY($1)
         ORDER BY project_id, display_order ASC, created_at ASC, id ASC",
    )
    .bind(project_ids)
    .fetch_all(pool)
    .await
}

pub async fn years(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar("SELECT DISTINCT year FROM projects ORDER BY year DESC")
        .fetch_all(pool)
        .await
}
