use sqlx::{PgConnection, PgPool, QueryBuilder};
use uuid::Uuid;

use crate::db::listing;
use crate::models::Partner;

const SEARCH_COLUMNS: &[&str] = &["name"];
const ORDERING: &[(&str, &str)] = &[("name", "name")];
const DEFAULT_ORDER: &str = "name ASC";

#[derive(Debug, Clone)]
pub struct PartnerDraft {
    pub name: String,
    pub project_ids: Vec<Uuid>,
}

/// Partner with the projects it is linked to.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PartnerRow {
    #[sqlx(flatten)]
    pub partner: Partner,
    pub project_ids: Vec<Uuid>,
}

const SELECT_WITH_PROJECTS: &str = "SELECT p.*, COALESCE(
        (SELECT array_agg(pp.project_id ORDER BY pp.project_id) FROM partner_projects pp WHERE pp.partner_id = p.id),
        '{}'
    ) AS project_ids
    FROM partners p WHERE 1=1";

pub async fn list(
    pool: &PgPool,
    project: Option<Uuid>,
    search: Option<&str>,
    ordering: Option<&str>,
) -> Result<Vec<PartnerRow>, sqlx::Error> {
    let mut query = QueryBuilder::new(SELECT_WITH_PROJECTS);

    if let Some(project) = project {
        query.push(
            " AND EXISTS (SELECT 1 FROM partner_projects pp WHERE pp.partner_id = p.id AND pp.project_id = ",
        );
        query.push_bind(project);
        query.push(")");
    }
    listing::push_search(&mut query, SEARCH_COLUMNS, search);
    query.push(listing::order_by(ordering, ORDERING, DEFAULT_ORDER));

    query.build_query_as::<PartnerRow>().fetch_all(pool).await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<PartnerRow>, sqlx::Error> {
    sqlx::query_as::<_, PartnerRow>(&format!("{SELECT_WITH_PROJECTS} AND p.id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn list_for_project(pool: &PgPool, project_id: Uuid) -> Result<Vec<Partner>, sqlx::Error> {
    sqlx::query_as::<_, Partner>(
        "SELECT p.* FROM partners p
         JOIN partner_projects pp ON pp.partner_id = p.id
         WHERE pp.project_id = $1
         ORDER BY p.name ASC, p.id ASC",
    )
    .bind(project_id)
    .fetch_all(pool)
    .await
}

pub async fn create(pool: &PgPool, draft: &PartnerDraft) -> Result<PartnerRow, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let partner = sqlx::query_as::<_, Partner>(
        "INSERT INTO partners (id, name) VALUES ($1, $2) RETURNING *",
    )
    .bind(Uuid::now_v7())
    .bind(&draft.name)
    .fetch_one(&mut *tx)
    .await?;

    let project_ids = set_projects(&mut tx, partner.id, &draft.project_ids).await?;
    tx.commit().await?;

    Ok(PartnerRow {
        partner,
        project_ids,
    })
}

pub async fn update(
    pool: &PgPool,
    id: Uuid,
    draft: &PartnerDraft,
) -> Result<Option<PartnerRow>, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let partner = sqlx::query_as::<_, Partner>(
        "UPDATE partners SET name = $2 WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(&draft.name)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(partner) = partner else {
        return Ok(None);
    };

    let project_ids = set_projects(&mut tx, partner.id, &draft.project_ids).await?;
    tx.commit().await?;

    Ok(Some(PartnerRow {
        partner,
        project_ids,
    }))
}

async fn set_projects(
    conn: &mut PgConnection,
    partner_id: Uuid,
    project_ids: &[Uuid],
) -> Result<Vec<Uuid>, sqlx::Error> {
    sqlx::query("DELETE FROM partner_projects WHERE partner_id = $1")
        .bind(partner_id)
        .execute(&mut *conn)
        .await?;

    if project_ids.is_empty() {
        return Ok(Vec::new());
    }

    sqlx::query_scalar(
        "INSERT INTO partner_projects (partner_id, project_id)
         SELECT $1, project_id FROM UNNEST($2::uuid[]) AS t(project_id)
         ON CONFLICT DO NOTHING
         RETURNING project_id",
    )
    .bind(partner_id)
    .bind(project_ids)
    .fetch_all(&mut *conn)
    .await
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM partners WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
