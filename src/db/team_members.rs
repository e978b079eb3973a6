use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

use crate::db::listing;
use crate::db::Visibility;
use crate::models::TeamMember;

const SEARCH_COLUMNS: &[&str] = &["name", "designation", "bio"];
const ORDERING: &[(&str, &str)] = &[("order", "display_order"), ("name", "name")];
const DEFAULT_ORDER: &str = "display_order ASC, name ASC";

/// Validated column values for an insert or full update.
#[derive(Debug, Clone)]
pub struct TeamMemberDraft {
    pub name: String,
    pub designation: String,
    pub role: String,
    pub bio: String,
    pub image: Option<String>,
    pub email: Option<String>,
    pub linkedin_profile: Option<String>,
    pub display_order: i32,
    pub is_active: bool,
}

#[derive(Debug, Default)]
pub struct TeamMemberFilter {
    pub role: Option<String>,
    pub is_active: Option<bool>,
    pub search: Option<String>,
    pub ordering: Option<String>,
}

pub async fn list(
    pool: &PgPool,
    visibility: Visibility,
    filter: &TeamMemberFilter,
) -> Result<Vec<TeamMember>, sqlx::Error> {
    let mut query = QueryBuilder::new("SELECT * FROM team_members WHERE 1=1");
    query.push(visibility.clause("is_active"));

    if let Some(role) = &filter.role {
        query.push(" AND role = ");
        query.push_bind(role.clone());
    }
    if let Some(is_active) = filter.is_active {
        query.push(" AND is_active = ");
        query.push_bind(is_active);
    }
    listing::push_search(&mut query, SEARCH_COLUMNS, filter.search.as_deref());
    query.push(listing::order_by(
        filter.ordering.as_deref(),
        ORDERING,
        DEFAULT_ORDER,
    ));

    query.build_query_as::<TeamMember>().fetch_all(pool).await
}

pub async fn find_by_id(
    pool: &PgPool,
    id: Uuid,
    visibility: Visibility,
) -> Result<Option<TeamMember>, sqlx::Error> {
    sqlx::query_as::<_, TeamMember>(&format!(
        "SELECT * FROM team_members WHERE id = $1{}",
        visibility.clause("is_active")
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn create(pool: &PgPool, draft: &TeamMemberDraft) -> Result<TeamMember, sqlx::Error> {
    sqlx::query_as::<_, TeamMember>(
        "INSERT INTO team_members
            (id, name, designation, role, bio, image, email, linkedin_profile, display_order, is_active)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING *",
    )
    .bind(Uuid::now_v7())
    .bind(&draft.name)
    .bind(&draft.designation)
    .bind(&draft.role)
    .bind(&draft.bio)
    .bind(&draft.image)
    .bind(&draft.email)
    .bind(&draft.linkedin_profile)
    .bind(draft.display_order)
    .bind(draft.is_active)
    .fetch_one(pool)
    .await
}

pub async fn update(
    pool: &PgPool,
    id: Uuid,
    draft: &TeamMemberDraft,
) -> Result<Option<TeamMember>, sqlx::Error> {
    sqlx::query_as::<_, TeamMember>(
        "UPDATE team_members SET name = $2, designation = $3, role = $4, bio = $5, image = $6,
            email = $7, linkedin_profile = $8, display_order = $9, is_active = $10, updated_at = now()
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(&draft.name)
    .bind(&draft.designation)
    .bind(&draft.role)
    .bind(&draft.bio)
    .bind(&draft.image)
    .bind(&draft.email)
    .bind(&draft.linkedin_profile)
    .bind(draft.display_order)
    .bind(draft.is_active)
    .fetch_optional(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM team_members WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
