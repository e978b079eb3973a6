use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

use crate::db::listing;
use crate::models::Tag;

const SEARCH_COLUMNS: &[&str] = &["name"];
const ORDERING: &[(&str, &str)] = &[("name", "name"), ("slug", "slug")];
const DEFAULT_ORDER: &str = "name ASC";

#[derive(Debug, Clone)]
pub struct TagDraft {
    pub name: String,
    pub slug: String,
}

pub async fn list(
    pool: &PgPool,
    search: Option<&str>,
    ordering: Option<&str>,
) -> Result<Vec<Tag>, sqlx::Error> {
    let mut query = QueryBuilder::new("SELECT * FROM tags WHERE 1=1");
    listing::push_search(&mut query, SEARCH_COLUMNS, search);
    query.push(listing::order_by(ordering, ORDERING, DEFAULT_ORDER));

    query.build_query_as::<Tag>().fetch_all(pool).await
}

pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Tag>, sqlx::Error> {
    sqlx::query_as::<_, Tag>("SELECT * FROM tags WHERE slug = $1")
        .bind(slug)
        .fetch_optional(pool)
        .await
}

pub async fn create(pool: &PgPool, draft: &TagDraft) -> Result<Tag, sqlx::Error> {
    sqlx::query_as::<_, Tag>("INSERT INTO tags (id, name, slug) VALUES ($1, $2, $3) RETURNING *")
        .bind(Uuid::now_v7())
        .bind(&draft.name)
        .bind(&draft.slug)
        .fetch_one(pool)
        .await
}

pub async fn update(pool: &PgPool, id: Uuid, draft: &TagDraft) -> Result<Option<Tag>, sqlx::Error> {
    sqlx::query_as::<_, Tag>("UPDATE tags SET name = $2, slug = $3 WHERE id = $1 RETURNING *")
        .bind(id)
        .bind(&draft.name)
        .bind(&draft.slug)
        .fetch_optional(pool)
        .await
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM tags WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
