//! Both FAQ tables; every query is parameterised by [`FaqKind`].

use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

use crate::db::listing;
use crate::db::Visibility;
use crate::models::{Faq, FaqKind};

const SEARCH_COLUMNS: &[&str] = &["question", "answer", "category"];
const ORDERING: &[(&str, &str)] = &[("order", "display_order")];
const DEFAULT_ORDER: &str = "display_order ASC";

#[derive(Debug, Clone)]
pub struct FaqDraft {
    pub question: String,
    pub answer: String,
    pub category: String,
    pub display_order: i32,
    pub is_published: bool,
}

#[derive(Debug, Default)]
pub struct FaqFilter {
    pub category: Option<String>,
    pub is_published: Option<bool>,
    pub search: Option<String>,
    pub ordering: Option<String>,
}

pub async fn list(
    pool: &PgPool,
    kind: FaqKind,
    visibility: Visibility,
    filter: &FaqFilter,
) -> Result<Vec<Faq>, sqlx::Error> {
    let mut query = QueryBuilder::new(format!("SELECT * FROM {} WHERE 1=1", kind.table()));
    query.push(visibility.clause("is_published"));

    if let Some(category) = &filter.category {
        query.push(" AND category = ");
        query.push_bind(category.clone());
    }
    if let Some(is_published) = filter.is_published {
        query.push(" AND is_published = ");
        query.push_bind(is_published);
    }
    listing::push_search(&mut query, SEARCH_COLUMNS, filter.search.as_deref());
    query.push(listing::order_by(
        filter.ordering.as_deref(),
        ORDERING,
        DEFAULT_ORDER,
    ));

    query.build_query_as::<Faq>().fetch_all(pool).await
}

pub async fn find_by_id(
    pool: &PgPool,
    kind: FaqKind,
    id: Uuid,
    visibility: Visibility,
) -> Result<Option<Faq>, sqlx::Error> {
    sqlx::query_as::<_, Faq>(&format!(
        "SELECT * FROM {} WHERE id = $1{}",
        kind.table(),
        visibility.clause("is_published")
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn create(pool: &PgPool, kind: FaqKind, draft: &FaqDraft) -> Result<Faq, sqlx::Error> {
    sqlx::query_as::<_, Faq>(&format!(
        "INSERT INTO {} (id, question, answer, category, display_order, is_published)
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        kind.table()
    ))
    .bind(Uuid::now_v7())
    .bind(&draft.question)
    .bind(&draft.answer)
    .bind(&draft.category)
    .bind(draft.display_order)
    .bind(draft.is_published)
    .fetch_one(pool)
    .await
}

pub async fn update(
    pool: &PgPool,
    kind: FaqKind,
    id: Uuid,
    draft: &FaqDraft,
) -> Result<Option<Faq>, sqlx::Error> {
    sqlx::query_as::<_, Faq>(&format!(
        "UPDATE {} SET question = $2, answer = $3, category = $4, display_order = $5,
            is_published = $6, updated_at = now()
         WHERE id = $1 RETURNING *",
        kind.table()
    ))
    .bind(id)
    .bind(&draft.question)
    .bind(&draft.answer)
    .bind(&draft.category)
    .bind(draft.display_order)
    .bind(draft.is_published)
    .fetch_optional(pool)
    .await
}

pub async fn delete(pool: &PgPool, kind: FaqKind, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(&format!("DELETE FROM {} WHERE id = $1", kind.table()))
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
