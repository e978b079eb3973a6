use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

use crate::db::listing;
use crate::models::{Contact, InquiryType};

const SEARCH_COLUMNS: &[&str] = &["first_name", "last_name", "email", "message"];
const ORDERING: &[(&str, &str)] = &[("created_at", "created_at")];
const DEFAULT_ORDER: &str = "created_at DESC";

/// Fields a submitter controls. `responded` and `response_notes` are staff-only.
#[derive(Debug, Clone)]
pub struct ContactDraft {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub inquiry_type: InquiryType,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct ContactFilter {
    pub inquiry_type: Option<InquiryType>,
    pub responded: Option<bool>,
    pub search: Option<String>,
    pub ordering: Option<String>,
}

pub async fn list(pool: &PgPool, filter: &ContactFilter) -> Result<Vec<Contact>, sqlx::Error> {
    let mut query = QueryBuilder::new("SELECT * FROM contacts WHERE 1=1");

    if let Some(inquiry_type) = filter.inquiry_type {
        query.push(" AND inquiry_type = ");
        query.push_bind(inquiry_type);
    }
    if let Some(responded) = filter.responded {
        query.push(" AND responded = ");
        query.push_bind(responded);
    }
    listing::push_search(&mut query, SEARCH_COLUMNS, filter.search.as_deref());
    query.push(listing::order_by(
        filter.ordering.as_deref(),
        ORDERING,
        DEFAULT_ORDER,
    ));

    query.build_query_as::<Contact>().fetch_all(pool).await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Contact>, sqlx::Error> {
    sqlx::query_as::<_, Contact>("SELECT * FROM contacts WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn create(pool: &PgPool, draft: &ContactDraft) -> Result<Contact, sqlx::Error> {
    sqlx::query_as::<_, Contact>(
        "INSERT INTO contacts
            (id, first_name, last_name, email, phone_number, inquiry_type, message)
         VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
    )
    .bind(Uuid::now_v7())
    .bind(&draft.first_name)
    .bind(&draft.last_name)
    .bind(&draft.email)
    .bind(&draft.phone_number)
    .bind(draft.inquiry_type)
    .bind(&draft.message)
    .fetch_one(pool)
    .await
}

pub async fn update(
    pool: &PgPool,
    id: Uuid,
    draft: &ContactDraft,
) -> Result<Option<Contact>, sqlx::Error> {
    sqlx::query_as::<_, Contact>(
        "UPDATE contacts SET first_name = $2, last_name = $3, email = $4, phone_number = $5,
            inquiry_type = $6, message = $7, updated_at = now()
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(&draft.first_name)
    .bind(&draft.last_name)
    .bind(&draft.email)
    .bind(&draft.phone_number)
    .bind(draft.inquiry_type)
    .bind(&draft.message)
    .fetch_optional(pool)
    .await
}

/// Single-row update; `notes = None` keeps whatever notes were stored.
pub async fn mark_responded(
    pool: &PgPool,
    id: Uuid,
    notes: Option<&str>,
) -> Result<Option<Contact>, sqlx::Error> {
    sqlx::query_as::<_, Contact>(
        "UPDATE contacts SET responded = TRUE, response_notes = COALESCE($2, response_notes),
            updated_at = now()
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(notes)
    .fetch_optional(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM contacts WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
