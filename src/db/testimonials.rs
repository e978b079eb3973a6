use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

use crate::db::listing;
use crate::db::Visibility;
use crate::models::{Rating, Testimonial};

const SEARCH_COLUMNS: &[&str] = &["name", "designation", "company", "message"];
const ORDERING: &[(&str, &str)] = &[("created_at", "created_at"), ("rating", "rating")];
const DEFAULT_ORDER: &str = "created_at DESC";

#[derive(Debug, Clone)]
pub struct TestimonialDraft {
    pub name: String,
    pub designation: String,
    pub company: String,
    pub message: String,
    pub image: Option<String>,
    pub is_featured: bool,
    pub rating: Rating,
}

#[derive(Debug, Default)]
pub struct TestimonialFilter {
    pub rating: Option<Rating>,
    pub is_featured: Option<bool>,
    pub search: Option<String>,
    pub ordering: Option<String>,
}

pub async fn list(
    pool: &PgPool,
    visibility: Visibility,
    filter: &TestimonialFilter,
) -> Result<Vec<Testimonial>, sqlx::Error> {
    let mut query = QueryBuilder::new("SELECT * FROM testimonials WHERE 1=1");
    query.push(visibility.clause("is_featured"));

    if let Some(rating) = filter.rating {
        query.push(" AND rating = ");
        query.push_bind(rating);
    }
    if let Some(is_featured) = filter.is_featured {
        query.push(" AND is_featured = ");
        query.push_bind(is_featured);
    }
    listing::push_search(&mut query, SEARCH_COLUMNS, filter.search.as_deref());
    query.push(listing::order_by(
        filter.ordering.as_deref(),
        ORDERING,
        DEFAULT_ORDER,
    ));

    query.build_query_as::<Testimonial>().fetch_all(pool).await
}

pub async fn find_by_id(
    pool: &PgPool,
    id: Uuid,
    visibility: Visibility,
) -> Result<Option<Testimonial>, sqlx::Error> {
    sqlx::query_as::<_, Testimonial>(&format!(
        "SELECT * FROM testimonials WHERE id = $1{}",
        visibility.clause("is_featured")
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn create(pool: &PgPool, draft: &TestimonialDraft) -> Result<Testimonial, sqlx::Error> {
    sqlx::query_as::<_, Testimonial>(
        "INSERT INTO testimonials
            (id, name, designation, company, message, image, is_featured, rating)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
    )
    .bind(Uuid::now_v7())
    .bind(&draft.name)
    .bind(&draft.designation)
    .bind(&draft.company)
    .bind(&draft.message)
    .bind(&draft.image)
    .bind(draft.is_featured)
    .bind(draft.rating)
    .fetch_one(pool)
    .await
}

pub async fn update(
    pool: &PgPool,
    id: Uuid,
    draft: &TestimonialDraft,
) -> Result<Option<Testimonial>, sqlx::Error> {
    sqlx::query_as::<_, Testimonial>(
        "UPDATE testimonials SET name = $2, designation = $3, company = $4, message = $5,
            image = $6, is_featured = $7, rating = $8, updated_at = now()
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(&draft.name)
    .bind(&draft.designation)
    .bind(&draft.company)
    .bind(&draft.message)
    .bind(&draft.image)
    .bind(draft.is_featured)
    .bind(draft.rating)
    .fetch_optional(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM testimonials WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
