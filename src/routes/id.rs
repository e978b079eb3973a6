use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use uuid::Uuid;

use crate::error::AppError;

/// Record id taken from the path. Anything that is not a UUID cannot name a
/// record, so it is a 404 like any other unknown id.
#[derive(Debug, Clone, Copy)]
pub struct Id(pub Uuid);

impl<S> FromRequestParts<S> for Id
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<Uuid>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::NotFound("Not found".to_string()))?;
        Ok(Id(id))
    }
}
