use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::CookieJar;
use uuid::Uuid;

use crate::auth::jwt;
use crate::db::Visibility;
use crate::error::AppError;
use crate::state::SharedState;

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub is_staff: bool,
}

/// Whoever issued the current request. Every operation receives this explicitly.
#[derive(Debug, Clone)]
pub enum Caller {
    Anonymous,
    User(AuthUser),
}

impl Caller {
    pub fn is_staff(&self) -> bool {
        matches!(self, Caller::User(user) if user.is_staff)
    }

    pub fn user_id(&self) -> Option<Uuid> {
        match self {
            Caller::Anonymous => None,
            Caller::User(user) => Some(user.user_id),
        }
    }

    /// Staff see every row; everyone else only the publicly relevant subset.
    pub fn visibility(&self) -> Visibility {
        if self.is_staff() {
            Visibility::All
        } else {
            Visibility::Public
        }
    }

    pub fn require_authenticated(&self) -> Result<&AuthUser, AppError> {
        match self {
            Caller::Anonymous => Err(AppError::not_authenticated()),
            Caller::User(user) => Ok(user),
        }
    }

    pub fn require_staff(&self) -> Result<&AuthUser, AppError> {
        let user = self.require_authenticated()?;
        if user.is_staff {
            Ok(user)
        } else {
            Err(AppError::staff_required())
        }
    }
}

fn bearer_token(parts: &Parts) -> Result<Option<String>, AppError> {
    let Some(auth_header) = parts.headers.get("authorization") else {
        return Ok(None);
    };
    let auth_str = auth_header
        .to_str()
        .map_err(|_| AppError::Unauthorized("Invalid authorization header".to_string()))?;
    Ok(auth_str.strip_prefix("Bearer ").map(str::to_string))
}

impl FromRequestParts<SharedState> for Caller {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        // Bearer header wins over the cookie
        let token = match bearer_token(parts)? {
            Some(token) => Some(token),
            None => CookieJar::from_headers(&parts.headers)
                .get("access_token")
                .map(|c| c.value().to_string()),
        };

        let Some(token) = token else {
            return Ok(Caller::Anonymous);
        };

        // A present but broken token is an error, not an anonymous request
        let claims = jwt::decode_token(&token, &state.config.jwt_secret)
            .map_err(|_| AppError::Unauthorized("Invalid or expired token".to_string()))?;

        Ok(Caller::User(AuthUser {
            user_id: claims.sub,
            is_staff: claims.staff,
        }))
    }
}

impl FromRequestParts<SharedState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        match Caller::from_request_parts(parts, state).await? {
            Caller::User(user) => Ok(user),
            Caller::Anonymous => Err(AppError::not_authenticated()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(is_staff: bool) -> Caller {
        Caller::User(AuthUser {
            user_id: Uuid::now_v7(),
            is_staff,
        })
    }

    #[test]
    fn anonymous_needs_authentication() {
        let caller = Caller::Anonymous;
        assert!(matches!(
            caller.require_authenticated(),
            Err(AppError::Unauthorized(_))
        ));
        assert!(matches!(caller.require_staff(), Err(AppError::Unauthorized(_))));
        assert_eq!(caller.visibility(), Visibility::Public);
    }

    #[test]
    fn non_staff_is_forbidden_not_unauthenticated() {
        let caller = user(false);
        assert!(caller.require_authenticated().is_ok());
        assert!(matches!(caller.require_staff(), Err(AppError::Forbidden(_))));
        assert_eq!(caller.visibility(), Visibility::Public);
    }

    #[test]
    fn staff_sees_everything() {
        let caller = user(true);
        assert!(caller.require_staff().is_ok());
        assert_eq!(caller.visibility(), Visibility::All);
    }
}
