use axum::{
    extract::FromRequestParts,
    http::request::Parts,
};

use crate::auth::jwt;
use crate::config::Config;
use crate::error::AppError;
use crate::service::MatchService;

/// Player identified by the bearer token.
/// Use as an extractor in route handlers that require auth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub id: i64,
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let service = parts
            .extensions
            .get::<MatchService>()
            .ok_or(AppError::Internal("Missing match service".into()))?
            .clone();

        let config = parts
            .extensions
            .get::<Config>()
            .ok_or(AppError::Internal("Missing config".into()))?
            .clone();

        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::Unauthorized)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .or_else(|| auth_header.strip_prefix("bearer "))
            .ok_or(AppError::Unauthorized)?;

        let claims = jwt::verify_token(token, &config.jwt_secret)
            .ok_or(AppError::Unauthorized)?;

        if !service.repository().user_exists(claims.user_id).await? {
            return Err(AppError::Unauthorized);
        }

        Ok(AuthUser { id: claims.user_id })
    }
}
