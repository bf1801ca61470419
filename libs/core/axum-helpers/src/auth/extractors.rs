use super::jwt::JwtClaims;
use super::middleware::InvalidToken;
use crate::errors::AppError;
use axum::{extract::FromRequestParts, http::request::Parts};

/// Any signed-in caller. Rejects with 401.
#[derive(Debug, Clone)]
pub struct AuthUser(pub JwtClaims);

/// Signed-in caller with the admin role. Rejects with 401, or 403 for other roles.
#[derive(Debug, Clone)]
pub struct AdminUser(pub JwtClaims);

fn claims_from_parts(parts: &Parts) -> Result<JwtClaims, AppError> {
    if let Some(claims) = parts.extensions.get::<JwtClaims>() {
        return Ok(claims.clone());
    }

    if parts.extensions.get::<InvalidToken>().is_some() {
        Err(AppError::Unauthorized(
            "Invalid or expired Token Provided".to_string(),
        ))
    } else {
        Err(AppError::Unauthorized("No Token Provided".to_string()))
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        claims_from_parts(parts).map(AuthUser)
    }
}

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let claims = claims_from_parts(parts)?;
        if !claims.is_admin() {
            tracing::warn!(user_id = %claims.user_id, "Non-admin access attempt");
            return Err(AppError::Forbidden(
                "Only Admin can Do this Operation!".to_string(),
            ));
        }
        Ok(AdminUser(claims))
    }
}
