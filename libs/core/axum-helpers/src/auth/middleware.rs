use super::cookie::TOKEN_COOKIE;
use super::jwt::JwtAuth;
use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;

/// Marker left in request extensions when a token was sent but failed verification
#[derive(Debug, Clone, Copy)]
pub struct InvalidToken;

/// Cookie first, then `Authorization: Bearer <token>`
pub fn extract_token(jar: &CookieJar, headers: &HeaderMap) -> Option<String> {
    jar.get(TOKEN_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
        .or_else(|| {
            headers
                .get(axum::http::header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .and_then(|auth| auth.strip_prefix("Bearer "))
                .map(|s| s.trim().to_string())
                .filter(|v| !v.is_empty())
        })
}

/// Resolves the caller once per request.
///
/// Valid tokens put [`JwtClaims`](super::JwtClaims) into request extensions. Requests are never
/// rejected here; the `AuthUser` and `AdminUser` extractors decide per route.
pub async fn optional_jwt_auth_middleware(
    State(auth): State<JwtAuth>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(token) = extract_token(&jar, request.headers()) {
        match auth.verify_token(&token) {
            Ok(claims) => {
                tracing::debug!(user_id = %claims.user_id, role = %claims.role, "Authenticated request");
                request.extensions_mut().insert(claims);
            }
            Err(e) => {
                tracing::debug!(error = %e, "JWT verification failed");
                request.extensions_mut().insert(InvalidToken);
            }
        }
    }

    next.run(request).await
}
