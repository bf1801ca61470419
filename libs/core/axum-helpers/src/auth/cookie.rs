use axum_extra::extract::cookie::{Cookie, SameSite};

/// Name of the cookie holding the session token
pub const TOKEN_COOKIE: &str = "token";

/// HttpOnly session cookie; `secure` should follow `Environment::use_https`.
pub fn auth_cookie(token: String, ttl: std::time::Duration, secure: bool) -> Cookie<'static> {
    let max_age = time::Duration::seconds(i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX));

    Cookie::build((TOKEN_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(max_age)
        .build()
}

/// Removal cookie for logout; path must match [`auth_cookie`]
pub fn clear_auth_cookie() -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE, "")).path("/").build()
}
