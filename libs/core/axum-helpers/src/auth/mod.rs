//! Stateless JWT sessions.
//!
//! Tokens are issued at login, carried in the `token` cookie or a Bearer header, and
//! resolved once per request by [`optional_jwt_auth_middleware`]. Handlers opt into
//! authentication with the [`AuthUser`] and [`AdminUser`] extractors.
//!
//! ```ignore
//! use axum_helpers::auth::{JwtAuth, JwtConfig, optional_jwt_auth_middleware};
//! use core_config::FromEnv;
//!
//! let auth = JwtAuth::new(&JwtConfig::from_env()?);
//! let app = router.layer(axum::middleware::from_fn_with_state(auth, optional_jwt_auth_middleware));
//! ```

pub mod config;
pub mod cookie;
pub mod extractors;
pub mod jwt;
pub mod middleware;

pub use config::JwtConfig;
pub use cookie::{TOKEN_COOKIE, auth_cookie, clear_auth_cookie};
pub use extractors::{AdminUser, AuthUser};
pub use jwt::{ADMIN_ROLE, JwtAuth, JwtClaims};
pub use middleware::{InvalidToken, extract_token, optional_jwt_auth_middleware};
