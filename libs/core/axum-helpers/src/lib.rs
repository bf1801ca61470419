//! # Axum Helpers
//!
//! Shared HTTP plumbing for the warehouse services.
//!
//! - [`errors`]: `AppError`, error codes and the `{success:false, message, error}` envelope
//! - [`response`]: the `{success, message, data}` success envelope
//! - [`extractors`]: `UuidPath` and `ValidatedJson`
//! - [`auth`]: JWT issuing, cookie/Bearer resolution, `AuthUser`/`AdminUser` extractors
//! - [`server`]: documented router, health endpoints, graceful shutdown
//! - [`http`]: CORS and security headers

pub mod auth;
pub mod errors;
pub mod extractors;
pub mod http;
pub mod response;
pub mod server;

pub use auth::{
    AdminUser, AuthUser, JwtAuth, JwtClaims, JwtConfig, auth_cookie, clear_auth_cookie,
    optional_jwt_auth_middleware,
};
pub use errors::{AppError, AppResult, ErrorCode, ErrorResponse};
pub use extractors::{UuidPath, ValidatedJson};
pub use response::ApiResponse;
pub use server::{
    HealthCheckFuture, ShutdownCoordinator, create_production_app, create_router, health_router,
    run_health_checks,
};
