//! Shared test utilities for the domain crates
//!
//! - `TestDataBuilder`: deterministic names and ids derived from the test name
//! - `TestAuth`: signs tokens and wraps routers with the JWT middleware
//! - `json_body`: collects a response body and parses it as JSON
//! - `TestMongo`: MongoDB container with automatic cleanup (feature: "mongo")
//!
//! # Router tests
//!
//! ```rust,ignore
//! use test_utils::{TestAuth, json_body};
//!
//! let auth = TestAuth::new();
//! let app = auth.wrap(handlers::router(service));
//! let request = Request::builder()
//!     .method("POST")
//!     .uri("/")
//!     .header("authorization", auth.bearer("admin"))
//!     .body(Body::empty())
//!     .unwrap();
//! ```

use axum::{Router, body::Body, middleware};
use axum_helpers::{JwtAuth, JwtConfig, optional_jwt_auth_middleware};
use http_body_util::BodyExt;
use uuid::Uuid;

#[cfg(feature = "mongo")]
mod mongo;

#[cfg(feature = "mongo")]
pub use mongo::TestMongo;

const TEST_JWT_SECRET: &str = "test-secret-for-handler-tests-only-32+";

/// Builder for test data with deterministic values
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Seed from a hash of the test name
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    pub fn user_id(&self) -> Uuid {
        let bytes = self.seed.to_le_bytes();
        let mut uuid_bytes = [0u8; 16];
        uuid_bytes[..8].copy_from_slice(&bytes);
        uuid_bytes[8..16].copy_from_slice(&bytes);
        Uuid::from_bytes(uuid_bytes)
    }

    /// Short enough for every name field (at most 20 chars)
    pub fn name(&self, prefix: &str) -> String {
        let mut name = format!("{}-{}", prefix, self.seed % 100_000_000);
        name.truncate(20);
        name
    }

    /// Storage location label, e.g. `A-12345678-01`
    pub fn location_id(&self, slot: u8) -> String {
        format!("A-{}-{:02}", self.seed % 100_000_000, slot)
    }

    /// Transport package id, e.g. `PKG-12345678`
    pub fn package_id(&self) -> String {
        format!("PKG-{}", self.seed % 100_000_000)
    }
}

/// Token signing for router tests
#[derive(Clone)]
pub struct TestAuth {
    jwt: JwtAuth,
}

impl TestAuth {
    pub fn new() -> Self {
        let config = JwtConfig::new(TEST_JWT_SECRET).expect("test secret is long enough");
        Self {
            jwt: JwtAuth::new(&config),
        }
    }

    pub fn jwt(&self) -> JwtAuth {
        self.jwt.clone()
    }

    pub fn token_for(&self, user_id: Uuid, role: &str) -> String {
        self.jwt
            .create_token(user_id, role)
            .expect("token signing should not fail")
    }

    /// `Bearer <token>` for a fresh user with `role`
    pub fn bearer(&self, role: &str) -> String {
        format!("Bearer {}", self.token_for(Uuid::now_v7(), role))
    }

    pub fn bearer_for(&self, user_id: Uuid, role: &str) -> String {
        format!("Bearer {}", self.token_for(user_id, role))
    }

    /// Layers the JWT middleware the way the application does
    pub fn wrap(&self, router: Router) -> Router {
        router.layer(middleware::from_fn_with_state(
            self.jwt.clone(),
            optional_jwt_auth_middleware,
        ))
    }
}

impl Default for TestAuth {
    fn default() -> Self {
        Self::new()
    }
}

/// Collects a response body and parses it as JSON
pub async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be valid JSON")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Request, StatusCode};
    use axum::routing::get;
    use axum_helpers::AuthUser;
    use tower::ServiceExt;

    #[test]
    fn test_data_builder_deterministic() {
        let builder1 = TestDataBuilder::from_test_name("my_test");
        let builder2 = TestDataBuilder::from_test_name("my_test");

        assert_eq!(builder1.user_id(), builder2.user_id());
        assert_eq!(builder1.package_id(), builder2.package_id());
    }

    #[test]
    fn test_data_builder_values_fit_field_limits() {
        let builder = TestDataBuilder::new(u64::MAX);
        assert!(builder.name("inventory").len() <= 20);
        assert!(builder.package_id().len() <= 20);
        assert!(builder.location_id(7).len() <= 40);
    }

    #[tokio::test]
    async fn test_wrapped_router_resolves_bearer_token() {
        async fn whoami(AuthUser(claims): AuthUser) -> String {
            claims.role
        }

        let auth = TestAuth::new();
        let app = auth.wrap(Router::new().route("/", get(whoami)));

        let request = Request::builder()
            .uri("/")
            .header("authorization", auth.bearer("driver"))
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let anonymous = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = app.oneshot(anonymous).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
