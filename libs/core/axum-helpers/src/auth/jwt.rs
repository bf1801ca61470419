use super::config::JwtConfig;
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role value that unlocks admin-only routes
pub const ADMIN_ROLE: &str = "admin";

/// Claims carried by session tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    pub user_id: Uuid,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

impl JwtClaims {
    pub fn is_admin(&self) -> bool {
        self.role == ADMIN_ROLE
    }
}

/// Issues and verifies HS256 session tokens
#[derive(Clone)]
pub struct JwtAuth {
    secret: String,
    ttl: std::time::Duration,
}

impl JwtAuth {
    pub fn new(config: &JwtConfig) -> Self {
        tracing::info!(ttl_secs = config.ttl.as_secs(), "JWT auth initialized");
        Self {
            secret: config.secret.clone(),
            ttl: config.ttl,
        }
    }

    pub fn ttl(&self) -> std::time::Duration {
        self.ttl
    }

    pub fn create_token(&self, user_id: Uuid, role: &str) -> eyre::Result<String> {
        let now = Utc::now();
        let ttl = Duration::from_std(self.ttl)?;

        let claims = JwtClaims {
            user_id,
            role: role.to_string(),
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
        };

        let header = Header {
            alg: jsonwebtoken::Algorithm::HS256,
            ..Default::default()
        };

        let token = encode(
            &header,
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )?;

        Ok(token)
    }

    /// Checks signature and expiry
    pub fn verify_token(&self, token: &str) -> eyre::Result<JwtClaims> {
        let token_data = decode::<JwtClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth() -> JwtAuth {
        JwtAuth::new(&JwtConfig::new("this-is-a-valid-secret-with-32-chars!").unwrap())
    }

    #[test]
    fn test_token_carries_user_and_role() {
        let auth = auth();
        let user_id = Uuid::now_v7();

        let token = auth.create_token(user_id, "admin").unwrap();
        let claims = auth.verify_token(&token).unwrap();

        assert_eq!(claims.user_id, user_id);
        assert!(claims.is_admin());
        assert_eq!(claims.exp - claims.iat, 604_800);
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let other = JwtAuth::new(
            &JwtConfig::new("another-secret-that-is-also-32-chars-long").unwrap(),
        );
        let token = other.create_token(Uuid::now_v7(), "staff").unwrap();

        assert!(auth().verify_token(&token).is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let config = JwtConfig::new("this-is-a-valid-secret-with-32-chars!")
            .unwrap()
            .with_ttl(std::time::Duration::from_secs(0));
        let auth = JwtAuth::new(&config);

        // Validation allows 60s of leeway, so forge an already-expired token
        let claims = JwtClaims {
            user_id: Uuid::now_v7(),
            role: "staff".to_string(),
            exp: Utc::now().timestamp() - 3600,
            iat: Utc::now().timestamp() - 7200,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"this-is-a-valid-secret-with-32-chars!"),
        )
        .unwrap();

        assert!(auth.verify_token(&token).is_err());
    }
}
