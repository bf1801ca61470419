use core_config::{ConfigError, FromEnv, env_parse_or, env_required};
use std::time::Duration;

const MIN_SECRET_LEN: usize = 32;
const DEFAULT_TTL_SECS: u64 = 7 * 24 * 60 * 60;

/// JWT signing settings.
///
/// - `JWT_SECRET` (required, at least 32 characters)
/// - `JWT_TTL_SECS` (default: 7 days), also used as the cookie max-age
#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: String,
    pub ttl: Duration,
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>) -> Result<Self, ConfigError> {
        let secret = secret.into();
        check_secret(&secret)?;
        Ok(Self {
            secret,
            ttl: Duration::from_secs(DEFAULT_TTL_SECS),
        })
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

fn check_secret(secret: &str) -> Result<(), ConfigError> {
    if secret.len() < MIN_SECRET_LEN {
        return Err(ConfigError::ParseError {
            key: "JWT_SECRET".to_string(),
            details: format!(
                "must be at least {MIN_SECRET_LEN} characters (got {}). Generate one with: openssl rand -base64 32",
                secret.len()
            ),
        });
    }
    Ok(())
}

impl FromEnv for JwtConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let secret = env_required("JWT_SECRET")?;
        check_secret(&secret)?;
        let ttl_secs = env_parse_or("JWT_TTL_SECS", DEFAULT_TTL_SECS)?;

        Ok(Self {
            secret,
            ttl: Duration::from_secs(ttl_secs),
        })
    }
}
