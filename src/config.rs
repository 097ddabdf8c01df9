//! Runtime configuration for the auth core
//! Handles secrets, token lifetimes and the bind address

use crate::constants::{
    DEFAULT_ACCESS_TOKEN_TTL_SECS, DEFAULT_HOST, DEFAULT_MIN_AUTH_MILLIS, DEFAULT_PORT,
    DEFAULT_REFRESH_TOKEN_TTL_SECS, MAX_TOKEN_TTL_SECS, MIN_SECRET_LEN,
};
use crate::error::{AuthError, Result};
use std::env;
use std::time::Duration;

/// Auth configuration parameters, immutable once built
#[derive(Clone)]
pub struct AuthConfig {
    pub host: String,
    pub port: u16,
    /// Secret for token signing/validation
    pub jwt_secret: String,
    pub access_token_ttl_secs: i64,
    pub refresh_token_ttl_secs: i64,
    /// Lower bound on how long a login attempt takes
    pub min_auth_duration: Duration,
    /// Optional account seeded with the admin role at startup
    pub seed_admin: Option<SeedAdmin>,
}

#[derive(Clone)]
pub struct SeedAdmin {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for SeedAdmin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeedAdmin")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("jwt_secret", &"<redacted>")
            .field("access_token_ttl_secs", &self.access_token_ttl_secs)
            .field("refresh_token_ttl_secs", &self.refresh_token_ttl_secs)
            .field("min_auth_duration", &self.min_auth_duration)
            .field("seed_admin", &self.seed_admin)
            .finish()
    }
}

impl AuthConfig {
    /// Build a configuration with default lifetimes around an explicit secret
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            jwt_secret: jwt_secret.into(),
            access_token_ttl_secs: DEFAULT_ACCESS_TOKEN_TTL_SECS,
            refresh_token_ttl_secs: DEFAULT_REFRESH_TOKEN_TTL_SECS,
            min_auth_duration: Duration::from_millis(DEFAULT_MIN_AUTH_MILLIS),
            seed_admin: None,
        }
    }

    pub fn with_token_ttls(mut self, access_secs: i64, refresh_secs: i64) -> Self {
        self.access_token_ttl_secs = access_secs;
        self.refresh_token_ttl_secs = refresh_secs;
        self
    }

    pub fn with_min_auth_duration(mut self, duration: Duration) -> Self {
        self.min_auth_duration = duration;
        self
    }

    /// Validate that a secret meets security requirements
    pub fn validate_secret(secret: &str) -> Result<()> {
        if secret.len() < MIN_SECRET_LEN {
            return Err(AuthError::ConfigError(format!(
                "JWT secret must be at least {} characters long",
                MIN_SECRET_LEN
            )));
        }

        // Check for insecure default or example values
        let insecure_patterns = [
            "your-secret-key",
            "change-this",
            "changeme",
            "INSECURE-DEFAULT",
            "default",
            "password",
            "12345",
        ];

        for pattern in &insecure_patterns {
            if secret.contains(pattern) {
                return Err(AuthError::ConfigError(format!(
                    "JWT secret contains insecure pattern '{}'. Generate one with: openssl rand -base64 32",
                    pattern
                )));
            }
        }

        if secret.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(AuthError::ConfigError(
                "JWT secret should contain mixed characters (letters, numbers, symbols)".to_string(),
            ));
        }

        Ok(())
    }

    fn validate_ttls(access_secs: i64, refresh_secs: i64) -> Result<()> {
        if access_secs <= 0 || refresh_secs <= 0 {
            return Err(AuthError::ConfigError(
                "Token TTLs must be positive".to_string(),
            ));
        }
        if access_secs > MAX_TOKEN_TTL_SECS || refresh_secs > MAX_TOKEN_TTL_SECS {
            return Err(AuthError::ConfigError(format!(
                "Token TTLs must not exceed {} seconds",
                MAX_TOKEN_TTL_SECS
            )));
        }
        if refresh_secs < access_secs {
            return Err(AuthError::ConfigError(
                "Refresh token TTL must not be shorter than access token TTL".to_string(),
            ));
        }
        Ok(())
    }

    /// Check secret strength and lifetime sanity
    pub fn validate(&self) -> Result<()> {
        Self::validate_secret(&self.jwt_secret)?;
        Self::validate_ttls(self.access_token_ttl_secs, self.refresh_token_ttl_secs)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let host = env::var("NEWSROOM_HOST").unwrap_or(DEFAULT_HOST.to_string());
        let port = env::var("NEWSROOM_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let jwt_secret = env::var("NEWSROOM_JWT_SECRET")
            .or_else(|_| env::var("JWT_SECRET"))
            .map_err(|_| {
                AuthError::ConfigError(
                    "JWT_SECRET environment variable is required. \
                     Generate one with: openssl rand -base64 32"
                        .to_string(),
                )
            })?;

        let access_token_ttl_secs = env::var("NEWSROOM_ACCESS_TOKEN_TTL")
            .ok()
            .and_then(|t| t.parse().ok())
            .unwrap_or(DEFAULT_ACCESS_TOKEN_TTL_SECS);

        let refresh_token_ttl_secs = env::var("NEWSROOM_REFRESH_TOKEN_TTL")
            .ok()
            .and_then(|t| t.parse().ok())
            .unwrap_or(DEFAULT_REFRESH_TOKEN_TTL_SECS);

        let min_auth_millis = env::var("NEWSROOM_MIN_AUTH_MS")
            .ok()
            .and_then(|t| t.parse().ok())
            .unwrap_or(DEFAULT_MIN_AUTH_MILLIS);

        let seed_admin = match (
            env::var("NEWSROOM_ADMIN_EMAIL"),
            env::var("NEWSROOM_ADMIN_PASSWORD"),
        ) {
            (Ok(email), Ok(password)) => Some(SeedAdmin { email, password }),
            _ => None,
        };

        let config = Self {
            host,
            port,
            jwt_secret,
            access_token_ttl_secs,
            refresh_token_ttl_secs,
            min_auth_duration: Duration::from_millis(min_auth_millis),
            seed_admin,
        };
        config.validate()?;

        Ok(config)
    }
}
