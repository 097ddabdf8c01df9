use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, Algorithm, DecodingKey, EncodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::auth::user::{Identity, Role};
use crate::config::AuthConfig;
use crate::error::{AuthError, Result};

/// Fixed JOSE header carried by every token we sign
const HEADER_JSON: &str = r#"{"alg":"HS256","typ":"JWT"}"#;

/// JWT claims structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (account ID)
    #[serde(rename = "sub")]
    pub subject_id: i64,
    pub email: String,
    pub role: Role,
    /// Issued at (unix seconds)
    #[serde(rename = "iat")]
    pub issued_at: i64,
    /// Expiration time (unix seconds)
    #[serde(rename = "exp")]
    pub expires_at: i64,
}

impl Claims {
    /// Creates unsigned claims; timestamps are stamped by [`TokenCodec::sign`]
    pub fn new(subject_id: i64, email: impl Into<String>, role: Role) -> Self {
        Self {
            subject_id,
            email: email.into(),
            role,
            issued_at: 0,
            expires_at: 0,
        }
    }

    pub fn into_identity(self) -> Identity {
        Identity {
            subject_id: self.subject_id,
            email: self.email,
            role: self.role,
            expires_at: self.expires_at,
        }
    }
}

/// Signs and verifies HS256 tokens with a server-held secret
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    /// Creates a codec with a secret
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against our own clock after the signature passes
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(&config.jwt_secret)
    }

    /// Sign claims valid for `ttl_secs` from now
    pub fn sign(&self, claims: &Claims, ttl_secs: i64) -> Result<String> {
        self.sign_at(claims, ttl_secs, now_unix())
    }

    /// Sign claims as if issued at `now` (unix seconds)
    pub fn sign_at(&self, claims: &Claims, ttl_secs: i64, now: i64) -> Result<String> {
        let expires_at = now
            .checked_add(ttl_secs)
            .ok_or_else(|| AuthError::TokenError("Token lifetime out of range".to_string()))?;
        let stamped = Claims {
            issued_at: now,
            expires_at,
            ..claims.clone()
        };

        let payload = serde_json::to_vec(&stamped)
            .map_err(|e| AuthError::TokenError(format!("Failed to encode claims: {}", e)))?;

        let message = format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(HEADER_JSON),
            URL_SAFE_NO_PAD.encode(payload)
        );

        let signature =
            jsonwebtoken::crypto::sign(message.as_bytes(), &self.encoding_key, Algorithm::HS256)
                .map_err(|e| AuthError::TokenError(format!("Failed to sign token: {}", e)))?;

        Ok(format!("{}.{}", message, signature))
    }

    /// Validates a token and returns its claims
    pub fn verify(&self, token: &str) -> Result<Claims> {
        self.verify_at(token, now_unix())
    }

    /// Validates a token against the given clock reading (unix seconds)
    pub fn verify_at(&self, token: &str, now: i64) -> Result<Claims> {
        if token.split('.').count() != 3 {
            return Err(AuthError::MalformedToken);
        }

        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    AuthError::InvalidSignature
                }
                _ => AuthError::MalformedToken,
            })?;

        if claims.expires_at <= now {
            return Err(AuthError::TokenExpired);
        }

        Ok(claims)
    }
}

/// Extracts the token from an `Authorization: Bearer <token>` header value
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    let token = auth_header.strip_prefix("Bearer ")?.trim();
    if token.is_empty() || token.contains(char::is_whitespace) {
        None
    } else {
        Some(token)
    }
}

pub fn now_unix() -> i64 {
    chrono::Utc::now().timestamp()
}
