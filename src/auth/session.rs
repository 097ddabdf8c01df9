//! Session issuance: register, login, refresh and password changes
//!
//! Every flow that hands out tokens re-reads the account from the
//! credential store, so role and activation changes take effect on the
//! next issued pair.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::auth::password::PasswordHasher;
use crate::auth::token::{Claims, TokenCodec};
use crate::auth::user::Role;
use crate::config::AuthConfig;
use crate::constants::MIN_PASSWORD_LEN;
use crate::error::{AuthError, Result};
use crate::security::AuthTimer;
use crate::security_logger::{log_security_event, SecurityEvent};
use crate::storage::{Credential, CredentialStore};

/// Access/refresh token pair handed to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
}

pub struct SessionIssuer {
    store: Arc<dyn CredentialStore>,
    codec: Arc<TokenCodec>,
    hasher: PasswordHasher,
    access_ttl_secs: i64,
    refresh_ttl_secs: i64,
    min_auth_duration: Duration,
    /// Verified against when the email is unknown so both login failures cost the same
    dummy_hash: String,
}

impl SessionIssuer {
    pub fn new(config: &AuthConfig, codec: Arc<TokenCodec>, store: Arc<dyn CredentialStore>) -> Self {
        let hasher = PasswordHasher::new();
        let dummy_hash = hasher.hash("newsroom-auth-dummy-password");

        Self {
            store,
            codec,
            hasher,
            access_ttl_secs: config.access_token_ttl_secs,
            refresh_ttl_secs: config.refresh_token_ttl_secs,
            min_auth_duration: config.min_auth_duration,
            dummy_hash,
        }
    }

    /// Create an account with an explicit role, without issuing tokens
    pub async fn provision(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
        role: Role,
    ) -> Result<Credential> {
        let email = normalize_email(email);
        let display_name = display_name.trim();
        validate_email(&email)?;
        validate_password(password)?;
        if display_name.is_empty() {
            return Err(AuthError::ValidationError(
                "display name must not be empty".to_string(),
            ));
        }

        if self.store.find_by_email(&email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let password_hash = self.hasher.hash(password);
        let credential = self
            .store
            .create(&email, password_hash, display_name, role)
            .await?;

        log_security_event(SecurityEvent::AccountRegistered {
            subject_id: credential.id,
        });
        Ok(credential)
    }

    /// Self-service registration with the default role
    pub async fn register(&self, email: &str, password: &str, display_name: &str) -> Result<TokenPair> {
        let credential = self
            .provision(email, password, display_name, Role::DEFAULT)
            .await?;
        self.issue_pair(&credential)
    }

    /// Exchange email and password for a token pair
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenPair> {
        let timer = AuthTimer::new(self.min_auth_duration);
        let result = self.check_credentials(email, password).await;
        timer.wait().await;

        let credential = result?;
        log_security_event(SecurityEvent::AuthenticationSuccess {
            subject_id: credential.id,
        });
        self.issue_pair(&credential)
    }

    async fn check_credentials(&self, email: &str, password: &str) -> Result<Credential> {
        let email = normalize_email(email);

        let credential = match self.store.find_by_email(&email).await? {
            Some(credential) => credential,
            None => {
                let _ = self.hasher.verify(password, &self.dummy_hash);
                log_security_event(SecurityEvent::AuthenticationFailed {
                    email,
                    reason: "unknown email".to_string(),
                });
                return Err(AuthError::InvalidCredentials);
            }
        };

        if !self.hasher.verify(password, &credential.password_hash) {
            log_security_event(SecurityEvent::AuthenticationFailed {
                email,
                reason: "wrong password".to_string(),
            });
            return Err(AuthError::InvalidCredentials);
        }

        if !credential.is_active {
            log_security_event(SecurityEvent::AuthenticationFailed {
                email,
                reason: "account disabled".to_string(),
            });
            return Err(AuthError::AccountDisabled);
        }

        Ok(credential)
    }

    /// Issue a fresh pair from a still-valid refresh token
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair> {
        let claims = self.codec.verify(refresh_token).map_err(|e| {
            log::debug!("Refresh token rejected: {}", e);
            AuthError::InvalidRefreshToken
        })?;

        let credential = match self.store.find_by_id(claims.subject_id).await? {
            Some(credential) if credential.is_active => credential,
            _ => return Err(AuthError::InvalidRefreshToken),
        };

        self.issue_pair(&credential)
    }

    /// Replace the password after checking the current one
    pub async fn change_password(
        &self,
        subject_id: i64,
        current_password: &str,
        new_password: &str,
    ) -> Result<()> {
        let credential = self
            .store
            .find_by_id(subject_id)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !self.hasher.verify(current_password, &credential.password_hash) {
            return Err(AuthError::InvalidCredentials);
        }
        validate_password(new_password)?;

        let password_hash = self.hasher.hash(new_password);
        self.store
            .update_password_hash(subject_id, password_hash)
            .await?;

        log_security_event(SecurityEvent::PasswordChanged { subject_id });
        Ok(())
    }

    /// Stored profile of an authenticated subject
    pub async fn profile(&self, subject_id: i64) -> Result<Credential> {
        self.store
            .find_by_id(subject_id)
            .await?
            .ok_or(AuthError::Unauthorized)
    }

    fn issue_pair(&self, credential: &Credential) -> Result<TokenPair> {
        let claims = Claims::new(credential.id, credential.email.clone(), credential.role);

        Ok(TokenPair {
            access_token: self.codec.sign(&claims, self.access_ttl_secs)?,
            refresh_token: self.codec.sign(&claims, self.refresh_ttl_secs)?,
            expires_in: self.access_ttl_secs,
        })
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn validate_email(email: &str) -> Result<()> {
    if email.is_empty() || !email.contains('@') {
        return Err(AuthError::ValidationError(
            "a valid email address is required".to_string(),
        ));
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::ValidationError(format!(
            "password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}
