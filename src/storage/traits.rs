//! Abstract storage interface for account credentials
//!
//! The auth core only needs lookups by email or id, account creation, and
//! password hash replacement. Backends own durability, timeouts and retries.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::user::Role;
use crate::error::Result;

/// Stored account credential
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    pub id: i64,
    pub email: String,
    /// `salt:digest`, never the raw password
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub display_name: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Credential storage interface
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Find an account by its (normalised) email
    async fn find_by_email(&self, email: &str) -> Result<Option<Credential>>;

    /// Find an account by id
    async fn find_by_id(&self, id: i64) -> Result<Option<Credential>>;

    /// Create an account.
    ///
    /// Must fail with `AuthError::EmailTaken` when the email already exists,
    /// atomically with respect to concurrent creates.
    async fn create(
        &self,
        email: &str,
        password_hash: String,
        display_name: &str,
        role: Role,
    ) -> Result<Credential>;

    /// Replace the stored password hash
    async fn update_password_hash(&self, id: i64, password_hash: String) -> Result<()>;
}
