//! In-memory credential storage for development and testing
//!
//! Keeps all accounts in memory behind a single lock. Suitable for
//! development, testing, or running the API without a database.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::traits::{Credential, CredentialStore};
use crate::auth::user::Role;
use crate::error::{AuthError, Result};

#[derive(Default)]
struct Accounts {
    by_id: HashMap<i64, Credential>,
    email_index: HashMap<String, i64>,
    next_id: i64,
}

/// In-memory credential storage
#[derive(Default)]
pub struct MemoryCredentialStore {
    accounts: RwLock<Accounts>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Activate or deactivate an account
    pub async fn set_active(&self, id: i64, is_active: bool) -> Result<()> {
        let mut accounts = self.accounts.write().await;
        let account = accounts
            .by_id
            .get_mut(&id)
            .ok_or_else(|| AuthError::StorageError(format!("account {} not found", id)))?;
        account.is_active = is_active;
        Ok(())
    }

    /// Change an account's role
    pub async fn set_role(&self, id: i64, role: Role) -> Result<()> {
        let mut accounts = self.accounts.write().await;
        let account = accounts
            .by_id
            .get_mut(&id)
            .ok_or_else(|| AuthError::StorageError(format!("account {} not found", id)))?;
        account.role = role;
        Ok(())
    }

    /// Remove an account entirely
    pub async fn delete(&self, id: i64) -> Result<()> {
        let mut accounts = self.accounts.write().await;
        if let Some(account) = accounts.by_id.remove(&id) {
            accounts.email_index.remove(&account.email);
        }
        Ok(())
    }

    pub async fn len(&self) -> usize {
        self.accounts.read().await.by_id.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.accounts.read().await.by_id.is_empty()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Credential>> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .email_index
            .get(email)
            .and_then(|id| accounts.by_id.get(id))
            .cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Credential>> {
        Ok(self.accounts.read().await.by_id.get(&id).cloned())
    }

    async fn create(
        &self,
        email: &str,
        password_hash: String,
        display_name: &str,
        role: Role,
    ) -> Result<Credential> {
        // Uniqueness check and insert happen under the same write lock
        let mut accounts = self.accounts.write().await;
        if accounts.email_index.contains_key(email) {
            return Err(AuthError::EmailTaken);
        }

        accounts.next_id += 1;
        let credential = Credential {
            id: accounts.next_id,
            email: email.to_string(),
            password_hash,
            display_name: display_name.to_string(),
            role,
            is_active: true,
            created_at: Utc::now(),
        };

        accounts.email_index.insert(credential.email.clone(), credential.id);
        accounts.by_id.insert(credential.id, credential.clone());

        Ok(credential)
    }

    async fn update_password_hash(&self, id: i64, password_hash: String) -> Result<()> {
        let mut accounts = self.accounts.write().await;
        match accounts.by_id.get_mut(&id) {
            Some(account) => {
                account.password_hash = password_hash;
                Ok(())
            }
            None => Err(AuthError::StorageError(format!("account {} not found", id))),
        }
    }
}
