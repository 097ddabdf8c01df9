//! Newsroom Auth - authentication and authorization core for the newsroom CMS
//!
//! This library provides password hashing, signed token issuance and
//! verification, and the request guards that protect the CMS API.

pub mod auth;
pub mod config;
pub mod constants;
pub mod error;
pub mod handlers;
pub mod security;
pub mod security_logger;
pub mod storage;

// Re-export main components
pub use auth::AuthState;
pub use config::AuthConfig;
pub use error::{AuthError, Result};
