//! Authentication and authorization module

pub mod guard;
pub mod password;
pub mod session;
pub mod token;
pub mod user;

use std::sync::Arc;

use crate::config::AuthConfig;
use crate::storage::CredentialStore;

// Re-export main components
pub use guard::{authorize, Authenticator, RequestContext, RouteAccess};
pub use password::PasswordHasher;
pub use session::{SessionIssuer, TokenPair};
pub use token::{extract_bearer_token, Claims, TokenCodec};
pub use user::{Identity, Role};

/// Shared auth services, built once at startup
#[derive(Clone)]
pub struct AuthState {
    pub config: Arc<AuthConfig>,
    pub codec: Arc<TokenCodec>,
    pub authenticator: Arc<Authenticator>,
    pub sessions: Arc<SessionIssuer>,
}

impl AuthState {
    pub fn new(config: AuthConfig, store: Arc<dyn CredentialStore>) -> Self {
        let codec = Arc::new(TokenCodec::from_config(&config));
        let authenticator = Arc::new(Authenticator::new(codec.clone()));
        let sessions = Arc::new(SessionIssuer::new(&config, codec.clone(), store));

        Self {
            config: Arc::new(config),
            codec,
            authenticator,
            sessions,
        }
    }
}
