use log::{error, info, warn};
use std::net::SocketAddr;
use std::sync::Arc;
use warp::Filter;

use newsroom_auth::auth::{AuthState, Role};
use newsroom_auth::config::AuthConfig;
use newsroom_auth::error::AuthError;
use newsroom_auth::handlers::auth::{handle_rejection, routes};
use newsroom_auth::security_logger::{init_security_logger, log_security_event, SecurityEvent};
use newsroom_auth::storage::MemoryCredentialStore;

#[tokio::main]
async fn main() {
    // Initialize env
    match dotenvy::dotenv() {
        Ok(_) => info!("Environment variables loaded from .env file"),
        Err(e) => warn!("Failed to load .env file: {}", e),
    };

    // Initialize logging
    env_logger::init();
    init_security_logger();

    let config = match AuthConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log_security_event(SecurityEvent::ConfigurationError {
                component: "auth".to_string(),
                error: e.to_string(),
            });
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    info!(
        "Configuration: host={}, port={}, access_ttl={}s, refresh_ttl={}s",
        config.host, config.port, config.access_token_ttl_secs, config.refresh_token_ttl_secs
    );

    let addr: SocketAddr = match format!("{}:{}", config.host, config.port).parse() {
        Ok(addr) => addr,
        Err(e) => {
            error!("Failed to parse server address: {}", e);
            std::process::exit(1);
        }
    };

    let seed_admin = config.seed_admin.clone();
    let store = Arc::new(MemoryCredentialStore::new());
    let state = AuthState::new(config, store);

    if let Some(seed) = seed_admin {
        match state
            .sessions
            .provision(&seed.email, &seed.password, "Administrator", Role::Admin)
            .await
        {
            Ok(admin) => info!("Seeded admin account {}", admin.id),
            Err(AuthError::EmailTaken) => info!("Admin account already present"),
            Err(e) => {
                error!("Failed to seed admin account: {}", e);
                std::process::exit(1);
            }
        }
    }

    let api = routes(state)
        .recover(handle_rejection)
        .with(warp::log("newsroom_auth::http"));

    info!("Starting newsroom auth API on {}", addr);
    warp::serve(api).run(addr).await;
}
