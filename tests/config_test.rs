use std::env;
use std::time::Duration;

use newsroom_auth::config::AuthConfig;
use newsroom_auth::error::AuthError;

const VARS: [&str; 9] = [
    "NEWSROOM_JWT_SECRET",
    "JWT_SECRET",
    "NEWSROOM_HOST",
    "NEWSROOM_PORT",
    "NEWSROOM_ACCESS_TOKEN_TTL",
    "NEWSROOM_REFRESH_TOKEN_TTL",
    "NEWSROOM_MIN_AUTH_MS",
    "NEWSROOM_ADMIN_EMAIL",
    "NEWSROOM_ADMIN_PASSWORD",
];

fn clear_env() {
    for var in VARS {
        env::remove_var(var);
    }
}

// Environment variables are process-wide, so every case runs in one test
#[test]
fn test_config_from_env() {
    clear_env();

    // Missing secret
    let err = AuthConfig::from_env().unwrap_err();
    assert!(matches!(err, AuthError::ConfigError(_)));

    // Fallback variable name with defaults everywhere else
    env::set_var("JWT_SECRET", "fallback_signing_material_4d3c2b1a0f9e8d7c");
    let config = AuthConfig::from_env().unwrap();
    assert_eq!(config.host, "0.0.0.0");
    assert_eq!(config.port, 4000);
    assert_eq!(config.access_token_ttl_secs, 3600);
    assert_eq!(config.refresh_token_ttl_secs, 604800);
    assert_eq!(config.min_auth_duration, Duration::from_millis(100));
    assert!(config.seed_admin.is_none());

    // Prefixed name wins
    env::set_var("NEWSROOM_JWT_SECRET", "primary_signing_material_0a1b2c3d4e5f6a7b8c");
    env::set_var("NEWSROOM_HOST", "127.0.0.1");
    env::set_var("NEWSROOM_PORT", "8088");
    env::set_var("NEWSROOM_ACCESS_TOKEN_TTL", "900");
    env::set_var("NEWSROOM_REFRESH_TOKEN_TTL", "86400");
    env::set_var("NEWSROOM_MIN_AUTH_MS", "0");
    env::set_var("NEWSROOM_ADMIN_EMAIL", "root@newsroom.test");
    env::set_var("NEWSROOM_ADMIN_PASSWORD", "Bootstrap-77");
    let config = AuthConfig::from_env().unwrap();
    assert_eq!(config.jwt_secret, "primary_signing_material_0a1b2c3d4e5f6a7b8c");
    assert_eq!(config.host, "127.0.0.1");
    assert_eq!(config.port, 8088);
    assert_eq!(config.access_token_ttl_secs, 900);
    assert_eq!(config.refresh_token_ttl_secs, 86400);
    assert_eq!(config.min_auth_duration, Duration::ZERO);
    let seed = config.seed_admin.unwrap();
    assert_eq!(seed.email, "root@newsroom.test");
    assert_eq!(seed.password, "Bootstrap-77");

    // Weak secrets and inverted lifetimes are refused
    env::set_var("NEWSROOM_JWT_SECRET", "your-secret-key-goes-here-0000000000000");
    assert!(AuthConfig::from_env().is_err());

    env::set_var("NEWSROOM_JWT_SECRET", "primary_signing_material_0a1b2c3d4e5f6a7b8c");
    env::set_var("NEWSROOM_REFRESH_TOKEN_TTL", "60");
    assert!(AuthConfig::from_env().is_err());

    // Lifetimes large enough to overflow a timestamp are refused up front
    env::set_var("NEWSROOM_ACCESS_TOKEN_TTL", "9223372036854775797");
    env::set_var("NEWSROOM_REFRESH_TOKEN_TTL", "9223372036854775807");
    let err = AuthConfig::from_env().unwrap_err();
    assert!(matches!(err, AuthError::ConfigError(_)));

    clear_env();
}
