// Fundamental configuration constants
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 4000;

// Token lifetimes in seconds
pub const DEFAULT_ACCESS_TOKEN_TTL_SECS: i64 = 3600;
pub const DEFAULT_REFRESH_TOKEN_TTL_SECS: i64 = 7 * 24 * 3600;
pub const MAX_TOKEN_TTL_SECS: i64 = 365 * 24 * 3600;

// Minimum wall time spent on a login attempt
pub const DEFAULT_MIN_AUTH_MILLIS: u64 = 100;

// Credential hashing
pub const SALT_LEN: usize = 16;
pub const MIN_PASSWORD_LEN: usize = 6;
pub const MIN_SECRET_LEN: usize = 32;
