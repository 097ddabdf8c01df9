use std::error::Error;
use std::fmt;

use warp::http::StatusCode;

use crate::auth::user::Role;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    // Token codec errors
    MalformedToken,
    InvalidSignature,
    TokenExpired,

    // Request pipeline errors
    Unauthorized,
    Forbidden(Vec<Role>),

    // Session errors
    InvalidCredentials,
    AccountDisabled,
    EmailTaken,
    InvalidRefreshToken,

    // Validation errors
    ValidationError(String),

    // Storage errors
    StorageError(String),

    // System errors
    TokenError(String),
    ConfigError(String),
    SystemError(String),
}

impl AuthError {
    /// HTTP status used when this error crosses the request boundary
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MalformedToken
            | Self::InvalidSignature
            | Self::TokenExpired
            | Self::Unauthorized
            | Self::InvalidCredentials
            | Self::InvalidRefreshToken => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) | Self::AccountDisabled => StatusCode::FORBIDDEN,
            Self::EmailTaken => StatusCode::CONFLICT,
            Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::StorageError(_)
            | Self::TokenError(_)
            | Self::ConfigError(_)
            | Self::SystemError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to hand back to a client.
    ///
    /// Token failures all read as a plain "Unauthorized" and infrastructure
    /// failures never leak their details.
    pub fn public_message(&self) -> String {
        match self {
            Self::MalformedToken | Self::InvalidSignature | Self::TokenExpired => {
                Self::Unauthorized.to_string()
            }
            Self::StorageError(_)
            | Self::TokenError(_)
            | Self::ConfigError(_)
            | Self::SystemError(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedToken => write!(f, "Malformed token"),
            Self::InvalidSignature => write!(f, "Invalid token signature"),
            Self::TokenExpired => write!(f, "Token expired"),
            Self::Unauthorized => write!(f, "Unauthorized"),
            Self::Forbidden(roles) => {
                let names: Vec<&str> = roles.iter().map(|r| r.as_str()).collect();
                write!(f, "Forbidden: requires one of roles [{}]", names.join(", "))
            }
            Self::InvalidCredentials => write!(f, "Invalid credentials"),
            Self::AccountDisabled => write!(f, "Account is disabled"),
            Self::EmailTaken => write!(f, "Email is already registered"),
            Self::InvalidRefreshToken => write!(f, "Invalid refresh token"),
            Self::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            Self::StorageError(msg) => write!(f, "Storage error: {}", msg),
            Self::TokenError(msg) => write!(f, "Token error: {}", msg),
            Self::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            Self::SystemError(msg) => write!(f, "System error: {}", msg),
        }
    }
}

impl Error for AuthError {}

// Generic result type for the auth core
pub type Result<T> = std::result::Result<T, AuthError>;
