use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AuthError;

/// Editorial roles known to the CMS
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Editor,
    Reporter,
    Contributor,
}

impl Role {
    /// Role given to self-registered accounts
    pub const DEFAULT: Role = Role::Contributor;

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Editor => "editor",
            Role::Reporter => "reporter",
            Role::Contributor => "contributor",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "editor" => Ok(Role::Editor),
            "reporter" => Ok(Role::Reporter),
            "contributor" => Ok(Role::Contributor),
            other => Err(AuthError::ValidationError(format!("unknown role '{}'", other))),
        }
    }
}

/// Authenticated identity attached to a single in-flight request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub subject_id: i64,
    pub email: String,
    pub role: Role,
    /// Expiry of the token the identity was decoded from (unix seconds)
    pub expires_at: i64,
}

impl Identity {
    /// Check if the identity holds one of the given roles
    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        roles.contains(&self.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_parse_case_insensitively() {
        assert_eq!("Admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!(" EDITOR ".parse::<Role>().unwrap(), Role::Editor);
        assert!("owner".parse::<Role>().is_err());
    }

    #[test]
    fn roles_serialize_lowercase() {
        let json = serde_json::to_string(&Role::Reporter).unwrap();
        assert_eq!(json, "\"reporter\"");
        let role: Role = serde_json::from_str("\"contributor\"").unwrap();
        assert_eq!(role, Role::Contributor);
    }
}
