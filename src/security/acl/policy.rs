//! Permission Types

use super::patterns::normalize_token;
use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Whether an ACL entry grants or denies access
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PermissionType {
    /// Not set, or not understood
    #[default]
    Unknown,

    /// In a filter, matches any permission
    Any,

    /// Denies access
    Deny,

    /// Grants access
    Allow,
}

impl PermissionType {
    pub const CONCRETE: [PermissionType; 2] = [PermissionType::Allow, PermissionType::Deny];

    pub fn valid_tokens() -> Vec<&'static str> {
        Self::CONCRETE.iter().map(|p| p.as_str()).collect()
    }

    /// Permission chosen by the `--allow` / `--deny` flags.
    ///
    /// Neither flag leaves the permission `Unknown` for validation to catch.
    pub fn from_flags(allow: bool, deny: bool) -> Result<Self, ValidationError> {
        match (allow, deny) {
            (true, true) => Err(ValidationError::ConflictingPermission),
            (true, false) => Ok(PermissionType::Allow),
            (false, true) => Ok(PermissionType::Deny),
            (false, false) => Ok(PermissionType::Unknown),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionType::Unknown => "unknown",
            PermissionType::Any => "any",
            PermissionType::Deny => "deny",
            PermissionType::Allow => "allow",
        }
    }
}

impl fmt::Display for PermissionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PermissionType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "allow" => Ok(PermissionType::Allow),
            "deny" => Ok(PermissionType::Deny),
            _ => Err(ValidationError::InvalidPermission {
                token: s.to_string(),
                valid: Self::valid_tokens().join(", "),
            }),
        }
    }
}
