//! Principal Parsing and Resolution
//!
//! Principals reach ACLs as `User:<numeric-id>`. People refer to accounts by
//! resource ID (`sa-123`, `u-abc`), so every principal given on the command
//! line is resolved through a [`DirectorySnapshot`] first, and every
//! principal shown back is translated the other way.

use super::directory::DirectorySnapshot;
use crate::error::ValidationError;

/// Prefix every principal carries
pub const PRINCIPAL_PREFIX: &str = "User:";

/// Principal as supplied by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrincipalInput {
    /// Bare service account resource ID, e.g. `sa-123`
    ServiceAccount(String),
    /// Prefixed principal, e.g. `User:u-abc`
    Principal(String),
}

impl PrincipalInput {
    /// Pick the principal from the `--service-account` / `--principal` flags.
    ///
    /// `Ok(None)` when neither is set; validation reports that later.
    pub fn from_flags(
        service_account: Option<&str>,
        principal: Option<&str>,
    ) -> Result<Option<Self>, ValidationError> {
        match (service_account, principal) {
            (Some(_), Some(_)) => Err(ValidationError::ConflictingPrincipal),
            (Some(sa), None) => Ok(Some(PrincipalInput::ServiceAccount(sa.to_string()))),
            (None, Some(p)) => Ok(Some(PrincipalInput::Principal(p.to_string()))),
            (None, None) => Ok(None),
        }
    }
}

/// Extract the resource ID from a `User:<resource-id>` principal.
///
/// A suffix made only of digits is rejected: it reads like an unresolved
/// legacy numeric ID.
pub fn parse_principal(principal: &str) -> Result<&str, ValidationError> {
    let malformed = |reason: &str| ValidationError::MalformedPrincipal {
        principal: principal.to_string(),
        reason: reason.to_string(),
    };

    let resource_id = principal
        .strip_prefix(PRINCIPAL_PREFIX)
        .ok_or_else(|| malformed("principal must begin with \"User:\""))?;

    if resource_id.is_empty() {
        return Err(malformed("principal must name a user or service account"));
    }

    if resource_id.chars().all(|c| c.is_ascii_digit()) {
        return Err(malformed("numeric IDs are not accepted, use a resource ID instead"));
    }

    Ok(resource_id)
}

/// Principal string for a numeric identity
pub fn format_principal(id: i32) -> String {
    format!("{}{}", PRINCIPAL_PREFIX, id)
}

/// Lookups between resource IDs and numeric identities
#[derive(Debug, Clone, Copy)]
pub struct PrincipalResolver<'a> {
    snapshot: &'a DirectorySnapshot,
}

impl<'a> PrincipalResolver<'a> {
    pub fn new(snapshot: &'a DirectorySnapshot) -> Self {
        Self { snapshot }
    }

    /// Numeric identity for a resource ID
    pub fn resource_id_to_principal_id(&self, resource_id: &str) -> Result<i32, ValidationError> {
        self.snapshot
            .id_for(resource_id)
            .ok_or_else(|| ValidationError::PrincipalNotFound(resource_id.to_string()))
    }

    /// Resource ID for a numeric identity; only used when rendering output
    pub fn principal_id_to_resource_id(&self, id: i32) -> Option<&'a str> {
        self.snapshot.resource_id_for(id)
    }

    /// Resolve user input to a `User:<numeric-id>` principal
    pub fn resolve(&self, input: &PrincipalInput) -> Result<String, ValidationError> {
        let resource_id = match input {
            PrincipalInput::ServiceAccount(sa) => sa.as_str(),
            PrincipalInput::Principal(p) => parse_principal(p)?,
        };

        self.resource_id_to_principal_id(resource_id).map(format_principal)
    }

    /// Render `User:<numeric-id>` back as `User:<resource-id>`.
    ///
    /// Anything that does not resolve is returned unchanged.
    pub fn display_principal(&self, principal: &str) -> String {
        principal
            .strip_prefix(PRINCIPAL_PREFIX)
            .and_then(|id| id.parse::<i32>().ok())
            .and_then(|id| self.principal_id_to_resource_id(id))
            .map(|resource_id| format!("{}{}", PRINCIPAL_PREFIX, resource_id))
            .unwrap_or_else(|| principal.to_string())
    }
}
