//! ACL Entries and Operations
//!
//! Defines the permission half of an ACL binding and the builder that expands
//! one permission decision over a list of operations.

use super::patterns::normalize_token;
use super::PermissionType;
use crate::error::{Validated, ValidationError, ValidationErrors};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Host value used by every entry; per-host targeting is not exposed.
pub const WILDCARD_HOST: &str = "*";

/// ACL entry: who, what, allow or deny, from where
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AclEntry {
    /// Principal in `User:<id>` form. Empty in a filter means any principal.
    pub principal: String,

    /// Allow or deny
    pub permission_type: PermissionType,

    /// Operation covered by this entry
    pub operation: AclOperation,

    /// Host the entry applies to
    pub host: String,
}

/// ACL operation enumeration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AclOperation {
    /// Not set, or not understood
    #[default]
    Unknown,

    /// In a filter, matches any operation
    Any,

    /// Read operation (consume messages, fetch offsets)
    Read,

    /// Write operation (produce messages)
    Write,

    /// Create operation (create topics)
    Create,

    /// Delete operation (delete topics, records)
    Delete,

    /// Alter operation (modify resources)
    Alter,

    /// Describe operation (get metadata)
    Describe,

    /// Inter-broker cluster actions
    ClusterAction,

    /// Read resource configuration
    DescribeConfigs,

    /// Modify resource configuration
    AlterConfigs,

    /// Idempotent produce
    IdempotentWrite,
}

impl AclOperation {
    /// Every concrete operation, in canonical order
    pub const CONCRETE: [AclOperation; 10] = [
        AclOperation::Read,
        AclOperation::Write,
        AclOperation::Create,
        AclOperation::Delete,
        AclOperation::Alter,
        AclOperation::Describe,
        AclOperation::ClusterAction,
        AclOperation::DescribeConfigs,
        AclOperation::AlterConfigs,
        AclOperation::IdempotentWrite,
    ];

    /// User-facing tokens, excluding the `any`/`unknown` sentinels
    pub fn valid_tokens() -> Vec<&'static str> {
        Self::CONCRETE.iter().map(|op| op.as_str()).collect()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AclOperation::Unknown => "unknown",
            AclOperation::Any => "any",
            AclOperation::Read => "read",
            AclOperation::Write => "write",
            AclOperation::Create => "create",
            AclOperation::Delete => "delete",
            AclOperation::Alter => "alter",
            AclOperation::Describe => "describe",
            AclOperation::ClusterAction => "cluster-action",
            AclOperation::DescribeConfigs => "describe-configs",
            AclOperation::AlterConfigs => "alter-configs",
            AclOperation::IdempotentWrite => "idempotent-write",
        }
    }

    fn invalid(token: &str) -> ValidationError {
        ValidationError::InvalidOperation {
            token: token.to_string(),
            valid: Self::valid_tokens().join(", "),
        }
    }
}

impl fmt::Display for AclOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AclOperation {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize_token(s);
        Self::CONCRETE
            .iter()
            .copied()
            .find(|op| op.as_str() == normalized)
            .ok_or_else(|| Self::invalid(s))
    }
}

/// Parse operation names, splitting each input on commas.
///
/// Every bad token is reported, not just the first. An empty list is itself
/// an error since a binding needs at least one operation.
pub fn parse_operations<I, S>(inputs: I) -> Validated<Vec<AclOperation>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut operations = Vec::new();
    let mut errors = ValidationErrors::new();

    for input in inputs {
        for token in input.as_ref().split(',') {
            match token.parse::<AclOperation>() {
                Ok(op) => operations.push(op),
                Err(e) => errors.push(e),
            }
        }
    }

    if operations.is_empty() && errors.is_empty() {
        errors.push(AclOperation::invalid(""));
    }

    errors.into_result(operations)
}

/// Expands one permission decision into one entry per operation.
#[derive(Debug, Clone)]
pub struct EntryBuilder {
    principal: String,
    permission_type: PermissionType,
}

impl EntryBuilder {
    /// `principal` is expected already resolved to `User:<numeric-id>`.
    /// An `Unknown` permission is kept as-is so validation can report it
    /// alongside any other problem.
    pub fn new(principal: impl Into<String>, permission_type: PermissionType) -> Self {
        Self {
            principal: principal.into(),
            permission_type,
        }
    }

    /// One entry per operation, in the order given
    pub fn build(&self, operations: &[AclOperation]) -> Vec<AclEntry> {
        operations
            .iter()
            .map(|&operation| AclEntry {
                principal: self.principal.clone(),
                permission_type: self.permission_type,
                operation,
                host: WILDCARD_HOST.to_string(),
            })
            .collect()
    }
}

impl AclEntry {
    /// Entry matching every principal, permission and operation
    pub fn any() -> Self {
        Self {
            principal: String::new(),
            permission_type: PermissionType::Any,
            operation: AclOperation::Any,
            host: WILDCARD_HOST.to_string(),
        }
    }

    /// Check if this filter entry matches a concrete entry
    pub fn matches(&self, other: &AclEntry) -> bool {
        if !self.principal.is_empty() && self.principal != other.principal {
            return false;
        }

        if !self.host.is_empty() && self.host != other.host {
            return false;
        }

        if self.operation != AclOperation::Any && self.operation != other.operation {
            return false;
        }

        self.permission_type == PermissionType::Any || self.permission_type == other.permission_type
    }
}
