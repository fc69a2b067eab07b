//! Filter Converter
//!
//! Widens partially specified bindings into filters for list and
//! delete-by-query. Widening follows Kafka's filter semantics: anything left
//! unset becomes `Any`, and the host is always `*`. It never fails.

use super::rules::{parse_operations, WILDCARD_HOST};
use super::selector::ResourceSelector;
use super::{AclBinding, AclEntry, AclOperation, PatternType, PermissionType, ResourcePattern, ResourceType};
use crate::error::{Validated, ValidationError, ValidationErrors};
use crate::security::auth::{PrincipalInput, PrincipalResolver};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Query predicate over existing ACL bindings
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AclFilter {
    pub pattern_filter: ResourcePattern,
    pub entry_filter: AclEntry,
}

impl AclFilter {
    /// Filter matching every binding
    pub fn any() -> Self {
        Self {
            pattern_filter: ResourcePattern::any(),
            entry_filter: AclEntry::any(),
        }
    }

    /// Check if `binding` is selected by this filter
    pub fn matches(&self, binding: &AclBinding) -> bool {
        self.pattern_filter.matches(&binding.pattern) && self.entry_filter.matches(&binding.entry)
    }
}

impl fmt::Display for AclFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let principal = if self.entry_filter.principal.is_empty() {
            "any principal"
        } else {
            self.entry_filter.principal.as_str()
        };
        write!(
            f,
            "{} {} {} on {} from {}",
            self.entry_filter.permission_type,
            principal,
            self.entry_filter.operation,
            self.pattern_filter,
            self.entry_filter.host
        )
    }
}

/// Widen a pattern: unset resource and pattern types become `Any`
pub fn widen_pattern(mut pattern: ResourcePattern) -> ResourcePattern {
    if pattern.resource_type == ResourceType::Unknown {
        pattern.resource_type = ResourceType::Any;
    }
    if pattern.pattern_type == PatternType::Unknown {
        pattern.pattern_type = PatternType::Any;
    }
    pattern
}

/// Widen an entry: unset operation and permission become `Any`, host is `*`
pub fn widen_entry(mut entry: AclEntry) -> AclEntry {
    if entry.operation == AclOperation::Unknown {
        entry.operation = AclOperation::Any;
    }
    if entry.permission_type == PermissionType::Unknown {
        entry.permission_type = PermissionType::Any;
    }
    entry.host = WILDCARD_HOST.to_string();
    entry
}

/// Build a filter from optional halves; an absent half matches everything
pub fn filter_from_parts(pattern: Option<ResourcePattern>, entry: Option<AclEntry>) -> AclFilter {
    AclFilter {
        pattern_filter: widen_pattern(pattern.unwrap_or_else(ResourcePattern::any)),
        entry_filter: widen_entry(entry.unwrap_or_else(AclEntry::any)),
    }
}

/// Widen a (possibly partial) binding into a filter
pub fn to_filter(binding: AclBinding) -> AclFilter {
    filter_from_parts(Some(binding.pattern), Some(binding.entry))
}

/// Widen an existing filter. Applying this twice changes nothing.
pub fn widen_filter(filter: AclFilter) -> AclFilter {
    filter_from_parts(Some(filter.pattern_filter), Some(filter.entry_filter))
}

/// List request as supplied by the user; every field is optional
#[derive(Debug, Clone, Default)]
pub struct QueryRequest {
    pub resource: ResourceSelector,
    pub allow: bool,
    pub deny: bool,
    pub service_account: Option<String>,
    pub principal: Option<String>,
    pub operation: Option<String>,
}

/// Build the single filter for a list request.
///
/// Input errors (conflicting flags, unknown principal, bad operation) are
/// still collected and reported together; unset fields are simply widened.
pub fn build_query_filter(request: &QueryRequest, resolver: &PrincipalResolver<'_>) -> Validated<AclFilter> {
    let mut errors = ValidationErrors::new();

    let pattern = request.resource.select_for_query().unwrap_or_else(|e| {
        errors.push(e);
        None
    });

    let permission_type = PermissionType::from_flags(request.allow, request.deny).unwrap_or_else(|e| {
        errors.push(e);
        PermissionType::Unknown
    });

    let principal = match PrincipalInput::from_flags(
        request.service_account.as_deref(),
        request.principal.as_deref(),
    ) {
        Ok(Some(input)) => resolver.resolve(&input).unwrap_or_else(|e| {
            errors.push(e);
            String::new()
        }),
        Ok(None) => String::new(),
        Err(e) => {
            errors.push(e);
            String::new()
        }
    };

    let operation = match &request.operation {
        Some(names) => match parse_operations([names]) {
            Ok(ops) if ops.len() == 1 => ops[0],
            Ok(_) => {
                errors.push(ValidationError::MultipleOperations(names.clone()));
                AclOperation::Unknown
            }
            Err(e) => {
                errors.append(e);
                AclOperation::Unknown
            }
        },
        None => AclOperation::Unknown,
    };

    let entry = AclEntry {
        principal,
        permission_type,
        operation,
        host: WILDCARD_HOST.to_string(),
    };

    errors.into_result(filter_from_parts(pattern, Some(entry)))
}
