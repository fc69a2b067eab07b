//! Validation Rules
//!
//! Shared by the create and delete paths. Each rule that fails appends one
//! error; no rule stops the others from running.

use super::{AclBinding, PatternType, PermissionType, ResourceType};
use crate::error::{ValidationError, ValidationErrors};

/// Fill in binding defaults: an unset pattern type becomes `Literal`.
///
/// This is the only rule that corrects instead of rejecting.
pub fn apply_binding_defaults(binding: &mut AclBinding) {
    if binding.pattern.pattern_type == PatternType::Unknown {
        binding.pattern.pattern_type = PatternType::Literal;
    }
}

/// Check a binding before it may be submitted.
///
/// `reported` holds errors already raised for the same request; a rule is
/// skipped when its field already has an error there, so a user is not told
/// twice about one missing input.
pub fn validate_binding(binding: &AclBinding, reported: &ValidationErrors) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    if binding.entry.principal.is_empty() && !reported.any(ValidationError::is_principal_error) {
        errors.push(ValidationError::MissingPrincipal);
    }

    if !matches!(
        binding.entry.permission_type,
        PermissionType::Allow | PermissionType::Deny
    ) && !reported.any(ValidationError::is_permission_error)
    {
        errors.push(ValidationError::MissingPermission);
    }

    let resource_type = binding.pattern.resource_type;
    if !reported.any(ValidationError::is_resource_error) {
        if resource_type.is_sentinel() {
            errors.push(ValidationError::MissingResourceType);
        } else if resource_type != ResourceType::Cluster && binding.pattern.name.is_empty() {
            // An empty name widens to "every resource" in a delete filter
            errors.push(ValidationError::EmptyResourceName(resource_type.as_str().to_string()));
        }
    }

    errors
}
