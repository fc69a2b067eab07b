//! Binding Assembler
//!
//! Joins the resource pattern and the expanded entries of one request into
//! ACL bindings, collecting every failure found along the way.

use super::filter::{to_filter, AclFilter};
use super::rules::{parse_operations, EntryBuilder};
use super::selector::ResourceSelector;
use super::validation::{apply_binding_defaults, validate_binding};
use super::{AclEntry, AclOperation, PatternType, PermissionType, ResourcePattern, ResourceType};
use crate::error::{Validated, ValidationErrors};
use crate::security::auth::{PrincipalInput, PrincipalResolver};

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single ACL to create or delete
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AclBinding {
    pub pattern: ResourcePattern,
    pub entry: AclEntry,
}

impl AclBinding {
    pub fn new(pattern: ResourcePattern, entry: AclEntry) -> Self {
        Self { pattern, entry }
    }
}

impl fmt::Display for AclBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} on {} from {}",
            self.entry.permission_type,
            self.entry.principal,
            self.entry.operation,
            self.pattern,
            self.entry.host
        )
    }
}

/// Create or delete request as supplied by the user
#[derive(Debug, Clone, Default)]
pub struct BindingRequest {
    pub resource: ResourceSelector,
    pub allow: bool,
    pub deny: bool,
    pub service_account: Option<String>,
    pub principal: Option<String>,
    /// Operation names; each may itself be a comma-separated list
    pub operations: Vec<String>,
}

/// Outcome of assembling one request
#[derive(Debug, Clone)]
pub struct BindingAssembly {
    request_errors: ValidationErrors,
    bindings: Vec<Validated<AclBinding>>,
}

impl BindingAssembly {
    /// Errors that apply to the request as a whole
    pub fn request_errors(&self) -> &ValidationErrors {
        &self.request_errors
    }

    /// Per-operation results, in the order the operations were listed
    pub fn bindings(&self) -> &[Validated<AclBinding>] {
        &self.bindings
    }

    /// Every distinct failure, request errors first
    pub fn errors(&self) -> ValidationErrors {
        let mut errors = self.request_errors.clone();
        for result in &self.bindings {
            if let Err(binding_errors) = result {
                errors.merge(binding_errors);
            }
        }
        errors
    }

    /// All bindings, or every failure if any binding failed.
    ///
    /// A batch is never handed out partially.
    pub fn into_result(self) -> Validated<Vec<AclBinding>> {
        let errors = self.errors();
        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(self.bindings.into_iter().filter_map(Result::ok).collect())
    }
}

/// Builds bindings for create and delete requests
#[derive(Debug, Clone, Copy)]
pub struct BindingAssembler<'a> {
    resolver: PrincipalResolver<'a>,
}

impl<'a> BindingAssembler<'a> {
    pub fn new(resolver: PrincipalResolver<'a>) -> Self {
        Self { resolver }
    }

    pub fn assemble(&self, request: &BindingRequest) -> BindingAssembly {
        let mut errors = ValidationErrors::new();

        let pattern = request.resource.select().unwrap_or_else(|e| {
            errors.push(e);
            ResourcePattern::new(ResourceType::Unknown, String::new(), PatternType::Unknown)
        });

        let permission_type = PermissionType::from_flags(request.allow, request.deny).unwrap_or_else(|e| {
            errors.push(e);
            PermissionType::Unknown
        });

        let principal = self.resolve_principal(request, &mut errors);

        let operations = parse_operations(&request.operations).unwrap_or_else(|e| {
            errors.append(e);
            Vec::new()
        });

        let builder = EntryBuilder::new(principal, permission_type);

        if operations.is_empty() {
            // No binding to attach field errors to; check a template instead.
            let mut template = AclBinding::new(pattern, builder.build(&[AclOperation::Unknown]).remove(0));
            apply_binding_defaults(&mut template);
            let field_errors = validate_binding(&template, &errors);
            errors.append(field_errors);

            return BindingAssembly {
                request_errors: errors,
                bindings: Vec::new(),
            };
        }

        let bindings = builder
            .build(&operations)
            .into_iter()
            .map(|entry| {
                let mut binding = AclBinding::new(pattern.clone(), entry);
                apply_binding_defaults(&mut binding);

                let mut binding_errors = errors.clone();
                binding_errors.append(validate_binding(&binding, &errors));
                binding_errors.into_result(binding)
            })
            .collect();

        BindingAssembly {
            request_errors: errors,
            bindings,
        }
    }

    /// Validated bindings, or every failure
    pub fn bindings(&self, request: &BindingRequest) -> Validated<Vec<AclBinding>> {
        self.assemble(request).into_result()
    }

    /// Delete path: validated bindings widened to one filter each
    pub fn delete_filters(&self, request: &BindingRequest) -> Validated<Vec<AclFilter>> {
        Ok(self.bindings(request)?.into_iter().map(to_filter).collect())
    }

    fn resolve_principal(&self, request: &BindingRequest, errors: &mut ValidationErrors) -> String {
        let input = PrincipalInput::from_flags(
            request.service_account.as_deref(),
            request.principal.as_deref(),
        );

        match input {
            Ok(Some(input)) => self.resolver.resolve(&input).unwrap_or_else(|e| {
                errors.push(e);
                String::new()
            }),
            Ok(None) => String::new(),
            Err(e) => {
                errors.push(e);
                String::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::security::auth::{DirectoryEntry, DirectorySnapshot};

    fn snapshot() -> DirectorySnapshot {
        DirectorySnapshot::from_entries(vec![DirectoryEntry::new(1, "sa-1")])
    }

    fn request() -> BindingRequest {
        BindingRequest {
            resource: ResourceSelector::topic("orders"),
            allow: true,
            service_account: Some("sa-1".to_string()),
            operations: vec!["read,write".to_string()],
            ..BindingRequest::default()
        }
    }

    #[test]
    fn test_assemble_valid_request() {
        let snapshot = snapshot();
        let assembler = BindingAssembler::new(PrincipalResolver::new(&snapshot));

        let bindings = assembler.bindings(&request()).unwrap();
        assert_eq!(bindings.len(), 2);
        assert_eq!(bindings[0].entry.operation, AclOperation::Read);
        assert_eq!(bindings[1].entry.operation, AclOperation::Write);
        assert_eq!(bindings[0].entry.principal, "User:1");
        assert_eq!(bindings[0].pattern, ResourcePattern::topic("orders"));
    }

    #[test]
    fn test_missing_principal_and_permission_reported_together() {
        let snapshot = snapshot();
        let assembler = BindingAssembler::new(PrincipalResolver::new(&snapshot));

        let mut req = request();
        req.allow = false;
        req.service_account = None;

        let errors = assembler.bindings(&req).unwrap_err();
        assert_eq!(
            errors.into_vec(),
            vec![ValidationError::MissingPrincipal, ValidationError::MissingPermission]
        );
    }

    #[test]
    fn test_each_binding_carries_its_errors() {
        let snapshot = snapshot();
        let assembler = BindingAssembler::new(PrincipalResolver::new(&snapshot));

        let mut req = request();
        req.deny = true;

        let assembly = assembler.assemble(&req);
        assert_eq!(assembly.bindings().len(), 2);
        for result in assembly.bindings() {
            let errors = result.as_ref().unwrap_err();
            assert!(errors.contains(&ValidationError::ConflictingPermission));
        }
        assert_eq!(assembly.errors().len(), 1);
    }

    #[test]
    fn test_invalid_operation_still_reports_other_fields() {
        let snapshot = snapshot();
        let assembler = BindingAssembler::new(PrincipalResolver::new(&snapshot));

        let req = BindingRequest {
            operations: vec!["fly".to_string()],
            ..BindingRequest::default()
        };

        let errors = assembler.bindings(&req).unwrap_err();
        assert!(errors.contains(&ValidationError::ResourceSelector));
        assert!(errors.contains(&ValidationError::MissingPrincipal));
        assert!(errors.contains(&ValidationError::MissingPermission));
        assert!(errors.any(|e| matches!(e, ValidationError::InvalidOperation { .. })));
        assert!(!errors.contains(&ValidationError::MissingResourceType));
    }

    #[test]
    fn test_unresolved_principal_reported_once() {
        let snapshot = snapshot();
        let assembler = BindingAssembler::new(PrincipalResolver::new(&snapshot));

        let mut req = request();
        req.service_account = Some("sa-404".to_string());

        let errors = assembler.bindings(&req).unwrap_err();
        assert_eq!(
            errors.into_vec(),
            vec![ValidationError::PrincipalNotFound("sa-404".to_string())]
        );
    }

    #[test]
    fn test_delete_filters() {
        let snapshot = snapshot();
        let assembler = BindingAssembler::new(PrincipalResolver::new(&snapshot));

        let filters = assembler.delete_filters(&request()).unwrap();
        assert_eq!(filters.len(), 2);
        assert_eq!(filters[0].entry_filter.operation, AclOperation::Read);
        assert_eq!(filters[0].pattern_filter.pattern_type, PatternType::Literal);
    }
}
