//! Access Control List (ACL) Specification
//!
//! This module turns a user's intent (a resource selector, an allow or deny
//! decision, one or more operations, and a principal) into the ACL bindings
//! to create or delete, or into the filters used to list and bulk-delete
//! existing bindings. Nothing here performs I/O; every function is a pure
//! transformation over its inputs.
//!
//! ## Flow
//!
//! - [`ResourceSelector`] picks the one resource the ACL applies to
//! - [`EntryBuilder`] expands a permission over each requested operation
//! - [`BindingAssembler`] joins the two, resolves the principal and runs the
//!   shared [`validation`] rules, collecting every failure
//! - [`filter`] widens bindings or query input into [`AclFilter`] values

pub mod binding;
pub mod filter;
pub mod patterns;
pub mod policy;
pub mod rules;
pub mod selector;
pub mod validation;

pub use binding::{AclBinding, BindingAssembler, BindingAssembly, BindingRequest};
pub use filter::{build_query_filter, filter_from_parts, to_filter, widen_filter, AclFilter, QueryRequest};
pub use patterns::{PatternType, ResourcePattern, ResourceType, CLUSTER_RESOURCE_NAME};
pub use policy::PermissionType;
pub use rules::{parse_operations, AclEntry, AclOperation, EntryBuilder, WILDCARD_HOST};
pub use selector::ResourceSelector;
