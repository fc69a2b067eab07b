//! Security Module
//!
//! ACL specification and principal identity handling.
//!
//! ## Key Components
//!
//! - **ACL**: resource selection, entry expansion, binding assembly,
//!   validation and filter widening
//! - **Auth**: principal parsing plus the directory-backed resolver

pub mod acl;
pub mod auth;

// Re-export key types for convenient access
pub use acl::{
    AclBinding, AclEntry, AclFilter, AclOperation, BindingAssembler, BindingRequest, PatternType,
    PermissionType, QueryRequest, ResourcePattern, ResourceSelector, ResourceType,
};
pub use auth::{DirectorySnapshot, PrincipalDirectory, PrincipalResolver};
