//! Principal Identity
//!
//! Directory snapshots and the resolver that maps between human-facing
//! resource IDs and the numeric identities ACL principals carry.

pub mod directory;
pub mod principal;

pub use directory::{DirectoryEntry, DirectorySnapshot, FileDirectory, PrincipalDirectory, StaticDirectory};
pub use principal::{format_principal, parse_principal, PrincipalInput, PrincipalResolver, PRINCIPAL_PREFIX};
