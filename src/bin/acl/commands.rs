use clap::{Args, Subcommand};
use kafka_acl::config::OutputFormat;
use kafka_acl::security::acl::{
    build_query_filter, AclBinding, AclEntry, AclFilter, BindingAssembler, BindingRequest, QueryRequest,
    ResourcePattern, ResourceSelector,
};
use kafka_acl::security::auth::{DirectorySnapshot, PrincipalResolver};
use kafka_acl::{AclError, Result};
use serde::Serialize;
use tracing::{debug, info};

use super::formatters::{print_info, print_output};

/// Column order for ACL output
pub const ACL_COLUMNS: [&str; 7] = [
    "principal",
    "permission",
    "operation",
    "resource_type",
    "resource_name",
    "pattern_type",
    "host",
];

#[derive(Subcommand)]
pub enum AclCommands {
    /// Build ACLs to create
    Create(AclCreateCommand),
    /// Build filters deleting specific ACLs
    Delete(AclDeleteCommand),
    /// Build a filter listing matching ACLs
    List(AclListCommand),
}

#[derive(Args, Debug, Clone, Default)]
pub struct ResourceArgs {
    /// Apply to the whole cluster
    #[arg(long)]
    pub cluster_scope: bool,
    /// Topic name
    #[arg(long)]
    pub topic: Option<String>,
    /// Consumer group ID
    #[arg(long)]
    pub consumer_group: Option<String>,
    /// Transactional ID
    #[arg(long)]
    pub transactional_id: Option<String>,
    /// Treat the resource name as a prefix
    #[arg(long)]
    pub prefix: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct PrincipalArgs {
    /// Service account resource ID, e.g. sa-123
    #[arg(long)]
    pub service_account: Option<String>,
    /// Principal, e.g. User:u-abc
    #[arg(long)]
    pub principal: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct PermissionArgs {
    /// Grant access
    #[arg(long)]
    pub allow: bool,
    /// Deny access
    #[arg(long)]
    pub deny: bool,
}

#[derive(Args, Debug, Clone)]
pub struct AclCreateCommand {
    #[command(flatten)]
    pub resource: ResourceArgs,
    #[command(flatten)]
    pub permission: PermissionArgs,
    #[command(flatten)]
    pub principal: PrincipalArgs,
    /// Operations (comma-separated)
    #[arg(long = "operations", alias = "operation")]
    pub operations: Vec<String>,
}

#[derive(Args, Debug, Clone)]
pub struct AclDeleteCommand {
    #[command(flatten)]
    pub resource: ResourceArgs,
    #[command(flatten)]
    pub permission: PermissionArgs,
    #[command(flatten)]
    pub principal: PrincipalArgs,
    /// Operations (comma-separated)
    #[arg(long = "operations", alias = "operation")]
    pub operations: Vec<String>,
}

#[derive(Args, Debug, Clone)]
pub struct AclListCommand {
    #[command(flatten)]
    pub resource: ResourceArgs,
    #[command(flatten)]
    pub permission: PermissionArgs,
    #[command(flatten)]
    pub principal: PrincipalArgs,
    /// Operation to match
    #[arg(long)]
    pub operation: Option<String>,
}

impl From<&ResourceArgs> for ResourceSelector {
    fn from(args: &ResourceArgs) -> Self {
        ResourceSelector {
            cluster_scope: args.cluster_scope,
            topic: args.topic.clone(),
            consumer_group: args.consumer_group.clone(),
            transactional_id: args.transactional_id.clone(),
            prefix: args.prefix,
        }
    }
}

fn binding_request(
    resource: &ResourceArgs,
    permission: &PermissionArgs,
    principal: &PrincipalArgs,
    operations: &[String],
) -> BindingRequest {
    BindingRequest {
        resource: resource.into(),
        allow: permission.allow,
        deny: permission.deny,
        service_account: principal.service_account.clone(),
        principal: principal.principal.clone(),
        operations: operations.to_vec(),
    }
}

impl AclCreateCommand {
    pub fn request(&self) -> BindingRequest {
        binding_request(&self.resource, &self.permission, &self.principal, &self.operations)
    }
}

impl AclDeleteCommand {
    pub fn request(&self) -> BindingRequest {
        binding_request(&self.resource, &self.permission, &self.principal, &self.operations)
    }
}

impl AclListCommand {
    pub fn request(&self) -> QueryRequest {
        QueryRequest {
            resource: (&self.resource).into(),
            allow: self.permission.allow,
            deny: self.permission.deny,
            service_account: self.principal.service_account.clone(),
            principal: self.principal.principal.clone(),
            operation: self.operation.clone(),
        }
    }
}

/// One output row, with the principal shown by resource ID
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AclRow {
    pub principal: String,
    pub permission: String,
    pub operation: String,
    pub resource_type: String,
    pub resource_name: String,
    pub pattern_type: String,
    pub host: String,
}

impl AclRow {
    pub fn new(pattern: &ResourcePattern, entry: &AclEntry, resolver: &PrincipalResolver<'_>) -> Self {
        let principal = if entry.principal.is_empty() {
            "any".to_string()
        } else {
            resolver.display_principal(&entry.principal)
        };
        let resource_name = if pattern.name.is_empty() {
            "any".to_string()
        } else {
            pattern.name.clone()
        };

        Self {
            principal,
            permission: entry.permission_type.to_string(),
            operation: entry.operation.to_string(),
            resource_type: pattern.resource_type.to_string(),
            resource_name,
            pattern_type: pattern.pattern_type.to_string(),
            host: entry.host.clone(),
        }
    }

    pub fn from_binding(binding: &AclBinding, resolver: &PrincipalResolver<'_>) -> Self {
        Self::new(&binding.pattern, &binding.entry, resolver)
    }

    pub fn from_filter(filter: &AclFilter, resolver: &PrincipalResolver<'_>) -> Self {
        Self::new(&filter.pattern_filter, &filter.entry_filter, resolver)
    }
}

/// Settings shared by every command
pub struct CommandContext {
    pub snapshot: DirectorySnapshot,
    pub format: OutputFormat,
    pub no_color: bool,
}

/// Rows the command would send, or every validation failure
pub fn plan_acl_command(cmd: &AclCommands, snapshot: &DirectorySnapshot) -> Result<Vec<AclRow>> {
    let resolver = PrincipalResolver::new(snapshot);
    let assembler = BindingAssembler::new(resolver);

    let rows = match cmd {
        AclCommands::Create(args) => assembler
            .bindings(&args.request())?
            .iter()
            .map(|b| AclRow::from_binding(b, &resolver))
            .collect(),
        AclCommands::Delete(args) => assembler
            .delete_filters(&args.request())?
            .iter()
            .map(|f| AclRow::from_filter(f, &resolver))
            .collect(),
        AclCommands::List(args) => {
            let filter = build_query_filter(&args.request(), &resolver)?;
            vec![AclRow::from_filter(&filter, &resolver)]
        }
    };

    Ok(rows)
}

pub fn execute_acl_command(cmd: &AclCommands, ctx: &CommandContext) -> Result<()> {
    let rows = plan_acl_command(cmd, &ctx.snapshot)?;

    match cmd {
        AclCommands::Create(_) => info!("Prepared {} ACL binding(s) to create", rows.len()),
        AclCommands::Delete(_) => info!("Prepared {} ACL filter(s) to delete", rows.len()),
        AclCommands::List(_) => debug!("Prepared ACL list filter"),
    }

    print_output(&rows, &ACL_COLUMNS, ctx.format, ctx.no_color)
        .map_err(|e| AclError::Output(e.to_string()))?;

    if ctx.format == OutputFormat::Table {
        print_info("No transport configured; requests were not sent", ctx.no_color);
    }

    Ok(())
}
