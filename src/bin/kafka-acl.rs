use clap::Parser;
use kafka_acl::config::{CliConfig, OutputFormat};
use kafka_acl::security::auth::{DirectorySnapshot, FileDirectory};
use kafka_acl::AclError;
use std::path::PathBuf;
use tracing::{debug, info};

mod acl;

use acl::{execute_acl_command, print_error, AclCommands, CommandContext};

#[derive(Parser)]
#[command(name = "kafka-acl")]
#[command(about = "Build Kafka ACL bindings and filters from command-line intent")]
#[command(version)]
pub struct Cli {
    /// Configuration file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory snapshot (JSON) used to resolve principals
    #[arg(long)]
    pub directory: Option<PathBuf>,

    /// Output format
    #[arg(long)]
    pub format: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: AclCommands,
}

fn load_config(cli: &Cli) -> anyhow::Result<CliConfig> {
    let mut config = match &cli.config {
        Some(path) => CliConfig::from_file(&path.to_string_lossy())?,
        None => CliConfig::default(),
    };

    // Flags win over the file
    if let Some(directory) = &cli.directory {
        config.directory.path = Some(directory.clone());
    }
    if let Some(format) = cli.format {
        config.output.format = format;
    }
    if cli.no_color {
        config.output.no_color = true;
    }
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }

    config.validate()?;
    Ok(config)
}

async fn load_snapshot(config: &CliConfig) -> anyhow::Result<DirectorySnapshot> {
    match &config.directory.path {
        Some(path) => {
            let snapshot = DirectorySnapshot::fetch(&FileDirectory::new(path)).await?;
            debug!("Loaded {} principals from {}", snapshot.len(), path.display());
            Ok(snapshot)
        }
        None => {
            info!("No directory configured; principals cannot be resolved");
            Ok(DirectorySnapshot::default())
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            print_error(&e.to_string(), cli.no_color);
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_max_level(config.logging.tracing_level())
        .with_writer(std::io::stderr)
        .init();

    let ctx = CommandContext {
        snapshot: load_snapshot(&config).await?,
        format: config.output.format,
        no_color: config.output.no_color,
    };

    if let Err(e) = execute_acl_command(&cli.command, &ctx) {
        match e {
            AclError::Validation(errors) => {
                for error in &errors {
                    print_error(&error.to_string(), ctx.no_color);
                }
            }
            other => print_error(&other.to_string(), ctx.no_color),
        }
        std::process::exit(1);
    }

    Ok(())
}
