mod commands;
mod context;

use clap::{Parser, Subcommand};
use commands::assignment::TargetKind;
use commands::id::IdKind;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "armflow")]
#[command(about = "Azure Resource Manager identifiers, feature flags and resource lifecycle", long_about = None)]
struct Cli {
    /// Provider configuration file (defaults to discovery from the current directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Work with resource identifiers
    #[command(subcommand)]
    Id(IdCommands),
    /// Print the resolved feature flags as YAML
    Features {
        /// Allow a configuration without a `features` block
        #[arg(long)]
        legacy: bool,
    },
    /// Generate Rust model structs from a resource schema
    Generate {
        /// Schema file (YAML)
        schema: PathBuf,
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Manage maintenance configuration assignments
    #[command(subcommand)]
    Assignment(AssignmentCommands),
    /// Show version information
    Version,
}

#[derive(Subcommand)]
enum IdCommands {
    /// Parse an id and print its canonical form
    Parse {
        /// The id to parse
        id: String,
        /// Expected resource kind
        #[arg(short, long, value_enum)]
        kind: IdKind,
        /// Ignore the casing of literal path segments; composite and target assignment ids are always strict
        #[arg(long)]
        insensitive: bool,
    },
}

#[derive(Subcommand)]
enum AssignmentCommands {
    /// Assign a maintenance configuration to a target
    Create {
        /// Id of the target resource
        #[arg(long)]
        target: String,
        /// Id of the maintenance configuration
        #[arg(long)]
        configuration: String,
        /// Azure region of the assignment
        #[arg(long)]
        location: String,
        #[arg(short, long, value_enum, default_value = "virtual-machine")]
        kind: TargetKind,
    },
    /// Refresh an assignment into the state file
    Read {
        /// Assignment id
        id: String,
        #[arg(short, long, value_enum, default_value = "virtual-machine")]
        kind: TargetKind,
    },
    /// Remove an assignment
    Delete {
        /// Assignment id
        id: String,
        #[arg(short, long, value_enum, default_value = "virtual-machine")]
        kind: TargetKind,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // stdout carries command output, logs go to stderr
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let config = cli.config.as_deref();

    match cli.command {
        Commands::Version => {
            println!("armflow {}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Id(IdCommands::Parse {
            id,
            kind,
            insensitive,
        }) => {
            commands::id::handle(&id, kind, insensitive)?;
        }
        Commands::Features { legacy } => {
            commands::features::handle(config, legacy)?;
        }
        Commands::Generate { schema, output } => {
            commands::generate::handle(&schema, output.as_deref())?;
        }
        Commands::Assignment(command) => {
            let app = context::AppContext::build(config)?;
            match command {
                AssignmentCommands::Create {
                    target,
                    configuration,
                    location,
                    kind,
                } => {
                    commands::assignment::create(&app, kind, &target, &configuration, &location)
                        .await?;
                }
                AssignmentCommands::Read { id, kind } => {
                    commands::assignment::read(&app, kind, &id).await?;
                }
                AssignmentCommands::Delete { id, kind } => {
                    commands::assignment::delete(&app, kind, &id).await?;
                }
            }
        }
    }

    Ok(())
}
