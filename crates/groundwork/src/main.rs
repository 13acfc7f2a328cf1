mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gw")]
#[command(about = "Idempotent cloud provisioning for serverless applications", long_about = None)]
struct Cli {
    /// AWS region
    #[arg(long, env = "AWS_REGION", global = true)]
    region: Option<String>,

    /// AWS credentials profile
    #[arg(long, env = "AWS_PROFILE", global = true)]
    profile: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Provision cloud resources
    #[command(subcommand)]
    Provision(ProvisionCommands),

    /// Stage an application directory into a deployment archive
    Build {
        /// Directory holding sources and vendored dependencies
        source: PathBuf,

        /// Archive path (defaults to <SOURCE>.tar.gz)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Upload a deployment archive as a function's new code
    Deploy {
        /// Function name
        function: String,

        /// Archive produced by `gw build`
        archive: PathBuf,
    },

    /// Check CLI installation and credentials
    Status,

    /// Show version
    Version,
}

#[derive(Subcommand)]
enum ProvisionCommands {
    /// Identity pool plus its authenticated role
    Pool {
        /// Resource directory containing config.json
        dir: PathBuf,
    },

    /// Data table plus the authenticated role's access policy for it
    Table {
        /// Resource directory containing config.json
        dir: PathBuf,

        /// Name of the identity pool the table belongs to
        #[arg(short, long)]
        pool: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt::init();

    match cli.command {
        Commands::Provision(ProvisionCommands::Pool { dir }) => {
            commands::provision::handle_pool(&dir, cli.region, cli.profile).await
        }
        Commands::Provision(ProvisionCommands::Table { dir, pool }) => {
            commands::provision::handle_table(&dir, &pool, cli.region, cli.profile).await
        }
        Commands::Build { source, output } => commands::build::handle(&source, output).await,
        Commands::Deploy { function, archive } => {
            commands::deploy::handle(&function, &archive, cli.region, cli.profile).await
        }
        Commands::Status => commands::status::handle(cli.region, cli.profile).await,
        Commands::Version => {
            println!("groundwork {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
