//! CLI module: command parsing and dispatch
//!
//! All CLI logic lives here. `main.rs` calls `cli::run()` and maps the error
//! to an exit code with [`exit_code`].

pub mod common;
pub mod daemon;
pub mod deps;
pub mod fetch;

use std::path::PathBuf;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};

use klaunch::config::Config;
use klaunch::utils::logging::init_logging;
use klaunch::KlaunchError;

#[derive(Parser)]
#[command(name = "klaunch")]
#[command(version)]
#[command(about = "Local Kafka/MongoDB stack bootstrap helpers", long_about = None)]
struct Cli {
    /// Config file (defaults to ~/.klaunch/config.json)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Make sure the Docker daemon is running, restarting it if needed
    Daemon {
        /// Manage the desktop application instead of the system service (macOS)
        #[arg(long)]
        desktop: bool,
        /// Only report status; never restart
        #[arg(long)]
        check_only: bool,
    },
    /// Download the MongoDB Kafka connector JAR and record its version
    Fetch {
        /// Exact version (x.y.z). Prompts when omitted.
        #[arg(value_name = "VERSION", conflicts_with = "latest")]
        version: Option<String>,
        /// Use the latest published version without prompting
        #[arg(long)]
        latest: bool,
        /// Treat an already downloaded JAR as success
        #[arg(long)]
        skip_existing: bool,
    },
    /// Install local development packages through Homebrew
    Deps {
        /// Print the package table and duplicate warnings only
        #[arg(long, conflicts_with = "dry_run")]
        audit: bool,
        /// Report what would be installed without installing
        #[arg(long)]
        dry_run: bool,
    },
    /// Show version information
    Version,
}

/// Entry point for the CLI, called from main().
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    init_logging(&config.logging);

    match cli.command {
        None => {
            let mut cmd = Cli::command();
            cmd.print_help()?;
            println!();
        }
        Some(Commands::Version) => {
            cmd_version();
        }
        Some(Commands::Daemon {
            desktop,
            check_only,
        }) => {
            daemon::cmd_daemon(&config, desktop, check_only).await?;
        }
        Some(Commands::Fetch {
            version,
            latest,
            skip_existing,
        }) => {
            fetch::cmd_fetch(&config, version, latest, skip_existing).await?;
        }
        Some(Commands::Deps { audit, dry_run }) => {
            deps::cmd_deps(&config, audit, dry_run).await?;
        }
    }

    Ok(())
}

/// Process exit code for a failed run.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<KlaunchError>())
        .map(KlaunchError::exit_code)
        .unwrap_or(1)
}

/// Display version information
fn cmd_version() {
    println!("klaunch {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Local Kafka/MongoDB stack bootstrap helpers");
}
