//! Command-line interface for user-sync
//!
//! # Usage Examples
//!
//! ## Bulk Load
//! ```bash
//! # 10M users, 10 workers, flushes of 1000 rows
//! user-sync load \
//!   --mysql-connection-string "mysql://root@localhost:3306/users_db" \
//!   --create-table
//!
//! # Print the worker plan only
//! user-sync load --total-records 105 --workers 10 --dry-run
//! ```
//!
//! ## CSV Export
//! ```bash
//! # Poll every 5s until backup.csv holds 10M rows
//! user-sync export --output backup.csv
//!
//! # Start over with the legacy fixed-page query
//! user-sync export --reset --paging fixed --max-passes 3
//! ```

use clap::{Parser, Subcommand};
use bulk_loader::LoadArgs;
use csv_exporter::ExportArgs;

#[derive(Parser)]
#[command(name = "user-sync")]
#[command(about = "Bulk-load fake users into MySQL and export them to CSV")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Insert deterministic fake users with concurrent workers
    Load(LoadArgs),

    /// Append users to a CSV file until it holds the target row count
    Export(ExportArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    // Initialize tracing, defaulting to info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Load(args) => user_sync::run_load(args).await?,
        Commands::Export(args) => user_sync::run_export(args).await?,
    }

    Ok(())
}
