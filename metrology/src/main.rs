// metrology/src/main.rs

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG=debug metrology scan ... to see per-product details.
    // Logs go to stderr so JSON on stdout stays pipeable.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Scan {
            project_dir,
            product_ids,
            platform,
            stale,
            days,
            output,
        } => {
            commands::scan::execute(project_dir, product_ids, platform, stale, days, output).await
        }
        Commands::Check {
            project_dir,
            product_id,
        } => commands::check::execute(project_dir, product_id).await,
        Commands::Summary {
            project_dir,
            product_id,
        } => commands::summary::execute(project_dir, product_id).await,
        Commands::Rules {
            project_dir,
            category,
        } => commands::rules::execute(project_dir, category),
        Commands::Violations {
            project_dir,
            product_id,
            status,
            severity,
            assigned_to,
            json,
        } => {
            let filter = metrology_core::ports::ViolationFilter {
                product_id,
                status,
                severity,
                assigned_to,
            };
            commands::violations::execute(project_dir, filter, json).await
        }
        Commands::Assign {
            project_dir,
            violation_id,
            user,
        } => commands::triage::assign(project_dir, violation_id, user).await,
        Commands::Resolve {
            project_dir,
            violation_id,
            notes,
        } => commands::triage::resolve(project_dir, violation_id, notes).await,
        Commands::Dismiss {
            project_dir,
            violation_id,
            notes,
        } => commands::triage::dismiss(project_dir, violation_id, notes).await,
        Commands::Stats {
            project_dir,
            product_id,
        } => commands::stats::execute(project_dir, product_id).await,
        Commands::Import { project_dir, file } => commands::import::execute(project_dir, file).await,
    }
}
