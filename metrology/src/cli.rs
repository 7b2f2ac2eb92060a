// metrology/src/cli.rs
//
// Single source of truth for all CLI definitions (Clap structs).

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use metrology_core::domain::compliance::Severity;
use metrology_core::domain::violation::ViolationStatus;

#[derive(Parser)]
#[command(name = "metrology")]
#[command(about = "Legal Metrology compliance scanner for e-commerce listings", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 🔎 Scans products and records open violations
    Scan {
        /// Project directory
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        /// Product ids to scan (repeatable)
        #[arg(long = "product-id", conflicts_with_all = ["platform", "stale"])]
        product_ids: Vec<String>,

        /// Scan every product of a platform
        #[arg(long, conflicts_with = "stale")]
        platform: Option<String>,

        /// Scan products not updated recently
        #[arg(long)]
        stale: bool,

        /// Age threshold for --stale (defaults to scan.default_stale_days)
        #[arg(long, requires = "stale")]
        days: Option<u32>,

        /// Write the full JSON report to this file
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// 🧪 Evaluates one product without recording anything
    Check {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        #[arg(long)]
        product_id: String,
    },

    /// 📊 Violation counts recorded for one product
    Summary {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        #[arg(long)]
        product_id: String,
    },

    /// 📜 Lists the active rules
    Rules {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        /// Only rules that apply to this category name
        #[arg(long)]
        category: Option<String>,
    },

    /// 📋 Lists recorded violations, newest first
    Violations {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        #[arg(long)]
        product_id: Option<String>,

        #[arg(long)]
        status: Option<ViolationStatus>,

        #[arg(long)]
        severity: Option<Severity>,

        #[arg(long)]
        assigned_to: Option<String>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// 🙋 Assigns a violation and moves it to investigating
    Assign {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        #[arg(long)]
        violation_id: String,

        #[arg(long)]
        user: String,
    },

    /// ✅ Marks a violation resolved
    Resolve {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        #[arg(long)]
        violation_id: String,

        #[arg(long)]
        notes: Option<String>,
    },

    /// 🚫 Dismisses a violation
    Dismiss {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        #[arg(long)]
        violation_id: String,

        #[arg(long)]
        notes: Option<String>,
    },

    /// 📈 Totals, breakdowns and a 30 day trend
    Stats {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        #[arg(long)]
        product_id: Option<String>,
    },

    /// 📥 Loads categories and products from a YAML or JSON catalog
    Import {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        #[arg(long)]
        file: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, bail};
    use clap::Parser;

    #[test]
    fn test_cli_parse_scan_products() -> Result<()> {
        let args = Cli::parse_from([
            "metrology",
            "scan",
            "--product-id",
            "p1",
            "--product-id",
            "p2",
            "--project-dir",
            "/tmp",
        ]);
        match args.command {
            Commands::Scan {
                project_dir,
                product_ids,
                platform,
                stale,
                ..
            } => {
                assert_eq!(project_dir.to_string_lossy(), "/tmp");
                assert_eq!(product_ids, vec!["p1", "p2"]);
                assert_eq!(platform, None);
                assert!(!stale);
                Ok(())
            }
            _ => bail!("Expected Scan command"),
        }
    }

    #[test]
    fn test_cli_parse_scan_stale_days() -> Result<()> {
        let args = Cli::parse_from(["metrology", "scan", "--stale", "--days", "14"]);
        match args.command {
            Commands::Scan { stale, days, .. } => {
                assert!(stale);
                assert_eq!(days, Some(14));
                Ok(())
            }
            _ => bail!("Expected Scan command"),
        }
    }

    #[test]
    fn test_cli_rejects_conflicting_targets() {
        let parsed = Cli::try_parse_from(["metrology", "scan", "--platform", "amz", "--stale"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_cli_parse_violation_filters() -> Result<()> {
        let args = Cli::parse_from([
            "metrology",
            "violations",
            "--status",
            "open",
            "--severity",
            "critical",
        ]);
        match args.command {
            Commands::Violations {
                status, severity, json, ..
            } => {
                assert_eq!(status, Some(ViolationStatus::Open));
                assert_eq!(severity, Some(Severity::Critical));
                assert!(!json);
                Ok(())
            }
            _ => bail!("Expected Violations command"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_status() {
        let parsed = Cli::try_parse_from(["metrology", "violations", "--status", "closed"]);
        assert!(parsed.is_err());
    }
}
