// metrology/src/commands/scan.rs
//
// USE CASE: Scan products and persist violations.

use anyhow::Context;
use std::path::PathBuf;

use metrology_core::application::{ScanRequest, run_scan};
use metrology_core::infrastructure::fs::write_json_report;

use super::Workspace;

pub async fn execute(
    project_dir: PathBuf,
    product_ids: Vec<String>,
    platform: Option<String>,
    stale: bool,
    days: Option<u32>,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let workspace = Workspace::open(&project_dir)?;
    let detector = workspace.detector()?;

    let request = match (platform, stale) {
        (Some(platform_id), _) => ScanRequest::platform(platform_id),
        (None, true) => ScanRequest::stale(days),
        (None, false) => ScanRequest::products(product_ids),
    };

    println!("🔎 Scanning ({:?})...", request.scan_type);
    let report = run_scan(
        &detector,
        &request,
        workspace.config.scan.default_stale_days,
    )
    .await?;

    println!(
        "   {} products scanned, {} violations recorded",
        report.products_scanned, report.violations_found
    );

    for violation in report
        .violations
        .iter()
        .take(workspace.config.scan.preview_limit)
    {
        println!(
            "   ➜ [{}] {} {}: {}",
            violation.severity, violation.product_id, violation.rule_type, violation.description
        );
    }
    if report.violations.len() > workspace.config.scan.preview_limit {
        println!(
            "   ... and {} more",
            report.violations.len() - workspace.config.scan.preview_limit
        );
    }

    for (product_id, failure) in &report.failures {
        eprintln!("   ⚠️  {} not scanned: {}", product_id, failure.message);
    }

    if let Some(path) = output {
        write_json_report(&path, &report)
            .with_context(|| format!("Failed to write report to {:?}", path))?;
        println!("📝 Report written to {}", path.display());
    }

    Ok(())
}
