// metrology/src/commands/summary.rs

use std::path::PathBuf;

use super::{Workspace, print_json};

pub async fn execute(project_dir: PathBuf, product_id: String) -> anyhow::Result<()> {
    let workspace = Workspace::open(&project_dir)?;
    let summary = workspace
        .detector()?
        .product_compliance_summary(&product_id)
        .await?;
    print_json(&summary)
}
