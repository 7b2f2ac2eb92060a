// metrology/src/commands/check.rs
//
// USE CASE: Dry-run evaluation of one product.

use std::path::PathBuf;

use super::{Workspace, print_json};

pub async fn execute(project_dir: PathBuf, product_id: String) -> anyhow::Result<()> {
    let workspace = Workspace::open(&project_dir)?;
    let result = workspace.detector()?.check_product(&product_id).await?;
    print_json(&result)
}
