// metrology/src/commands/stats.rs

use chrono::Utc;
use std::path::PathBuf;

use metrology_core::application::violation_stats;
use metrology_core::ports::ViolationFilter;

use super::{Workspace, print_json};

pub async fn execute(project_dir: PathBuf, product_id: Option<String>) -> anyhow::Result<()> {
    let workspace = Workspace::open(&project_dir)?;
    let filter = ViolationFilter {
        product_id,
        ..Default::default()
    };
    let stats = violation_stats(workspace.store.as_ref(), &filter, Utc::now()).await?;
    print_json(&stats)
}
