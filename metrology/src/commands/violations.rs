// metrology/src/commands/violations.rs

use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL};
use std::path::PathBuf;

use metrology_core::application::list_violations;
use metrology_core::ports::ViolationFilter;

use super::{Workspace, print_json};

pub async fn execute(project_dir: PathBuf, filter: ViolationFilter, json: bool) -> anyhow::Result<()> {
    let workspace = Workspace::open(&project_dir)?;
    let violations = list_violations(workspace.store.as_ref(), &filter).await?;

    if json {
        return print_json(&violations);
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            "Id", "Product", "Rule", "Severity", "Status", "Assigned", "Created",
        ]);

    for v in &violations {
        table.add_row(vec![
            v.id.clone(),
            v.product_id.clone(),
            v.rule_type.clone(),
            v.severity.to_string(),
            v.status.to_string(),
            v.assigned_to.clone().unwrap_or_else(|| "-".to_string()),
            v.created_at.format("%Y-%m-%d %H:%M").to_string(),
        ]);
    }

    println!("{table}");
    println!("{} violations", violations.len());
    Ok(())
}
