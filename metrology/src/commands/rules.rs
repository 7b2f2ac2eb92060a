// metrology/src/commands/rules.rs
//
// USE CASE: Show the rule registry as configured for this project.

use anyhow::Context;
use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL};
use std::path::PathBuf;

use metrology_core::application::build_engine;
use metrology_core::infrastructure::config::load_project_config;

pub fn execute(project_dir: PathBuf, category: Option<String>) -> anyhow::Result<()> {
    let config = load_project_config(&project_dir).with_context(|| {
        format!(
            "Failed to load project configuration from {:?}",
            project_dir
        )
    })?;
    let engine = build_engine(&config.rules).context("Invalid rule configuration")?;

    let rules = match &category {
        Some(name) => engine.rules_for_category(name),
        None => engine.all_rules(),
    };

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Id", "Severity", "Categories", "Reads", "Description"]);

    for rule in &rules {
        let def = rule.definition();
        let scope = if def.categories.is_empty() {
            "all".to_string()
        } else {
            def.categories.join(", ")
        };
        table.add_row(vec![
            def.id.clone(),
            def.severity.to_string(),
            scope,
            def.reads.join(", "),
            def.description.clone(),
        ]);
    }

    println!("{table}");
    println!("{} rules", rules.len());
    Ok(())
}
