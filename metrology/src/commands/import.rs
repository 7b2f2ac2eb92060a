// metrology/src/commands/import.rs
//
// USE CASE: Seed the store from a catalog file.

use anyhow::Context;
use std::path::PathBuf;

use metrology_core::infrastructure::config::load_catalog;
use metrology_core::ports::ProductRepository;

use super::Workspace;

pub async fn execute(project_dir: PathBuf, file: PathBuf) -> anyhow::Result<()> {
    let workspace = Workspace::open(&project_dir)?;
    let catalog =
        load_catalog(&file).with_context(|| format!("Failed to read catalog {:?}", file))?;

    // Categories first so products resolve on the next read.
    for category in &catalog.categories {
        workspace.store.upsert_category(category).await?;
    }
    for product in &catalog.products {
        workspace.store.upsert_product(product).await?;
    }

    println!(
        "📥 Imported {} categories and {} products",
        catalog.categories.len(),
        catalog.products.len()
    );
    Ok(())
}
