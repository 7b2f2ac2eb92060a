// metrology/src/commands/mod.rs

pub mod check;
pub mod import;
pub mod rules;
pub mod scan;
pub mod stats;
pub mod summary;
pub mod triage;
pub mod violations;

use anyhow::Context;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

use metrology_core::application::{ViolationDetector, build_engine};
use metrology_core::infrastructure::adapters::DuckDbStore;
use metrology_core::infrastructure::config::{
    ProjectConfig, database_location, load_project_config,
};

/// Loaded configuration plus an open store, shared by every subcommand.
pub struct Workspace {
    pub config: ProjectConfig,
    pub store: Arc<DuckDbStore>,
}

impl Workspace {
    pub fn open(project_dir: &Path) -> anyhow::Result<Self> {
        let config = load_project_config(project_dir).with_context(|| {
            format!(
                "Failed to load project configuration from {:?}",
                project_dir
            )
        })?;

        let db_path = database_location(project_dir, &config);
        let store = DuckDbStore::new(&db_path)
            .with_context(|| format!("Failed to open DuckDB at {}", db_path))?;
        debug!(project = %config.name, db = %db_path, "store opened");

        Ok(Self {
            config,
            store: Arc::new(store),
        })
    }

    pub fn detector(&self) -> anyhow::Result<ViolationDetector<DuckDbStore>> {
        let engine = build_engine(&self.config.rules).context("Invalid rule configuration")?;
        Ok(ViolationDetector::new(Arc::new(engine), self.store.clone())
            .with_concurrency(self.config.scan.concurrency))
    }
}

pub(crate) fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
