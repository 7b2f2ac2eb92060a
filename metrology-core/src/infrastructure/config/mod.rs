pub mod catalog;
pub mod project;

pub use crate::domain::project::ProjectConfig;
pub use catalog::{CatalogFile, load_catalog};
pub use project::{database_location, load_project_config};
