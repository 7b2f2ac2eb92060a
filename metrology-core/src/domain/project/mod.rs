pub mod configuration;

// Re-exports
pub use configuration::{ProjectConfig, RulesConfig, ScanConfig};
