// src/domain/project/configuration.rs

use crate::domain::compliance::CustomRuleConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProjectConfig {
    pub name: String,
    #[serde(default = "default_version")]
    pub version: String,

    /// DuckDB file, relative to the project directory, or `:memory:`.
    #[serde(default = "default_database")]
    pub database: String,

    #[serde(default)]
    pub scan: ScanConfig,

    #[serde(default)]
    pub rules: RulesConfig,
}

/// Upper bound for any stale-scan age, in days.
pub const MAX_STALE_DAYS: u32 = 3650;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ScanConfig {
    #[serde(default = "default_stale_days")]
    pub default_stale_days: u32,

    /// Products scanned concurrently inside one batch.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Violations echoed by the CLI after a scan.
    #[serde(default = "default_preview_limit")]
    pub preview_limit: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            default_stale_days: default_stale_days(),
            concurrency: default_concurrency(),
            preview_limit: default_preview_limit(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct RulesConfig {
    /// Builtin rule ids to leave out of the engine.
    #[serde(default)]
    pub disabled: Vec<String>,

    #[serde(default)]
    pub custom: Vec<CustomRuleConfig>,
}

fn default_version() -> String {
    "0.1.0".to_string()
}
fn default_database() -> String {
    "metrology.duckdb".to_string()
}
fn default_stale_days() -> u32 {
    7
}
fn default_concurrency() -> usize {
    8
}
fn default_preview_limit() -> usize {
    10
}
