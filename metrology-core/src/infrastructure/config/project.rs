// metrology-core/src/infrastructure/config/project.rs

use anyhow::Context;
use serde::{Deserialize, de::DeserializeOwned};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

use crate::domain::compliance::CustomRuleConfig;
use crate::domain::project::configuration::{MAX_STALE_DAYS, ProjectConfig};
use crate::infrastructure::error::InfrastructureError;

const CONFIG_CANDIDATES: [&str; 2] = ["metrology.yaml", "metrology_project_conf.yaml"];
const RULES_FRAGMENT: &str = "rules.yml";

#[instrument(skip(project_dir))]
pub fn load_project_config(project_dir: &Path) -> Result<ProjectConfig, InfrastructureError> {
    // 1. Locate the main file
    let config_path = find_main_config(project_dir)?;
    info!(path = ?config_path, "Loading project configuration");

    // 2. Base YAML
    let mut config: ProjectConfig = load_fragment(&config_path)?;

    // 3. Optional rules fragment next to the main file
    let rules_path = project_dir.join(RULES_FRAGMENT);
    if rules_path.exists() {
        load_rules_fragment(&mut config, &rules_path)?;
    }

    // 4. Environment overrides (layering)
    apply_env_overrides(&mut config);

    if config.scan.concurrency == 0 {
        return Err(InfrastructureError::ConfigError(
            "scan.concurrency must be at least 1".to_string(),
        ));
    }
    if !(1..=MAX_STALE_DAYS).contains(&config.scan.default_stale_days) {
        return Err(InfrastructureError::ConfigError(format!(
            "scan.default_stale_days must be between 1 and {}",
            MAX_STALE_DAYS
        )));
    }

    Ok(config)
}

/// Database path as DuckDB expects it: `:memory:` untouched, relative paths
/// anchored at the project directory.
pub fn database_location(project_dir: &Path, config: &ProjectConfig) -> String {
    if config.database == ":memory:" {
        return config.database.clone();
    }
    let path = Path::new(&config.database);
    if path.is_absolute() {
        config.database.clone()
    } else {
        project_dir.join(path).to_string_lossy().into_owned()
    }
}

fn find_main_config(root: &Path) -> Result<PathBuf, InfrastructureError> {
    for filename in CONFIG_CANDIDATES {
        let p = root.join(filename);
        if p.exists() {
            return Ok(p);
        }
    }
    Err(InfrastructureError::ConfigNotFound(format!(
        "No configuration file found in {:?}. Checked: {:?}",
        root, CONFIG_CANDIDATES
    )))
}

/// Typed configuration fragment loaded from a YAML file.
fn load_fragment<T: DeserializeOwned>(path: &Path) -> Result<T, InfrastructureError> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file at {:?}", path))?;
    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse YAML at {:?}", path))
        .map_err(Into::into)
}

fn load_rules_fragment(config: &mut ProjectConfig, path: &Path) -> Result<(), InfrastructureError> {
    #[derive(Deserialize)]
    struct RulesWrapper {
        #[serde(default)]
        disabled: Vec<String>,
        #[serde(default)]
        custom: Vec<CustomRuleConfig>,
    }

    let wrapper: RulesWrapper = load_fragment(path)?;
    info!(
        custom = wrapper.custom.len(),
        disabled = wrapper.disabled.len(),
        "Rules fragment loaded"
    );
    config.rules.disabled.extend(wrapper.disabled);
    config.rules.custom.extend(wrapper.custom);
    Ok(())
}

fn apply_env_overrides(config: &mut ProjectConfig) {
    if let Ok(val) = std::env::var("METROLOGY_DATABASE") {
        info!(old = ?config.database, new = ?val, "Overriding database via ENV");
        config.database = val;
    }
    if let Ok(val) = std::env::var("METROLOGY_STALE_DAYS") {
        match val.parse::<u32>() {
            Ok(days) => {
                info!(old = config.scan.default_stale_days, new = days, "Overriding stale days via ENV");
                config.scan.default_stale_days = days;
            }
            Err(_) => warn!(value = ?val, "Ignoring non-numeric METROLOGY_STALE_DAYS"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tempfile::tempdir;

    #[test]
    fn test_minimal_config_gets_defaults() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("metrology.yaml"), "name: officer-desk\n")?;

        let config = load_project_config(dir.path())?;
        assert_eq!(config.name, "officer-desk");
        assert_eq!(config.scan.default_stale_days, 7);
        assert_eq!(config.scan.concurrency, 8);
        assert!(config.rules.custom.is_empty());
        Ok(())
    }

    #[test]
    fn test_rules_fragment_is_merged() -> Result<()> {
        let dir = tempdir()?;
        fs::write(
            dir.path().join("metrology.yaml"),
            "name: desk\nrules:\n  disabled: [care_instructions]\n",
        )?;
        fs::write(
            dir.path().join("rules.yml"),
            r#"
disabled: [warranty_information]
custom:
  - id: unit_pricing
    name: Unit Price
    fields: [unit_price]
"#,
        )?;

        let config = load_project_config(dir.path())?;
        assert_eq!(
            config.rules.disabled,
            vec!["care_instructions", "warranty_information"]
        );
        assert_eq!(config.rules.custom.len(), 1);
        Ok(())
    }

    #[test]
    fn test_missing_config_is_reported() -> Result<()> {
        let dir = tempdir()?;
        let err = load_project_config(dir.path()).unwrap_err();
        assert!(matches!(err, InfrastructureError::ConfigNotFound(_)));
        Ok(())
    }

    #[test]
    fn test_stale_days_outside_bounds_are_rejected() -> Result<()> {
        let dir = tempdir()?;
        for days in ["0", "4000000000"] {
            fs::write(
                dir.path().join("metrology.yaml"),
                format!("name: desk\nscan:\n  default_stale_days: {}\n", days),
            )?;
            let err = load_project_config(dir.path()).unwrap_err();
            assert!(matches!(err, InfrastructureError::ConfigError(_)));
        }
        Ok(())
    }

    #[test]
    fn test_database_location_is_anchored() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("metrology.yaml"), "name: desk\ndatabase: data/lm.duckdb\n")?;
        let config = load_project_config(dir.path())?;

        let location = database_location(dir.path(), &config);
        assert!(location.ends_with("lm.duckdb"));
        assert!(Path::new(&location).starts_with(dir.path()));
        Ok(())
    }
}
