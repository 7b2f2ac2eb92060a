// metrology-core/src/domain/catalog/category.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-requirement switch inside a category's `compliance_rules`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementConfig {
    #[serde(default)]
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub compliance_rules: BTreeMap<String, RequirementConfig>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Category {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            compliance_rules: BTreeMap::new(),
            created_at: Utc::now(),
        }
    }

    /// Builder-style helper: marks `requirement` as required.
    pub fn requiring(mut self, requirement: &str) -> Self {
        self.compliance_rules.insert(
            requirement.to_string(),
            RequirementConfig { required: true },
        );
        self
    }

    /// An absent key never requires anything.
    pub fn requires(&self, requirement: &str) -> bool {
        self.compliance_rules
            .get(requirement)
            .is_some_and(|r| r.required)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn test_requirements_parse_from_yaml() -> Result<()> {
        let yaml = r#"
id: cat-food
name: Food & Beverages
compliance_rules:
  weight_declaration: { required: true }
  warranty: { required: false }
  country_of_origin: {}
"#;
        let category: Category = serde_yaml::from_str(yaml)?;
        assert!(category.requires("weight_declaration"));
        assert!(!category.requires("warranty"));
        assert!(!category.requires("country_of_origin"));
        assert!(!category.requires("manufacturer_details"));
        Ok(())
    }
}
