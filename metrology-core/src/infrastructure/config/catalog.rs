// metrology-core/src/infrastructure/config/catalog.rs

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::domain::catalog::{Category, Product};
use crate::infrastructure::error::InfrastructureError;

/// Import file for `metrology import`. JSON is accepted too (YAML superset).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogFile {
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub products: Vec<Product>,
}

pub fn load_catalog(path: &Path) -> Result<CatalogFile, InfrastructureError> {
    let content = fs::read_to_string(path)?;
    let catalog: CatalogFile = serde_yaml::from_str(&content)?;
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tempfile::tempdir;

    #[test]
    fn test_load_json_catalog() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("catalog.json");
        fs::write(
            &path,
            r#"{
  "categories": [{"id": "c1", "name": "Textiles"}],
  "products": [{"id": "p1", "platform_id": "flip", "category_id": "c1",
                "name": "Shirt", "price": 799, "raw_data": {"material": "cotton"},
                "updated_at": "2026-01-01T00:00:00Z"}]
}"#,
        )?;

        let catalog = load_catalog(&path)?;
        assert_eq!(catalog.categories[0].name, "Textiles");
        assert_eq!(catalog.products[0].price, Some(799.0));
        assert!(catalog.products[0].has_raw(&["material"]));
        assert_eq!(catalog.products[0].updated_at.to_rfc3339(), "2026-01-01T00:00:00+00:00");
        Ok(())
    }
}
