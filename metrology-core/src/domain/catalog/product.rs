// metrology-core/src/domain/catalog/product.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::raw::{RawData, RawValue};

/// A scraped listing. Rules only ever read it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub platform_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<String>,
    #[serde(default)]
    pub raw_data: RawData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default = "Utc::now")]
    pub scraped_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn new(
        id: impl Into<String>,
        platform_id: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            platform_id: platform_id.into(),
            category_id: None,
            external_id: None,
            name: name.into(),
            description: None,
            price: None,
            weight: None,
            dimensions: None,
            raw_data: RawData::new(),
            url: None,
            scraped_at: now,
            updated_at: now,
        }
    }

    pub fn raw(&self, key: &str) -> Option<&RawValue> {
        self.raw_data.get(key)
    }

    /// True if any of `keys` holds a present value in `raw_data`.
    pub fn has_raw(&self, keys: &[&str]) -> bool {
        keys.iter()
            .any(|k| self.raw(k).is_some_and(RawValue::is_present))
    }

    /// Raw value rendered as text, only when it is present.
    pub fn raw_text(&self, key: &str) -> Option<String> {
        self.raw(key)
            .filter(|v| v.is_present())
            .and_then(RawValue::as_text)
    }

    /// A zero price counts as "not displayed".
    pub fn has_price(&self) -> bool {
        self.price.is_some_and(|p| p > 0.0)
    }

    /// Structured weight, if non-blank.
    pub fn declared_weight(&self) -> Option<&str> {
        self.weight.as_deref().filter(|w| !w.trim().is_empty())
    }
}
