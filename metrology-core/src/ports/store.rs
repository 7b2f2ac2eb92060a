// metrology-core/src/ports/store.rs

// What the compliance core needs from persistence, without knowing whether the
// records live in DuckDB, in memory, or behind a hosted database.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::catalog::{Category, Product};
use crate::domain::compliance::Severity;
use crate::domain::violation::{Violation, ViolationStatus};
use crate::error::MetrologyError;

/// Selection criterion for `list_product_ids`.
#[derive(Debug, Clone, PartialEq)]
pub enum ProductFilter {
    All,
    Platform(String),
    UpdatedBefore(DateTime<Utc>),
}

/// Optional filters for violation listings. `None` means "any".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViolationFilter {
    pub product_id: Option<String>,
    pub status: Option<ViolationStatus>,
    pub severity: Option<Severity>,
    pub assigned_to: Option<String>,
}

impl ViolationFilter {
    pub fn matches(&self, violation: &Violation) -> bool {
        self.product_id
            .as_deref()
            .is_none_or(|id| violation.product_id == id)
            && self.status.is_none_or(|s| violation.status == s)
            && self.severity.is_none_or(|s| violation.severity == s)
            && self
                .assigned_to
                .as_deref()
                .is_none_or(|user| violation.assigned_to.as_deref() == Some(user))
    }
}

#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Product joined with its category (when the category id resolves).
    async fn get_product_by_id(
        &self,
        id: &str,
    ) -> Result<Option<(Product, Option<Category>)>, MetrologyError>;

    /// Ids ordered by product id.
    async fn list_product_ids(&self, filter: &ProductFilter) -> Result<Vec<String>, MetrologyError>;

    async fn upsert_product(&self, product: &Product) -> Result<(), MetrologyError>;

    async fn upsert_category(&self, category: &Category) -> Result<(), MetrologyError>;

    async fn list_categories(&self) -> Result<Vec<Category>, MetrologyError>;
}

#[async_trait]
pub trait ViolationRepository: Send + Sync {
    async fn insert_violation(&self, record: Violation) -> Result<Violation, MetrologyError>;

    async fn list_violations_by_product(
        &self,
        product_id: &str,
    ) -> Result<Vec<Violation>, MetrologyError>;

    async fn get_violation(&self, id: &str) -> Result<Option<Violation>, MetrologyError>;

    /// Persists status, assignee, resolution timestamp and notes.
    async fn update_violation(&self, violation: &Violation) -> Result<(), MetrologyError>;

    /// Newest first, ties ordered by id.
    async fn list_violations(
        &self,
        filter: &ViolationFilter,
    ) -> Result<Vec<Violation>, MetrologyError>;
}

/// Everything the detector and the triage use cases need.
pub trait ComplianceStore: ProductRepository + ViolationRepository {}

impl<T: ProductRepository + ViolationRepository> ComplianceStore for T {}
