// metrology-core/src/infrastructure/adapters/memory.rs

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::BTreeMap;
#[cfg(test)]
use std::collections::HashSet;
use std::sync::Arc;

use crate::domain::catalog::{Category, Product};
use crate::domain::error::DomainError;
use crate::domain::violation::Violation;
use crate::error::MetrologyError;
#[cfg(test)]
use crate::infrastructure::error::{DatabaseError, InfrastructureError};
use crate::ports::store::{ProductFilter, ProductRepository, ViolationFilter, ViolationRepository};

/// Process-local store. Cloning shares the same records.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    products: RwLock<BTreeMap<String, Product>>,
    categories: RwLock<BTreeMap<String, Category>>,
    violations: RwLock<Vec<Violation>>,
    #[cfg(test)]
    rejected_products: RwLock<HashSet<String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every violation insert for `product_id` fail with a store error.
    #[cfg(test)]
    pub(crate) fn reject_inserts_for(&self, product_id: &str) {
        self.inner
            .rejected_products
            .write()
            .insert(product_id.to_string());
    }

    #[cfg(test)]
    fn rejection(&self, product_id: &str) -> Option<MetrologyError> {
        self.inner
            .rejected_products
            .read()
            .contains(product_id)
            .then(|| {
                InfrastructureError::Database(DatabaseError::Rejected(format!(
                    "product {}",
                    product_id
                )))
                .into()
            })
    }

    #[cfg(not(test))]
    fn rejection(&self, _product_id: &str) -> Option<MetrologyError> {
        None
    }

    pub fn violation_count(&self) -> usize {
        self.inner.violations.read().len()
    }
}

/// Newest first; ties broken by id so both adapters list identically.
fn newest_first(mut violations: Vec<Violation>) -> Vec<Violation> {
    violations.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| a.id.cmp(&b.id))
    });
    violations
}

#[async_trait]
impl ProductRepository for InMemoryStore {
    async fn get_product_by_id(
        &self,
        id: &str,
    ) -> Result<Option<(Product, Option<Category>)>, MetrologyError> {
        let Some(product) = self.inner.products.read().get(id).cloned() else {
            return Ok(None);
        };
        let category = product
            .category_id
            .as_deref()
            .and_then(|cid| self.inner.categories.read().get(cid).cloned());
        Ok(Some((product, category)))
    }

    async fn list_product_ids(&self, filter: &ProductFilter) -> Result<Vec<String>, MetrologyError> {
        let products = self.inner.products.read();
        Ok(products
            .values()
            .filter(|p| match filter {
                ProductFilter::All => true,
                ProductFilter::Platform(platform_id) => &p.platform_id == platform_id,
                ProductFilter::UpdatedBefore(cutoff) => p.updated_at < *cutoff,
            })
            .map(|p| p.id.clone())
            .collect())
    }

    async fn upsert_product(&self, product: &Product) -> Result<(), MetrologyError> {
        self.inner
            .products
            .write()
            .insert(product.id.clone(), product.clone());
        Ok(())
    }

    async fn upsert_category(&self, category: &Category) -> Result<(), MetrologyError> {
        self.inner
            .categories
            .write()
            .insert(category.id.clone(), category.clone());
        Ok(())
    }

    async fn list_categories(&self) -> Result<Vec<Category>, MetrologyError> {
        Ok(self.inner.categories.read().values().cloned().collect())
    }
}

#[async_trait]
impl ViolationRepository for InMemoryStore {
    async fn insert_violation(&self, record: Violation) -> Result<Violation, MetrologyError> {
        if let Some(err) = self.rejection(&record.product_id) {
            return Err(err);
        }
        self.inner.violations.write().push(record.clone());
        Ok(record)
    }

    async fn list_violations_by_product(
        &self,
        product_id: &str,
    ) -> Result<Vec<Violation>, MetrologyError> {
        let found = self
            .inner
            .violations
            .read()
            .iter()
            .filter(|v| v.product_id == product_id)
            .cloned()
            .collect();
        Ok(newest_first(found))
    }

    async fn get_violation(&self, id: &str) -> Result<Option<Violation>, MetrologyError> {
        Ok(self
            .inner
            .violations
            .read()
            .iter()
            .find(|v| v.id == id)
            .cloned())
    }

    async fn update_violation(&self, violation: &Violation) -> Result<(), MetrologyError> {
        let mut violations = self.inner.violations.write();
        let slot = violations
            .iter_mut()
            .find(|v| v.id == violation.id)
            .ok_or_else(|| DomainError::ViolationNotFound(violation.id.clone()))?;
        *slot = violation.clone();
        Ok(())
    }

    async fn list_violations(
        &self,
        filter: &ViolationFilter,
    ) -> Result<Vec<Violation>, MetrologyError> {
        let found = self
            .inner
            .violations
            .read()
            .iter()
            .filter(|v| filter.matches(v))
            .cloned()
            .collect();
        Ok(newest_first(found))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::compliance::{Severity, ViolationDescriptor};
    use crate::domain::violation::ViolationStatus;
    use anyhow::Result;
    use chrono::{Duration, Utc};

    #[tokio::test]
    async fn test_product_join_and_filters() -> Result<()> {
        let store = InMemoryStore::new();
        store.upsert_category(&Category::new("c1", "Textiles")).await?;

        let mut shirt = Product::new("p-2", "flip", "Shirt");
        shirt.category_id = Some("c1".into());
        shirt.updated_at = Utc::now() - Duration::days(30);
        store.upsert_product(&shirt).await?;
        store.upsert_product(&Product::new("p-1", "amz", "Kettle")).await?;

        let (product, category) = store.get_product_by_id("p-2").await?.unwrap();
        assert_eq!(product.name, "Shirt");
        assert_eq!(category.unwrap().name, "Textiles");
        assert!(store.get_product_by_id("nope").await?.is_none());

        assert_eq!(store.list_product_ids(&ProductFilter::All).await?, vec!["p-1", "p-2"]);
        assert_eq!(
            store.list_product_ids(&ProductFilter::Platform("amz".into())).await?,
            vec!["p-1"]
        );
        let cutoff = Utc::now() - Duration::days(7);
        assert_eq!(
            store.list_product_ids(&ProductFilter::UpdatedBefore(cutoff)).await?,
            vec!["p-2"]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_same_timestamp_violations_list_by_id() -> Result<()> {
        let store = InMemoryStore::new();
        let now = Utc::now();
        for rule in ["ingredients_list", "expiry_date", "price_display"] {
            let finding = ViolationDescriptor::new(rule, rule, Severity::High);
            store
                .insert_violation(Violation::open("p-1", finding, now))
                .await?;
        }

        let listed = store.list_violations_by_product("p-1").await?;
        let ids: Vec<&str> = listed.iter().map(|v| v.id.as_str()).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
        Ok(())
    }

    #[tokio::test]
    async fn test_violation_update_and_filter() -> Result<()> {
        let store = InMemoryStore::new();
        let finding = ViolationDescriptor::new("price_display", "Missing MRP", Severity::High);
        let mut v = store
            .insert_violation(Violation::open("p-1", finding, Utc::now()))
            .await?;

        v.assign("officer-1")?;
        store.update_violation(&v).await?;

        let filter = ViolationFilter {
            status: Some(ViolationStatus::Investigating),
            ..Default::default()
        };
        let listed = store.list_violations(&filter).await?;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].assigned_to.as_deref(), Some("officer-1"));

        let mut ghost = v.clone();
        ghost.id = "ghost".into();
        assert!(store.update_violation(&ghost).await.unwrap_err().is_not_found());
        Ok(())
    }
}
