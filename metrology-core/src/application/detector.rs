// metrology-core/src/application/detector.rs

use chrono::{DateTime, Duration, Utc};
use futures::{StreamExt, stream};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use crate::domain::compliance::{ComplianceEngine, ComplianceResult};
use crate::domain::error::DomainError;
use crate::domain::violation::{ComplianceSummary, Violation};
use crate::error::MetrologyError;
use crate::ports::store::{ComplianceStore, ProductFilter};

pub const DEFAULT_CONCURRENCY: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanFailureKind {
    NotFound,
    Store,
}

/// Why one product of a batch produced no violations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanFailure {
    pub kind: ScanFailureKind,
    pub message: String,
}

impl From<&MetrologyError> for ScanFailure {
    fn from(err: &MetrologyError) -> Self {
        let kind = if err.is_not_found() {
            ScanFailureKind::NotFound
        } else {
            ScanFailureKind::Store
        };
        Self {
            kind,
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProductScanOutcome {
    pub product_id: String,
    pub outcome: Result<Vec<Violation>, ScanFailure>,
}

/// One outcome per requested id, in request order.
#[derive(Debug, Clone, Default)]
pub struct ScanBatch {
    pub outcomes: Vec<ProductScanOutcome>,
}

impl ScanBatch {
    /// Failed scans map to an empty list.
    pub fn violations_by_product(&self) -> BTreeMap<String, Vec<Violation>> {
        self.outcomes
            .iter()
            .map(|o| {
                let found = o.outcome.as_ref().map(Vec::clone).unwrap_or_default();
                (o.product_id.clone(), found)
            })
            .collect()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &ScanFailure)> {
        self.outcomes.iter().filter_map(|o| match &o.outcome {
            Ok(_) => None,
            Err(failure) => Some((o.product_id.as_str(), failure)),
        })
    }

    /// Flattens successful outcomes, product order first.
    pub fn into_violations(self) -> Vec<Violation> {
        self.outcomes
            .into_iter()
            .filter_map(|o| o.outcome.ok())
            .flatten()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

/// Runs the engine over stored products and persists what it finds.
pub struct ViolationDetector<S> {
    engine: Arc<ComplianceEngine>,
    store: Arc<S>,
    concurrency: usize,
}

impl<S: ComplianceStore> ViolationDetector<S> {
    pub fn new(engine: Arc<ComplianceEngine>, store: Arc<S>) -> Self {
        Self {
            engine,
            store,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn engine(&self) -> &ComplianceEngine {
        &self.engine
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Evaluates one product and writes one open violation per finding.
    #[instrument(skip(self))]
    pub async fn scan_product(&self, product_id: &str) -> Result<Vec<Violation>, MetrologyError> {
        let (product, category) = self
            .store
            .get_product_by_id(product_id)
            .await?
            .ok_or_else(|| DomainError::ProductNotFound(product_id.to_string()))?;

        let result = self.engine.evaluate_product(&product, category.as_ref());
        let now = Utc::now();

        let mut persisted = Vec::with_capacity(result.violations.len());
        for finding in result.violations {
            let record = Violation::open(&product.id, finding, now);
            persisted.push(self.store.insert_violation(record).await?);
        }

        debug!(violations = persisted.len(), "product scanned");
        Ok(persisted)
    }

    /// Evaluates without writing anything.
    #[instrument(skip(self))]
    pub async fn check_product(&self, product_id: &str) -> Result<ComplianceResult, MetrologyError> {
        let (product, category) = self
            .store
            .get_product_by_id(product_id)
            .await?
            .ok_or_else(|| DomainError::ProductNotFound(product_id.to_string()))?;

        Ok(self.engine.evaluate_product(&product, category.as_ref()))
    }

    /// Never fails as a whole: each id gets its own outcome.
    #[instrument(skip(self, product_ids), fields(products = product_ids.len()))]
    pub async fn scan_products(&self, product_ids: &[String]) -> ScanBatch {
        let outcomes = stream::iter(product_ids.iter().map(|product_id| async move {
            let outcome = match self.scan_product(product_id).await {
                Ok(found) => Ok(found),
                Err(err) => {
                    warn!(product_id = %product_id, error = %err, "scan failed, continuing batch");
                    Err(ScanFailure::from(&err))
                }
            };
            ProductScanOutcome {
                product_id: product_id.clone(),
                outcome,
            }
        }))
        .buffered(self.concurrency)
        .collect::<Vec<_>>()
        .await;

        ScanBatch { outcomes }
    }

    /// Batch over every product the filter selects, in store order.
    pub async fn scan_matching(&self, filter: &ProductFilter) -> Result<ScanBatch, MetrologyError> {
        let ids = self.store.list_product_ids(filter).await?;
        Ok(self.scan_products(&ids).await)
    }

    #[instrument(skip(self))]
    pub async fn scan_platform(&self, platform_id: &str) -> Result<Vec<Violation>, MetrologyError> {
        let batch = self
            .scan_matching(&ProductFilter::Platform(platform_id.to_string()))
            .await?;
        Ok(batch.into_violations())
    }

    pub async fn scan_stale_products(&self, days_old: u32) -> Result<Vec<Violation>, MetrologyError> {
        self.scan_stale_products_at(days_old, Utc::now()).await
    }

    /// Products whose `updated_at` is strictly before `now - days_old`.
    #[instrument(skip(self))]
    pub async fn scan_stale_products_at(
        &self,
        days_old: u32,
        now: DateTime<Utc>,
    ) -> Result<Vec<Violation>, MetrologyError> {
        let batch = self.scan_matching(&stale_filter(days_old, now)?).await?;
        Ok(batch.into_violations())
    }

    /// Counts over stored violations. Does not re-evaluate.
    pub async fn product_compliance_summary(
        &self,
        product_id: &str,
    ) -> Result<ComplianceSummary, MetrologyError> {
        let violations = self.store.list_violations_by_product(product_id).await?;
        Ok(ComplianceSummary::from_violations(&violations))
    }
}

/// Fails instead of panicking when the cutoff falls outside chrono's range.
pub(crate) fn stale_filter(
    days_old: u32,
    now: DateTime<Utc>,
) -> Result<ProductFilter, MetrologyError> {
    now.checked_sub_signed(Duration::days(i64::from(days_old)))
        .map(ProductFilter::UpdatedBefore)
        .ok_or_else(|| {
            MetrologyError::Validation(format!(
                "days_old {} reaches before the supported calendar range",
                days_old
            ))
        })
}
