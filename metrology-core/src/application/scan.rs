// metrology-core/src/application/scan.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::{Validate, ValidationError};

use super::detector::{ScanBatch, ScanFailure, ViolationDetector, stale_filter};
use crate::domain::violation::Violation;
use crate::error::MetrologyError;
use crate::ports::store::{ComplianceStore, ProductFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanType {
    Products,
    Platform,
    Stale,
}

/// A scan as a caller asks for it. Checked before the store is touched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_target"))]
pub struct ScanRequest {
    pub scan_type: ScanType,

    #[serde(default)]
    pub product_ids: Vec<String>,

    #[serde(default)]
    pub platform_id: Option<String>,

    #[serde(default)]
    #[validate(range(min = 1, max = 3650, message = "days_old must be between 1 and 3650"))]
    pub days_old: Option<u32>,
}

impl ScanRequest {
    pub fn products(ids: Vec<String>) -> Self {
        Self {
            scan_type: ScanType::Products,
            product_ids: ids,
            platform_id: None,
            days_old: None,
        }
    }

    pub fn platform(platform_id: impl Into<String>) -> Self {
        Self {
            scan_type: ScanType::Platform,
            product_ids: vec![],
            platform_id: Some(platform_id.into()),
            days_old: None,
        }
    }

    pub fn stale(days_old: Option<u32>) -> Self {
        Self {
            scan_type: ScanType::Stale,
            product_ids: vec![],
            platform_id: None,
            days_old,
        }
    }
}

fn validate_target(request: &ScanRequest) -> Result<(), ValidationError> {
    let problem = match request.scan_type {
        ScanType::Products if request.product_ids.iter().all(|id| id.trim().is_empty()) => {
            Some(("missing_product_ids", "product_ids are required for a products scan"))
        }
        ScanType::Platform
            if request
                .platform_id
                .as_deref()
                .is_none_or(|id| id.trim().is_empty()) =>
        {
            Some(("missing_platform_id", "platform_id is required for a platform scan"))
        }
        _ => None,
    };

    match problem {
        Some((code, message)) => {
            let mut err = ValidationError::new(code);
            err.message = Some(message.into());
            Err(err)
        }
        None => Ok(()),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub scan_type: ScanType,
    pub scanned_at: DateTime<Utc>,
    pub products_scanned: usize,
    pub violations_found: usize,
    pub violations: Vec<Violation>,
    /// Products that could not be scanned, keyed by id.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub failures: BTreeMap<String, ScanFailure>,
}

impl ScanReport {
    fn from_batch(scan_type: ScanType, scanned_at: DateTime<Utc>, batch: ScanBatch) -> Self {
        let failures = batch
            .failures()
            .map(|(id, failure)| (id.to_string(), failure.clone()))
            .collect();
        let products_scanned = batch.len();
        let violations = batch.into_violations();

        Self {
            scan_type,
            scanned_at,
            products_scanned,
            violations_found: violations.len(),
            violations,
            failures,
        }
    }
}

/// Validates the request, resolves its target set and scans it.
pub async fn run_scan<S: ComplianceStore>(
    detector: &ViolationDetector<S>,
    request: &ScanRequest,
    default_stale_days: u32,
) -> Result<ScanReport, MetrologyError> {
    request.validate()?;
    let now = Utc::now();

    let batch = match request.scan_type {
        ScanType::Products => {
            let ids: Vec<String> = request
                .product_ids
                .iter()
                .filter(|id| !id.trim().is_empty())
                .cloned()
                .collect();
            detector.scan_products(&ids).await
        }
        ScanType::Platform => {
            let platform_id = request.platform_id.clone().unwrap_or_default();
            detector
                .scan_matching(&ProductFilter::Platform(platform_id))
                .await?
        }
        ScanType::Stale => {
            let days = request.days_old.unwrap_or(default_stale_days);
            detector.scan_matching(&stale_filter(days, now)?).await?
        }
    };

    Ok(ScanReport::from_batch(request.scan_type, now, batch))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::application::detector::ScanFailureKind;
    use crate::application::detector::tests::seeded_store;
    use crate::domain::compliance::ComplianceEngine;
    use crate::infrastructure::adapters::InMemoryStore;
    use anyhow::Result;
    use std::sync::Arc;

    async fn detector() -> Result<ViolationDetector<InMemoryStore>> {
        Ok(ViolationDetector::new(
            Arc::new(ComplianceEngine::with_builtin_rules()),
            Arc::new(seeded_store().await?),
        ))
    }

    #[test]
    fn test_request_validation() {
        assert!(ScanRequest::products(vec!["p1".into()]).validate().is_ok());
        assert!(ScanRequest::products(vec![]).validate().is_err());
        assert!(ScanRequest::products(vec!["  ".into()]).validate().is_err());
        assert!(ScanRequest::platform("amz").validate().is_ok());
        assert!(ScanRequest::platform("").validate().is_err());
        assert!(ScanRequest::stale(None).validate().is_ok());
        assert!(ScanRequest::stale(Some(0)).validate().is_err());
        assert!(ScanRequest::stale(Some(4000)).validate().is_err());
    }

    #[test]
    fn test_request_from_json() {
        let request: ScanRequest =
            serde_json::from_str(r#"{"scan_type":"platform","platform_id":"amz"}"#).unwrap();
        assert_eq!(request, ScanRequest::platform("amz"));
    }

    #[tokio::test]
    async fn test_invalid_request_fails_before_store_access() -> Result<()> {
        let detector = detector().await?;
        let err = run_scan(&detector, &ScanRequest::products(vec![]), 7)
            .await
            .unwrap_err();
        assert!(matches!(err, MetrologyError::Validation(_)));
        assert_eq!(detector.store().violation_count(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_products_report_includes_failures() -> Result<()> {
        let detector = detector().await?;
        let request = ScanRequest::products(vec!["valid-1".into(), "missing-2".into()]);

        let report = run_scan(&detector, &request, 7).await?;
        assert_eq!(report.products_scanned, 2);
        assert_eq!(report.violations_found, 2);
        assert_eq!(report.failures["missing-2"].kind, ScanFailureKind::NotFound);

        let json = serde_json::to_value(&report)?;
        assert_eq!(json["scan_type"], "products");
        assert_eq!(json["failures"]["missing-2"]["kind"], "not_found");
        Ok(())
    }

    #[tokio::test]
    async fn test_stale_scan_defaults_to_configured_days() -> Result<()> {
        let detector = detector().await?;
        let report = run_scan(&detector, &ScanRequest::stale(None), 7).await?;
        assert_eq!(report.products_scanned, 0);
        assert!(report.failures.is_empty());
        Ok(())
    }
}
