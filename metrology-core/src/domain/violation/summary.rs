// metrology-core/src/domain/violation/summary.rs

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use super::record::{Violation, ViolationStatus};
use crate::domain::compliance::Severity;

pub const TREND_DAYS: i64 = 30;

/// Per-product counts. Severity counts partition `total`; status counts do too.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ComplianceSummary {
    pub total: usize,
    pub open: usize,
    pub investigating: usize,
    pub resolved: usize,
    pub dismissed: usize,
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl ComplianceSummary {
    pub fn from_violations(violations: &[Violation]) -> Self {
        let mut summary = Self {
            total: violations.len(),
            ..Self::default()
        };
        for v in violations {
            match v.status {
                ViolationStatus::Open => summary.open += 1,
                ViolationStatus::Investigating => summary.investigating += 1,
                ViolationStatus::Resolved => summary.resolved += 1,
                ViolationStatus::Dismissed => summary.dismissed += 1,
            }
            match v.severity {
                Severity::Critical => summary.critical += 1,
                Severity::High => summary.high += 1,
                Severity::Medium => summary.medium += 1,
                Severity::Low => summary.low += 1,
            }
        }
        summary
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub count: usize,
    pub critical: usize,
    pub high: usize,
}

/// Dashboard-wide statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViolationStats {
    pub total: usize,
    pub by_status: BTreeMap<ViolationStatus, usize>,
    pub by_severity: BTreeMap<Severity, usize>,
    /// One point per day for the last `TREND_DAYS` days, oldest first.
    pub trend: Vec<TrendPoint>,
}

impl ViolationStats {
    pub fn compute(violations: &[Violation], now: DateTime<Utc>) -> Self {
        let mut by_status = BTreeMap::new();
        let mut by_severity = BTreeMap::new();
        for v in violations {
            *by_status.entry(v.status).or_insert(0) += 1;
            *by_severity.entry(v.severity).or_insert(0) += 1;
        }

        let window_start = now - Duration::days(TREND_DAYS);
        let recent: Vec<&Violation> = violations
            .iter()
            .filter(|v| v.created_at >= window_start)
            .collect();

        let trend = (0..TREND_DAYS)
            .map(|i| {
                let date = (now - Duration::days(TREND_DAYS - 1 - i)).date_naive();
                let day: Vec<&&Violation> = recent
                    .iter()
                    .filter(|v| v.created_at.date_naive() == date)
                    .collect();
                TrendPoint {
                    date,
                    count: day.len(),
                    critical: day.iter().filter(|v| v.severity == Severity::Critical).count(),
                    high: day.iter().filter(|v| v.severity == Severity::High).count(),
                }
            })
            .collect();

        Self {
            total: violations.len(),
            by_status,
            by_severity,
            trend,
        }
    }
}
