// metrology-core/src/domain/violation/record.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::domain::compliance::{Severity, ViolationDescriptor};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ViolationStatus {
    #[default]
    Open,
    Investigating,
    Resolved,
    Dismissed,
}

impl ViolationStatus {
    pub const ALL: [ViolationStatus; 4] = [
        Self::Open,
        Self::Investigating,
        Self::Resolved,
        Self::Dismissed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Investigating => "investigating",
            Self::Resolved => "resolved",
            Self::Dismissed => "dismissed",
        }
    }

    /// Resolved and dismissed are terminal.
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Resolved | Self::Dismissed)
    }
}

impl fmt::Display for ViolationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ViolationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "open" => Ok(Self::Open),
            "investigating" => Ok(Self::Investigating),
            "resolved" => Ok(Self::Resolved),
            "dismissed" => Ok(Self::Dismissed),
            _ => Err(format!("Unknown violation status: {}", s)),
        }
    }
}

/// A persisted rule failure for one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    pub id: String,
    pub product_id: String,
    /// Id of the rule that produced it. A label, not a live reference.
    pub rule_type: String,
    pub severity: Severity,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    #[serde(default)]
    pub status: ViolationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Violation {
    /// Fresh open record for a finding, with a new v4 id.
    pub fn open(product_id: &str, finding: ViolationDescriptor, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            product_id: product_id.to_string(),
            rule_type: finding.rule,
            severity: finding.severity,
            description: finding.description,
            details: finding.details,
            status: ViolationStatus::Open,
            assigned_to: None,
            created_at: now,
            resolved_at: None,
            notes: None,
        }
    }
}
