// metrology-core/src/domain/compliance/result.rs

use serde::{Deserialize, Serialize};

use super::severity::Severity;

/// One rule failure, before it is persisted as a violation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViolationDescriptor {
    pub rule: String,
    pub description: String,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ViolationDescriptor {
    pub fn new(rule: &str, description: &str, severity: Severity) -> Self {
        Self {
            rule: rule.to_string(),
            description: description.to_string(),
            severity,
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ComplianceResult {
    pub is_compliant: bool,
    pub violations: Vec<ViolationDescriptor>,
}

impl ComplianceResult {
    pub fn compliant() -> Self {
        Self {
            is_compliant: true,
            violations: vec![],
        }
    }

    /// `is_compliant` is derived, never set independently.
    pub fn from_violations(violations: Vec<ViolationDescriptor>) -> Self {
        Self {
            is_compliant: violations.is_empty(),
            violations,
        }
    }
}
