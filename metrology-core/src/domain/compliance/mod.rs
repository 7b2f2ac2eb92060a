// metrology-core/src/domain/compliance/mod.rs

pub mod custom;
pub mod engine;
pub mod evidence;
pub mod result;
pub mod rule;
pub mod rules;
pub mod severity;

// Re-exports
pub use custom::{CustomRuleConfig, RequiredEvidenceRule};
pub use engine::ComplianceEngine;
pub use result::{ComplianceResult, ViolationDescriptor};
pub use rule::{ComplianceRule, FnRule, RuleDefinition};
pub use rules::builtin_rules;
pub use severity::Severity;
