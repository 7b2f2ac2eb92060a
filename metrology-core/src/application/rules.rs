// metrology-core/src/application/rules.rs

use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::compliance::{ComplianceEngine, RequiredEvidenceRule};
use crate::domain::error::DomainError;
use crate::domain::project::RulesConfig;

/// Builtin rules minus `disabled`, plus the configured custom rules.
pub fn build_engine(config: &RulesConfig) -> Result<ComplianceEngine, DomainError> {
    let engine = ComplianceEngine::with_builtin_rules();

    for rule_id in &config.disabled {
        if !engine.remove_rule(rule_id) {
            warn!(rule_id = %rule_id, "disabled rule is not registered");
        }
    }

    for custom in &config.custom {
        engine.add_rule(Arc::new(RequiredEvidenceRule::from_config(custom)?))?;
    }

    info!(rules = engine.len(), custom = config.custom.len(), "rule engine ready");
    Ok(engine)
}
