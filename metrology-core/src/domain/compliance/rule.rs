// metrology-core/src/domain/compliance/rule.rs

use serde::Serialize;
use std::fmt;

use super::result::ComplianceResult;
use super::severity::Severity;
use crate::domain::catalog::{Category, Product};

/// Static metadata of a rule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleDefinition {
    pub id: String,
    pub name: String,
    pub description: String,
    pub severity: Severity,
    /// Category names the rule is restricted to. Empty = every category,
    /// including uncategorised products.
    pub categories: Vec<String>,
    /// `raw_data` / `compliance_rules` keys the validator inspects.
    pub reads: Vec<String>,
}

impl RuleDefinition {
    pub fn new(id: &str, name: &str, description: &str, severity: Severity) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            severity,
            categories: vec![],
            reads: vec![],
        }
    }

    pub fn scoped_to(mut self, categories: &[&str]) -> Self {
        self.categories = categories.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn reading(mut self, keys: &[&str]) -> Self {
        self.reads = keys.iter().map(|k| k.to_string()).collect();
        self
    }

    /// A scoped rule never applies to a product without a category.
    pub fn applies_to(&self, category_name: Option<&str>) -> bool {
        if self.categories.is_empty() {
            return true;
        }
        category_name.is_some_and(|name| self.categories.iter().any(|c| c == name))
    }
}

/// A pure, total predicate over one product.
///
/// Implementations must not perform I/O and must treat missing optional
/// fields as "absent", never as an error.
pub trait ComplianceRule: Send + Sync + fmt::Debug {
    fn definition(&self) -> &RuleDefinition;

    fn evaluate(&self, product: &Product, category: Option<&Category>) -> ComplianceResult;

    fn id(&self) -> &str {
        &self.definition().id
    }
}

type Validator = dyn Fn(&Product, Option<&Category>) -> ComplianceResult + Send + Sync;

/// A rule backed by a closure, for rules registered at runtime.
pub struct FnRule {
    definition: RuleDefinition,
    validator: Box<Validator>,
}

impl FnRule {
    pub fn new<F>(definition: RuleDefinition, validator: F) -> Self
    where
        F: Fn(&Product, Option<&Category>) -> ComplianceResult + Send + Sync + 'static,
    {
        Self {
            definition,
            validator: Box::new(validator),
        }
    }
}

impl fmt::Debug for FnRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnRule")
            .field("id", &self.definition.id)
            .finish_non_exhaustive()
    }
}

impl ComplianceRule for FnRule {
    fn definition(&self) -> &RuleDefinition {
        &self.definition
    }

    fn evaluate(&self, product: &Product, category: Option<&Category>) -> ComplianceResult {
        (self.validator)(product, category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unscoped_rule_applies_everywhere() {
        let def = RuleDefinition::new("any", "Any", "", Severity::Low);
        assert!(def.applies_to(None));
        assert!(def.applies_to(Some("Textiles")));
    }

    #[test]
    fn test_scoped_rule_requires_matching_category() {
        let def = RuleDefinition::new("expiry", "Expiry", "", Severity::Critical)
            .scoped_to(&["Food & Beverages", "Cosmetics"]);
        assert!(def.applies_to(Some("Cosmetics")));
        assert!(!def.applies_to(Some("Electronics")));
        assert!(!def.applies_to(None));
    }
}
