// metrology-core/src/domain/compliance/engine.rs

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use super::result::ComplianceResult;
use super::rule::ComplianceRule;
use super::rules::builtin_rules;
use crate::domain::catalog::{Category, Product};
use crate::domain::error::DomainError;

/// Rule registry plus evaluation loop.
///
/// The registry is owned by whoever constructs the engine (no global
/// instance). Mutations take the write lock, evaluations the read lock, so
/// concurrent add/remove calls never lose updates.
#[derive(Debug)]
pub struct ComplianceEngine {
    rules: RwLock<Vec<Arc<dyn ComplianceRule>>>,
}

impl ComplianceEngine {
    pub fn new(rules: Vec<Arc<dyn ComplianceRule>>) -> Self {
        Self {
            rules: RwLock::new(rules),
        }
    }

    pub fn with_builtin_rules() -> Self {
        Self::new(builtin_rules())
    }

    /// Runs every applicable rule and concatenates findings in rule order.
    pub fn evaluate_product(
        &self,
        product: &Product,
        category: Option<&Category>,
    ) -> ComplianceResult {
        let category_name = category.map(|c| c.name.as_str());
        let rules = self.rules.read();

        let violations = rules
            .iter()
            .filter(|rule| rule.definition().applies_to(category_name))
            .flat_map(|rule| rule.evaluate(product, category).violations)
            .collect();

        ComplianceResult::from_violations(violations)
    }

    /// Resolves each product's category by id; an unknown or missing
    /// `category_id` evaluates with no category.
    pub fn evaluate_products(
        &self,
        products: &[Product],
        categories: &[Category],
    ) -> HashMap<String, ComplianceResult> {
        let by_id: HashMap<&str, &Category> =
            categories.iter().map(|c| (c.id.as_str(), c)).collect();

        products
            .iter()
            .map(|product| {
                let category = product
                    .category_id
                    .as_deref()
                    .and_then(|id| by_id.get(id).copied());
                (product.id.clone(), self.evaluate_product(product, category))
            })
            .collect()
    }

    /// Unscoped rules plus those scoped to `category_name`.
    pub fn rules_for_category(&self, category_name: &str) -> Vec<Arc<dyn ComplianceRule>> {
        self.rules
            .read()
            .iter()
            .filter(|rule| rule.definition().applies_to(Some(category_name)))
            .cloned()
            .collect()
    }

    /// Appends a rule. Ids are unique within the registry.
    pub fn add_rule(&self, rule: Arc<dyn ComplianceRule>) -> Result<(), DomainError> {
        let mut rules = self.rules.write();
        if rules.iter().any(|existing| existing.id() == rule.id()) {
            return Err(DomainError::DuplicateRule(rule.id().to_string()));
        }
        rules.push(rule);
        Ok(())
    }

    /// Returns whether a rule was removed; an unknown id is not an error.
    pub fn remove_rule(&self, rule_id: &str) -> bool {
        let mut rules = self.rules.write();
        let before = rules.len();
        rules.retain(|rule| rule.id() != rule_id);
        rules.len() != before
    }

    /// Snapshot of the registry. Mutating it does not touch the engine.
    pub fn all_rules(&self) -> Vec<Arc<dyn ComplianceRule>> {
        self.rules.read().clone()
    }

    pub fn len(&self) -> usize {
        self.rules.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.read().is_empty()
    }
}

impl Default for ComplianceEngine {
    fn default() -> Self {
        Self::with_builtin_rules()
    }
}
