// metrology-core/src/domain/compliance/custom.rs

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use serde_json::json;
use validator::{Validate, ValidationError};

use super::evidence::Evidence;
use super::rules::category_name;
use super::{ComplianceResult, ComplianceRule, RuleDefinition, Severity, ViolationDescriptor};
use crate::domain::catalog::{Category, Product};
use crate::domain::error::DomainError;

/// A declarative "this information must be present" rule, loaded from config.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
#[validate(schema(function = "validate_has_evidence"))]
pub struct CustomRuleConfig {
    #[validate(length(min = 1, message = "Rule id cannot be empty"))]
    pub id: String,

    #[validate(length(min = 1, message = "Rule name cannot be empty"))]
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default = "default_severity")]
    pub severity: Severity,

    /// Empty = every category.
    #[serde(default)]
    pub categories: Vec<String>,

    /// `compliance_rules` key gating the rule. None = always on.
    #[serde(default)]
    pub requirement: Option<String>,

    /// `raw_data` keys accepted as a declaration.
    #[serde(default)]
    pub fields: Vec<String>,

    /// Description substrings accepted as a declaration.
    #[serde(default)]
    pub terms: Vec<String>,

    /// Regex over the description accepted as a declaration (case-insensitive).
    #[serde(default)]
    pub pattern: Option<String>,
}

fn default_severity() -> Severity {
    Severity::Medium
}

fn validate_has_evidence(config: &CustomRuleConfig) -> Result<(), ValidationError> {
    if config.fields.is_empty() && config.terms.is_empty() && config.pattern.is_none() {
        let mut err = ValidationError::new("no_evidence");
        err.message = Some("a custom rule needs at least one of fields, terms or pattern".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug)]
pub struct RequiredEvidenceRule {
    definition: RuleDefinition,
    requirement: Option<String>,
    fields: Vec<String>,
    terms: Vec<String>,
    pattern: Option<Regex>,
}

impl RequiredEvidenceRule {
    /// Validates the config and compiles its pattern once.
    pub fn from_config(config: &CustomRuleConfig) -> Result<Self, DomainError> {
        config
            .validate()
            .map_err(|e| DomainError::InvalidRule(format!("{}: {}", config.id, e)))?;

        let pattern = config
            .pattern
            .as_deref()
            .map(|p| RegexBuilder::new(p).case_insensitive(true).build())
            .transpose()
            .map_err(|e| DomainError::InvalidRule(format!("{}: {}", config.id, e)))?;

        let description = if config.description.is_empty() {
            format!("{} must be declared", config.name)
        } else {
            config.description.clone()
        };

        let mut reads: Vec<String> = config
            .fields
            .iter()
            .map(|f| format!("raw_data.{}", f))
            .collect();
        if let Some(req) = &config.requirement {
            reads.insert(0, format!("compliance_rules.{}", req));
        }

        let mut definition =
            RuleDefinition::new(&config.id, &config.name, &description, config.severity);
        definition.categories = config.categories.clone();
        definition.reads = reads;

        Ok(Self {
            definition,
            requirement: config.requirement.clone(),
            fields: config.fields.clone(),
            terms: config.terms.iter().map(|t| t.to_lowercase()).collect(),
            pattern,
        })
    }

    fn is_declared(&self, product: &Product) -> bool {
        let evidence = Evidence::of(product);
        let fields: Vec<&str> = self.fields.iter().map(String::as_str).collect();
        let terms: Vec<&str> = self.terms.iter().map(String::as_str).collect();

        evidence.declares(&fields, &terms)
            || self.pattern.as_ref().is_some_and(|re| {
                product
                    .description
                    .as_deref()
                    .is_some_and(|d| re.is_match(d))
            })
    }
}

impl ComplianceRule for RequiredEvidenceRule {
    fn definition(&self) -> &RuleDefinition {
        &self.definition
    }

    fn evaluate(&self, product: &Product, category: Option<&Category>) -> ComplianceResult {
        if !self.definition.applies_to(category_name(category)) {
            return ComplianceResult::compliant();
        }
        if let Some(req) = &self.requirement
            && !category.is_some_and(|c| c.requires(req))
        {
            return ComplianceResult::compliant();
        }
        if self.is_declared(product) {
            return ComplianceResult::compliant();
        }

        let mut finding = ViolationDescriptor::new(
            &self.definition.id,
            &format!("Missing {}", self.definition.name.to_lowercase()),
            self.definition.severity,
        );
        if self.requirement.is_some() {
            finding = finding.with_details(json!({ "required_by_category": category_name(category) }));
        }
        ComplianceResult::from_violations(vec![finding])
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Result;

    fn config(yaml: &str) -> CustomRuleConfig {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_custom_rule_from_yaml() -> Result<()> {
        let cfg = config(
            r#"
id: unit_pricing
name: Unit Price
severity: medium
categories: ["Food & Beverages"]
fields: [unit_price]
pattern: 'per\s+(100\s*g|kg|litre)'
"#,
        );
        let rule = RequiredEvidenceRule::from_config(&cfg)?;
        let food = Category::new("c1", "Food & Beverages");

        let mut p = Product::new("p1", "amz", "Basmati rice");
        let result = rule.evaluate(&p, Some(&food));
        assert_eq!(result.violations.len(), 1);
        assert_eq!(result.violations[0].rule, "unit_pricing");
        assert_eq!(result.violations[0].description, "Missing unit price");
        assert!(result.violations[0].details.is_none());

        p.description = Some("₹12 PER 100 g".into());
        assert!(rule.evaluate(&p, Some(&food)).is_compliant);

        let toys = Category::new("c2", "Toys");
        assert!(rule.evaluate(&Product::new("p2", "amz", "Kite"), Some(&toys)).is_compliant);
        Ok(())
    }

    #[test]
    fn test_requirement_gates_custom_rule() -> Result<()> {
        let cfg = config(
            r#"
id: bis_mark
name: BIS Certification
severity: high
requirement: bis_certification
terms: ["ISI", "BIS"]
"#,
        );
        let rule = RequiredEvidenceRule::from_config(&cfg)?;
        let p = Product::new("p1", "amz", "Helmet");

        assert!(rule.evaluate(&p, Some(&Category::new("c", "Auto"))).is_compliant);

        let gated = Category::new("c", "Auto").requiring("bis_certification");
        let result = rule.evaluate(&p, Some(&gated));
        assert_eq!(result.violations[0].severity, Severity::High);
        assert!(result.violations[0].details.is_some());

        let mut marked = p.clone();
        marked.description = Some("isi marked shell".into());
        assert!(rule.evaluate(&marked, Some(&gated)).is_compliant);
        Ok(())
    }

    #[test]
    fn test_rule_without_evidence_is_rejected() {
        let cfg = config("id: empty\nname: Empty\n");
        assert!(matches!(
            RequiredEvidenceRule::from_config(&cfg),
            Err(DomainError::InvalidRule(_))
        ));
    }

    #[test]
    fn test_invalid_pattern_is_rejected() {
        let cfg = config("id: bad\nname: Bad\npattern: '[unclosed'\n");
        assert!(RequiredEvidenceRule::from_config(&cfg).is_err());
    }
}
