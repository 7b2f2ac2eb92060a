// metrology-core/src/domain/compliance/rules/weight.rs

use serde_json::json;

use super::required_by;
use crate::domain::catalog::{Category, Product};
use crate::domain::compliance::evidence::contains_any;
use crate::domain::compliance::{
    ComplianceResult, ComplianceRule, RuleDefinition, Severity, ViolationDescriptor,
};

/// Any of these keys in `compliance_rules` turns the rule on.
const REQUIREMENT_KEYS: [&str; 3] = ["weight_declaration", "net_weight", "net_quantity"];
const DECLARATION_FIELDS: [&str; 2] = ["weight", "quantity"];
const VAGUE_TERMS: [&str; 4] = ["approximately", "about", "around", "~"];

/// Net quantity must be declared, and declared precisely.
#[derive(Debug)]
pub struct WeightDeclarationRule {
    definition: RuleDefinition,
}

impl WeightDeclarationRule {
    pub const ID: &'static str = "weight_declaration";

    pub fn new() -> Self {
        Self {
            definition: RuleDefinition::new(
                Self::ID,
                "Weight Declaration",
                "Product must declare accurate weight/quantity as per Legal Metrology Rules 2011",
                Severity::High,
            )
            .reading(&[
                "compliance_rules.weight_declaration",
                "compliance_rules.net_weight",
                "compliance_rules.net_quantity",
                "raw_data.weight",
                "raw_data.quantity",
            ]),
        }
    }
}

impl Default for WeightDeclarationRule {
    fn default() -> Self {
        Self::new()
    }
}

impl ComplianceRule for WeightDeclarationRule {
    fn definition(&self) -> &RuleDefinition {
        &self.definition
    }

    fn evaluate(&self, product: &Product, category: Option<&Category>) -> ComplianceResult {
        let gated = category.is_some_and(|c| REQUIREMENT_KEYS.iter().any(|k| c.requires(k)));
        if !gated {
            return ComplianceResult::compliant();
        }

        let mut violations = Vec::new();
        let structured = product.declared_weight();

        if structured.is_none() && !product.has_raw(&DECLARATION_FIELDS) {
            violations.push(
                ViolationDescriptor::new(
                    Self::ID,
                    "Missing weight/quantity declaration",
                    Severity::High,
                )
                .with_details(required_by(category)),
            );
        }

        let weight_text = structured
            .map(str::to_string)
            .or_else(|| product.raw_text("weight"));
        if let Some(text) = weight_text
            && contains_any(&text, &VAGUE_TERMS)
        {
            violations.push(
                ViolationDescriptor::new(
                    Self::ID,
                    "Weight declaration contains vague terms (approximately, about, around)",
                    Severity::Medium,
                )
                .with_details(json!({ "declared_weight": text })),
            );
        }

        ComplianceResult::from_violations(violations)
    }
}
