// metrology-core/src/domain/compliance/rules/price.rs

use serde_json::json;

use crate::domain::catalog::{Category, Product};
use crate::domain::compliance::evidence::contains_any;
use crate::domain::compliance::{
    ComplianceResult, ComplianceRule, RuleDefinition, Severity, ViolationDescriptor,
};

const MANIPULATION_TERMS: [&str; 3] = ["strike", "crossed", "original"];

/// MRP must be displayed, without strike-through theatrics.
#[derive(Debug)]
pub struct PriceDisplayRule {
    definition: RuleDefinition,
}

impl PriceDisplayRule {
    pub const ID: &'static str = "price_display";

    pub fn new() -> Self {
        Self {
            definition: RuleDefinition::new(
                Self::ID,
                "Price Display",
                "Maximum Retail Price (MRP) must be clearly displayed",
                Severity::High,
            )
            .reading(&["raw_data.mrp", "raw_data.price", "raw_data.price_text"]),
        }
    }
}

impl Default for PriceDisplayRule {
    fn default() -> Self {
        Self::new()
    }
}

impl ComplianceRule for PriceDisplayRule {
    fn definition(&self) -> &RuleDefinition {
        &self.definition
    }

    fn evaluate(&self, product: &Product, _category: Option<&Category>) -> ComplianceResult {
        let mut violations = Vec::new();

        if !product.has_price() && !product.has_raw(&["mrp", "price"]) {
            violations.push(ViolationDescriptor::new(
                Self::ID,
                "Missing Maximum Retail Price (MRP) declaration",
                Severity::High,
            ));
        }

        if let Some(price_text) = product.raw_text("price_text")
            && contains_any(&price_text, &MANIPULATION_TERMS)
        {
            violations.push(
                ViolationDescriptor::new(
                    Self::ID,
                    "Potential price manipulation detected",
                    Severity::Medium,
                )
                .with_details(json!({ "price_display": price_text })),
            );
        }

        ComplianceResult::from_violations(violations)
    }
}
