// metrology-core/src/domain/compliance/rules/energy.rs

use serde_json::json;

use super::{ELECTRONICS, category_name};
use crate::domain::catalog::{Category, Product};
use crate::domain::compliance::evidence::Evidence;
use crate::domain::compliance::{
    ComplianceResult, ComplianceRule, RuleDefinition, Severity, ViolationDescriptor,
};

/// Product-name keywords identifying appliances that need a star label.
const APPLIANCES: [&str; 5] = [
    "refrigerator",
    "washing machine",
    "air conditioner",
    "television",
    "microwave",
];

#[derive(Debug)]
pub struct EnergyRatingRule {
    definition: RuleDefinition,
}

impl EnergyRatingRule {
    pub const ID: &'static str = "energy_rating";
    const TERMS: [&'static str; 2] = ["star rating", "energy efficient"];

    pub fn new() -> Self {
        Self {
            definition: RuleDefinition::new(
                Self::ID,
                "Energy Rating",
                "Electronic appliances must display energy efficiency rating",
                Severity::Medium,
            )
            .scoped_to(&[ELECTRONICS])
            .reading(&["raw_data.energy_rating"]),
        }
    }
}

impl Default for EnergyRatingRule {
    fn default() -> Self {
        Self::new()
    }
}

impl ComplianceRule for EnergyRatingRule {
    fn definition(&self) -> &RuleDefinition {
        &self.definition
    }

    fn evaluate(&self, product: &Product, category: Option<&Category>) -> ComplianceResult {
        if !self.definition.applies_to(category_name(category)) {
            return ComplianceResult::compliant();
        }

        let evidence = Evidence::of(product);
        if !evidence.name_mentions(&APPLIANCES)
            || evidence.declares(&["energy_rating"], &Self::TERMS)
        {
            return ComplianceResult::compliant();
        }

        ComplianceResult::from_violations(vec![
            ViolationDescriptor::new(
                Self::ID,
                "Missing energy efficiency rating for appliance",
                Severity::Medium,
            )
            .with_details(json!({ "product_type": "appliance" })),
        ])
    }
}
