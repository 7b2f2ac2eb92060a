// metrology-core/src/domain/compliance/rules/textiles.rs

use super::{TEXTILES, category_name};
use crate::domain::catalog::{Category, Product};
use crate::domain::compliance::evidence::Evidence;
use crate::domain::compliance::{
    ComplianceResult, ComplianceRule, RuleDefinition, Severity, ViolationDescriptor,
};

#[derive(Debug)]
pub struct FabricCompositionRule {
    definition: RuleDefinition,
}

impl FabricCompositionRule {
    pub const ID: &'static str = "fabric_composition";
    const FIELDS: [&'static str; 2] = ["fabric_composition", "material"];
    const TERMS: [&'static str; 3] = ["cotton", "polyester", "%"];

    pub fn new() -> Self {
        Self {
            definition: RuleDefinition::new(
                Self::ID,
                "Fabric Composition",
                "Textile products must declare fabric composition with percentages",
                Severity::Medium,
            )
            .scoped_to(&[TEXTILES])
            .reading(&["raw_data.fabric_composition", "raw_data.material"]),
        }
    }
}

impl Default for FabricCompositionRule {
    fn default() -> Self {
        Self::new()
    }
}

impl ComplianceRule for FabricCompositionRule {
    fn definition(&self) -> &RuleDefinition {
        &self.definition
    }

    fn evaluate(&self, product: &Product, category: Option<&Category>) -> ComplianceResult {
        if !self.definition.applies_to(category_name(category))
            || Evidence::of(product).declares(&Self::FIELDS, &Self::TERMS)
        {
            return ComplianceResult::compliant();
        }

        ComplianceResult::from_violations(vec![ViolationDescriptor::new(
            Self::ID,
            "Missing fabric composition details",
            Severity::Medium,
        )])
    }
}

#[derive(Debug)]
pub struct CareInstructionsRule {
    definition: RuleDefinition,
}

impl CareInstructionsRule {
    pub const ID: &'static str = "care_instructions";
    const TERMS: [&'static str; 3] = ["wash", "dry clean", "care"];

    pub fn new() -> Self {
        Self {
            definition: RuleDefinition::new(
                Self::ID,
                "Care Instructions",
                "Textile products must provide care instructions",
                Severity::Low,
            )
            .scoped_to(&[TEXTILES])
            .reading(&["raw_data.care_instructions"]),
        }
    }
}

impl Default for CareInstructionsRule {
    fn default() -> Self {
        Self::new()
    }
}

impl ComplianceRule for CareInstructionsRule {
    fn definition(&self) -> &RuleDefinition {
        &self.definition
    }

    fn evaluate(&self, product: &Product, category: Option<&Category>) -> ComplianceResult {
        if !self.definition.applies_to(category_name(category))
            || Evidence::of(product).declares(&["care_instructions"], &Self::TERMS)
        {
            return ComplianceResult::compliant();
        }

        ComplianceResult::from_violations(vec![ViolationDescriptor::new(
            Self::ID,
            "Missing care instructions",
            Severity::Low,
        )])
    }
}
