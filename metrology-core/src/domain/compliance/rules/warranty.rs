// metrology-core/src/domain/compliance/rules/warranty.rs

use super::required_by;
use crate::domain::catalog::{Category, Product};
use crate::domain::compliance::evidence::Evidence;
use crate::domain::compliance::{
    ComplianceResult, ComplianceRule, RuleDefinition, Severity, ViolationDescriptor,
};

#[derive(Debug)]
pub struct WarrantyInformationRule {
    definition: RuleDefinition,
}

impl WarrantyInformationRule {
    pub const ID: &'static str = "warranty_information";
    /// The category config key is `warranty`, not the rule id.
    const REQUIREMENT: &'static str = "warranty";
    const FIELDS: [&'static str; 1] = ["warranty"];
    const TERMS: [&'static str; 2] = ["warranty", "guarantee"];

    pub fn new() -> Self {
        Self {
            definition: RuleDefinition::new(
                Self::ID,
                "Warranty Information",
                "Products must clearly state warranty terms and conditions",
                Severity::Low,
            )
            .reading(&["compliance_rules.warranty", "raw_data.warranty"]),
        }
    }
}

impl Default for WarrantyInformationRule {
    fn default() -> Self {
        Self::new()
    }
}

impl ComplianceRule for WarrantyInformationRule {
    fn definition(&self) -> &RuleDefinition {
        &self.definition
    }

    fn evaluate(&self, product: &Product, category: Option<&Category>) -> ComplianceResult {
        if !category.is_some_and(|c| c.requires(Self::REQUIREMENT)) {
            return ComplianceResult::compliant();
        }

        if Evidence::of(product).declares(&Self::FIELDS, &Self::TERMS) {
            return ComplianceResult::compliant();
        }

        ComplianceResult::from_violations(vec![
            ViolationDescriptor::new(Self::ID, "Missing warranty information", Severity::Low)
                .with_details(required_by(category)),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::compliance::rules::fixtures::{category, product};

    #[test]
    fn test_gated_on_warranty_key() {
        let rule = WarrantyInformationRule::new();
        let p = product("Mixer grinder 750W");

        let ungated = category("Appliances").requiring("warranty_information");
        assert!(rule.evaluate(&p, Some(&ungated)).is_compliant);

        let cat = category("Appliances").requiring("warranty");
        let result = rule.evaluate(&p, Some(&cat));
        assert_eq!(result.violations.len(), 1);
        assert_eq!(result.violations[0].severity, Severity::Low);

        let guaranteed = product("2 year guarantee on motor");
        assert!(rule.evaluate(&guaranteed, Some(&cat)).is_compliant);
    }
}
