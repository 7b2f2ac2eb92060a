// metrology-core/src/domain/compliance/rules/manufacturer.rs

use super::required_by;
use crate::domain::catalog::{Category, Product};
use crate::domain::compliance::evidence::Evidence;
use crate::domain::compliance::{
    ComplianceResult, ComplianceRule, RuleDefinition, Severity, ViolationDescriptor,
};

#[derive(Debug)]
pub struct ManufacturerDetailsRule {
    definition: RuleDefinition,
}

impl ManufacturerDetailsRule {
    pub const ID: &'static str = "manufacturer_details";
    const FIELDS: [&'static str; 2] = ["manufacturer", "brand"];
    const TERMS: [&'static str; 1] = ["manufactured by"];

    pub fn new() -> Self {
        Self {
            definition: RuleDefinition::new(
                Self::ID,
                "Manufacturer Details",
                "Manufacturer name and address must be provided",
                Severity::High,
            )
            .reading(&[
                "compliance_rules.manufacturer_details",
                "raw_data.manufacturer",
                "raw_data.brand",
            ]),
        }
    }
}

impl Default for ManufacturerDetailsRule {
    fn default() -> Self {
        Self::new()
    }
}

impl ComplianceRule for ManufacturerDetailsRule {
    fn definition(&self) -> &RuleDefinition {
        &self.definition
    }

    fn evaluate(&self, product: &Product, category: Option<&Category>) -> ComplianceResult {
        if !category.is_some_and(|c| c.requires(Self::ID)) {
            return ComplianceResult::compliant();
        }

        if Evidence::of(product).declares(&Self::FIELDS, &Self::TERMS) {
            return ComplianceResult::compliant();
        }

        ComplianceResult::from_violations(vec![
            ViolationDescriptor::new(Self::ID, "Missing manufacturer details", Severity::High)
                .with_details(required_by(category)),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::compliance::rules::fixtures::{category, product, with_raw};

    #[test]
    fn test_brand_counts_as_manufacturer() {
        let rule = ManufacturerDetailsRule::new();
        let cat = category("Cosmetics").requiring("manufacturer_details");

        assert!(!rule.evaluate(&product("Face cream"), Some(&cat)).is_compliant);
        let p = with_raw(product("Face cream"), "brand", "Glow");
        assert!(rule.evaluate(&p, Some(&cat)).is_compliant);
        assert!(
            rule.evaluate(&product("Manufactured by Glow Pvt Ltd, Pune"), Some(&cat))
                .is_compliant
        );
    }
}
