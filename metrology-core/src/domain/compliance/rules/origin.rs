// metrology-core/src/domain/compliance/rules/origin.rs

use super::required_by;
use crate::domain::catalog::{Category, Product};
use crate::domain::compliance::evidence::Evidence;
use crate::domain::compliance::{
    ComplianceResult, ComplianceRule, RuleDefinition, Severity, ViolationDescriptor,
};

#[derive(Debug)]
pub struct CountryOfOriginRule {
    definition: RuleDefinition,
}

impl CountryOfOriginRule {
    pub const ID: &'static str = "country_of_origin";
    const FIELDS: [&'static str; 2] = ["country_of_origin", "made_in"];
    const TERMS: [&'static str; 2] = ["made in", "country of origin"];

    pub fn new() -> Self {
        Self {
            definition: RuleDefinition::new(
                Self::ID,
                "Country of Origin",
                "Country of origin must be declared for imported goods",
                Severity::Medium,
            )
            .reading(&[
                "compliance_rules.country_of_origin",
                "raw_data.country_of_origin",
                "raw_data.made_in",
            ]),
        }
    }
}

impl Default for CountryOfOriginRule {
    fn default() -> Self {
        Self::new()
    }
}

impl ComplianceRule for CountryOfOriginRule {
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
            ViolationDescriptor::new(
                Self::ID,
                "Missing country of origin declaration",
                Severity::Medium,
            )
            .with_details(required_by(category)),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::compliance::rules::fixtures::{category, product, with_raw};

    #[test]
    fn test_fires_only_when_required() {
        let rule = CountryOfOriginRule::new();
        let p = product("Stainless steel bottle");

        assert!(rule.evaluate(&p, Some(&category("Kitchen"))).is_compliant);

        let cat = category("Kitchen").requiring("country_of_origin");
        let result = rule.evaluate(&p, Some(&cat));
        assert_eq!(result.violations.len(), 1);
        assert_eq!(result.violations[0].severity, Severity::Medium);
    }

    #[test]
    fn test_description_or_field_satisfies() {
        let rule = CountryOfOriginRule::new();
        let cat = category("Kitchen").requiring("country_of_origin");

        assert!(rule.evaluate(&product("MADE IN India"), Some(&cat)).is_compliant);
        let p = with_raw(product(""), "made_in", "Vietnam");
        assert!(rule.evaluate(&p, Some(&cat)).is_compliant);
    }
}
