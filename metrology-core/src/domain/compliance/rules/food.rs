// metrology-core/src/domain/compliance/rules/food.rs

use serde_json::json;

use super::{COSMETICS, FOOD_AND_BEVERAGES, category_name};
use crate::domain::catalog::{Category, Product};
use crate::domain::compliance::evidence::Evidence;
use crate::domain::compliance::{
    ComplianceResult, ComplianceRule, RuleDefinition, Severity, ViolationDescriptor,
};

#[derive(Debug)]
pub struct IngredientsListRule {
    definition: RuleDefinition,
}

impl IngredientsListRule {
    pub const ID: &'static str = "ingredients_list";

    pub fn new() -> Self {
        Self {
            definition: RuleDefinition::new(
                Self::ID,
                "Ingredients List",
                "Food products must list ingredients in descending order by weight",
                Severity::High,
            )
            .scoped_to(&[FOOD_AND_BEVERAGES])
            .reading(&["raw_data.ingredients"]),
        }
    }
}

impl Default for IngredientsListRule {
    fn default() -> Self {
        Self::new()
    }
}

impl ComplianceRule for IngredientsListRule {
    fn definition(&self) -> &RuleDefinition {
        &self.definition
    }

    fn evaluate(&self, product: &Product, category: Option<&Category>) -> ComplianceResult {
        if !self.definition.applies_to(category_name(category))
            || Evidence::of(product).declares(&["ingredients"], &["ingredients"])
        {
            return ComplianceResult::compliant();
        }

        ComplianceResult::from_violations(vec![ViolationDescriptor::new(
            Self::ID,
            "Missing ingredients list for food product",
            Severity::High,
        )])
    }
}

/// Perishables (food and cosmetics) must carry an expiry or best-before date.
#[derive(Debug)]
pub struct ExpiryDateRule {
    definition: RuleDefinition,
}

impl ExpiryDateRule {
    pub const ID: &'static str = "expiry_date";
    const FIELDS: [&'static str; 2] = ["expiry_date", "best_before"];
    const TERMS: [&'static str; 2] = ["expiry", "best before"];

    pub fn new() -> Self {
        Self {
            definition: RuleDefinition::new(
                Self::ID,
                "Expiry Date",
                "Perishable products must display expiry/best before date",
                Severity::Critical,
            )
            .scoped_to(&[FOOD_AND_BEVERAGES, COSMETICS])
            .reading(&["raw_data.expiry_date", "raw_data.best_before"]),
        }
    }
}

impl Default for ExpiryDateRule {
    fn default() -> Self {
        Self::new()
    }
}

impl ComplianceRule for ExpiryDateRule {
    fn definition(&self) -> &RuleDefinition {
        &self.definition
    }

    fn evaluate(&self, product: &Product, category: Option<&Category>) -> ComplianceResult {
        if !self.definition.applies_to(category_name(category))
            || Evidence::of(product).declares(&Self::FIELDS, &Self::TERMS)
        {
            return ComplianceResult::compliant();
        }

        ComplianceResult::from_violations(vec![
            ViolationDescriptor::new(
                Self::ID,
                "Missing expiry/best before date",
                Severity::Critical,
            )
            .with_details(json!({ "category": category_name(category) })),
        ])
    }
}
