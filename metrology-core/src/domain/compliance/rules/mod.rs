// metrology-core/src/domain/compliance/rules/mod.rs
//
// Builtin Legal Metrology (Packaged Commodities) rules.

pub mod energy;
pub mod food;
pub mod manufacturer;
pub mod origin;
pub mod price;
pub mod textiles;
pub mod warranty;
pub mod weight;

use std::sync::Arc;

use serde_json::json;

use super::rule::ComplianceRule;
use crate::domain::catalog::Category;

pub use energy::EnergyRatingRule;
pub use food::{ExpiryDateRule, IngredientsListRule};
pub use manufacturer::ManufacturerDetailsRule;
pub use origin::CountryOfOriginRule;
pub use price::PriceDisplayRule;
pub use textiles::{CareInstructionsRule, FabricCompositionRule};
pub use warranty::WarrantyInformationRule;
pub use weight::WeightDeclarationRule;

pub const FOOD_AND_BEVERAGES: &str = "Food & Beverages";
pub const COSMETICS: &str = "Cosmetics";
pub const TEXTILES: &str = "Textiles";
pub const ELECTRONICS: &str = "Electronics";

/// The builtin catalogue, in evaluation order.
pub fn builtin_rules() -> Vec<Arc<dyn ComplianceRule>> {
    vec![
        Arc::new(WeightDeclarationRule::new()),
        Arc::new(PriceDisplayRule::new()),
        Arc::new(CountryOfOriginRule::new()),
        Arc::new(ManufacturerDetailsRule::new()),
        Arc::new(IngredientsListRule::new()),
        Arc::new(ExpiryDateRule::new()),
        Arc::new(FabricCompositionRule::new()),
        Arc::new(CareInstructionsRule::new()),
        Arc::new(EnergyRatingRule::new()),
        Arc::new(WarrantyInformationRule::new()),
    ]
}

pub(crate) fn category_name(category: Option<&Category>) -> Option<&str> {
    category.map(|c| c.name.as_str())
}

/// Details attached to config-gated findings.
pub(crate) fn required_by(category: Option<&Category>) -> serde_json::Value {
    json!({ "required_by_category": category_name(category) })
}
