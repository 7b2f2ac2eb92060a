// metrology-core/src/domain/catalog/mod.rs

pub mod category;
pub mod product;
pub mod raw;

pub use category::{Category, RequirementConfig};
pub use product::Product;
pub use raw::{RawData, RawValue};
