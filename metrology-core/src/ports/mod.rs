// metrology-core/src/ports/mod.rs

pub mod store;

pub use store::{ComplianceStore, ProductFilter, ProductRepository, ViolationFilter, ViolationRepository};
