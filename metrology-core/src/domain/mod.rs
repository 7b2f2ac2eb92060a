pub mod catalog;
pub mod compliance;
pub mod error;
pub mod project;
pub mod violation;

// Handy re-exports to keep imports short elsewhere
pub use error::DomainError;
