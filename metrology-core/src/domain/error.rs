// metrology-core/src/domain/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DomainError {
    #[error("Product '{0}' not found")]
    #[diagnostic(code(metrology::domain::product_not_found))]
    ProductNotFound(String),

    #[error("Violation '{0}' not found")]
    #[diagnostic(code(metrology::domain::violation_not_found))]
    ViolationNotFound(String),

    #[error("A rule with id '{0}' is already registered")]
    #[diagnostic(
        code(metrology::domain::duplicate_rule),
        help("Remove the existing rule first, or pick another id.")
    )]
    DuplicateRule(String),

    #[error("Invalid rule definition: {0}")]
    #[diagnostic(code(metrology::domain::invalid_rule))]
    InvalidRule(String),

    #[error("Violation '{violation_id}' cannot move from '{from}' to '{to}'")]
    #[diagnostic(
        code(metrology::domain::lifecycle),
        help("Resolved and dismissed violations are closed.")
    )]
    InvalidTransition {
        violation_id: String,
        from: String,
        to: String,
    },
}
