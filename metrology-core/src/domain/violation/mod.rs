// metrology-core/src/domain/violation/mod.rs

pub mod lifecycle;
pub mod record;
pub mod summary;

pub use record::{Violation, ViolationStatus};
pub use summary::{ComplianceSummary, TrendPoint, ViolationStats};
