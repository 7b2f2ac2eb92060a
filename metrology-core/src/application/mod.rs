// metrology-core/src/application/mod.rs

pub mod detector;
pub mod rules;
pub mod scan;
pub mod triage;

// Facade so the CLI can `use metrology_core::application::{...}` without
// knowing the file layout.
pub use detector::{
    ProductScanOutcome, ScanBatch, ScanFailure, ScanFailureKind, ViolationDetector,
};
pub use rules::build_engine;
pub use scan::{ScanReport, ScanRequest, ScanType, run_scan};
pub use triage::{
    assign_violation, dismiss_violation, list_violations, resolve_violation, violation_stats,
};
