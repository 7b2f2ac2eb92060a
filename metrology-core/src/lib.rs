// metrology-core/src/lib.rs

#![allow(missing_docs)]
// Memory safety
#![deny(unsafe_code)]
// Robustness
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
// Performance
#![warn(clippy::perf)]

// --- HEXAGONAL MODULES ---

// 1. Ports (storage contracts)
pub mod ports;

// 2. Domain (catalog records, rule engine, violation lifecycle)
// Depends on nothing else in the crate.
pub mod domain;

// 3. Infrastructure (adapters: DuckDB, in-memory, config files)
pub mod infrastructure;

// 4. Application (use cases: scans, triage, engine assembly)
pub mod application;

// --- GLOBAL ERROR HANDLING ---
pub mod error;

// --- RE-EXPORTS (FACADE) ---
pub use error::MetrologyError;
