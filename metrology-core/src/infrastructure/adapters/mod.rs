// metrology-core/src/infrastructure/adapters/mod.rs

pub mod duckdb;
pub mod memory;

pub use self::duckdb::DuckDbStore;
pub use memory::InMemoryStore;
