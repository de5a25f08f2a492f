pub mod aggregate;
pub mod backend;
pub mod dedupe;
pub mod schema;
pub mod session;
pub mod store_impl;

pub use backend::DuckDbStore;

/// Re-export the `duckdb` crate so consumers (especially tests) can use
/// `pagetally_duckdb::duckdb::params!` without an extra dependency.
pub use duckdb;
