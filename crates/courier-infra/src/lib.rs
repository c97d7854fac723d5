//! Infrastructure layer
//!
//! Concrete implementations of domain interfaces: the TOML rate table,
//! file-backed repositories and CSV loaders.

pub mod csv_loader;
pub mod persistence;
pub mod rate_table_loader;
