//! Adapters - concrete implementations of external dependencies

pub mod duckdb;
pub mod mock_transfer;
