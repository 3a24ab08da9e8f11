//! Upstream data contracts: entity records and workspace snapshots.
pub mod snapshot;
pub mod types;
