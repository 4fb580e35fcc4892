//! # Ecosim IO
//!
//! Persistence layer for the ecosim simulation.
//!
//! This crate provides:
//! - Structured error handling with custom error types
//! - JSON and hex serialization helpers
//! - Gzip-compressed world snapshots and single-policy export

/// Error types and result aliases for I/O operations
pub mod error;
/// Snapshot save/load and policy export
pub mod persistence;
/// Validated serialization helpers for JSON and hex
pub mod serialization;

pub use error::{IoError, Result};
pub use persistence::{
    export_policy, import_policy, load_snapshot, save_snapshot, snapshot_from_bytes,
    snapshot_to_bytes,
};
pub use serialization::{from_hex, from_json, to_hex, to_json};
