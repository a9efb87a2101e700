//! # Factcollector - Digital Fact Collector
//!
//! Fetches short text facts from an online source and keeps them in a local,
//! deduplicated collection.
//!
//! Factcollector provides:
//! - A JSON-file fact store with case- and whitespace-insensitive deduplication
//! - Atomic persistence (temporary file + rename) after every insert
//! - A pluggable fact source with an HTTP implementation
//! - A collection driver that runs one cycle on demand or on a fixed interval

pub mod fact;
pub mod storage;
pub mod source;
pub mod collector;
pub mod config;
pub mod ui;

// Re-exports for convenient access
pub use fact::{CollectionStats, FactRecord};
pub use storage::FactStore;
pub use source::{FactSource, HttpFactSource};
pub use collector::{CollectOutcome, Collector, DriverState, SessionStats};

use std::path::PathBuf;

/// Result type alias for Factcollector operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Factcollector operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("Malformed storage at {path}: {reason}")]
    MalformedStorage { path: PathBuf, reason: String },

    #[error("Empty fact received")]
    EmptyInput,

    #[error("Duplicate detected: '{preview}...'")]
    Duplicate { preview: String },

    #[error("Persist error: {0}")]
    Persist(std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),
}
