//! Storage Layer - JSON-file persistence
//!
//! System of record is a single JSON array of fact records:
//! - fact (text)
//! - date_added (timestamp text)
//! - id (integer)
//!
//! The whole array is rewritten on every insert through a temporary file
//! that is renamed over the target.

pub mod fact_store;

pub use fact_store::{FactStore, load};
