//! Fact records and collection statistics

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Number of characters shown when a rejected fact is echoed back.
pub const PREVIEW_CHARS: usize = 50;

/// Layout of timestamps written by this crate
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// A single stored fact.
///
/// Field order matches the on-disk layout: `fact`, `date_added`, `id`.
/// `date_added` is kept as the text found in storage so that any ISO-8601
/// variant written by another tool survives a load/persist cycle untouched.
/// New records use local wall-clock time without an offset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactRecord {
    pub fact: String,
    pub date_added: String,
    pub id: u64,
}

impl FactRecord {
    /// Create a record stamped with the current local time
    pub fn new(id: u64, fact: impl Into<String>) -> Self {
        Self {
            fact: fact.into(),
            date_added: chrono::Local::now().format(TIMESTAMP_FORMAT).to_string(),
            id,
        }
    }

    /// Deduplication key for this record
    pub fn normalized(&self) -> String {
        normalize(&self.fact)
    }
}

/// Parse ISO-8601 timestamp text: naive with `T` or space separator, or
/// RFC 3339 with an offset (kept as the wall-clock time of that offset).
pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_local());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
}

/// Timestamp text for display; unrecognised text is shown as stored
pub fn display_timestamp(text: &str) -> String {
    match parse_timestamp(text) {
        Some(ts) => ts.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => text.to_string(),
    }
}

/// Trim and case-fold text for duplicate comparison.
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// First `max_chars` characters of `text`, never splitting a code point.
pub fn preview(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// Summary of a fact collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CollectionStats {
    pub total: usize,
    pub first_added: Option<String>,
    pub latest_added: Option<String>,
    pub most_recent_fact: Option<String>,
}

impl CollectionStats {
    pub fn from_facts(facts: &[FactRecord]) -> Self {
        Self {
            total: facts.len(),
            first_added: facts.first().map(|f| f.date_added.clone()),
            latest_added: facts.last().map(|f| f.date_added.clone()),
            most_recent_fact: facts.last().map(|f| f.fact.clone()),
        }
    }
}

impl std::fmt::Display for CollectionStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Total facts in database: {}", self.total)?;
        if let (Some(first), Some(latest)) = (&self.first_added, &self.latest_added) {
            writeln!(f, "First fact added: {}", display_timestamp(first))?;
            writeln!(f, "Latest fact added: {}", display_timestamp(latest))?;
        }
        if let Some(fact) = &self.most_recent_fact {
            writeln!(f, "Most recent fact:")?;
            writeln!(f, "  {}", fact)?;
        }
        Ok(())
    }
}
