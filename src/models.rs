//! Core data models used throughout the indexer.
//!
//! [`ContentDocument`] is what the scanner and parser produce from a file;
//! [`SearchRecord`] is what gets uploaded. The serde names on
//! [`SearchRecord`] are the wire contract with the hosted index.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata declared in a document's front-matter block. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub sidebar_label: Option<String>,
    pub description: Option<String>,
    pub keywords: Vec<String>,
    pub tags: Vec<String>,
}

impl FrontMatter {
    pub fn is_empty(&self) -> bool {
        *self == FrontMatter::default()
    }
}

/// A document discovered under the content root, split into metadata and body.
#[derive(Debug, Clone)]
pub struct ContentDocument {
    /// Path relative to the content root, always `/`-separated.
    pub path: String,
    pub front_matter: FrontMatter,
    pub raw_body: String,
}

/// Display hierarchy used by the search UI for grouping results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hierarchy {
    pub lvl0: String,
    pub lvl1: String,
    pub lvl2: String,
}

/// One record in the remote index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRecord {
    #[serde(rename = "objectID")]
    pub object_id: String,
    pub title: String,
    pub content: String,
    pub url: String,
    pub hierarchy: Hierarchy,
    #[serde(rename = "type")]
    pub record_type: String,
    pub category: String,
    pub keywords: String,
    pub description: String,
    pub tags: Vec<String>,
    #[serde(rename = "lastModified")]
    pub last_modified: DateTime<Utc>,
}

/// All records produced in one run. Replaces the remote index wholesale.
#[derive(Debug, Clone, Default)]
pub struct IndexSnapshot {
    pub records: Vec<SearchRecord>,
}

impl IndexSnapshot {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
