//! Indexing pipeline orchestration.
//!
//! Coordinates one run: scan → parse → normalize → synthesize for every
//! document, then a full-replace sync of the resulting snapshot. Documents
//! are independent of each other; only the final upload is a batch step.
//!
//! Everything here returns [`Result`]; translating failures into exit codes
//! is left to the binary.

use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;

use crate::config::{Config, IndexSettings};
use crate::error::{IndexerError, Result};
use crate::frontmatter::parse_document;
use crate::index::SearchIndex;
use crate::models::{IndexSnapshot, SearchRecord};
use crate::normalize::normalize_markdown;
use crate::record::synthesize_record;
use crate::scanner::{scan_documents, DiscoveredFile};
use crate::sync::{IndexSynchronizer, SyncReport};

/// Number of records echoed to the log before upload.
const SAMPLE_RECORDS: usize = 5;
const SAMPLE_KEYWORD_CHARS: usize = 100;

/// Summary of a completed run.
#[derive(Debug, Clone)]
pub struct IndexReport {
    pub files_found: usize,
    pub sync: SyncReport,
}

/// Scan the content root and synthesize one record per document.
pub fn build_snapshot(config: &Config) -> Result<IndexSnapshot> {
    let files: Vec<DiscoveredFile> = scan_documents(&config.content)?.collect::<Result<_>>()?;
    tracing::info!(
        root = %config.content.root.display(),
        files = files.len(),
        "found document files"
    );

    let mut records = Vec::with_capacity(files.len());
    for file in &files {
        tracing::info!(path = %file.relative_path, "processing");
        records.push(process_file(config, file)?);
    }

    warn_on_duplicate_ids(&records);

    Ok(IndexSnapshot { records })
}

/// Read, parse, normalize and synthesize a single document.
pub fn process_file(config: &Config, file: &DiscoveredFile) -> Result<SearchRecord> {
    let bytes = std::fs::read(&file.path).map_err(|e| IndexerError::filesystem(&file.path, e))?;
    let content = String::from_utf8_lossy(&bytes);

    let doc = parse_document(&file.relative_path, &content);
    let body = normalize_markdown(&doc.raw_body);
    Ok(synthesize_record(
        &doc,
        &body,
        &config.categories,
        &config.content.extensions,
        Utc::now(),
    ))
}

/// Build the snapshot and replace the remote index with it.
///
/// Settings are validated before the content tree is touched, so a missing
/// credential fails the run without doing any work.
pub async fn run_index(
    config: &Config,
    settings: &IndexSettings,
    index: Arc<dyn SearchIndex>,
) -> Result<IndexReport> {
    settings.validate()?;

    let snapshot = build_snapshot(config)?;
    log_samples(&snapshot);

    let sync = IndexSynchronizer::new(settings.clone(), index)
        .sync(&snapshot)
        .await?;
    tracing::info!(
        index = %sync.index_name,
        records = sync.records_written,
        "indexing completed"
    );

    Ok(IndexReport {
        files_found: snapshot.len(),
        sync,
    })
}

/// Log the first few records so a run's output can be eyeballed.
pub fn log_samples(snapshot: &IndexSnapshot) {
    for record in snapshot.records.iter().take(SAMPLE_RECORDS) {
        let keywords: String = record.keywords.chars().take(SAMPLE_KEYWORD_CHARS).collect();
        tracing::info!(
            "sample: {} ({}) - keywords: {}...",
            record.title,
            record.category,
            keywords
        );
    }
}

fn warn_on_duplicate_ids(records: &[SearchRecord]) {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for record in records {
        *counts.entry(record.object_id.as_str()).or_default() += 1;
    }
    for (object_id, count) in counts {
        if count > 1 {
            tracing::warn!(
                object_id,
                count,
                "several documents share an object id; the last one uploaded wins"
            );
        }
    }
}
