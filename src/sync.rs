//! Full-replace synchronization of an [`IndexSnapshot`] with a remote index.
//!
//! Sequence for [`IndexSynchronizer::sync`]:
//!
//! 1. validate the [`IndexSettings`]; a missing credential stops here, before
//!    any remote call,
//! 2. clear the index,
//! 3. write the snapshot in batches of `batch_size`, one after another,
//! 4. optionally wait for every write task to be published.
//!
//! Clear and write are not transactional. If a later step fails, the index is
//! left in whatever state the earlier steps produced.

use std::sync::Arc;

use crate::config::IndexSettings;
use crate::error::Result;
use crate::index::SearchIndex;
use crate::models::IndexSnapshot;

/// Outcome of a successful synchronization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub index_name: String,
    pub records_written: usize,
    pub batches: usize,
}

pub struct IndexSynchronizer {
    settings: IndexSettings,
    index: Arc<dyn SearchIndex>,
}

impl IndexSynchronizer {
    pub fn new(settings: IndexSettings, index: Arc<dyn SearchIndex>) -> Self {
        Self { settings, index }
    }

    pub async fn sync(&self, snapshot: &IndexSnapshot) -> Result<SyncReport> {
        self.settings.validate()?;

        let name = self.index.name().to_string();
        let wait = self.settings.wait_for_tasks;

        tracing::info!(index = %name, "clearing existing index");
        let task = self.index.clear_objects().await?;
        if wait {
            self.index.wait_for_task(task).await?;
        }

        tracing::info!(
            index = %name,
            records = snapshot.len(),
            batch_size = self.settings.batch_size,
            "uploading records"
        );
        let mut batches = 0;
        for batch in snapshot.records.chunks(self.settings.batch_size) {
            let task = self.index.save_objects(batch).await?;
            batches += 1;
            tracing::debug!(index = %name, batch = batches, records = batch.len(), task = task.0, "batch accepted");
            if wait {
                self.index.wait_for_task(task).await?;
            }
        }

        Ok(SyncReport {
            index_name: name,
            records_written: snapshot.len(),
            batches,
        })
    }
}
