//! Remote search index abstraction.
//!
//! The [`SearchIndex`] trait is the seam between the synchronizer and the
//! hosted service, so full-replace logic can be exercised against
//! [`memory::InMemoryIndex`] without network access.
//!
//! | Method | Purpose |
//! |--------|---------|
//! | [`clear_objects`](SearchIndex::clear_objects) | Remove every stored record |
//! | [`save_objects`](SearchIndex::save_objects) | Create or replace a batch of records by `objectID` |
//! | [`wait_for_task`](SearchIndex::wait_for_task) | Block until an async write is visible |

pub mod algolia;
pub mod memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::SearchRecord;

/// Handle for an asynchronous write accepted by the remote index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId(pub i64);

#[async_trait]
pub trait SearchIndex: Send + Sync {
    /// Name of the target index, used in log output.
    fn name(&self) -> &str;

    /// Remove every record from the index.
    async fn clear_objects(&self) -> Result<TaskId>;

    /// Create or replace `records`, keyed by their object id.
    async fn save_objects(&self, records: &[SearchRecord]) -> Result<TaskId>;

    /// Wait until the write identified by `task` has been applied.
    async fn wait_for_task(&self, task: TaskId) -> Result<()>;
}
