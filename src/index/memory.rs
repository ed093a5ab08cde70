//! In-memory [`SearchIndex`] for tests and offline runs.
//!
//! Records are kept in a `BTreeMap` keyed by object id behind
//! `std::sync::RwLock`. Every call is appended to a log so tests can assert
//! on ordering (clear before write) and on the absence of calls.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::{IndexerError, Result};
use crate::models::SearchRecord;

use super::{SearchIndex, TaskId};

/// One observed call against an [`InMemoryIndex`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexCall {
    Clear,
    Save { count: usize },
    Wait(TaskId),
}

/// In-memory index with optional failure injection.
pub struct InMemoryIndex {
    name: String,
    records: RwLock<BTreeMap<String, SearchRecord>>,
    calls: RwLock<Vec<IndexCall>>,
    next_task: AtomicI64,
    fail_on: Option<&'static str>,
}

impl InMemoryIndex {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            records: RwLock::new(BTreeMap::new()),
            calls: RwLock::new(Vec::new()),
            next_task: AtomicI64::new(1),
            fail_on: None,
        }
    }

    /// An index whose `operation` (`"clear"`, `"batch"` or `"task"`) always fails.
    pub fn failing_on(name: &str, operation: &'static str) -> Self {
        Self {
            fail_on: Some(operation),
            ..Self::new(name)
        }
    }

    /// Pre-populate records, as if left over from an earlier run.
    pub fn seed(&self, records: impl IntoIterator<Item = SearchRecord>) {
        let mut stored = self.records.write().unwrap_or_else(|e| e.into_inner());
        for record in records {
            stored.insert(record.object_id.clone(), record);
        }
    }

    pub fn records(&self) -> Vec<SearchRecord> {
        let stored = self.records.read().unwrap_or_else(|e| e.into_inner());
        stored.values().cloned().collect()
    }

    pub fn get(&self, object_id: &str) -> Option<SearchRecord> {
        let stored = self.records.read().unwrap_or_else(|e| e.into_inner());
        stored.get(object_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.records.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn calls(&self) -> Vec<IndexCall> {
        self.calls.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn record_call(&self, call: IndexCall) {
        self.calls
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(call);
    }

    fn check(&self, operation: &'static str) -> Result<()> {
        if self.fail_on == Some(operation) {
            return Err(IndexerError::remote(operation, "injected failure"));
        }
        Ok(())
    }

    fn task(&self) -> TaskId {
        TaskId(self.next_task.fetch_add(1, Ordering::SeqCst))
    }
}

#[async_trait]
impl SearchIndex for InMemoryIndex {
    fn name(&self) -> &str {
        &self.name
    }

    async fn clear_objects(&self) -> Result<TaskId> {
        self.record_call(IndexCall::Clear);
        self.check("clear")?;
        self.records
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
        Ok(self.task())
    }

    async fn save_objects(&self, records: &[SearchRecord]) -> Result<TaskId> {
        self.record_call(IndexCall::Save {
            count: records.len(),
        });
        self.check("batch")?;
        self.seed(records.iter().cloned());
        Ok(self.task())
    }

    async fn wait_for_task(&self, task: TaskId) -> Result<()> {
        self.record_call(IndexCall::Wait(task));
        self.check("task")
    }
}
