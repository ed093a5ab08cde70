//! Algolia REST backend for [`SearchIndex`].
//!
//! Talks to the write host (`https://{app_id}.algolia.net` unless overridden)
//! with the admin key:
//!
//! | Operation | Request |
//! |-----------|---------|
//! | clear | `POST /1/indexes/{index}/clear` |
//! | save | `POST /1/indexes/{index}/batch` with `updateObject` actions |
//! | wait | `GET /1/indexes/{index}/task/{taskID}` until `published` |
//!
//! There is no retry here: a non-2xx response or transport error becomes an
//! [`IndexerError::RemoteIndex`] and the run stops.

use async_trait::async_trait;
use reqwest::{Client, Method, Url};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

use crate::config::IndexSettings;
use crate::error::{IndexerError, Result};
use crate::models::SearchRecord;

use super::{SearchIndex, TaskId};

const POLL_INTERVAL: Duration = Duration::from_millis(500);
const MAX_POLLS: u32 = 240;

#[derive(Debug, Deserialize)]
struct TaskResponse {
    #[serde(rename = "taskID")]
    task_id: i64,
}

#[derive(Debug, Deserialize)]
struct TaskStatus {
    status: String,
}

pub struct AlgoliaIndex {
    client: Client,
    base: Url,
    app_id: String,
    api_key: String,
    index_name: String,
}

impl AlgoliaIndex {
    /// Build a client from resolved settings.
    ///
    /// # Errors
    ///
    /// Returns [`IndexerError::Configuration`] if the credential, app id or
    /// index name is missing, or if the host override is not a valid URL.
    pub fn new(settings: &IndexSettings) -> Result<Self> {
        settings.validate()?;
        let app_id = settings.app_id()?.to_string();
        let api_key = settings.api_key()?.to_string();
        let index_name = settings.index_name()?.to_string();

        let host = settings
            .host
            .clone()
            .unwrap_or_else(|| format!("https://{}.algolia.net", app_id));
        let base = Url::parse(&host).map_err(|e| {
            IndexerError::configuration(format!("invalid algolia host '{}': {}", host, e))
        })?;
        if base.cannot_be_a_base() {
            return Err(IndexerError::configuration(format!(
                "invalid algolia host '{}'",
                host
            )));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| IndexerError::configuration(format!("http client: {}", e)))?;

        Ok(Self {
            client,
            base,
            app_id,
            api_key,
            index_name,
        })
    }

    fn endpoint(&self, tail: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["1", "indexes", self.index_name.as_str()])
                .extend(tail);
        }
        url
    }

    async fn call(
        &self,
        operation: &'static str,
        method: Method,
        url: Url,
        body: Option<Value>,
    ) -> Result<Value> {
        let mut request = self
            .client
            .request(method, url)
            .header("X-Algolia-Application-Id", &self.app_id)
            .header("X-Algolia-API-Key", &self.api_key);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| IndexerError::remote(operation, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(IndexerError::remote(
                operation,
                format!("HTTP {}: {}", status, body_text),
            ));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| IndexerError::remote(operation, format!("invalid response: {}", e)))
    }

    fn parse_task(operation: &'static str, value: Value) -> Result<TaskId> {
        let parsed: TaskResponse = serde_json::from_value(value)
            .map_err(|e| IndexerError::remote(operation, format!("missing taskID: {}", e)))?;
        Ok(TaskId(parsed.task_id))
    }
}

#[async_trait]
impl SearchIndex for AlgoliaIndex {
    fn name(&self) -> &str {
        &self.index_name
    }

    async fn clear_objects(&self) -> Result<TaskId> {
        let url = self.endpoint(&["clear"]);
        let value = self.call("clear", Method::POST, url, None).await?;
        Self::parse_task("clear", value)
    }

    async fn save_objects(&self, records: &[SearchRecord]) -> Result<TaskId> {
        let requests: Vec<Value> = records
            .iter()
            .map(|record| json!({ "action": "updateObject", "body": record }))
            .collect();
        let url = self.endpoint(&["batch"]);
        let value = self
            .call("batch", Method::POST, url, Some(json!({ "requests": requests })))
            .await?;
        Self::parse_task("batch", value)
    }

    async fn wait_for_task(&self, task: TaskId) -> Result<()> {
        let task_id = task.0.to_string();
        for _ in 0..MAX_POLLS {
            let url = self.endpoint(&["task", task_id.as_str()]);
            let value = self.call("task", Method::GET, url, None).await?;
            let status: TaskStatus = serde_json::from_value(value)
                .map_err(|e| IndexerError::remote("task", format!("invalid status: {}", e)))?;
            if status.status == "published" {
                return Ok(());
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
        Err(IndexerError::remote(
            "task",
            format!("task {} was not published in time", task.0),
        ))
    }
}
