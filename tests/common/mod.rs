//! Local stand-in for the Algolia REST API, served by axum on 127.0.0.1:0.
//!
//! Only the three endpoints the indexer uses are implemented. Objects are
//! stored per `objectID` and every accepted call is logged by name.

#![allow(dead_code)]

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

pub const ADMIN_KEY: &str = "admin-key";
pub const APP_ID: &str = "TESTAPP";

#[derive(Default)]
pub struct MockState {
    pub objects: BTreeMap<String, Value>,
    pub calls: Vec<String>,
    pub task_polls: u32,
    next_task: i64,
}

impl MockState {
    fn task(&mut self) -> i64 {
        self.next_task += 1;
        self.next_task
    }
}

pub type Shared = Arc<Mutex<MockState>>;

pub struct MockAlgolia {
    pub addr: SocketAddr,
    pub state: Shared,
}

impl MockAlgolia {
    pub fn host(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn seed(&self, object_id: &str) {
        self.state
            .lock()
            .unwrap()
            .objects
            .insert(object_id.to_string(), json!({ "objectID": object_id }));
    }

    pub fn object_ids(&self) -> Vec<String> {
        self.state.lock().unwrap().objects.keys().cloned().collect()
    }

    pub fn object(&self, object_id: &str) -> Option<Value> {
        self.state.lock().unwrap().objects.get(object_id).cloned()
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }
}

pub async fn start_mock() -> MockAlgolia {
    let state: Shared = Arc::new(Mutex::new(MockState::default()));

    let app = Router::new()
        .route("/1/indexes/{index}/clear", post(clear))
        .route("/1/indexes/{index}/batch", post(batch))
        .route("/1/indexes/{index}/task/{task_id}", get(task))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockAlgolia { addr, state }
}

fn authorized(headers: &HeaderMap) -> bool {
    let key = headers.get("x-algolia-api-key").and_then(|v| v.to_str().ok());
    let app = headers
        .get("x-algolia-application-id")
        .and_then(|v| v.to_str().ok());
    key == Some(ADMIN_KEY) && app == Some(APP_ID)
}

fn forbidden() -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(json!({ "message": "Invalid Application-ID or API key", "status": 403 })),
    )
        .into_response()
}

async fn clear(
    State(state): State<Shared>,
    Path(_index): Path<String>,
    headers: HeaderMap,
) -> Response {
    if !authorized(&headers) {
        return forbidden();
    }
    let mut s = state.lock().unwrap();
    s.calls.push("clear".to_string());
    s.objects.clear();
    let task = s.task();
    Json(json!({ "taskID": task, "updatedAt": "2026-01-01T00:00:00Z" })).into_response()
}

async fn batch(
    State(state): State<Shared>,
    Path(_index): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return forbidden();
    }
    let mut s = state.lock().unwrap();
    s.calls.push("batch".to_string());

    let mut ids = Vec::new();
    for request in body["requests"].as_array().cloned().unwrap_or_default() {
        if request["action"] != "updateObject" {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "message": "unsupported action" })),
            )
                .into_response();
        }
        let object = request["body"].clone();
        let Some(id) = object["objectID"].as_str().map(str::to_string) else {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "message": "missing objectID" })),
            )
                .into_response();
        };
        ids.push(id.clone());
        s.objects.insert(id, object);
    }

    let task = s.task();
    Json(json!({ "taskID": task, "objectIDs": ids })).into_response()
}

async fn task(
    State(state): State<Shared>,
    Path((_index, _task_id)): Path<(String, i64)>,
) -> Json<Value> {
    let mut s = state.lock().unwrap();
    s.task_polls += 1;
    // Every other poll reports the task as still pending.
    let status = if s.task_polls % 2 == 1 {
        "notPublished"
    } else {
        "published"
    };
    Json(json!({ "status": status, "pendingTask": status != "published" }))
}
