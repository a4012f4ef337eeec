//! Mock EmoTune backend
//!
//! A real axum server on 127.0.0.1:0 that records every request and answers
//! with scripted replies, so the reqwest clients run against actual HTTP.

use axum::extract::{Multipart, Query, State};
use axum::http::{StatusCode, Uri};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One multipart field as received
#[derive(Debug, Clone)]
pub struct UploadedPart {
    pub name: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadedPart {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub path: String,
    pub query: HashMap<String, String>,
    pub json: Option<Value>,
    pub parts: Vec<UploadedPart>,
}

impl RecordedRequest {
    pub fn part(&self, name: &str) -> Option<&UploadedPart> {
        self.parts.iter().find(|p| p.name == name)
    }
}

/// Scripted answer for one path
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: StatusCode,
    pub body: Value,
    pub delay: Duration,
}

impl Reply {
    pub fn ok(body: Value) -> Self {
        Self {
            status: StatusCode::OK,
            body,
            delay: Duration::ZERO,
        }
    }

    pub fn status(status: StatusCode, body: Value) -> Self {
        Self {
            status,
            body,
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[derive(Default)]
struct Inner {
    requests: Vec<RecordedRequest>,
    replies: HashMap<String, Reply>,
}

#[derive(Clone, Default)]
pub struct MockBackend {
    inner: Arc<Mutex<Inner>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every request to `path` with `reply`
    pub fn reply(&self, path: &str, reply: Reply) -> &Self {
        self.inner
            .lock()
            .unwrap()
            .replies
            .insert(path.to_string(), reply);
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.inner.lock().unwrap().requests.clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }

    /// Serve on an ephemeral port; returns the base URL
    pub async fn start(&self) -> String {
        let app = Router::new()
            .route("/detect-emotion", post(multipart_handler))
            .route("/recommendations", get(query_handler))
            .route("/register", post(json_handler))
            .route("/login", post(json_handler))
            .route("/check-user", post(json_handler))
            .route("/forgot-password", post(json_handler))
            .route("/send-reset-link", post(multipart_handler))
            .route("/profile", get(query_handler))
            .route("/update-profile", put(json_handler))
            .route("/upload-profile-pic", post(multipart_handler))
            .route("/change-password", post(multipart_handler))
            .with_state(self.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    async fn answer(&self, request: RecordedRequest) -> (StatusCode, Json<Value>) {
        let reply = {
            let mut inner = self.inner.lock().unwrap();
            let reply = inner
                .replies
                .get(&request.path)
                .cloned()
                .unwrap_or_else(|| default_reply(&request.path));
            inner.requests.push(request);
            reply
        };
        if !reply.delay.is_zero() {
            tokio::time::sleep(reply.delay).await;
        }
        (reply.status, Json(reply.body))
    }
}

fn default_reply(path: &str) -> Reply {
    match path {
        "/recommendations" => Reply::ok(json!([])),
        "/detect-emotion" => Reply::ok(json!({ "emotion": null, "confidence": null })),
        _ => Reply::ok(json!({ "message": "ok" })),
    }
}

async fn multipart_handler(
    State(mock): State<MockBackend>,
    uri: Uri,
    mut multipart: Multipart,
) -> (StatusCode, Json<Value>) {
    let mut parts = Vec::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map(|b| b.to_vec()).unwrap_or_default();
        parts.push(UploadedPart {
            name,
            file_name,
            content_type,
            bytes,
        });
    }
    mock.answer(RecordedRequest {
        method: "POST",
        path: uri.path().to_string(),
        query: HashMap::new(),
        json: None,
        parts,
    })
    .await
}

async fn query_handler(
    State(mock): State<MockBackend>,
    uri: Uri,
    Query(query): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    mock.answer(RecordedRequest {
        method: "GET",
        path: uri.path().to_string(),
        query,
        json: None,
        parts: Vec::new(),
    })
    .await
}

async fn json_handler(
    State(mock): State<MockBackend>,
    uri: Uri,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let method = if uri.path() == "/update-profile" { "PUT" } else { "POST" };
    mock.answer(RecordedRequest {
        method,
        path: uri.path().to_string(),
        query: HashMap::new(),
        json: Some(body),
        parts: Vec::new(),
    })
    .await
}
