// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! In-process mock of the items/likes backend.
//!
//! Limits behave like the real service: code requests are counted per
//! email, a fresh code resets the wrong-attempt counter, and likes share a
//! single per-client window. `None` disables a limit.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Behavior of the mock backend.
#[derive(Debug, Clone)]
pub struct MockOptions {
    /// Status returned by `/health`
    pub health_status: u16,
    /// Status returned by `/api/items`
    pub items_status: u16,
    /// Code requests accepted per email
    pub code_quota: Option<u32>,
    /// Wrong codes accepted before lockout
    pub lock_after: Option<u32>,
    /// Answer a locked code with 401 and the French lockout text instead of 429
    pub lockout_as_message: bool,
    /// Likes accepted per window
    pub like_quota: Option<u32>,
    /// Whether a like raises the counter
    pub likes_increment: bool,
    /// Items served by `/api/items`
    pub items: Vec<Value>,
    /// Email echoed by a code request instead of the requested one
    pub echoed_email: Option<String>,
}

impl Default for MockOptions {
    fn default() -> Self {
        Self {
            health_status: 200,
            items_status: 200,
            code_quota: Some(3),
            lock_after: Some(5),
            lockout_as_message: false,
            like_quota: Some(15),
            likes_increment: true,
            items: vec![sample_item(1, 2), sample_item(2, 0)],
            echoed_email: None,
        }
    }
}

/// A complete public item.
pub fn sample_item(id: i64, likes: i64) -> Value {
    json!({
        "id": id,
        "type": "note",
        "title": format!("item {}", id),
        "createdAt": "2026-10-01T12:00:00Z",
        "isPublic": true,
        "likes": likes
    })
}

#[derive(Debug, Default)]
struct Counters {
    code_requests: HashMap<String, u32>,
    failed_attempts: HashMap<String, u32>,
    like_requests: u32,
}

struct MockState {
    options: MockOptions,
    items: Mutex<Vec<Value>>,
    counters: Mutex<Counters>,
}

/// A running mock backend.
pub struct MockBackend {
    pub base_url: String,
    state: Arc<MockState>,
    handle: JoinHandle<()>,
}

impl MockBackend {
    pub async fn spawn(options: MockOptions) -> Self {
        let state = Arc::new(MockState {
            items: Mutex::new(options.items.clone()),
            options,
            counters: Mutex::new(Counters::default()),
        });

        let app = Router::new()
            .route("/", get(info))
            .route("/health", get(health))
            .route("/api/auth/request-code", post(request_code))
            .route("/api/auth/verify-code", post(verify_code))
            .route("/api/items", get(list_items))
            .route("/api/likes/:id", post(like))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind mock backend");
        let addr = listener.local_addr().expect("mock backend addr");
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock backend crashed");
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
            handle,
        }
    }

    pub async fn start() -> Self {
        Self::spawn(MockOptions::default()).await
    }

    /// Like requests received so far.
    pub fn like_requests(&self) -> u32 {
        self.state.counters.lock().unwrap().like_requests
    }

    /// Code requests received so far for `email`.
    pub fn code_requests(&self, email: &str) -> u32 {
        self.state
            .counters
            .lock()
            .unwrap()
            .code_requests
            .get(email)
            .copied()
            .unwrap_or(0)
    }

    /// Current like count of the item with `id`.
    pub fn likes_of(&self, id: i64) -> Option<i64> {
        self.state
            .items
            .lock()
            .unwrap()
            .iter()
            .find(|item| item["id"] == json!(id))
            .and_then(|item| item["likes"].as_i64())
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn status(code: u16) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

fn too_many(message: &str, retry_after_secs: u64) -> Response {
    (
        StatusCode::TOO_MANY_REQUESTS,
        [("Retry-After", retry_after_secs.to_string())],
        Json(json!({ "error": message })),
    )
        .into_response()
}

fn id_matches(item: &Value, id: &str) -> bool {
    match &item["id"] {
        Value::Number(n) => n.to_string() == id,
        Value::String(s) => s == id,
        _ => false,
    }
}

async fn info() -> Json<Value> {
    Json(json!({
        "message": "Items Backend API",
        "version": "1.0.0",
        "status": "running",
        "endpoints": {
            "auth": "/api/auth",
            "items": "/api/items",
            "likes": "/api/likes"
        }
    }))
}

async fn health(State(state): State<Arc<MockState>>) -> Response {
    (
        status(state.options.health_status),
        Json(json!({ "status": "ok" })),
    )
        .into_response()
}

async fn request_code(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    let email = body["email"].as_str().unwrap_or("unknown").to_string();
    let mut counters = state.counters.lock().unwrap();

    let count = counters.code_requests.entry(email.clone()).or_insert(0);
    *count += 1;
    if state.options.code_quota.is_some_and(|quota| *count > quota) {
        return too_many(
            "Trop de tentatives de demande de code. Réessayez dans 15 minutes.",
            900,
        );
    }

    counters.failed_attempts.insert(email.clone(), 0);
    let echoed = state.options.echoed_email.clone().unwrap_or(email);
    Json(json!({ "message": "Code sent to your email", "email": echoed })).into_response()
}

async fn verify_code(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    let email = body["email"].as_str().unwrap_or("unknown").to_string();
    if body["code"].as_str().is_none() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Email and code are required" })),
        )
            .into_response();
    }

    let mut counters = state.counters.lock().unwrap();
    let failed = counters.failed_attempts.entry(email).or_insert(0);

    if state.options.lock_after.is_some_and(|limit| *failed >= limit) {
        if state.options.lockout_as_message {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Trop de tentatives. Demandez un nouveau code." })),
            )
                .into_response();
        }
        return too_many(
            "Code bloqué après 5 tentatives échouées. Demandez un nouveau code.",
            900,
        );
    }

    *failed += 1;
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": "Invalid or expired code" })),
    )
        .into_response()
}

async fn list_items(State(state): State<Arc<MockState>>) -> Response {
    let items = state.items.lock().unwrap().clone();
    (
        status(state.options.items_status),
        Json(json!({ "items": items })),
    )
        .into_response()
}

async fn like(State(state): State<Arc<MockState>>, Path(id): Path<String>) -> Response {
    {
        let mut counters = state.counters.lock().unwrap();
        counters.like_requests += 1;
        if state
            .options
            .like_quota
            .is_some_and(|quota| counters.like_requests > quota)
        {
            return too_many("Trop de likes. Veuillez patienter.", 60);
        }
    }

    let mut items = state.items.lock().unwrap();
    let Some(item) = items.iter_mut().find(|item| id_matches(item, &id)) else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Item non trouvé" })),
        )
            .into_response();
    };

    let mut likes = item["likes"].as_i64().unwrap_or(0);
    if state.options.likes_increment {
        likes += 1;
        item["likes"] = json!(likes);
    }
    Json(json!({ "success": true, "likes": likes })).into_response()
}
