//! Mock generation API lifecycle
//!
//! Each test gets its own server on a random port. Replies are scripted per
//! model and every generateContent request is recorded for assertions.

use super::constants::*;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use sumini_studio::llm::{ApiKeySource, GeminiProvider};
use sumini_studio::ModelTiers;
use tokio::net::TcpListener;

/// One scripted answer to a generateContent call.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// 200 with a single candidate carrying this text.
    Text(String),
    /// Error status with a plain body.
    Status(u16),
    /// Never answer within any reasonable timeout.
    Hang,
}

impl MockReply {
    pub fn text(text: &str) -> Self {
        MockReply::Text(text.to_string())
    }
}

/// A generateContent request as the server saw it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub model: String,
    pub api_key: Option<String>,
    pub body: Value,
}

#[allow(dead_code)]
impl RecordedRequest {
    pub fn uses_search(&self) -> bool {
        self.body["tools"]
            .as_array()
            .map(|tools| tools.iter().any(|t| t.get("google_search").is_some()))
            .unwrap_or(false)
    }

    pub fn temperature(&self) -> f64 {
        self.body["generationConfig"]["temperature"]
            .as_f64()
            .unwrap_or_default()
    }

    /// Text of the last entry in `contents`.
    pub fn last_user_text(&self) -> String {
        self.body["contents"]
            .as_array()
            .and_then(|c| c.last())
            .and_then(|c| c["parts"][0]["text"].as_str())
            .unwrap_or_default()
            .to_string()
    }

    pub fn system_instruction(&self) -> Option<String> {
        self.body["systemInstruction"]["parts"][0]["text"]
            .as_str()
            .map(String::from)
    }
}

#[derive(Default)]
struct MockState {
    scripts: Mutex<HashMap<String, VecDeque<MockReply>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// Mock server instance; shuts down when dropped.
pub struct MockGemini {
    /// Base URL to hand to providers (e.g., "http://127.0.0.1:12345/v1beta")
    pub base_url: String,
    state: Arc<MockState>,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

#[allow(dead_code)]
impl MockGemini {
    pub async fn spawn() -> Self {
        let state = Arc::new(MockState::default());

        let app = Router::new()
            .route("/v1beta/models/{call}", get(model_info).post(generate_content))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Server failed");
        });

        let server = Self {
            base_url: format!("http://127.0.0.1:{}/v1beta", port),
            state,
            _shutdown_tx: Some(shutdown_tx),
        };
        server.wait_for_ready().await;
        server
    }

    /// Queue replies for `model`. Calls past the end of the script get a 500.
    pub fn script(&self, model: &str, replies: Vec<MockReply>) {
        self.state
            .scripts
            .lock()
            .unwrap()
            .entry(model.to_string())
            .or_default()
            .extend(replies);
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn requests_for(&self, model: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.model == model)
            .collect()
    }

    pub fn provider(&self, model: &str) -> Arc<GeminiProvider> {
        Arc::new(GeminiProvider::new(
            self.base_url.clone(),
            model,
            ApiKeySource::Static(TEST_API_KEY.to_string()),
        ))
    }

    /// Quality and speed tiers backed by this server.
    pub fn model_tiers(&self) -> ModelTiers {
        ModelTiers::new(self.provider(QUALITY_MODEL), self.provider(SPEED_MODEL))
    }

    async fn wait_for_ready(&self) {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .expect("Failed to build reqwest client");
        let url = format!("{}/models/{}", self.base_url, QUALITY_MODEL);

        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(SERVER_READY_TIMEOUT_MS);
        while start.elapsed() < timeout {
            if client.get(&url).send().await.is_ok() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("Mock server did not become ready within {:?}", timeout);
    }
}

async fn model_info(Path(model): Path<String>) -> Json<Value> {
    Json(json!({ "name": format!("models/{}", model) }))
}

async fn generate_content(
    State(state): State<Arc<MockState>>,
    Path(call): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let Some(model) = call.strip_suffix(":generateContent") else {
        return StatusCode::NOT_FOUND.into_response();
    };

    state.requests.lock().unwrap().push(RecordedRequest {
        model: model.to_string(),
        api_key: headers
            .get("x-goog-api-key")
            .and_then(|v| v.to_str().ok())
            .map(String::from),
        body,
    });

    let reply = state
        .scripts
        .lock()
        .unwrap()
        .get_mut(model)
        .and_then(|queue| queue.pop_front())
        .unwrap_or(MockReply::Status(500));

    match reply {
        MockReply::Text(text) => Json(json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": text }] },
                "finishReason": "STOP"
            }],
            "usageMetadata": {
                "promptTokenCount": 12,
                "candidatesTokenCount": 34,
                "totalTokenCount": 46
            }
        }))
        .into_response(),
        MockReply::Status(code) => {
            let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, "scripted failure").into_response()
        }
        MockReply::Hang => {
            tokio::time::sleep(Duration::from_secs(60)).await;
            StatusCode::GATEWAY_TIMEOUT.into_response()
        }
    }
}
