//! Test utilities for tally-core
//!
//! This module provides a mock remote classifier server that speaks both the
//! OpenAI chat completions API and the Ollama generate API, so backends and
//! the parser fallback can be tested without a real model.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Json, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::oneshot;

use crate::parser::RuleParser;

/// How the mock server answers classification requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockMode {
    /// Valid JSON computed by the rule parser
    Good,
    /// A chatty answer with no JSON object in it
    Malformed,
    /// HTTP 500 on every endpoint
    ServerError,
    /// A good answer, but only after `SLOW_DELAY`
    Slow,
}

/// How long `MockMode::Slow` waits before answering
pub const SLOW_DELAY: Duration = Duration::from_secs(2);

/// What the server saw on the most recent classification request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeenRequest {
    pub authorization: Option<String>,
    pub model: String,
    /// User prompt (chat) or generate prompt (Ollama)
    pub prompt: String,
}

struct ServerState {
    mode: MockMode,
    last_request: Mutex<Option<SeenRequest>>,
}

/// Mock remote classifier server for testing
pub struct MockRemoteServer {
    addr: SocketAddr,
    state: Arc<ServerState>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockRemoteServer {
    /// Start the mock server on an available port
    pub async fn start(mode: MockMode) -> Self {
        let state = Arc::new(ServerState {
            mode,
            last_request: Mutex::new(None),
        });

        let app = Router::new()
            .route("/v1/models", get(handle_health))
            .route("/v1/chat/completions", post(handle_chat))
            .route("/api/tags", get(handle_health))
            .route("/api/generate", post(handle_generate))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            state,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// The most recent classification request, if any
    pub fn last_request(&self) -> Option<SeenRequest> {
        self.state.last_request.lock().unwrap().clone()
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockRemoteServer {
    fn drop(&mut self) {
        self.stop();
    }
}

#[derive(Debug, Deserialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
}

/// `/v1/models` and `/api/tags`
async fn handle_health(State(state): State<Arc<ServerState>>) -> Response {
    if state.mode == MockMode::ServerError {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    Json(json!({
        "data": [{"id": "test-model"}],
        "models": [{"name": "llama3.2:latest"}]
    }))
    .into_response()
}

/// OpenAI chat completions endpoint
async fn handle_chat(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    Json(request): Json<ChatRequest>,
) -> Response {
    let prompt = request
        .messages
        .iter()
        .rev()
        .find(|m| m.role == "user")
        .map(|m| m.content.clone())
        .unwrap_or_default();

    let Some(content) = answer(&state, &headers, request.model, &prompt).await else {
        return (StatusCode::INTERNAL_SERVER_ERROR, "mock server error").into_response();
    };

    Json(json!({
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    }))
    .into_response()
}

/// Ollama generate endpoint
async fn handle_generate(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    Json(request): Json<GenerateRequest>,
) -> Response {
    let model = request.model.clone();
    let Some(content) = answer(&state, &headers, request.model, &request.prompt).await else {
        return (StatusCode::INTERNAL_SERVER_ERROR, "mock server error").into_response();
    };

    Json(json!({
        "model": model,
        "response": content,
        "done": true
    }))
    .into_response()
}

/// Record the request and build the model's text answer (None = HTTP 500)
async fn answer(
    state: &ServerState,
    headers: &HeaderMap,
    model: String,
    prompt: &str,
) -> Option<String> {
    let authorization = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    *state.last_request.lock().unwrap() = Some(SeenRequest {
        authorization,
        model,
        prompt: prompt.to_string(),
    });

    match state.mode {
        MockMode::ServerError => None,
        MockMode::Malformed => {
            Some("Sounds like a purchase to me, but I am not sure of the amount.".to_string())
        }
        MockMode::Slow => {
            tokio::time::sleep(SLOW_DELAY).await;
            Some(classify_mock(prompt))
        }
        MockMode::Good => Some(classify_mock(prompt)),
    }
}

/// Answer the way a well-behaved model would, wrapped in a little chatter
fn classify_mock(prompt: &str) -> String {
    let text = extract_text_from_prompt(prompt);
    let parsed = RuleParser::new().unwrap().parse(&text);
    format!(
        "Here is the transaction:\n{}",
        serde_json::to_string(&parsed).unwrap()
    )
}

/// Pull the utterance out of the `Text: "{{text}}"` line of the prompt
fn extract_text_from_prompt(prompt: &str) -> String {
    const MARKER: &str = "Text: \"";
    if let Some(start) = prompt.find(MARKER) {
        let after_start = &prompt[start + MARKER.len()..];
        let end = after_start
            .find("\"\n")
            .or_else(|| after_start.rfind('"'))
            .unwrap_or(after_start.len());
        return after_start[..end].to_string();
    }
    prompt.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_text_from_prompt() {
        let prompt = "Parse this.\nText: \"coffee 5 dollars\"\n\nRules:";
        assert_eq!(extract_text_from_prompt(prompt), "coffee 5 dollars");

        let quoted = "Text: \"the \"good\" coffee 5\"\nmore";
        assert_eq!(extract_text_from_prompt(quoted), "the \"good\" coffee 5");

        assert_eq!(extract_text_from_prompt("taxi 100"), "taxi 100");
    }

    #[tokio::test]
    async fn test_server_lifecycle() {
        let mut server = MockRemoteServer::start(MockMode::Good).await;
        assert!(server.url().starts_with("http://127.0.0.1:"));
        assert!(server.last_request().is_none());
        server.stop();
    }
}
