//! Test utilities for financeplay-core
//!
//! This module provides a mock LLM server speaking both the OpenAI chat
//! completions API and the Ollama generate API, for development and
//! integration tests.

use axum::{
    extract::Json,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;
use std::net::SocketAddr;
use tokio::sync::oneshot;

/// Prompts containing this marker make the mock answer with HTTP 500
pub const FAIL_MARKER: &str = "FAIL_PLEASE";

/// Mock LLM server for testing and development
pub struct MockLlmServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockLlmServer {
    /// Start the mock server on an available port
    pub async fn start() -> Self {
        let app = Router::new()
            .route("/v1/models", get(handle_models))
            .route("/v1/chat/completions", post(handle_chat_completions))
            .route("/api/tags", get(handle_tags))
            .route("/api/generate", post(handle_generate));

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
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockLlmServer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Canned coaching reply that quotes the user's question back
pub fn mock_reply(prompt: &str) -> String {
    let question = prompt
        .split_once("USER_PROMPT:")
        .map(|(_, rest)| rest.trim_start())
        .and_then(|rest| rest.lines().next())
        .unwrap_or("")
        .trim();
    format!(
        "🎯 About \"{}\": move R200 to savings this week for +60 XP. 💡 Keep logging every expense.",
        question
    )
}

async fn handle_models() -> Json<serde_json::Value> {
    Json(json!({
        "object": "list",
        "data": [{ "id": "test-model", "object": "model" }]
    }))
}

#[derive(Debug, Deserialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

async fn handle_chat_completions(Json(request): Json<ChatCompletionRequest>) -> Response {
    let prompt = request
        .messages
        .last()
        .map(|m| m.content.as_str())
        .unwrap_or("");
    if prompt.contains(FAIL_MARKER) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "mock failure").into_response();
    }

    Json(json!({
        "id": "chatcmpl-mock",
        "object": "chat.completion",
        "model": request.model,
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": mock_reply(prompt) },
            "finish_reason": "stop"
        }]
    }))
    .into_response()
}

/// Ollama tags endpoint response (health check)
async fn handle_tags() -> Json<serde_json::Value> {
    Json(json!({
        "models": [{ "name": "llama3.2:latest", "size": 4_000_000_000u64 }]
    }))
}

#[derive(Debug, Deserialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
}

/// Ollama generate endpoint
async fn handle_generate(Json(request): Json<GenerateRequest>) -> Response {
    if request.prompt.contains(FAIL_MARKER) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "mock failure").into_response();
    }

    Json(json!({
        "model": request.model,
        "response": mock_reply(&request.prompt),
        "done": true
    }))
    .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_reply_quotes_question() {
        let reply = mock_reply("SNAPSHOT\nUSER_PROMPT:\nCan I afford a laptop?\n\nCOACHING BEHAVIORS");
        assert!(reply.contains("Can I afford a laptop?"));
    }

    #[tokio::test]
    async fn test_server_starts_and_stops() {
        let mut server = MockLlmServer::start().await;
        let resp = reqwest::get(format!("{}/v1/models", server.url()))
            .await
            .unwrap();
        assert!(resp.status().is_success());
        server.stop();
    }
}
