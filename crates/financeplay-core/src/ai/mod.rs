//! Pluggable LLM backends for the coach
//!
//! # Architecture
//!
//! - `CoachBackend` trait: the one capability the coach needs, prompt in, text out
//! - `CoachClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backend implementations: `OpenAICompatibleBackend`, `OllamaBackend`, `MockBackend`
//!
//! Callers never surface a backend error to the end user; see
//! [`crate::coach::Coach`] for the fallback handling.
//!
//! # Configuration
//!
//! Environment variables:
//! - `COACH_BACKEND`: Backend to use (openai_compatible, ollama, mock, none).
//!   Default: whichever of the below is configured, OpenAI-compatible first
//! - `OPENAI_COMPATIBLE_HOST`: Server URL for openai_compatible
//! - `OPENAI_COMPATIBLE_MODEL`: Model name (default: gpt-4.1-mini)
//! - `OPENAI_COMPATIBLE_API_KEY`: API key if required (optional; `OPENAI_API_KEY`
//!   alone selects the hosted OpenAI API)
//! - `OLLAMA_HOST`: Ollama server URL
//! - `OLLAMA_MODEL`: Default model name (default: llama3.2)

mod mock;
mod ollama;
mod openai_compatible;

pub use mock::MockBackend;
pub use ollama::OllamaBackend;
pub use openai_compatible::OpenAICompatibleBackend;

use std::time::Duration;

use async_trait::async_trait;

use crate::coach::CoachSource;
use crate::error::Result;

/// Trait defining the interface for coach LLM backends
///
/// Backends should be Send + Sync to allow use across async tasks.
#[async_trait]
pub trait CoachBackend: Send + Sync {
    /// Send a prompt and return the model's reply text
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Check if the backend is available
    async fn health_check(&self) -> bool;

    /// Get the model name (for logging)
    fn model(&self) -> &str;

    /// Get the host URL (for logging)
    fn host(&self) -> &str;
}

/// Concrete coach client enum
///
/// Provides Clone and compile-time dispatch without Box<dyn> overhead.
#[derive(Clone)]
pub enum CoachClient {
    /// OpenAI-compatible chat completions (OpenAI, vLLM, LocalAI, llama-server, etc.)
    OpenAICompatible(OpenAICompatibleBackend),
    /// Ollama backend (HTTP API)
    Ollama(OllamaBackend),
    /// Mock backend for testing
    Mock(MockBackend),
}

impl CoachClient {
    /// Create a coach client from environment variables
    ///
    /// Returns None when no backend is configured; the coach then answers
    /// with its offline reply.
    pub fn from_env() -> Option<Self> {
        let backend = std::env::var("COACH_BACKEND").unwrap_or_default();

        match backend.to_lowercase().as_str() {
            "" => Self::detect_from_env(),
            "openai_compatible" | "openai" | "vllm" | "localai" | "llamacpp" => {
                OpenAICompatibleBackend::from_env().map(CoachClient::OpenAICompatible)
            }
            "ollama" => OllamaBackend::from_env().map(CoachClient::Ollama),
            "mock" => Some(CoachClient::Mock(MockBackend::new())),
            "none" | "offline" => None,
            _ => {
                tracing::warn!(backend = %backend, "Unknown COACH_BACKEND, detecting from environment");
                Self::detect_from_env()
            }
        }
    }

    fn detect_from_env() -> Option<Self> {
        OpenAICompatibleBackend::from_env()
            .map(CoachClient::OpenAICompatible)
            .or_else(|| OllamaBackend::from_env().map(CoachClient::Ollama))
    }

    /// Create an Ollama backend directly
    pub fn ollama(host: &str, model: &str) -> Self {
        CoachClient::Ollama(OllamaBackend::new(host, model))
    }

    /// Create an OpenAI-compatible backend directly
    pub fn openai_compatible(host: &str, model: &str, api_key: Option<&str>) -> Self {
        let backend = match api_key {
            Some(key) => OpenAICompatibleBackend::with_api_key(host, model, key),
            None => OpenAICompatibleBackend::new(host, model),
        };
        CoachClient::OpenAICompatible(backend)
    }

    /// Create a mock backend for testing
    pub fn mock() -> Self {
        CoachClient::Mock(MockBackend::new())
    }

    /// Apply a request timeout to HTTP backends
    pub fn with_timeout(self, timeout: Duration) -> Self {
        match self {
            CoachClient::OpenAICompatible(b) => CoachClient::OpenAICompatible(b.with_timeout(timeout)),
            CoachClient::Ollama(b) => CoachClient::Ollama(b.with_timeout(timeout)),
            CoachClient::Mock(b) => CoachClient::Mock(b),
        }
    }

    /// Reply source reported for successful completions
    pub fn source(&self) -> CoachSource {
        match self {
            CoachClient::OpenAICompatible(_) => CoachSource::OpenaiCompatible,
            CoachClient::Ollama(_) => CoachSource::Ollama,
            CoachClient::Mock(_) => CoachSource::Mock,
        }
    }
}

// Implement CoachBackend for CoachClient by delegating to the inner backend
#[async_trait]
impl CoachBackend for CoachClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        match self {
            CoachClient::OpenAICompatible(b) => b.complete(prompt).await,
            CoachClient::Ollama(b) => b.complete(prompt).await,
            CoachClient::Mock(b) => b.complete(prompt).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            CoachClient::OpenAICompatible(b) => b.health_check().await,
            CoachClient::Ollama(b) => b.health_check().await,
            CoachClient::Mock(b) => b.health_check().await,
        }
    }

    fn model(&self) -> &str {
        match self {
            CoachClient::OpenAICompatible(b) => b.model(),
            CoachClient::Ollama(b) => b.model(),
            CoachClient::Mock(b) => b.model(),
        }
    }

    fn host(&self) -> &str {
        match self {
            CoachClient::OpenAICompatible(b) => b.host(),
            CoachClient::Ollama(b) => b.host(),
            CoachClient::Mock(b) => b.host(),
        }
    }
}
