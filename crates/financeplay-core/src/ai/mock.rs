//! Mock backend for testing
//!
//! Returns a canned reply, or fails on demand so fallback paths can be
//! exercised without a running LLM server.

use async_trait::async_trait;

use crate::error::{Error, Result};

use super::CoachBackend;

pub const MOCK_REPLY: &str = "🎯 You're doing well. Keep logging every expense this week for +60 XP.";

/// Mock coach backend for testing
#[derive(Clone, Default)]
pub struct MockBackend {
    /// Whether health_check should return true
    pub healthy: bool,
    /// Whether complete should return an error
    pub failing: bool,
    /// Reply returned by complete (canned text when None)
    pub reply: Option<String>,
}

impl MockBackend {
    /// Create a new mock backend (healthy by default)
    pub fn new() -> Self {
        Self {
            healthy: true,
            failing: false,
            reply: None,
        }
    }

    /// Create an unhealthy mock backend whose completions fail
    pub fn unhealthy() -> Self {
        Self {
            healthy: false,
            failing: true,
            reply: None,
        }
    }

    /// Create a mock that answers with the given text
    pub fn with_reply(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            ..Self::new()
        }
    }
}

#[async_trait]
impl CoachBackend for MockBackend {
    async fn complete(&self, prompt: &str) -> Result<String> {
        if self.failing {
            return Err(Error::Coach("mock backend configured to fail".into()));
        }
        tracing::debug!(prompt_chars = prompt.len(), "Mock completion");
        Ok(self.reply.clone().unwrap_or_else(|| MOCK_REPLY.to_string()))
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}
