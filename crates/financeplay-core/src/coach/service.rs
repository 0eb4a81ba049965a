//! Coach service
//!
//! Builds the prompt for a request, asks the configured backend and answers
//! with a fixed fallback reply when the backend is missing or fails.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::ai::{CoachBackend, CoachClient};
use crate::config::CoachSettings;
use crate::error::Result;

use super::prompt::{CoachPromptBuilder, CoachRequest};

/// Reply used whenever no backend answer is available
pub const FALLBACK_REPLY: &str =
    "Consider moving R200 to your Emergency Fund and limit takeout to R300 this week for +120 XP.";

/// Where a coach reply came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoachSource {
    OpenaiCompatible,
    Ollama,
    Mock,
    /// Backend configured but the call failed or returned nothing
    Fallback,
    /// No backend configured
    Offline,
}

impl CoachSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            CoachSource::OpenaiCompatible => "openai_compatible",
            CoachSource::Ollama => "ollama",
            CoachSource::Mock => "mock",
            CoachSource::Fallback => "fallback",
            CoachSource::Offline => "offline",
        }
    }
}

impl std::fmt::Display for CoachSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoachReply {
    pub reply: String,
    pub source: CoachSource,
}

/// Coach service
///
/// Never returns a backend error: any failure is logged and answered with
/// the fallback reply.
#[derive(Clone)]
pub struct Coach {
    client: Option<CoachClient>,
    builder: CoachPromptBuilder,
    fallback_reply: String,
}

impl Coach {
    pub fn new(client: Option<CoachClient>, builder: CoachPromptBuilder) -> Self {
        Self {
            client,
            builder,
            fallback_reply: FALLBACK_REPLY.to_string(),
        }
    }

    /// Coach using the embedded prompt template
    pub fn with_client(client: Option<CoachClient>) -> Result<Self> {
        Ok(Self::new(client, CoachPromptBuilder::embedded()?))
    }

    /// Coach with the backend chosen from the environment and tuned by settings
    pub fn from_settings(settings: &CoachSettings) -> Result<Self> {
        let client = CoachClient::from_env().map(|c| c.with_timeout(settings.timeout));
        Ok(Self::with_client(client)?.with_fallback_reply(settings.fallback_reply.clone()))
    }

    pub fn with_fallback_reply(mut self, reply: impl Into<String>) -> Self {
        self.fallback_reply = reply.into();
        self
    }

    pub fn client(&self) -> Option<&CoachClient> {
        self.client.as_ref()
    }

    pub fn fallback_reply(&self) -> &str {
        &self.fallback_reply
    }

    /// Render the prompt that would be sent for `request`
    pub fn prompt(&self, request: &CoachRequest<'_>) -> String {
        self.builder.build(request)
    }

    pub async fn reply(&self, request: &CoachRequest<'_>) -> CoachReply {
        let Some(client) = &self.client else {
            debug!("No coach backend configured, answering offline");
            return self.fallback(CoachSource::Offline);
        };

        let prompt = self.builder.build(request);
        match client.complete(&prompt).await {
            Ok(text) if !text.trim().is_empty() => {
                info!(
                    model = client.model(),
                    host = client.host(),
                    prompt_chars = prompt.len(),
                    "Coach reply received"
                );
                CoachReply {
                    reply: text.trim().to_string(),
                    source: client.source(),
                }
            }
            Ok(_) => {
                warn!(model = client.model(), "Coach backend returned an empty reply");
                self.fallback(CoachSource::Fallback)
            }
            Err(e) => {
                warn!(model = client.model(), host = client.host(), error = %e, "Coach backend failed");
                self.fallback(CoachSource::Fallback)
            }
        }
    }

    fn fallback(&self, source: CoachSource) -> CoachReply {
        CoachReply {
            reply: self.fallback_reply.clone(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::MockBackend;
    use crate::models::Persona;
    use chrono::NaiveDate;

    fn request() -> CoachRequest<'static> {
        CoachRequest {
            user_prompt: "How am I doing?",
            persona: Persona::Friendly,
            history: &[],
            snapshot: None,
            today: NaiveDate::from_ymd_opt(2024, 5, 14).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_offline_without_client() {
        let coach = Coach::with_client(None).unwrap();
        let reply = coach.reply(&request()).await;
        assert_eq!(reply.source, CoachSource::Offline);
        assert_eq!(reply.reply, FALLBACK_REPLY);
    }

    #[tokio::test]
    async fn test_backend_reply_is_trimmed() {
        let client = CoachClient::Mock(MockBackend::with_reply("  Save R50 today \n"));
        let coach = Coach::with_client(Some(client)).unwrap();
        let reply = coach.reply(&request()).await;
        assert_eq!(reply.source, CoachSource::Mock);
        assert_eq!(reply.reply, "Save R50 today");
    }

    #[tokio::test]
    async fn test_failure_falls_back() {
        let client = CoachClient::Mock(MockBackend::unhealthy());
        let coach = Coach::with_client(Some(client))
            .unwrap()
            .with_fallback_reply("Try again later");
        let reply = coach.reply(&request()).await;
        assert_eq!(reply.source, CoachSource::Fallback);
        assert_eq!(reply.reply, "Try again later");
    }

    #[tokio::test]
    async fn test_empty_reply_falls_back() {
        let client = CoachClient::Mock(MockBackend::with_reply("   "));
        let coach = Coach::with_client(Some(client)).unwrap();
        assert_eq!(coach.reply(&request()).await.source, CoachSource::Fallback);
    }

    #[test]
    fn test_source_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&CoachSource::OpenaiCompatible).unwrap(),
            "\"openai_compatible\""
        );
        assert_eq!(CoachSource::Offline.to_string(), "offline");
    }
}
