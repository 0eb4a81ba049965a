//! Conversational coach
//!
//! - [`prompt`]: pure prompt assembly from a snapshot and chat history
//! - [`service`]: the [`Coach`] that sends the prompt to a backend and falls
//!   back to a fixed reply when the backend is missing or fails

pub mod prompt;
mod service;

pub use prompt::{CoachPromptBuilder, CoachRequest};
pub use service::{Coach, CoachReply, CoachSource, FALLBACK_REPLY};
