//! The backend contract.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::LlmError;

/// One message of a chat transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// `system`, `user` or `assistant`.
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// A chat completion backend.
///
/// Implementations are cheap handles over a shared HTTP client; clone or wrap
/// in `Arc` freely. `model` is passed per call because one backend serves both
/// the generator model and the classifier models.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Run one non-streaming chat completion and return the assistant text.
    async fn chat(&self, model: &str, messages: &[ChatMessage]) -> Result<String, LlmError>;

    /// Model ids the backend currently serves.
    async fn list_models(&self) -> Result<Vec<String>, LlmError>;
}
