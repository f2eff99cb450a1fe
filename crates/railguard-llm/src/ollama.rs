//! Native Ollama backend.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::client::{ChatMessage, LlmClient};
use crate::error::LlmError;

/// Client for an Ollama server's native API (`/api/chat`, `/api/tags`).
#[derive(Debug, Clone)]
pub struct OllamaClient {
    http: reqwest::Client,
    base_url: String,
    timeout_secs: u64,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

#[derive(Deserialize)]
struct TagsResponse {
    models: Vec<TaggedModel>,
}

#[derive(Deserialize)]
struct TaggedModel {
    name: String,
}

impl OllamaClient {
    /// Build a client against `base_url` (e.g. `http://localhost:11434`) with
    /// a per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Self {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout_secs,
        }
    }

    /// Models currently loaded into memory (`/api/ps`), as opposed to all
    /// pulled models. Useful for operator diagnostics before a cold start.
    pub async fn loaded_models(&self) -> Result<Vec<String>, LlmError> {
        let url = format!("{}/api/ps", self.base_url);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| self.classify_transport("", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: TagsResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Malformed(e.to_string()))?;
        Ok(parsed.models.into_iter().map(|m| m.name).collect())
    }

    fn classify_transport(&self, model: &str, err: reqwest::Error) -> LlmError {
        if err.is_timeout() {
            LlmError::Timeout {
                model: model.to_string(),
                seconds: self.timeout_secs,
            }
        } else {
            LlmError::Connect {
                url: self.base_url.clone(),
                source: err,
            }
        }
    }
}

#[async_trait]
impl LlmClient for OllamaClient {
    async fn chat(&self, model: &str, messages: &[ChatMessage]) -> Result<String, LlmError> {
        let url = format!("{}/api/chat", self.base_url);
        let body = json!({
            "model": model,
            "messages": messages,
            "stream": false,
        });

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.classify_transport(model, e))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            // Ollama answers 404 for a model it has not pulled.
            return Err(LlmError::UnknownModel {
                model: model.to_string(),
            });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Malformed(e.to_string()))?;
        tracing::debug!(model, chars = parsed.message.content.len(), "ollama chat completed");
        Ok(parsed.message.content)
    }

    async fn list_models(&self) -> Result<Vec<String>, LlmError> {
        let url = format!("{}/api/tags", self.base_url);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| self.classify_transport("", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: TagsResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Malformed(e.to_string()))?;
        Ok(parsed.models.into_iter().map(|m| m.name).collect())
    }
}
