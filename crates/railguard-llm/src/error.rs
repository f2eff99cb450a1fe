//! Backend error taxonomy.

use thiserror::Error;

/// What went wrong talking to a chat backend.
#[derive(Debug, Error)]
pub enum LlmError {
    /// TCP/TLS level failure reaching the backend.
    #[error("cannot reach backend at {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The call was accepted but did not finish in time.
    #[error("request to model {model} timed out after {seconds}s")]
    Timeout { model: String, seconds: u64 },

    /// The backend does not serve the requested model.
    #[error("model {model} is not available on the backend")]
    UnknownModel { model: String },

    /// Non-success HTTP status from the backend.
    #[error("backend returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The response arrived but was not the shape we expect.
    #[error("malformed backend response: {0}")]
    Malformed(String),
}

impl LlmError {
    /// Whether this error means the backend as a whole cannot be used.
    ///
    /// Unavailable errors make an engine return a fail-closed unavailable
    /// verdict; everything else is a transient per-call failure the engine
    /// may fail open on, concern by concern.
    pub fn is_unavailable(&self) -> bool {
        match self {
            LlmError::Connect { .. } | LlmError::UnknownModel { .. } => true,
            LlmError::Status { status, .. } => *status >= 500,
            LlmError::Timeout { .. } | LlmError::Malformed(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_model_is_unavailable() {
        let err = LlmError::UnknownModel {
            model: "qwen3:4b".to_string(),
        };
        assert!(err.is_unavailable());
    }

    #[test]
    fn test_timeout_is_transient() {
        let err = LlmError::Timeout {
            model: "qwen3:4b".to_string(),
            seconds: 30,
        };
        assert!(!err.is_unavailable());
    }

    #[test]
    fn test_server_error_is_unavailable_client_error_is_not() {
        let five = LlmError::Status {
            status: 503,
            body: "overloaded".to_string(),
        };
        let four = LlmError::Status {
            status: 400,
            body: "bad request".to_string(),
        };
        assert!(five.is_unavailable());
        assert!(!four.is_unavailable());
    }

    #[test]
    fn test_malformed_is_transient() {
        assert!(!LlmError::Malformed("empty choices".to_string()).is_unavailable());
    }
}
