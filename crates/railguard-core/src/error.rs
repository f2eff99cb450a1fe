//! Error types for the guard pipeline.

use thiserror::Error;

/// Request- and configuration-level failures.
///
/// Guard outcomes are never errors: a blocked text, an unavailable engine, a
/// failed concern check all surface as [`railguard_policy::Verdict`] values
/// inside a successful pipeline result. `CoreError` is reserved for the cases
/// where no result can be produced at all.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The request named an engine id the registry does not know.
    #[error("unknown engine id: {0:?}")]
    UnknownEngine(String),

    /// The generation call itself failed.
    #[error("generation failed: {0}")]
    Generation(#[from] railguard_llm::LlmError),

    /// Configuration could not be read or parsed.
    #[error("configuration error: {0}")]
    Config(String),
}
