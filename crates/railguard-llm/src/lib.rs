//! # Railguard LLM
//!
//! Chat model backends. One trait, [`LlmClient`], two implementations: a
//! native Ollama client and an OpenAI-compatible client (vLLM, llama.cpp
//! server, hosted APIs). Classification engines and the answer generator both
//! talk through this trait, so swapping backend is a config change.
//!
//! Error classification matters more here than in most client crates: the
//! pipeline fails closed when a backend is unreachable but fails open on a
//! transient per-call hiccup. [`LlmError::is_unavailable`] draws that line.

mod client;
mod error;
mod ollama;
mod openai;

pub use client::{ChatMessage, LlmClient};
pub use error::LlmError;
pub use ollama::OllamaClient;
pub use openai::OpenAiCompatClient;
