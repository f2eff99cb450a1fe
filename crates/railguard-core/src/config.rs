//! Configuration for the guard pipeline.

use std::path::Path;

use serde::{Deserialize, Serialize};

use railguard_policy::ConcernToggles;

use crate::error::CoreError;

/// Top-level configuration, TOML-loadable. Consumed once at startup; there is
/// no runtime reconfiguration mid-request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RailguardConfig {
    /// Chat backend selection and connection settings.
    pub backend: BackendConfig,

    /// Model ids used by the pipeline.
    pub models: ModelConfig,

    /// Guard defaults applied when a request does not override them.
    pub guard: GuardConfig,

    /// Telemetry retention.
    pub telemetry: TelemetryConfig,
}

/// Which chat backend to talk to and how.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Backend dialect.
    pub kind: BackendKind,

    /// Base URL, e.g. `http://localhost:11434`.
    pub base_url: String,

    /// Bearer token for OpenAI-compatible backends.
    pub api_key: Option<String>,

    /// Per-request timeout in seconds, applied to generation and classifier
    /// calls alike.
    pub timeout_secs: u64,
}

/// Supported backend dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    #[default]
    Ollama,
    OpenaiCompat,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            kind: BackendKind::Ollama,
            base_url: "http://localhost:11434".to_string(),
            api_key: None,
            timeout_secs: 30,
        }
    }
}

/// Model ids for the two roles the backend serves.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// The answer-generating model.
    pub chat: String,

    /// The classifier model used by the semantic and harm-taxonomy engines.
    pub guard: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            chat: "qwen2.5:7b".to_string(),
            guard: "llama-guard3:8b".to_string(),
        }
    }
}

/// Default guard posture.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    /// Engine id applied when a request does not name one. `none` disables
    /// checking entirely.
    pub default_engine: String,

    /// Concern keys enabled by default. Unknown keys are skipped.
    pub default_concerns: Vec<String>,

    /// System prompt for the answering assistant.
    pub system_prompt: String,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            default_engine: "pattern".to_string(),
            default_concerns: vec![
                "pii".to_string(),
                "jailbreak".to_string(),
                "toxicity".to_string(),
                "off_topic".to_string(),
                "hallucination".to_string(),
                "competitor".to_string(),
            ],
            system_prompt: "คุณคือผู้ช่วยคอลเซ็นเตอร์ของการรถไฟแห่งประเทศไทย (รฟท.) \
                            ตอบคำถามเกี่ยวกับตารางเดินรถ ตั๋ว สถานี และค่าโดยสารอย่างสุภาพ \
                            เป็นภาษาไทย และไม่ตอบคำถามนอกเหนือจากบริการรถไฟ"
                .to_string(),
        }
    }
}

impl GuardConfig {
    /// The default toggle set, built from `default_concerns`.
    pub fn default_toggles(&self) -> ConcernToggles {
        ConcernToggles::from_labels(self.default_concerns.iter().map(|key| (key.as_str(), true)))
    }
}

/// Telemetry retention settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Number of stage events retained in memory.
    pub history_capacity: usize,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            history_capacity: 100,
        }
    }
}

impl RailguardConfig {
    /// Load from a TOML file. Missing keys fall back to defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let raw = std::fs::read_to_string(path.as_ref())
            .map_err(|e| CoreError::Config(format!("{}: {e}", path.as_ref().display())))?;
        toml::from_str(&raw).map_err(|e| CoreError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use railguard_policy::ConcernKey;

    #[test]
    fn test_default_config() {
        let config = RailguardConfig::default();
        assert_eq!(config.guard.default_engine, "pattern");
        assert_eq!(config.backend.kind, BackendKind::Ollama);
        assert_eq!(config.telemetry.history_capacity, 100);
    }

    #[test]
    fn test_default_toggles_cover_named_concerns() {
        let toggles = RailguardConfig::default().guard.default_toggles();
        for key in ConcernKey::NAMED {
            assert!(toggles.is_enabled(key), "{key} should default on");
        }
    }

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let parsed: RailguardConfig = toml::from_str(
            r#"
            [models]
            chat = "qwen3:4b"

            [guard]
            default_engine = "semantic"
            "#,
        )
        .unwrap();
        assert_eq!(parsed.models.chat, "qwen3:4b");
        assert_eq!(parsed.models.guard, "llama-guard3:8b");
        assert_eq!(parsed.guard.default_engine, "semantic");
        assert_eq!(parsed.backend.timeout_secs, 30);
    }

    #[test]
    fn test_unknown_default_concern_is_skipped() {
        let mut config = RailguardConfig::default();
        config.guard.default_concerns = vec!["pii".to_string(), "sarcasm".to_string()];
        let toggles = config.guard.default_toggles();
        assert_eq!(toggles.len(), 1);
    }

    #[test]
    fn test_config_serialization_round_trip() {
        let config = RailguardConfig::default();
        let toml = toml::to_string(&config).unwrap();
        let parsed: RailguardConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.models.chat, config.models.chat);
        assert_eq!(parsed.guard.default_concerns, config.guard.default_concerns);
    }
}
