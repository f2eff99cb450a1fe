//! The closed engine registry.

use std::collections::BTreeMap;
use std::sync::Arc;

use railguard_classifier::{HarmTaxonomyEngine, SemanticEngine, ValidatorEngine};
use railguard_llm::LlmClient;
use railguard_patterns::{NameRecognizer, PatternEngine};
use railguard_policy::{EngineDescriptor, GuardEngine};

use crate::error::CoreError;

/// Engine id that explicitly disables all checking.
pub const ENGINE_NONE: &str = "none";

/// The closed set of guard engines, built once at startup.
///
/// Requests select an engine by id. An unknown id is a per-request
/// configuration error, never a silent fallback; the id [`ENGINE_NONE`] is
/// the one sanctioned opt-out and resolves to no engine at all.
pub struct EngineRegistry {
    engines: BTreeMap<String, Arc<dyn GuardEngine>>,
}

impl EngineRegistry {
    /// An empty registry. Useful for tests; production code uses
    /// [`EngineRegistry::standard`].
    pub fn empty() -> Self {
        Self {
            engines: BTreeMap::new(),
        }
    }

    /// The standard engine set: `pattern`, `semantic` and `harm_taxonomy`,
    /// all sharing one backend client. `pattern_ner` is added only when a
    /// name recognizer is supplied, and the `validator` engine only when the
    /// deployment registers validator modules.
    pub fn standard(
        client: Arc<dyn LlmClient>,
        guard_model: &str,
        recognizer: Option<Arc<dyn NameRecognizer>>,
        validator: Option<ValidatorEngine>,
    ) -> Self {
        let mut registry = Self::empty()
            .register(Arc::new(PatternEngine::new()))
            .register(Arc::new(SemanticEngine::new(client.clone(), guard_model)))
            .register(Arc::new(HarmTaxonomyEngine::new(client, guard_model)));
        if let Some(recognizer) = recognizer {
            registry = registry.register(Arc::new(PatternEngine::with_recognizer(recognizer)));
        }
        if let Some(validator) = validator {
            registry = registry.register(Arc::new(validator));
        }
        registry
    }

    /// Add an engine under its descriptor id.
    pub fn register(mut self, engine: Arc<dyn GuardEngine>) -> Self {
        let id = engine.descriptor().id.clone();
        self.engines.insert(id, engine);
        self
    }

    /// Resolve an engine id. `Ok(None)` means checking is disabled for the
    /// request; an unknown id is an error.
    pub fn resolve(&self, id: &str) -> Result<Option<Arc<dyn GuardEngine>>, CoreError> {
        if id == ENGINE_NONE {
            return Ok(None);
        }
        self.engines
            .get(id)
            .cloned()
            .map(Some)
            .ok_or_else(|| CoreError::UnknownEngine(id.to_string()))
    }

    /// Descriptors of every registered engine, in id order.
    pub fn descriptors(&self) -> Vec<EngineDescriptor> {
        self.engines
            .values()
            .map(|engine| engine.descriptor().clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_resolves_to_no_engine() {
        let registry = EngineRegistry::empty();
        assert!(registry.resolve("none").unwrap().is_none());
    }

    #[test]
    fn test_unknown_id_is_an_error() {
        let registry = EngineRegistry::empty().register(Arc::new(PatternEngine::new()));
        let Err(err) = registry.resolve("nemo") else {
            panic!("expected an error for unknown engine id");
        };
        assert!(matches!(err, CoreError::UnknownEngine(id) if id == "nemo"));
    }

    #[test]
    fn test_registered_engine_resolves() {
        let registry = EngineRegistry::empty().register(Arc::new(PatternEngine::new()));
        let engine = registry.resolve("pattern").unwrap().unwrap();
        assert_eq!(engine.descriptor().id, "pattern");
    }

    #[test]
    fn test_standard_registers_validator_when_supplied() {
        use railguard_llm::{ChatMessage, LlmError};
        use railguard_policy::ConcernKey;

        struct NoBackend;

        #[async_trait::async_trait]
        impl LlmClient for NoBackend {
            async fn chat(
                &self,
                _model: &str,
                _messages: &[ChatMessage],
            ) -> Result<String, LlmError> {
                Err(LlmError::UnknownModel {
                    model: "test backend".into(),
                })
            }

            async fn list_models(&self) -> Result<Vec<String>, LlmError> {
                Ok(vec![])
            }
        }

        let without = EngineRegistry::standard(Arc::new(NoBackend), "llama-guard", None, None);
        assert!(matches!(
            without.resolve("validator"),
            Err(CoreError::UnknownEngine(_))
        ));

        let validator =
            ValidatorEngine::new(vec![(ConcernKey::Pii, "guardrails/detect_pii".to_string())]);
        let with = EngineRegistry::standard(
            Arc::new(NoBackend),
            "llama-guard",
            None,
            Some(validator),
        );
        let engine = with.resolve("validator").unwrap().unwrap();
        assert_eq!(engine.descriptor().id, "validator");
    }

    #[test]
    fn test_descriptors_sorted_by_id() {
        let registry = EngineRegistry::empty().register(Arc::new(PatternEngine::new()));
        let ids: Vec<String> = registry.descriptors().into_iter().map(|d| d.id).collect();
        assert_eq!(ids, vec!["pattern".to_string()]);
    }
}
