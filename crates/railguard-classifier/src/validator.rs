//! The hosted-validator engine: externally-named validator modules.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use railguard_policy::{
    ConcernKey, ConcernToggles, EngineDescriptor, GuardEngine, GuardStage, Verdict,
};

/// Result of running one validator module over one text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidatorOutcome {
    Pass,
    Fail { reason: String },
}

/// One hosted validator module wrapping a third-party detector.
#[async_trait]
pub trait Validator: Send + Sync {
    /// The module's registry name, e.g. `"guardrails/detect_pii"`.
    fn name(&self) -> &str;

    /// Run the wrapped detector.
    async fn validate(
        &self,
        text: &str,
    ) -> Result<ValidatorOutcome, Box<dyn std::error::Error + Send + Sync>>;
}

/// Guard engine delegating each concern to a named validator module
/// (id `validator`).
///
/// Bindings map a concern to a module name; installed modules are registered
/// separately. A concern bound to a module that is not installed yields an
/// unavailable verdict, never a silent pass. The binding order is the
/// evaluation priority order.
pub struct ValidatorEngine {
    descriptor: EngineDescriptor,
    bindings: Vec<(ConcernKey, String)>,
    installed: HashMap<String, Arc<dyn Validator>>,
}

impl ValidatorEngine {
    /// Build from concern-to-module bindings, with no modules installed yet.
    pub fn new(bindings: Vec<(ConcernKey, String)>) -> Self {
        let supported = bindings.iter().map(|(key, _)| *key).collect();
        Self {
            descriptor: EngineDescriptor::new("validator", "Hosted validators", supported),
            bindings,
            installed: HashMap::new(),
        }
    }

    /// Register an installed module under its own name.
    pub fn install(mut self, module: Arc<dyn Validator>) -> Self {
        self.installed.insert(module.name().to_string(), module);
        self
    }

    fn module_for(&self, concern: ConcernKey) -> Option<(&str, Option<&Arc<dyn Validator>>)> {
        self.bindings
            .iter()
            .find(|(key, _)| *key == concern)
            .map(|(_, name)| (name.as_str(), self.installed.get(name)))
    }
}

#[async_trait]
impl GuardEngine for ValidatorEngine {
    fn descriptor(&self) -> &EngineDescriptor {
        &self.descriptor
    }

    async fn check(
        &self,
        stage: GuardStage,
        text: &str,
        toggles: &ConcernToggles,
        _model: Option<&str>,
    ) -> Verdict {
        for concern in toggles.enabled_subset(&self.descriptor.supported) {
            let (name, module) = match self.module_for(concern) {
                Some(found) => found,
                None => continue,
            };

            let module = match module {
                Some(module) => module,
                None => {
                    tracing::error!(%stage, %concern, module = name, "validator module not installed");
                    return Verdict::unavailable(format!(
                        "validator module {name} is not installed"
                    ));
                }
            };

            match module.validate(text).await {
                Ok(ValidatorOutcome::Pass) => {}
                Ok(ValidatorOutcome::Fail { reason }) => {
                    tracing::info!(%stage, %concern, module = name, "validator flagged text");
                    return Verdict::violation(concern, reason);
                }
                Err(err) => {
                    // Transient module failure: fail open for this concern.
                    tracing::warn!(%stage, %concern, module = name, error = %err, "validator call failed");
                }
            }
        }
        Verdict::safe()
    }
}
