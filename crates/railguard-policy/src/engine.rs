//! The engine contract: every detection strategy implements [`GuardEngine`].

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::concern::ConcernKey;
use crate::toggles::ConcernToggles;
use crate::verdict::Verdict;

/// Which side of the generation call a check runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GuardStage {
    /// Checking the raw user message before generation.
    Input,
    /// Checking the generated response before it reaches the user.
    Output,
}

impl GuardStage {
    /// Stable string form for telemetry.
    pub fn as_str(&self) -> &'static str {
        match self {
            GuardStage::Input => "input",
            GuardStage::Output => "output",
        }
    }
}

impl fmt::Display for GuardStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity and capabilities of an engine.
///
/// `supported` is the engine's priority-ordered concern list: cheapest and
/// most specific first. A concern toggled on but absent from this list is
/// silently skipped at check time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineDescriptor {
    /// Registry id, e.g. `"pattern"` or `"harm_taxonomy"`.
    pub id: String,
    /// Human-readable name for listings.
    pub name: String,
    /// Supported concerns in evaluation priority order.
    pub supported: Vec<ConcernKey>,
}

impl EngineDescriptor {
    /// Create a descriptor.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        supported: Vec<ConcernKey>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            supported,
        }
    }

    /// Whether this engine can evaluate the given concern.
    pub fn supports(&self, key: ConcernKey) -> bool {
        self.supported.contains(&key)
    }
}

/// A swappable detection strategy.
///
/// Engines are constructed once at startup, hold only read-only configuration
/// (pattern tables, taxonomy text, a shared model client) and are shared
/// across requests. All per-request state lives in the arguments.
///
/// Implementations must uphold the failure semantics of the pipeline:
///
/// - an enabled-but-unsupported concern is skipped, never an error
/// - a transient failure of one concern's detector is fail-open for that
///   concern only: log it and continue with the next concern
/// - inability to run at all (backend down, model missing) returns
///   [`Verdict::Unavailable`], which the pipeline treats as a block
#[async_trait]
pub trait GuardEngine: Send + Sync {
    /// This engine's identity and supported concerns.
    fn descriptor(&self) -> &EngineDescriptor;

    /// Check one text at the given stage against the enabled concerns.
    ///
    /// `model`, when set, is the request's target model id: engines backed by
    /// a classifier model use it instead of their configured default for this
    /// check. Engines with no model involvement ignore it.
    ///
    /// Returns the first blocking verdict in the engine's priority order, or
    /// `Safe` when every enabled, supported concern passes.
    async fn check(
        &self,
        stage: GuardStage,
        text: &str,
        toggles: &ConcernToggles,
        model: Option<&str>,
    ) -> Verdict;

    /// Check the user message before generation.
    async fn check_input(
        &self,
        text: &str,
        toggles: &ConcernToggles,
        model: Option<&str>,
    ) -> Verdict {
        self.check(GuardStage::Input, text, toggles, model).await
    }

    /// Check the generated response before it is shown.
    async fn check_output(
        &self,
        text: &str,
        toggles: &ConcernToggles,
        model: Option<&str>,
    ) -> Verdict {
        self.check(GuardStage::Output, text, toggles, model).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_supports() {
        let desc = EngineDescriptor::new(
            "pattern",
            "Pattern Engine",
            vec![ConcernKey::Pii, ConcernKey::Jailbreak],
        );
        assert!(desc.supports(ConcernKey::Pii));
        assert!(!desc.supports(ConcernKey::OffTopic));
    }

    #[test]
    fn test_stage_str() {
        assert_eq!(GuardStage::Input.as_str(), "input");
        assert_eq!(GuardStage::Output.to_string(), "output");
    }
}
