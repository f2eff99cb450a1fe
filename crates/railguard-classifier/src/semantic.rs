//! The semantic engine: signature pre-pass, then per-concern label calls.

use std::sync::Arc;

use async_trait::async_trait;

use railguard_llm::LlmClient;
use railguard_policy::{
    ConcernKey, ConcernToggles, EngineDescriptor, GuardEngine, GuardStage, Verdict,
};

use crate::adapter::SignatureSet;
use crate::label::LabelClassifier;

const INPUT_ORDER: [ConcernKey; 4] = [
    ConcernKey::Pii,
    ConcernKey::Jailbreak,
    ConcernKey::Toxicity,
    ConcernKey::OffTopic,
];

const OUTPUT_ORDER: [ConcernKey; 3] = [
    ConcernKey::Hallucination,
    ConcernKey::Toxicity,
    ConcernKey::Competitor,
];

/// Classifier-backed engine for concerns too ambiguous for fixed patterns.
///
/// Two layers per stage: first the no-network signature pre-pass over the
/// enabled concerns, then one constrained-label model call per remaining
/// concern. Failure semantics follow the pipeline's asymmetry: a transient
/// failure on one concern's call is logged and skipped, but a backend that
/// cannot be used at all turns the whole check into an unavailable verdict.
pub struct SemanticEngine {
    descriptor: EngineDescriptor,
    signatures: SignatureSet,
    classifier: LabelClassifier,
}

impl SemanticEngine {
    pub fn new(client: Arc<dyn LlmClient>, model: impl Into<String>) -> Self {
        let supported = vec![
            ConcernKey::Pii,
            ConcernKey::Jailbreak,
            ConcernKey::Toxicity,
            ConcernKey::OffTopic,
            ConcernKey::Hallucination,
            ConcernKey::Competitor,
        ];
        Self {
            descriptor: EngineDescriptor::new("semantic", "Semantic classification", supported),
            signatures: SignatureSet::builtin(),
            classifier: LabelClassifier::new(client, model),
        }
    }
}

#[async_trait]
impl GuardEngine for SemanticEngine {
    fn descriptor(&self) -> &EngineDescriptor {
        &self.descriptor
    }

    async fn check(
        &self,
        stage: GuardStage,
        text: &str,
        toggles: &ConcernToggles,
        model: Option<&str>,
    ) -> Verdict {
        let order: &[ConcernKey] = match stage {
            GuardStage::Input => &INPUT_ORDER,
            GuardStage::Output => &OUTPUT_ORDER,
        };
        let enabled = toggles.enabled_subset(order);

        // No-network pre-pass over known trigger phrasings.
        if let Some((concern, signature)) = self.signatures.first_match(text, &enabled) {
            tracing::info!(%stage, %concern, signature, "signature pre-pass hit");
            return Verdict::violation_with_detail(
                concern,
                format!("matched known {concern} signature"),
                signature,
            );
        }

        for concern in enabled {
            match self.classifier.classify(concern, stage, text, model).await {
                Ok(true) => {
                    tracing::info!(%stage, %concern, "semantic classifier flagged text");
                    return Verdict::violation(
                        concern,
                        format!("classifier labelled text as {concern} violation"),
                    );
                }
                Ok(false) => {}
                Err(err) if err.is_unavailable() => {
                    tracing::error!(%stage, %concern, error = %err, "classifier backend unavailable");
                    return Verdict::unavailable(err.to_string());
                }
                Err(err) => {
                    // Transient per-concern failure: fail open for this
                    // concern only and keep evaluating.
                    tracing::warn!(%stage, %concern, error = %err, "classifier call failed, skipping concern");
                }
            }
        }
        Verdict::safe()
    }
}
