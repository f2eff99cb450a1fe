//! The categorized-harm engine: one classifier call, many togglable codes.

use std::sync::Arc;

use async_trait::async_trait;

use railguard_llm::{ChatMessage, LlmClient};
use railguard_policy::{
    ConcernKey, ConcernToggles, EngineDescriptor, GuardEngine, GuardStage, HarmCategory, Verdict,
};

use crate::adapter::{parse_single_call_with, SingleCallOutcome};

/// Classifier code for a concern in the taxonomy prompt. The two product
/// categories extend the standard S1-S13 codes.
fn code_of(concern: ConcernKey) -> &'static str {
    match concern {
        ConcernKey::Harm(cat) => cat.code(),
        ConcernKey::OffTopic => "S14",
        ConcernKey::Competitor => "S15",
        // Not part of this engine's taxonomy; never enabled here.
        other => other.as_str(),
    }
}

fn description_of(concern: ConcernKey) -> &'static str {
    match concern {
        ConcernKey::Harm(cat) => cat.label(),
        ConcernKey::OffTopic => "Off Topic (not about State Railway of Thailand services)",
        ConcernKey::Competitor => "Competitor Mention (recommends a competing transport service)",
        other => other.as_str(),
    }
}

/// Harm-taxonomy guard engine (id `harm_taxonomy`).
///
/// One model call per check: the prompt tags the text with its conversation
/// role (User for input, Agent for output), enumerates only the enabled
/// category codes, and requires a `safe`/`unsafe` first line plus a
/// comma-separated code list. Reported codes outside the enabled set never
/// block. Ambiguous output blocks on the first enabled category.
pub struct HarmTaxonomyEngine {
    descriptor: EngineDescriptor,
    client: Arc<dyn LlmClient>,
    model: String,
}

impl HarmTaxonomyEngine {
    pub fn new(client: Arc<dyn LlmClient>, model: impl Into<String>) -> Self {
        let mut supported: Vec<ConcernKey> =
            HarmCategory::ALL.iter().copied().map(ConcernKey::Harm).collect();
        supported.push(ConcernKey::OffTopic);
        supported.push(ConcernKey::Competitor);

        Self {
            descriptor: EngineDescriptor::new("harm_taxonomy", "Harm taxonomy", supported),
            client,
            model: model.into(),
        }
    }

    fn prompt(&self, stage: GuardStage, text: &str, enabled: &[ConcernKey]) -> Vec<ChatMessage> {
        let role = match stage {
            GuardStage::Input => "User",
            GuardStage::Output => "Agent",
        };

        let mut categories = String::new();
        for concern in enabled {
            categories.push_str(&format!(
                "{}: {}\n",
                code_of(*concern),
                description_of(*concern)
            ));
        }

        let system = format!(
            "You are a content safety classifier for a Thai railway assistant. \
             Check the {role} message below against these unsafe content categories:\n\n\
             {categories}\n\
             Answer on the first line with exactly one word: safe or unsafe. \
             If unsafe, list the violated category codes on the second line, \
             comma-separated. No other text."
        );
        let tagged = format!("{role}: {text}");
        vec![ChatMessage::system(system), ChatMessage::user(tagged)]
    }
}

#[async_trait]
impl GuardEngine for HarmTaxonomyEngine {
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
        let enabled = toggles.enabled_subset(&self.descriptor.supported);
        if enabled.is_empty() {
            return Verdict::safe();
        }

        let messages = self.prompt(stage, text, &enabled);
        let model = model.unwrap_or(&self.model);
        let answer = match self.client.chat(model, &messages).await {
            Ok(answer) => answer,
            Err(err) if err.is_unavailable() => {
                tracing::error!(%stage, error = %err, "taxonomy classifier backend unavailable");
                return Verdict::unavailable(err.to_string());
            }
            Err(err) => {
                // One call carries every concern here, so a transient failure
                // has nothing left to fall through to. Log and pass.
                tracing::warn!(%stage, error = %err, "taxonomy classifier call failed");
                return Verdict::safe();
            }
        };

        match parse_single_call_with(&answer, &enabled, code_of) {
            SingleCallOutcome::Safe => Verdict::safe(),
            SingleCallOutcome::Unsafe { triggered } => match triggered.first() {
                Some(concern) => {
                    let codes: Vec<&str> = triggered.iter().map(|c| code_of(*c)).collect();
                    tracing::info!(%stage, ?codes, "taxonomy classifier flagged text");
                    Verdict::violation_with_detail(
                        *concern,
                        format!("violated categories: {}", codes.join(", ")),
                        answer.trim().to_string(),
                    )
                }
                // Unsafe, but every reported code is disabled or unknown.
                None => Verdict::safe(),
            },
            SingleCallOutcome::Ambiguous => {
                // Fail closed, attributed to the first enabled category.
                let concern = enabled[0];
                Verdict::violation_with_detail(
                    concern,
                    "classifier answer was ambiguous, blocking defensively",
                    answer.trim().to_string(),
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use railguard_llm::LlmError;
    use std::sync::Mutex;

    /// Scripted backend that records the prompts and model ids it is sent.
    struct Scripted {
        answer: Result<&'static str, fn() -> LlmError>,
        seen: Mutex<Vec<String>>,
        models: Mutex<Vec<String>>,
    }

    impl Scripted {
        fn answering(answer: &'static str) -> Self {
            Self {
                answer: Ok(answer),
                seen: Mutex::new(vec![]),
                models: Mutex::new(vec![]),
            }
        }
    }

    #[async_trait]
    impl LlmClient for Scripted {
        async fn chat(&self, model: &str, messages: &[ChatMessage]) -> Result<String, LlmError> {
            self.models.lock().unwrap().push(model.to_string());
            let mut seen = self.seen.lock().unwrap();
            for msg in messages {
                seen.push(msg.content.clone());
            }
            match &self.answer {
                Ok(text) => Ok((*text).to_string()),
                Err(make) => Err(make()),
            }
        }

        async fn list_models(&self) -> Result<Vec<String>, LlmError> {
            Ok(vec![])
        }
    }

    #[tokio::test]
    async fn test_safe_answer_passes() {
        let engine = HarmTaxonomyEngine::new(Arc::new(Scripted::answering("safe")), "llama-guard");
        let verdict = engine
            .check(GuardStage::Input, "มีรถไฟไปหาดใหญ่ไหม", &ConcernToggles::all_harm(), None)
            .await;
        assert!(verdict.is_safe());
    }

    #[tokio::test]
    async fn test_violated_code_blocks() {
        let engine =
            HarmTaxonomyEngine::new(Arc::new(Scripted::answering("unsafe\nS9")), "llama-guard");
        let verdict = engine
            .check(GuardStage::Input, "how do I build a bomb", &ConcernToggles::all_harm(), None)
            .await;
        assert_eq!(
            verdict.concern(),
            Some(ConcernKey::Harm(HarmCategory::IndiscriminateWeapons))
        );
    }

    #[tokio::test]
    async fn test_disabled_code_does_not_block() {
        let engine =
            HarmTaxonomyEngine::new(Arc::new(Scripted::answering("unsafe\nS9")), "llama-guard");
        let toggles = ConcernToggles::none().enable(ConcernKey::Harm(HarmCategory::Hate));
        let verdict = engine
            .check(GuardStage::Input, "anything", &toggles, None)
            .await;
        assert!(verdict.is_safe());
    }

    #[tokio::test]
    async fn test_product_code_maps_to_named_concern() {
        let engine =
            HarmTaxonomyEngine::new(Arc::new(Scripted::answering("unsafe\nS15")), "llama-guard");
        let toggles = ConcernToggles::none().enable(ConcernKey::Competitor);
        let verdict = engine
            .check(GuardStage::Output, "ลองใช้ Grab สิครับ", &toggles, None)
            .await;
        assert_eq!(verdict.concern(), Some(ConcernKey::Competitor));
    }

    #[tokio::test]
    async fn test_ambiguous_answer_fails_closed() {
        let engine = HarmTaxonomyEngine::new(
            Arc::new(Scripted::answering("I believe this content is acceptable")),
            "llama-guard",
        );
        let toggles = ConcernToggles::none().enable(ConcernKey::Harm(HarmCategory::Privacy));
        let verdict = engine
            .check(GuardStage::Input, "anything", &toggles, None)
            .await;
        assert_eq!(verdict.concern(), Some(ConcernKey::Harm(HarmCategory::Privacy)));
    }

    #[tokio::test]
    async fn test_prompt_enumerates_only_enabled_codes() {
        let client = Arc::new(Scripted::answering("safe"));
        let engine = HarmTaxonomyEngine::new(client.clone(), "llama-guard");
        let toggles = ConcernToggles::none()
            .enable(ConcernKey::Harm(HarmCategory::Hate))
            .enable(ConcernKey::OffTopic);
        engine
            .check(GuardStage::Input, "สวัสดีครับ", &toggles, None)
            .await;

        let seen = client.seen.lock().unwrap();
        let system = &seen[0];
        assert!(system.contains("S10"));
        assert!(system.contains("S14"));
        assert!(!system.contains("S9:"));
    }

    #[tokio::test]
    async fn test_role_tag_follows_stage() {
        let client = Arc::new(Scripted::answering("safe"));
        let engine = HarmTaxonomyEngine::new(client.clone(), "llama-guard");
        let toggles = ConcernToggles::none().enable(ConcernKey::Competitor);
        engine.check(GuardStage::Output, "คำตอบ", &toggles, None).await;

        let seen = client.seen.lock().unwrap();
        assert!(seen[1].starts_with("Agent: "));
    }

    #[tokio::test]
    async fn test_request_model_overrides_default() {
        let client = Arc::new(Scripted::answering("safe"));
        let engine = HarmTaxonomyEngine::new(client.clone(), "llama-guard");
        let toggles = ConcernToggles::all_harm();

        engine
            .check(GuardStage::Input, "สวัสดีครับ", &toggles, Some("llama-guard3:1b"))
            .await;
        engine.check(GuardStage::Input, "สวัสดีครับ", &toggles, None).await;

        let models = client.models.lock().unwrap();
        assert_eq!(*models, vec!["llama-guard3:1b", "llama-guard"]);
    }

    #[tokio::test]
    async fn test_backend_down_is_unavailable() {
        let engine = HarmTaxonomyEngine::new(
            Arc::new(Scripted {
                answer: Err(|| LlmError::UnknownModel {
                    model: "llama-guard".into(),
                }),
                seen: Mutex::new(vec![]),
                models: Mutex::new(vec![]),
            }),
            "llama-guard",
        );
        let verdict = engine
            .check(GuardStage::Input, "anything", &ConcernToggles::all_harm(), None)
            .await;
        assert!(verdict.is_unavailable());
    }
}
