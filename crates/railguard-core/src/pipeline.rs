//! The guard pipeline: input stage, generation, output stage.

use std::sync::{Arc, Mutex};
use std::time::Instant;

use railguard_llm::{ChatMessage, LlmClient};
use railguard_policy::{
    refusal_message, unavailable_message, ConcernToggles, GuardStage, Verdict,
};

use crate::config::RailguardConfig;
use crate::error::CoreError;
use crate::registry::EngineRegistry;
use crate::result::{PipelineResult, StageTimings};
use crate::telemetry::{EventLog, StageEvent};

/// One message to run through the pipeline, with optional per-request
/// overrides of the configured defaults.
#[derive(Debug, Clone, Default)]
pub struct GuardRequest {
    pub message: String,
    pub model_id: Option<String>,
    pub engine_id: Option<String>,
    pub toggles: Option<ConcernToggles>,
}

impl GuardRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    pub fn with_engine(mut self, engine_id: impl Into<String>) -> Self {
        self.engine_id = Some(engine_id.into());
        self
    }

    /// Target model for this request: both generation and any model-backed
    /// detector calls use it instead of the configured defaults.
    pub fn with_model(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = Some(model_id.into());
        self
    }

    pub fn with_toggles(mut self, toggles: ConcernToggles) -> Self {
        self.toggles = Some(toggles);
        self
    }
}

/// The pipeline controller.
///
/// Sequence per request: resolve the engine, check the input, generate, check
/// the output. The first blocking verdict wins and later stages never run; a
/// blocked result carries only the templated refusal for the triggering
/// concern while the raw detector detail goes to logs and telemetry.
///
/// Generation failure is a request-level error, not a guard verdict. Engine
/// unavailability is the opposite: a blocking verdict, because the pipeline
/// never bypasses a dead engine.
pub struct GuardPipeline {
    registry: EngineRegistry,
    client: Arc<dyn LlmClient>,
    config: RailguardConfig,
    log: Mutex<EventLog>,
}

impl GuardPipeline {
    pub fn new(registry: EngineRegistry, client: Arc<dyn LlmClient>, config: RailguardConfig) -> Self {
        let log = Mutex::new(EventLog::new(config.telemetry.history_capacity));
        Self {
            registry,
            client,
            config,
            log,
        }
    }

    /// Stage events retained in the ring buffer, oldest first.
    pub fn recent_events(&self) -> Vec<StageEvent> {
        match self.log.lock() {
            Ok(log) => log.recent(),
            Err(poisoned) => poisoned.into_inner().recent(),
        }
    }

    /// The registry, for listings.
    pub fn registry(&self) -> &EngineRegistry {
        &self.registry
    }

    fn record(&self, event: StageEvent) {
        tracing::info!(
            stage = event.stage,
            status = event.status,
            detail = event.detail,
            elapsed_secs = event.elapsed_secs,
            "stage finished"
        );
        match self.log.lock() {
            Ok(mut log) => log.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }

    fn refusal_for(stage: GuardStage, verdict: &Verdict) -> String {
        match verdict {
            Verdict::Violation { concern, .. } => refusal_message(stage, *concern).to_string(),
            _ => unavailable_message().to_string(),
        }
    }

    fn blocked(
        &self,
        stage: GuardStage,
        verdict: Verdict,
        elapsed: f64,
        timings: StageTimings,
    ) -> PipelineResult {
        let status = if verdict.is_unavailable() {
            "unavailable"
        } else {
            "blocked"
        };
        self.record(StageEvent::new(
            stage.as_str(),
            status,
            verdict.to_string(),
            elapsed,
        ));
        PipelineResult::blocked(Self::refusal_for(stage, &verdict), stage, verdict, timings)
    }

    /// Run one message through the full pipeline.
    pub async fn run(&self, request: GuardRequest) -> Result<PipelineResult, CoreError> {
        let engine_id = request
            .engine_id
            .as_deref()
            .unwrap_or(&self.config.guard.default_engine);
        let engine = self.registry.resolve(engine_id)?;
        let toggles = request
            .toggles
            .clone()
            .unwrap_or_else(|| self.config.guard.default_toggles());
        let model = request
            .model_id
            .as_deref()
            .unwrap_or(&self.config.models.chat);

        let mut timings = StageTimings::default();

        // Input stage.
        if let Some(engine) = &engine {
            let started = Instant::now();
            let verdict = engine
                .check_input(&request.message, &toggles, request.model_id.as_deref())
                .await;
            let elapsed = started.elapsed().as_secs_f64();
            timings.input_secs = Some(elapsed);

            if verdict.is_blocked() {
                return Ok(self.blocked(GuardStage::Input, verdict, elapsed, timings));
            }
            self.record(StageEvent::new("input", "pass", "", elapsed));
        }

        // Generation.
        let messages = [
            ChatMessage::system(self.config.guard.system_prompt.clone()),
            ChatMessage::user(request.message.clone()),
        ];
        let started = Instant::now();
        let reply = match self.client.chat(model, &messages).await {
            Ok(reply) => reply,
            Err(err) => {
                let elapsed = started.elapsed().as_secs_f64();
                self.record(StageEvent::new("generation", "error", err.to_string(), elapsed));
                return Err(CoreError::Generation(err));
            }
        };
        let elapsed = started.elapsed().as_secs_f64();
        timings.generation_secs = Some(elapsed);
        self.record(StageEvent::new(
            "generation",
            "pass",
            format!("{} chars", reply.chars().count()),
            elapsed,
        ));

        // Output stage. The generated text is discarded on a block.
        if let Some(engine) = &engine {
            let started = Instant::now();
            let verdict = engine
                .check_output(&reply, &toggles, request.model_id.as_deref())
                .await;
            let elapsed = started.elapsed().as_secs_f64();
            timings.output_secs = Some(elapsed);

            if verdict.is_blocked() {
                return Ok(self.blocked(GuardStage::Output, verdict, elapsed, timings));
            }
            self.record(StageEvent::new("output", "pass", "", elapsed));
        }

        Ok(PipelineResult::passed(reply, timings))
    }
}
