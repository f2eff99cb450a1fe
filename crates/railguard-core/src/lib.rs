//! # Railguard Core
//!
//! Orchestration of the guard pipeline: the closed engine registry, the
//! three-stage controller (input check, generation, output check), pipeline
//! results, stage telemetry and configuration.
//!
//! ```no_run
//! use std::sync::Arc;
//! use railguard_core::{EngineRegistry, GuardPipeline, GuardRequest, RailguardConfig};
//! use railguard_llm::OllamaClient;
//!
//! # async fn demo() -> Result<(), railguard_core::CoreError> {
//! let config = RailguardConfig::default();
//! let client = Arc::new(OllamaClient::new(&config.backend.base_url, config.backend.timeout_secs));
//! let registry = EngineRegistry::standard(client.clone(), &config.models.guard, None, None);
//! let pipeline = GuardPipeline::new(registry, client, config);
//!
//! let result = pipeline.run(GuardRequest::new("มีรถไฟไปหาดใหญ่ไหม")).await?;
//! println!("{}", result.reply);
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod pipeline;
mod registry;
mod result;
mod telemetry;

pub use config::{
    BackendConfig, BackendKind, GuardConfig, ModelConfig, RailguardConfig, TelemetryConfig,
};
pub use error::CoreError;
pub use pipeline::{GuardPipeline, GuardRequest};
pub use registry::{EngineRegistry, ENGINE_NONE};
pub use result::{PipelineResult, StageTimings};
pub use telemetry::{EventLog, ResourceSnapshot, StageEvent};
