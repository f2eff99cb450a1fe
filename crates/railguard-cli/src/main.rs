//! Railguard CLI - drive the guard pipeline from the command line.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use railguard_core::{
    BackendKind, EngineRegistry, GuardPipeline, GuardRequest, RailguardConfig,
};
use railguard_llm::{LlmClient, OllamaClient, OpenAiCompatClient};
use railguard_patterns::PatternEngine;
use railguard_policy::{ConcernToggles, GuardEngine, GuardStage};

#[derive(Parser)]
#[command(name = "railguard")]
#[command(about = "Guardrails pipeline for the Thai railway assistant")]
struct Cli {
    /// Configuration file path. Defaults apply when the file does not exist.
    #[arg(short, long, default_value = "config/railguard.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Run one message through the full pipeline
    Chat {
        message: String,
        /// Engine id (pattern, pattern_ner, semantic, harm_taxonomy, none)
        #[arg(short, long)]
        engine: Option<String>,
        /// Chat model id override
        #[arg(short, long)]
        model: Option<String>,
        /// Comma-separated concern keys to enable, overriding the defaults
        #[arg(long)]
        concerns: Option<String>,
        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run one guard stage over a text, without generation
    Check {
        text: String,
        /// Stage to run: input or output
        #[arg(short, long, default_value = "input")]
        stage: String,
        /// Engine id
        #[arg(short, long)]
        engine: Option<String>,
        /// Classifier model id override for model-backed engines
        #[arg(short, long)]
        model: Option<String>,
        #[arg(long)]
        concerns: Option<String>,
    },
    /// Redact PII from a text and print the result
    Redact { text: String },
    /// List registered engines and their supported concerns
    Engines,
    /// List models served by the configured backend
    Models,
}

fn load_config(path: &str) -> anyhow::Result<RailguardConfig> {
    if std::path::Path::new(path).exists() {
        Ok(RailguardConfig::load(path)?)
    } else {
        tracing::debug!(path, "config file not found, using defaults");
        Ok(RailguardConfig::default())
    }
}

fn build_client(config: &RailguardConfig) -> Arc<dyn LlmClient> {
    let backend = &config.backend;
    match backend.kind {
        BackendKind::Ollama => Arc::new(OllamaClient::new(&backend.base_url, backend.timeout_secs)),
        BackendKind::OpenaiCompat => Arc::new(OpenAiCompatClient::new(
            &backend.base_url,
            backend.api_key.clone(),
            backend.timeout_secs,
        )),
    }
}

fn parse_concerns(spec: Option<&str>) -> Option<ConcernToggles> {
    spec.map(|spec| ConcernToggles::from_labels(spec.split(',').map(|key| (key.trim(), true))))
}

fn parse_stage(stage: &str) -> anyhow::Result<GuardStage> {
    match stage {
        "input" => Ok(GuardStage::Input),
        "output" => Ok(GuardStage::Output),
        other => anyhow::bail!("unknown stage {other:?}, expected input or output"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "railguard=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli.config)?;
    let client = build_client(&config);
    let registry = EngineRegistry::standard(client.clone(), &config.models.guard, None, None);

    match cli.command {
        Commands::Chat {
            message,
            engine,
            model,
            concerns,
            json,
        } => {
            let pipeline = GuardPipeline::new(registry, client, config);
            let mut request = GuardRequest::new(message);
            request.engine_id = engine;
            request.model_id = model;
            request.toggles = parse_concerns(concerns.as_deref());

            let result = pipeline.run(request).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("{}", result.reply);
                if result.blocked {
                    let stage = result
                        .blocked_stage
                        .map(|s| s.as_str())
                        .unwrap_or("unknown");
                    let kind = result.violation_type().unwrap_or("unavailable");
                    eprintln!("[blocked at {stage} stage: {kind}]");
                }
            }
        }
        Commands::Check {
            text,
            stage,
            engine,
            model,
            concerns,
        } => {
            let stage = parse_stage(&stage)?;
            let engine_id = engine.as_deref().unwrap_or(&config.guard.default_engine);
            let engine = registry
                .resolve(engine_id)?
                .context("engine id 'none' performs no checks")?;
            let toggles =
                parse_concerns(concerns.as_deref()).unwrap_or_else(|| config.guard.default_toggles());

            let verdict = engine.check(stage, &text, &toggles, model.as_deref()).await;
            println!("{verdict}");
        }
        Commands::Redact { text } => {
            let engine = PatternEngine::new();
            println!("{}", engine.pii().redact(&text));
        }
        Commands::Engines => {
            for descriptor in registry.descriptors() {
                let concerns: Vec<&str> =
                    descriptor.supported.iter().map(|c| c.as_str()).collect();
                println!("{:<14} {:<28} {}", descriptor.id, descriptor.name, concerns.join(", "));
            }
        }
        Commands::Models => {
            let models = client.list_models().await?;
            if models.is_empty() {
                println!("no models reported by the backend");
            }
            for model in models {
                println!("{model}");
            }
        }
    }

    Ok(())
}
