//! # Railguard Patterns
//!
//! Deterministic, sub-millisecond detectors: regex tables, keyword lexicons
//! and brand lists. No network calls, no model round-trips: these are the
//! cheap checks the pipeline runs before anything expensive.
//!
//! The crate exposes the individual detectors plus [`PatternEngine`], which
//! wires them into the engine contract:
//!
//! | Detector | Concern | Stage |
//! |----------|---------|-------|
//! | [`PiiDetector`] | `pii` | input |
//! | [`JailbreakDetector`] | `jailbreak` | input |
//! | [`ToxicityDetector`] | `toxicity` | input + output |
//! | [`HallucinationDetector`] | `hallucination` | output |
//! | [`CompetitorDetector`] | `competitor` | output |
//!
//! All tables are built once at construction and read-only thereafter.

mod competitor;
mod engine;
mod hallucination;
mod jailbreak;
mod ner;
mod pii;
mod toxicity;

pub use competitor::CompetitorDetector;
pub use engine::PatternEngine;
pub use hallucination::HallucinationDetector;
pub use jailbreak::JailbreakDetector;
pub use ner::{merge_bio_spans, NameRecognizer};
pub use pii::{PiiDetector, PiiSignal};
pub use toxicity::ToxicityDetector;
