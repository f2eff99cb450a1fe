//! # Railguard Policy
//!
//! The shared contract between the guard pipeline and its detection engines.
//!
//! Every engine, whether pattern-based, classifier-based, or hosted-validator,
//! speaks the same language defined here:
//!
//! - [`ConcernKey`]: one policy dimension being checked (PII, jailbreak, a harm
//!   taxonomy code, ...)
//! - [`ConcernToggles`]: which concerns are enabled for the current request
//! - [`Verdict`]: the outcome of checking one text, distinguishing a policy
//!   violation from the checking machinery itself being unavailable
//! - [`GuardEngine`]: the swappable strategy interface
//!
//! ## Failure semantics
//!
//! Verdicts carry failure semantics explicitly instead of using errors as the
//! sole signal: [`Verdict::Violation`] is the expected "detector did its job"
//! outcome, while [`Verdict::Unavailable`] means the engine itself could not
//! run and the pipeline must fail closed. A concern-level transient failure is
//! not a verdict at all: engines log it and continue with the next concern.

mod concern;
mod engine;
mod refusal;
mod toggles;
mod verdict;

pub use concern::{ConcernKey, HarmCategory};
pub use engine::{EngineDescriptor, GuardEngine, GuardStage};
pub use refusal::{refusal_message, unavailable_message};
pub use toggles::ConcernToggles;
pub use verdict::Verdict;
