//! # Railguard Classifier
//!
//! Model-backed guard engines. Where the patterns crate answers in
//! microseconds from fixed tables, everything here costs a model round-trip,
//! so the engines are built around the single-call contract: classify once,
//! parse one structured answer, and filter the result against the enabled
//! concerns.
//!
//! Three engines:
//!
//! - [`SemanticEngine`] (`semantic`): a refusal-signature pre-pass, then one
//!   constrained-label classification per ambiguous concern
//! - [`HarmTaxonomyEngine`] (`harm_taxonomy`): one classifier call against the
//!   S1-S13 harm taxonomy plus the product categories (off-topic, competitor)
//! - [`ValidatorEngine`] (`validator`): externally-named validator modules; a
//!   concern mapped to an uninstalled module reports "not installed" rather
//!   than silently passing

mod adapter;
mod label;
mod semantic;
mod taxonomy;
mod validator;

pub use adapter::{parse_single_call, parse_single_call_with, SignatureSet, SingleCallOutcome};
pub use label::LabelClassifier;
pub use semantic::SemanticEngine;
pub use taxonomy::HarmTaxonomyEngine;
pub use validator::{Validator, ValidatorEngine, ValidatorOutcome};
