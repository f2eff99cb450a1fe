//! Verdict types for guard check results.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::concern::ConcernKey;

/// The outcome of checking one text against the enabled concerns.
///
/// A check returns one of three verdicts:
/// - `Safe`: no enabled concern matched, proceed
/// - `Violation`: a concern matched; the text must be blocked
/// - `Unavailable`: the engine itself could not run; the pipeline fails closed
///
/// Verdicts are pure values and are never mutated after creation. The
/// invariants "not safe implies a concern is set" and "safe implies no
/// concern" hold by construction: only `Violation` carries a concern.
///
/// `reason` is operator-facing and goes to logs; the end user only ever sees
/// the templated refusal message for the triggering concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Verdict {
    /// No enabled concern matched.
    Safe,

    /// An enabled concern matched. Block the text.
    Violation {
        /// The concern that triggered.
        concern: ConcernKey,
        /// Operator-facing description of what matched.
        reason: String,
        /// Raw detector output (classifier text, matched pattern), if any.
        raw_detail: Option<String>,
    },

    /// The engine could not run at all (missing dependency, backend down).
    /// Treated as blocking; the pipeline never bypasses a dead engine.
    Unavailable {
        /// Operator-facing description of what is broken.
        detail: String,
    },
}

impl Verdict {
    /// Create a Safe verdict.
    pub fn safe() -> Self {
        Self::Safe
    }

    /// Create a Violation verdict.
    pub fn violation(concern: ConcernKey, reason: impl Into<String>) -> Self {
        Self::Violation {
            concern,
            reason: reason.into(),
            raw_detail: None,
        }
    }

    /// Create a Violation verdict carrying raw detector output.
    pub fn violation_with_detail(
        concern: ConcernKey,
        reason: impl Into<String>,
        raw_detail: impl Into<String>,
    ) -> Self {
        Self::Violation {
            concern,
            reason: reason.into(),
            raw_detail: Some(raw_detail.into()),
        }
    }

    /// Create an Unavailable verdict.
    pub fn unavailable(detail: impl Into<String>) -> Self {
        Self::Unavailable {
            detail: detail.into(),
        }
    }

    /// Returns true if the text may proceed.
    pub fn is_safe(&self) -> bool {
        matches!(self, Self::Safe)
    }

    /// Returns true if the text must be blocked (violation or unavailable).
    pub fn is_blocked(&self) -> bool {
        !self.is_safe()
    }

    /// Returns true if the engine itself could not run.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }

    /// The triggering concern, if this is a violation.
    pub fn concern(&self) -> Option<ConcernKey> {
        match self {
            Self::Violation { concern, .. } => Some(*concern),
            _ => None,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Safe => write!(f, "safe"),
            Self::Violation {
                concern, reason, ..
            } => write!(f, "violation ({concern}): {reason}"),
            Self::Unavailable { detail } => write!(f, "engine unavailable: {detail}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_has_no_concern() {
        let verdict = Verdict::safe();
        assert!(verdict.is_safe());
        assert!(!verdict.is_blocked());
        assert_eq!(verdict.concern(), None);
    }

    #[test]
    fn test_violation_carries_concern() {
        let verdict = Verdict::violation(ConcernKey::Pii, "PHONE: 1 instance(s)");
        assert!(verdict.is_blocked());
        assert!(!verdict.is_unavailable());
        assert_eq!(verdict.concern(), Some(ConcernKey::Pii));
    }

    #[test]
    fn test_unavailable_blocks_without_concern() {
        let verdict = Verdict::unavailable("classifier model not loaded");
        assert!(verdict.is_blocked());
        assert!(verdict.is_unavailable());
        assert_eq!(verdict.concern(), None);
    }

    #[test]
    fn test_display() {
        let verdict = Verdict::violation(ConcernKey::Jailbreak, "instruction override");
        assert_eq!(
            verdict.to_string(),
            "violation (jailbreak): instruction override"
        );
    }
}
