//! Per-request concern toggles.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::concern::{ConcernKey, HarmCategory};

/// The set of concerns enabled for one request.
///
/// Unknown keys in user-supplied maps are ignored rather than rejected, so a
/// newer client can send toggle keys an older server does not know about.
/// Insertion order is irrelevant; engines evaluate their supported concerns in
/// their own fixed priority order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConcernToggles {
    enabled: HashSet<ConcernKey>,
}

impl ConcernToggles {
    /// No concerns enabled.
    pub fn none() -> Self {
        Self::default()
    }

    /// All six named concerns enabled (harm taxonomy off).
    pub fn all_named() -> Self {
        let mut toggles = Self::default();
        for key in ConcernKey::NAMED {
            toggles.enabled.insert(key);
        }
        toggles
    }

    /// All thirteen harm taxonomy categories enabled, matching the
    /// classifier's default posture.
    pub fn all_harm() -> Self {
        let mut toggles = Self::default();
        for cat in HarmCategory::ALL {
            toggles.enabled.insert(ConcernKey::Harm(cat));
        }
        toggles
    }

    /// Builder-style enable.
    pub fn enable(mut self, key: ConcernKey) -> Self {
        self.enabled.insert(key);
        self
    }

    /// Builder-style disable.
    pub fn disable(mut self, key: ConcernKey) -> Self {
        self.enabled.remove(&key);
        self
    }

    /// Set one toggle in place.
    pub fn set(&mut self, key: ConcernKey, on: bool) {
        if on {
            self.enabled.insert(key);
        } else {
            self.enabled.remove(&key);
        }
    }

    /// Build from `(key, enabled)` string pairs. Unknown keys are skipped.
    pub fn from_labels<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, bool)>,
        S: AsRef<str>,
    {
        let mut toggles = Self::default();
        for (label, on) in pairs {
            if let Some(key) = ConcernKey::parse(label.as_ref()) {
                toggles.set(key, on);
            }
        }
        toggles
    }

    /// Whether a concern is enabled.
    pub fn is_enabled(&self, key: ConcernKey) -> bool {
        self.enabled.contains(&key)
    }

    /// True when nothing is enabled.
    pub fn is_empty(&self) -> bool {
        self.enabled.is_empty()
    }

    /// Number of enabled concerns.
    pub fn len(&self) -> usize {
        self.enabled.len()
    }

    /// The enabled subset of an engine's supported concerns, preserving the
    /// engine-supplied priority order. This is the only iteration engines
    /// should use: it guarantees a concern toggled on but unsupported by the
    /// engine is silently skipped, and evaluation order stays deterministic.
    pub fn enabled_subset(&self, supported: &[ConcernKey]) -> Vec<ConcernKey> {
        supported
            .iter()
            .copied()
            .filter(|key| self.is_enabled(*key))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_labels_ignored() {
        let toggles = ConcernToggles::from_labels([
            ("pii", true),
            ("sarcasm", true), // not a concern this system knows
            ("S7", true),
            ("S99", true),
        ]);
        assert_eq!(toggles.len(), 2);
        assert!(toggles.is_enabled(ConcernKey::Pii));
        assert!(toggles.is_enabled(ConcernKey::Harm(HarmCategory::Privacy)));
    }

    #[test]
    fn test_enabled_subset_preserves_order() {
        let toggles = ConcernToggles::none()
            .enable(ConcernKey::Toxicity)
            .enable(ConcernKey::Pii);
        let supported = [
            ConcernKey::Pii,
            ConcernKey::Jailbreak,
            ConcernKey::Toxicity,
        ];
        assert_eq!(
            toggles.enabled_subset(&supported),
            vec![ConcernKey::Pii, ConcernKey::Toxicity]
        );
    }

    #[test]
    fn test_disable_wins() {
        let toggles = ConcernToggles::all_named().disable(ConcernKey::OffTopic);
        assert!(!toggles.is_enabled(ConcernKey::OffTopic));
        assert!(toggles.is_enabled(ConcernKey::Pii));
    }

    #[test]
    fn test_serde_round_trip() {
        let toggles = ConcernToggles::none()
            .enable(ConcernKey::Jailbreak)
            .enable(ConcernKey::Harm(HarmCategory::Hate));
        let json = serde_json::to_string(&toggles).unwrap();
        let parsed: ConcernToggles = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, toggles);
    }
}
