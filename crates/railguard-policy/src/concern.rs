//! Concern keys: the policy dimensions an engine can check.

use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One category of the fixed harm taxonomy (S1–S13).
///
/// The codes and labels follow the standard thirteen-category safety taxonomy
/// used by harm-classifier models: each category is independently togglable,
/// and a classifier reports violated categories by code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HarmCategory {
    /// S1: Violent Crimes
    ViolentCrimes,
    /// S2: Non-Violent Crimes
    NonViolentCrimes,
    /// S3: Sex Crimes
    SexCrimes,
    /// S4: Child Exploitation
    ChildExploitation,
    /// S5: Defamation
    Defamation,
    /// S6: Specialized Advice
    SpecializedAdvice,
    /// S7: Privacy
    Privacy,
    /// S8: Intellectual Property
    IntellectualProperty,
    /// S9: Indiscriminate Weapons
    IndiscriminateWeapons,
    /// S10: Hate
    Hate,
    /// S11: Self-Harm
    SelfHarm,
    /// S12: Sexual Content
    SexualContent,
    /// S13: Elections
    Elections,
}

impl HarmCategory {
    /// All thirteen categories in code order.
    pub const ALL: [HarmCategory; 13] = [
        HarmCategory::ViolentCrimes,
        HarmCategory::NonViolentCrimes,
        HarmCategory::SexCrimes,
        HarmCategory::ChildExploitation,
        HarmCategory::Defamation,
        HarmCategory::SpecializedAdvice,
        HarmCategory::Privacy,
        HarmCategory::IntellectualProperty,
        HarmCategory::IndiscriminateWeapons,
        HarmCategory::Hate,
        HarmCategory::SelfHarm,
        HarmCategory::SexualContent,
        HarmCategory::Elections,
    ];

    /// The short code used in classifier prompts and toggle keys, e.g. `"S1"`.
    pub fn code(&self) -> &'static str {
        match self {
            HarmCategory::ViolentCrimes => "S1",
            HarmCategory::NonViolentCrimes => "S2",
            HarmCategory::SexCrimes => "S3",
            HarmCategory::ChildExploitation => "S4",
            HarmCategory::Defamation => "S5",
            HarmCategory::SpecializedAdvice => "S6",
            HarmCategory::Privacy => "S7",
            HarmCategory::IntellectualProperty => "S8",
            HarmCategory::IndiscriminateWeapons => "S9",
            HarmCategory::Hate => "S10",
            HarmCategory::SelfHarm => "S11",
            HarmCategory::SexualContent => "S12",
            HarmCategory::Elections => "S13",
        }
    }

    /// Human-readable label used when enumerating categories in a prompt.
    pub fn label(&self) -> &'static str {
        match self {
            HarmCategory::ViolentCrimes => "Violent Crimes",
            HarmCategory::NonViolentCrimes => "Non-Violent Crimes",
            HarmCategory::SexCrimes => "Sex Crimes",
            HarmCategory::ChildExploitation => "Child Exploitation",
            HarmCategory::Defamation => "Defamation",
            HarmCategory::SpecializedAdvice => "Specialized Advice",
            HarmCategory::Privacy => "Privacy",
            HarmCategory::IntellectualProperty => "Intellectual Property",
            HarmCategory::IndiscriminateWeapons => "Indiscriminate Weapons",
            HarmCategory::Hate => "Hate",
            HarmCategory::SelfHarm => "Self-Harm",
            HarmCategory::SexualContent => "Sexual Content",
            HarmCategory::Elections => "Elections",
        }
    }

    /// Parse a code like `"S7"` (case-insensitive). Unknown codes yield `None`.
    pub fn parse(code: &str) -> Option<Self> {
        let code = code.trim();
        HarmCategory::ALL
            .iter()
            .copied()
            .find(|c| c.code().eq_ignore_ascii_case(code))
    }
}

impl fmt::Display for HarmCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code(), self.label())
    }
}

/// A concern key identifies one policy dimension being checked.
///
/// The six named concerns come from the product's guard set; the harm taxonomy
/// codes come from the categorized-harm classifier. Keys serialize as their
/// string form (`"pii"`, `"off_topic"`, `"S7"`, ...) so toggle maps stay
/// readable in config files and telemetry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConcernKey {
    /// Personal data leakage (phone numbers, citizen ids, names, ...).
    Pii,
    /// Prompt injection / jailbreak attempts.
    Jailbreak,
    /// Profanity and toxic language.
    Toxicity,
    /// Off-topic drift away from the product domain.
    OffTopic,
    /// Fabricated claims in model output.
    Hallucination,
    /// Competitor brand mentions in model output.
    Competitor,
    /// One category of the harm taxonomy.
    Harm(HarmCategory),
}

impl ConcernKey {
    /// The six named (non-taxonomy) concerns.
    pub const NAMED: [ConcernKey; 6] = [
        ConcernKey::Pii,
        ConcernKey::Jailbreak,
        ConcernKey::Toxicity,
        ConcernKey::OffTopic,
        ConcernKey::Hallucination,
        ConcernKey::Competitor,
    ];

    /// Stable string form used in toggle maps, telemetry and config.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConcernKey::Pii => "pii",
            ConcernKey::Jailbreak => "jailbreak",
            ConcernKey::Toxicity => "toxicity",
            ConcernKey::OffTopic => "off_topic",
            ConcernKey::Hallucination => "hallucination",
            ConcernKey::Competitor => "competitor",
            ConcernKey::Harm(cat) => cat.code(),
        }
    }

    /// Parse a key from its string form. Unknown keys yield `None`; callers
    /// that accept user-supplied toggle maps must skip them, never error.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        match s.to_ascii_lowercase().as_str() {
            "pii" => Some(ConcernKey::Pii),
            "jailbreak" => Some(ConcernKey::Jailbreak),
            "toxicity" => Some(ConcernKey::Toxicity),
            "off_topic" => Some(ConcernKey::OffTopic),
            "hallucination" => Some(ConcernKey::Hallucination),
            "competitor" => Some(ConcernKey::Competitor),
            _ => HarmCategory::parse(s).map(ConcernKey::Harm),
        }
    }
}

impl fmt::Display for ConcernKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ConcernKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ConcernKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct KeyVisitor;

        impl Visitor<'_> for KeyVisitor {
            type Value = ConcernKey;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a concern key such as \"pii\" or \"S7\"")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<ConcernKey, E> {
                ConcernKey::parse(v)
                    .ok_or_else(|| E::custom(format!("unknown concern key: {v:?}")))
            }
        }

        deserializer.deserialize_str(KeyVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_round_trip() {
        for key in ConcernKey::NAMED {
            assert_eq!(ConcernKey::parse(key.as_str()), Some(key));
        }
    }

    #[test]
    fn test_harm_code_round_trip() {
        for cat in HarmCategory::ALL {
            assert_eq!(ConcernKey::parse(cat.code()), Some(ConcernKey::Harm(cat)));
        }
        assert_eq!(HarmCategory::parse("s11"), Some(HarmCategory::SelfHarm));
    }

    #[test]
    fn test_unknown_key_is_none() {
        assert_eq!(ConcernKey::parse("S99"), None);
        assert_eq!(ConcernKey::parse("profanity"), None);
        assert_eq!(ConcernKey::parse(""), None);
    }

    #[test]
    fn test_serde_string_form() {
        let json = serde_json::to_string(&ConcernKey::Harm(HarmCategory::Privacy)).unwrap();
        assert_eq!(json, "\"S7\"");
        let parsed: ConcernKey = serde_json::from_str("\"off_topic\"").unwrap();
        assert_eq!(parsed, ConcernKey::OffTopic);
    }
}
