//! PII detection and redaction.
//!
//! Detection is additive: any one matching signal marks the text unsafe, and
//! the reason enumerates every distinct signal found, not just the first.
//! Redaction is a separate, purely textual operation over the same pattern
//! table and is idempotent: the `[LABEL_REDACTED]` markers contain no digits,
//! no `@` and no Thai keyword, so re-redacting is a no-op.

use std::sync::Arc;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::ner::NameRecognizer;

/// One labelled pattern of the redaction map.
struct PiiPattern {
    label: &'static str,
    regex: Regex,
}

/// One distinct PII signal found in a text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PiiSignal {
    /// Signal label, e.g. `PHONE` or `NAME`.
    pub label: String,
    /// Number of matches for that label.
    pub count: usize,
}

impl PiiSignal {
    fn new(label: impl Into<String>, count: usize) -> Self {
        Self {
            label: label.into(),
            count,
        }
    }
}

/// Detects directly- and indirectly-identifying personal data in Thai and
/// English text.
///
/// Three layers, all additive:
///
/// 1. the ordered regex table (phone, citizen id, email, card, bank account,
///    passport, chat handle, date of birth, address)
/// 2. an optional [`NameRecognizer`] pass tagging bare person names
/// 3. a honorific-prefix heuristic used only when no recognizer is installed
///
/// The regex table doubles as the redaction map for [`PiiDetector::redact`].
pub struct PiiDetector {
    patterns: Vec<PiiPattern>,
    name_prefixes: Vec<(&'static str, Regex)>,
    recognizer: Option<Arc<dyn NameRecognizer>>,
}

impl PiiDetector {
    /// Build the detector with the honorific-prefix fallback for names.
    pub fn new() -> Self {
        Self {
            patterns: Self::build_patterns(),
            name_prefixes: Self::build_name_prefixes(),
            recognizer: None,
        }
    }

    /// Build the detector with an external named-entity recognizer. The
    /// prefix heuristic is not used when a recognizer is present.
    pub fn with_recognizer(recognizer: Arc<dyn NameRecognizer>) -> Self {
        Self {
            recognizer: Some(recognizer),
            ..Self::new()
        }
    }

    /// The ordered redaction map. Wider patterns come before narrower ones so
    /// a 13-digit citizen id is redacted whole rather than as a phone prefix.
    fn build_patterns() -> Vec<PiiPattern> {
        // Patterns that embed a keyword (account, line, dob keywords) are
        // case-insensitive; PASSPORT stays case-sensitive so ordinary words
        // followed by digits don't trip it.
        let table: [(&'static str, &'static str); 9] = [
            (
                "CITIZEN_ID",
                r"\b\d[-\s]?\d{4}[-\s]?\d{5}[-\s]?\d{2}[-\s]?\d\b",
            ),
            (
                "CREDIT_CARD",
                r"\b\d{4}[-\s]?\d{4}[-\s]?\d{4}[-\s]?\d{4}\b",
            ),
            (
                "PHONE",
                r"(?:\+66[-.\s]?\d[-.\s]?\d{3}[-.\s]?\d{4}|0[689]\d[-.\s]?\d{3}[-.\s]?\d{4}|0[2-7]\d[-.\s]?\d{3}[-.\s]?\d{4})",
            ),
            (
                "EMAIL",
                r"[a-zA-Z0-9._%+\-]+@[a-zA-Z0-9.\-]+\.[a-zA-Z]{2,}",
            ),
            (
                "BANK_ACCOUNT",
                r"(?i)(?:เลขบัญชี|บัญชี|account)\s*:?\s*\d{3}[-\s]?\d[-\s]?\d{5}[-\s]?\d",
            ),
            ("PASSPORT", r"\b[A-Z]{1,2}\d{6,8}\b"),
            (
                "CHAT_HANDLE",
                r"(?i)(?:ไอดีไลน์|ไลน์|line)\s*:?\s*@?[a-zA-Z0-9._\-]{4,30}",
            ),
            (
                "DOB",
                r"(?i)(?:วันเกิด|เกิด(?:วันที่)?|date of birth|dob)\s*:?\s*\d{1,2}[\s/.\-]\d{1,2}[\s/.\-]\d{2,4}",
            ),
            (
                "ADDRESS",
                r"(?:บ้านเลขที่|ที่อยู่|ซอย|ถนน|แขวง|เขต|ตำบล|อำเภอ|จังหวัด|หมู่บ้าน|หมู่ที่)\s*:?\s*[\wก-๙./\-]+",
            ),
        ];

        table
            .into_iter()
            .map(|(label, pattern)| PiiPattern {
                label,
                // Table entries are fixed literals validated by tests.
                regex: Regex::new(pattern).unwrap(),
            })
            .collect()
    }

    /// Honorific/keyword prefixes for the fallback name pass.
    fn build_name_prefixes() -> Vec<(&'static str, Regex)> {
        [
            ("นางสาว", r"นางสาว\s*([ก-๙a-zA-Z]{2,}(?:\s+[ก-๙a-zA-Z]{2,})?)"),
            ("นาย", r"นาย\s*([ก-๙a-zA-Z]{2,}(?:\s+[ก-๙a-zA-Z]{2,})?)"),
            ("นาง", r"นาง\s*([ก-๙a-zA-Z]{2,}(?:\s+[ก-๙a-zA-Z]{2,})?)"),
            ("ด.ช.", r"ด\.ช\.\s*([ก-๙a-zA-Z]{2,}(?:\s+[ก-๙a-zA-Z]{2,})?)"),
            ("ด.ญ.", r"ด\.ญ\.\s*([ก-๙a-zA-Z]{2,}(?:\s+[ก-๙a-zA-Z]{2,})?)"),
            ("ชื่อ", r"ชื่อ\s*:?\s*([ก-๙a-zA-Z]{2,}(?:\s+[ก-๙a-zA-Z]{2,})?)"),
            ("name", r"(?i)name\s*:?\s*([a-zA-Zก-๙]{2,}(?:\s+[a-zA-Zก-๙]{2,})?)"),
        ]
        .into_iter()
        .map(|(kw, pattern)| (kw, Regex::new(pattern).unwrap()))
        .collect()
    }

    /// Scan a text for PII. Returns every distinct signal found; empty means
    /// the text is clean.
    pub fn scan(&self, text: &str) -> Vec<PiiSignal> {
        let mut found = Vec::new();

        for pattern in &self.patterns {
            let count = pattern.regex.find_iter(text).count();
            if count > 0 {
                found.push(PiiSignal::new(pattern.label, count));
            }
        }

        if let Some(recognizer) = &self.recognizer {
            let names = recognizer.person_names(text);
            if !names.is_empty() {
                found.push(PiiSignal::new("NAME", names.len()));
            }
        } else {
            // Fallback: honorific prefix followed by a plausible name token.
            for (keyword, regex) in &self.name_prefixes {
                if let Some(caps) = regex.captures(text) {
                    if caps.get(1).is_some_and(|m| m.as_str().trim().len() > 2) {
                        tracing::debug!(keyword, "name matched via prefix heuristic");
                        found.push(PiiSignal::new("NAME", 1));
                        break;
                    }
                }
            }
        }

        found
    }

    /// Format signals into the operator-facing reason string, enumerating
    /// every signal with its count.
    pub fn describe(signals: &[PiiSignal]) -> String {
        signals
            .iter()
            .map(|s| format!("{}: {} instance(s)", s.label, s.count))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Replace every regex match with a `[LABEL_REDACTED]` marker.
    ///
    /// Purely textual; runs the regex table only, never the name passes, and
    /// is not required for detection to function. Idempotent.
    pub fn redact(&self, text: &str) -> String {
        let mut out = text.to_string();
        for pattern in &self.patterns {
            let marker = format!("[{}_REDACTED]", pattern.label);
            out = pattern.regex.replace_all(&out, marker.as_str()).into_owned();
        }
        out
    }
}

impl Default for PiiDetector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thai_mobile_number_detected() {
        let detector = PiiDetector::new();
        let signals = detector.scan("ติดต่อเบอร์ 0812345678");
        assert!(signals.iter().any(|s| s.label == "PHONE"));
    }

    #[test]
    fn test_citizen_id_detected_raw_and_formatted() {
        let detector = PiiDetector::new();
        assert!(detector
            .scan("เลขบัตร 1234567890123")
            .iter()
            .any(|s| s.label == "CITIZEN_ID"));
        assert!(detector
            .scan("1-2345-67890-12-3")
            .iter()
            .any(|s| s.label == "CITIZEN_ID"));
    }

    #[test]
    fn test_email_detected_regardless_of_surrounding_text() {
        let detector = PiiDetector::new();
        let signals = detector.scan("สอบถามตารางรถไฟ ส่งมาที่ somchai@example.co.th ด้วยครับ");
        assert!(signals.iter().any(|s| s.label == "EMAIL"));
    }

    #[test]
    fn test_additive_reporting_lists_all_signals() {
        let detector = PiiDetector::new();
        let signals = detector.scan("โทร 0812345678 หรือเมล a@b.com และ c@d.org");
        let reason = PiiDetector::describe(&signals);
        assert!(reason.contains("PHONE: 1 instance(s)"));
        assert!(reason.contains("EMAIL: 2 instance(s)"));
    }

    #[test]
    fn test_clean_text_has_no_signals() {
        let detector = PiiDetector::new();
        assert!(detector.scan("มีรถไฟไปหาดใหญ่ไหม").is_empty());
        assert!(detector.scan("What time is the first train to Chiang Mai?").is_empty());
    }

    #[test]
    fn test_prefix_fallback_name() {
        let detector = PiiDetector::new();
        let signals = detector.scan("ผมชื่อ นายสมชาย ใจดี ครับ");
        assert!(signals.iter().any(|s| s.label == "NAME"));
    }

    #[test]
    fn test_recognizer_replaces_prefix_heuristic() {
        struct Fixed;
        impl NameRecognizer for Fixed {
            fn person_names(&self, _text: &str) -> Vec<String> {
                vec!["สมชาย ใจดี".to_string()]
            }
        }
        let detector = PiiDetector::with_recognizer(Arc::new(Fixed));
        let signals = detector.scan("ข้อความไม่มีคำนำหน้า");
        assert!(signals.iter().any(|s| s.label == "NAME" && s.count == 1));
    }

    #[test]
    fn test_redact_replaces_matches() {
        let detector = PiiDetector::new();
        let out = detector.redact("โทร 0812345678 เมล a@b.com");
        assert!(!out.contains("0812345678"));
        assert!(!out.contains("a@b.com"));
        assert!(out.contains("[PHONE_REDACTED]"));
        assert!(out.contains("[EMAIL_REDACTED]"));
    }

    #[test]
    fn test_redact_is_idempotent() {
        let detector = PiiDetector::new();
        let input = "บัตร 1234567890123 โทร 0812345678 line: somchai_99 เมล a@b.com";
        let once = detector.redact(input);
        let twice = detector.redact(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_redaction_not_required_for_detection() {
        let detector = PiiDetector::new();
        // scan works on raw text, untouched by redact
        let raw = "โทร 0812345678";
        assert!(!detector.scan(raw).is_empty());
        assert!(detector.scan(&detector.redact(raw)).is_empty());
    }
}
