//! Profanity and toxic-language detection.
//!
//! Thai + English blocklists with spaced-out spellings, transliterations and
//! l33t-speak obfuscation regexes, plus a no-space re-check that catches
//! words split with spaces.

use regex::Regex;

/// Main Thai profanity list. The first [`NO_SPACE_CHECK`] entries are also
/// re-checked against the text with all spaces removed.
const THAI_WORDS: &[&str] = &[
    "เหี้ย", "ควาย", "มึง", "กู", "สัด", "เย็ด", "ควย",
    "ห่า", "แม่ง", "อีดอก", "อีสัตว์", "ไอ้บ้า", "ไอ้เวร",
    "อีเวร", "ไอ้สัตว์", "อีควาย", "ไอ้ควาย", "เฮงซวย",
    "ชิบหาย", "อีหน้าหี", "หน้าหี", "อีดอกทอง",
    "ทุเรศ", "ส้นตีน", "สันดาน", "ชาติชั่ว",
    "ดัดจริต", "งี่เง่า", "ปัญญาอ่อน", "หัวขี้เลื่อย",
    "เ หี้ ย", "ค ว า ย", "มึ ง", "สั ด", "ค ว ย",
    "เหี้ยๆ", "ควายๆ", "ควยๆ",
    "ฟัค", "บิทช์", "แอสโฮล",
];

const ENGLISH_WORDS: &[&str] = &[
    "fuck", "shit", "bitch", "asshole", "idiot", "stupid",
    "bastard", "moron", "retard",
    "whore", "slut",
    "fck", "fuk", "fvck", "sh1t", "b1tch", "a$$hole",
    "stfu", "wtf",
];

/// How many leading Thai words participate in the no-space pass.
const NO_SPACE_CHECK: usize = 12;

/// Detects profanity in Thai and English text.
pub struct ToxicityDetector {
    obfuscation: Vec<Regex>,
}

impl ToxicityDetector {
    pub fn new() -> Self {
        let obfuscation = [
            r"(?i)f+[u*@]+c+k+",
            r"(?i)s+h+[i1!]+t+",
            r"(?i)b+[i1!]+t+c+h+",
            r"(?i)a+s+s+h+o+l+e+",
        ]
        .into_iter()
        .map(|p| Regex::new(p).unwrap())
        .collect();

        Self { obfuscation }
    }

    /// Returns a description of every distinct match, or `None` when clean.
    pub fn check(&self, text: &str) -> Option<String> {
        let lower = text.to_lowercase();
        let mut found: Vec<String> = Vec::new();

        for word in THAI_WORDS.iter().chain(ENGLISH_WORDS) {
            if lower.contains(&word.to_lowercase()) {
                found.push((*word).to_string());
            }
        }

        for pattern in &self.obfuscation {
            if pattern.is_match(&lower) {
                found.push(format!("pattern:{}", pattern.as_str()));
            }
        }

        // Catch words split with spaces, e.g. "เ หี้ ย".
        let no_space: String = lower.chars().filter(|c| !c.is_whitespace()).collect();
        for word in THAI_WORDS.iter().take(NO_SPACE_CHECK) {
            let squashed: String = word.chars().filter(|c| !c.is_whitespace()).collect();
            if no_space.contains(&squashed) && !found.iter().any(|f| f == word) {
                found.push(format!("{word}(no-space)"));
            }
        }

        if found.is_empty() {
            return None;
        }
        found.sort();
        found.dedup();
        found.truncate(5);
        Some(format!("toxicity detected: {}", found.join(", ")))
    }
}

impl Default for ToxicityDetector {
    fn default() -> Self {
        Self::new()
    }
}
