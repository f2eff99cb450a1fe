//! Heuristic hallucination screening for generated answers.
//!
//! Two signal families: fabrication markers (over-confident claims about
//! prices, promotions or guarantees the assistant cannot know) and hedging
//! density (two or more uncertainty phrases in one answer). Either family
//! alone flags the answer.

use regex::Regex;

/// Hedging phrases, Thai and English. One is normal speech; two or more in a
/// single answer correlates with invented detail.
const UNCERTAINTY_PHRASES: &[&str] = &[
    "อาจจะ", "น่าจะ", "คงจะ", "ไม่แน่ใจ", "เท่าที่ทราบ", "ถ้าจำไม่ผิด",
    "i think", "i believe", "probably", "perhaps", "maybe",
    "as far as i know", "if i remember correctly", "not sure",
];

/// Detects likely-fabricated content in assistant answers.
pub struct HallucinationDetector {
    fabrication: Vec<(Regex, &'static str)>,
}

impl HallucinationDetector {
    pub fn new() -> Self {
        let fabrication = [
            (
                r"(?i)(?:ลดราคา|ส่วนลด|โปรโมชั่น|discount|promotion)\s*(?:\d{1,3}\s*%|พิเศษ)",
                "specific promotion claim",
            ),
            (
                r"(?:รับประกัน|การันตี)(?:ว่า)?(?:ไม่มีดีเลย์|ตรงเวลา|ได้ที่นั่ง)",
                "impossible guarantee",
            ),
            (
                r"(?i)guarantee[ds]?\s+(?:no\s+delays?|on[\s-]?time|a\s+seat)",
                "impossible guarantee",
            ),
            (
                r"(?:ฟรี|ไม่เสียค่าใช้จ่าย)(?:ทุกที่นั่ง|ทุกขบวน|ตลอดชีพ)",
                "free-for-everything claim",
            ),
            (
                r"(?i)100\s*%\s*(?:แน่นอน|ชัวร์|certain|accurate|sure)",
                "absolute certainty claim",
            ),
        ]
        .into_iter()
        .map(|(p, d)| (Regex::new(p).unwrap(), d))
        .collect();

        Self { fabrication }
    }

    /// Returns a description of the strongest signal, or `None` when the
    /// answer looks grounded.
    pub fn check(&self, text: &str) -> Option<String> {
        if let Some((_, description)) =
            self.fabrication.iter().find(|(re, _)| re.is_match(text))
        {
            return Some(format!("fabrication marker: {description}"));
        }

        let lower = text.to_lowercase();
        let hedges: Vec<&str> = UNCERTAINTY_PHRASES
            .iter()
            .copied()
            .filter(|p| lower.contains(p))
            .collect();
        if hedges.len() >= 2 {
            return Some(format!(
                "high uncertainty: {} hedging phrases ({})",
                hedges.len(),
                hedges.join(", ")
            ));
        }

        None
    }
}

impl Default for HallucinationDetector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_promotion_claim_flagged() {
        let detector = HallucinationDetector::new();
        assert!(detector
            .check("ตอนนี้มีโปรโมชั่น 50% สำหรับทุกขบวนครับ")
            .is_some());
    }

    #[test]
    fn test_guarantee_flagged() {
        let detector = HallucinationDetector::new();
        assert!(detector.check("รับประกันว่าไม่มีดีเลย์แน่นอนครับ").is_some());
        assert!(detector.check("We guarantee no delays on this route.").is_some());
    }

    #[test]
    fn test_double_hedging_flagged() {
        let detector = HallucinationDetector::new();
        let hit = detector.check("น่าจะออกประมาณ 8 โมง แต่ไม่แน่ใจนะครับ");
        assert!(hit.unwrap().contains("hedging"));
    }

    #[test]
    fn test_single_hedge_passes() {
        let detector = HallucinationDetector::new();
        assert!(detector.check("รถไฟน่าจะถึงตรงเวลาครับ").is_none());
    }

    #[test]
    fn test_grounded_answer_passes() {
        let detector = HallucinationDetector::new();
        assert!(detector
            .check("ขบวน 171 ออกจากกรุงเทพอภิวัฒน์เวลา 13:00 น. ถึงหาดใหญ่ 05:40 น.")
            .is_none());
    }
}
