//! User-facing refusal templates.
//!
//! Blocked results always surface one of these fixed, non-technical messages.
//! Detector internals (matched patterns, raw classifier output) go to logs
//! only and must never reach the end user.

use crate::concern::ConcernKey;
use crate::engine::GuardStage;

/// The refusal message shown when `concern` blocks at `stage`.
pub fn refusal_message(stage: GuardStage, concern: ConcernKey) -> &'static str {
    match stage {
        GuardStage::Input => match concern {
            ConcernKey::Pii => "ข้อความมีข้อมูลส่วนบุคคล (PII) ไม่สามารถประมวลผลได้",
            ConcernKey::Toxicity => "ข้อความมีเนื้อหาที่ไม่เหมาะสม",
            ConcernKey::OffTopic => "ฉันสามารถตอบคำถามเกี่ยวกับการรถไฟแห่งประเทศไทยเท่านั้น",
            // Jailbreak, competitor and every harm category share the
            // generic policy refusal on input.
            _ => "ข้อความละเมิดนโยบายความปลอดภัย",
        },
        GuardStage::Output => match concern {
            ConcernKey::Hallucination => "คำตอบถูกกรองเนื่องจากอาจมีข้อมูลที่ไม่ถูกต้อง",
            ConcernKey::Competitor => "คำตอบถูกกรองเนื่องจากมีการกล่าวถึงคู่แข่ง",
            _ => "คำตอบถูกกรองเนื่องจากมีเนื้อหาไม่เหมาะสม",
        },
    }
}

/// The refusal shown when the safety system itself cannot run. Distinct from
/// any concern message so operators can tell "blocked by policy" apart from
/// "the guard machinery is broken".
pub fn unavailable_message() -> &'static str {
    "ระบบตรวจสอบความปลอดภัยไม่พร้อมใช้งานชั่วคราว กรุณาลองใหม่อีกครั้ง"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::concern::HarmCategory;

    #[test]
    fn test_stage_specific_messages() {
        assert_ne!(
            refusal_message(GuardStage::Input, ConcernKey::Toxicity),
            refusal_message(GuardStage::Output, ConcernKey::Toxicity)
        );
    }

    #[test]
    fn test_harm_categories_share_policy_message() {
        let a = refusal_message(GuardStage::Input, ConcernKey::Harm(HarmCategory::Hate));
        let b = refusal_message(GuardStage::Input, ConcernKey::Jailbreak);
        assert_eq!(a, b);
    }

    #[test]
    fn test_unavailable_is_distinct() {
        for key in ConcernKey::NAMED {
            assert_ne!(unavailable_message(), refusal_message(GuardStage::Input, key));
            assert_ne!(unavailable_message(), refusal_message(GuardStage::Output, key));
        }
    }
}
