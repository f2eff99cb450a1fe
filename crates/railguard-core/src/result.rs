//! The pipeline's result value.

use serde::{Deserialize, Serialize};

use railguard_policy::{ConcernKey, GuardStage, Verdict};

use crate::telemetry::ResourceSnapshot;

/// Wall-clock seconds per stage. A stage that never ran stays `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StageTimings {
    pub input_secs: Option<f64>,
    pub generation_secs: Option<f64>,
    pub output_secs: Option<f64>,
}

/// The outcome of one message through the full pipeline.
///
/// `reply` is always user-presentable: the generated answer when nothing
/// blocked, or the templated refusal when something did. Raw detector detail
/// lives in `verdict` and in the logs, never in `reply`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineResult {
    /// Text to show the user.
    pub reply: String,

    /// Whether a guard stage blocked the request.
    pub blocked: bool,

    /// The stage that blocked, if any.
    pub blocked_stage: Option<GuardStage>,

    /// The concern that triggered, if the block was a violation.
    pub concern: Option<ConcernKey>,

    /// The triggering verdict, for operators. `None` when nothing blocked.
    pub verdict: Option<Verdict>,

    /// Per-stage elapsed times.
    pub timings: StageTimings,

    /// Process resources at completion, best-effort.
    pub resources: ResourceSnapshot,
}

impl PipelineResult {
    /// A clean pass-through result carrying the generated reply.
    pub fn passed(reply: String, timings: StageTimings) -> Self {
        Self {
            reply,
            blocked: false,
            blocked_stage: None,
            concern: None,
            verdict: None,
            timings,
            resources: ResourceSnapshot::capture(),
        }
    }

    /// A blocked result. `reply` must already be the templated refusal.
    pub fn blocked(
        reply: String,
        stage: GuardStage,
        verdict: Verdict,
        timings: StageTimings,
    ) -> Self {
        Self {
            reply,
            blocked: true,
            blocked_stage: Some(stage),
            concern: verdict.concern(),
            verdict: Some(verdict),
            timings,
            resources: ResourceSnapshot::capture(),
        }
    }

    /// The concern key's string form, for transport layers that report a
    /// `violationType` field.
    pub fn violation_type(&self) -> Option<&'static str> {
        self.concern.map(|c| c.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passed_result_has_no_block_fields() {
        let result = PipelineResult::passed("สวัสดีครับ".to_string(), StageTimings::default());
        assert!(!result.blocked);
        assert_eq!(result.blocked_stage, None);
        assert_eq!(result.violation_type(), None);
    }

    #[test]
    fn test_blocked_result_carries_concern() {
        let verdict = Verdict::violation(ConcernKey::Pii, "PHONE: 1 instance(s)");
        let result = PipelineResult::blocked(
            "ข้อความมีข้อมูลส่วนบุคคล".to_string(),
            GuardStage::Input,
            verdict,
            StageTimings::default(),
        );
        assert!(result.blocked);
        assert_eq!(result.blocked_stage, Some(GuardStage::Input));
        assert_eq!(result.violation_type(), Some("pii"));
    }

    #[test]
    fn test_unavailable_block_has_no_concern() {
        let result = PipelineResult::blocked(
            "ระบบไม่พร้อม".to_string(),
            GuardStage::Input,
            Verdict::unavailable("backend down"),
            StageTimings::default(),
        );
        assert!(result.blocked);
        assert_eq!(result.concern, None);
    }
}
