//! Tagged state patches.
//!
//! Agents never mutate the session; each returns exactly one patch naming the
//! fields it is allowed to touch. [`crate::SessionState::apply`] is the sole
//! consumer.

use crate::report::FinalReport;
use crate::state::EndReason;
use council_proto::{BehavioralJudgment, Intent, Protocol, TechnicalJudgment};

/// One agent's output for one turn.
#[derive(Debug)]
pub enum StatePatch {
    Classification(ClassificationPatch),
    Technical(TechnicalPatch),
    Behavioral(BehavioralPatch),
    Strategic(StrategicPatch),
    Phrasing(PhrasingPatch),
    Report(ReportPatch),
}

/// Output of the intent classifier.
#[derive(Debug)]
pub struct ClassificationPatch {
    pub intent: Intent,
    pub thought: String,
}

/// Output of the technical evaluator. `judgment: None` means the evaluation
/// failed and this turn proceeds without a technical assessment.
#[derive(Debug)]
pub struct TechnicalPatch {
    pub judgment: Option<TechnicalJudgment>,
    pub thought: String,
}

/// Output of the behavioral evaluator. `judgment: None` means the evaluation
/// failed and the previous behavioral context stays in effect.
#[derive(Debug)]
pub struct BehavioralPatch {
    pub judgment: Option<BehavioralJudgment>,
    pub thought: String,
}

/// Output of the strategic coordinator: plan mutations, counters, the
/// directive for the renderer, and the optional termination flag.
#[derive(Debug, Default)]
pub struct StrategicPatch {
    /// Score to record on the current topic; also counts an answered turn.
    pub topic_score: Option<u8>,
    /// Increment the evaluated-question counter on the current topic.
    pub count_question: bool,
    /// Complete the current topic and start the next pending one.
    pub advance_topic: bool,
    /// Mark the first topic in_progress (opening turn only).
    pub start_plan: bool,
    /// New protocol; Standard never downgrades an escalated protocol.
    pub protocol: Option<Protocol>,
    pub hallucination: bool,
    pub off_topic: bool,
    pub contradiction: bool,
    /// Instruction for the dialogue renderer.
    pub directive: String,
    /// When set, the session terminates after this turn's response.
    pub end_reason: Option<EndReason>,
    pub thought: String,
}

impl StrategicPatch {
    /// The degraded patch used when strategic planning fails: keep the plan
    /// untouched and carry on with the current topic.
    pub fn continue_only(directive: impl Into<String>, thought: impl Into<String>) -> Self {
        Self {
            directive: directive.into(),
            thought: thought.into(),
            ..Self::default()
        }
    }
}

/// Output of the dialogue renderer: the one message shown to the candidate.
#[derive(Debug)]
pub struct PhrasingPatch {
    pub message: String,
    pub thought: String,
}

/// Output of the reporter; applying it terminates the session.
#[derive(Debug)]
pub struct ReportPatch {
    pub report: FinalReport,
    pub thought: String,
}
