//! The six judgment schemas produced at the provider boundary.
//!
//! Each schema is the structured result of one agent role's prompt. Backends
//! deserialize model output into these types; the orchestration core consumes
//! them and never sees raw model text.

use crate::tags::{
    Accuracy, Demeanor, Depth, Difficulty, Engagement, Grade, Intent, NextAction, Protocol,
    Recommendation, StressLevel,
};
use serde::{Deserialize, Serialize};

/// Intent classification of one candidate message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationJudgment {
    /// Exactly one of the four intents; never multi-label.
    pub intent: Intent,
    /// One-sentence rationale for the chosen intent.
    pub rationale: String,
}

/// Technical assessment of an answer turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechnicalJudgment {
    /// Answer score, 0-10.
    pub score: u8,
    pub accuracy: Accuracy,
    pub depth: Depth,
    /// Up to three concrete issues with the answer.
    #[serde(default)]
    pub issues: Vec<String>,
    /// Short correction for a gross factual error, when one was made.
    #[serde(default)]
    pub correction: Option<String>,
    /// The answer contradicts the candidate's earlier statements.
    #[serde(default)]
    pub contradiction_detected: bool,
    /// The answer uses invented terms, libraries, or citations.
    #[serde(default)]
    pub fictional_term_detected: bool,
    /// One-sentence assessment.
    pub rationale: String,
}

impl TechnicalJudgment {
    /// True when the answer must be treated as a fabrication.
    pub fn is_hallucination(&self) -> bool {
        self.accuracy == Accuracy::Hallucination || self.fictional_term_detected
    }

    /// Enforces the schema contract on a raw provider result.
    ///
    /// The score is clamped to 0-10 always, and to 0-1 when the answer is a
    /// hallucination. This is a hard policy, not a prompt suggestion. The
    /// issue list is capped at three entries.
    pub fn normalized(mut self) -> Self {
        self.score = self.score.min(10);
        if self.is_hallucination() {
            self.score = self.score.min(1);
        }
        self.issues.truncate(3);
        self
    }
}

/// Behavioral assessment of how the candidate communicates.
///
/// Deliberately blind to technical content; scores manner only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BehavioralJudgment {
    pub demeanor: Demeanor,
    /// Clarity of expression, 1-10.
    pub clarity: u8,
    /// Honesty, 1-10. Driven into 1-3 when the answer is sourced from an
    /// external assistant or otherwise evasive; 7-10 requires first-person
    /// experience or an explicit admission of not knowing.
    pub honesty: u8,
    pub engagement: Engagement,
    pub stress: StressLevel,
    /// One-sentence behavioral observation.
    pub observation: String,
    #[serde(default)]
    pub recommended_protocol: Protocol,
}

/// One topic proposed for the interview plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannedTopic {
    pub label: String,
    pub difficulty: Difficulty,
    /// Why this topic matters for the role.
    pub rationale: String,
}

/// Generated interview plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanJudgment {
    /// Six to eight concrete topics, ordered basic to advanced.
    pub topics: Vec<PlannedTopic>,
    pub rationale: String,
}

/// Full-mode strategic directive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategicJudgment {
    /// Score to record on the current topic, if the provider assessed one.
    #[serde(default)]
    pub topic_score: Option<u8>,
    pub next_action: NextAction,
    #[serde(default)]
    pub protocol: Protocol,
    /// Instruction for the dialogue renderer.
    pub directive: String,
    pub rationale: String,
}

/// Fast-mode strategic directive for meta-questions and off-topic turns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuickDirective {
    pub directive: String,
    pub rationale: String,
}

/// The single message shown to the candidate for one turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhrasingJudgment {
    pub message: String,
    pub rationale: String,
}

/// Final hiring verdict produced once at termination.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportJudgment {
    /// Grade actually demonstrated, independent of the declared one.
    pub assessed_grade: Grade,
    pub recommendation: Recommendation,
    /// Confidence in the verdict, 0-100.
    pub confidence: u8,
    /// Two to three sentence verdict rationale.
    pub reasoning: String,
    /// Soft-skill sub-scores, 1-10 each.
    pub clarity: u8,
    pub honesty: u8,
    pub engagement: u8,
    pub soft_skill_notes: String,
    /// Development roadmap, at least three items.
    pub roadmap: Vec<String>,
    /// Learning resources.
    #[serde(default)]
    pub resources: Vec<String>,
    pub rationale: String,
}
