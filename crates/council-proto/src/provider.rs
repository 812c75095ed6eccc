//! The judgment provider boundary.
//!
//! A provider receives a role-specific request and returns a structured
//! judgment or an error; it is the only boundary to the underlying language
//! model. Backends are constructed explicitly and injected into the core,
//! never reached through process-wide globals.

use crate::error::ProviderError;
use crate::judgment::{
    BehavioralJudgment, ClassificationJudgment, PhrasingJudgment, PlanJudgment, QuickDirective,
    ReportJudgment, StrategicJudgment, TechnicalJudgment,
};
use crate::tags::{Difficulty, Grade, Intent, Protocol};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Per-call model selection and creativity level.
///
/// The core treats both knobs as opaque; backends map them onto whatever
/// their API expects. `model: None` means the backend's configured default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelTuning {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub temperature: Option<f32>,
}

impl ModelTuning {
    pub fn with_temperature(temperature: f32) -> Self {
        Self {
            model: None,
            temperature: Some(temperature),
        }
    }
}

/// Input to intent classification.
#[derive(Debug, Clone)]
pub struct ClassificationRequest {
    /// Most recent interviewer message, or the interview-start sentinel.
    pub question: String,
    /// Candidate's raw message.
    pub message: String,
    pub tuning: ModelTuning,
}

/// Input to the technical assessment.
#[derive(Debug, Clone)]
pub struct TechnicalRequest {
    pub topic: String,
    pub difficulty: Difficulty,
    /// Most recent interviewer question.
    pub question: String,
    /// Candidate's answer.
    pub answer: String,
    pub tuning: ModelTuning,
}

/// Input to the behavioral assessment.
///
/// Carries the candidate message only; the question is deliberately
/// withheld so the assessment scores manner, not content.
#[derive(Debug, Clone)]
pub struct BehavioralRequest {
    pub message: String,
    pub tuning: ModelTuning,
}

/// Input to interview plan generation.
#[derive(Debug, Clone)]
pub struct PlanRequest {
    pub role: String,
    pub grade: Grade,
    pub experience: String,
    pub tuning: ModelTuning,
}

/// Input to full-mode strategic planning.
#[derive(Debug, Clone)]
pub struct StrategicRequest {
    pub name: String,
    pub role: String,
    pub grade: Grade,
    pub turn_id: u32,
    pub current_topic: String,
    /// Human-readable plan progress, one line per topic.
    pub plan_status: String,
    pub technical_summary: String,
    pub behavioral_summary: String,
    pub intent: Intent,
    pub message: String,
    pub hallucination_detected: bool,
    pub correction: Option<String>,
    pub tuning: ModelTuning,
}

/// Input to fast-mode strategic planning (meta-question or off-topic).
#[derive(Debug, Clone)]
pub struct QuickRequest {
    pub turn_id: u32,
    pub intent: Intent,
    pub message: String,
    pub current_topic: String,
    pub tuning: ModelTuning,
}

/// Situational flags the renderer phrases around.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhrasingFlags {
    /// First workflow invocation; greet the candidate.
    pub opening: bool,
    /// A fabrication was just detected; challenge without explaining.
    pub hallucination_challenge: bool,
    /// The plan just advanced; close the old topic and open the new one.
    pub topic_transition: bool,
    /// Redirect from off-topic chatter.
    pub offtopic_redirect: bool,
    /// Briefly answer the candidate's counter-question first.
    pub meta_question: bool,
}

/// Input to dialogue rendering.
#[derive(Debug, Clone)]
pub struct PhrasingRequest {
    pub name: String,
    pub role: String,
    pub grade: Grade,
    pub experience: String,
    pub turn_id: u32,
    pub directive: String,
    pub protocol: Protocol,
    pub topic: String,
    pub difficulty: Difficulty,
    pub intent: Intent,
    pub message: String,
    /// Bounded window of recent history, oldest first, pre-truncated.
    pub history: Vec<String>,
    pub flags: PhrasingFlags,
    pub tuning: ModelTuning,
}

/// Derived statistics fed into the final report.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ReportStats {
    /// Completed candidate turns.
    pub total_turns: u32,
    /// Turns where the candidate did not substantively address the question.
    pub unanswered: u32,
    /// Answer turns that produced a substantive, evaluated response.
    pub substantive_answers: u32,
    pub hallucinations: u32,
    pub off_topic: u32,
    pub contradictions: u32,
}

/// Input to final report generation.
#[derive(Debug, Clone)]
pub struct ReportRequest {
    pub name: String,
    pub role: String,
    pub grade: Grade,
    pub experience: String,
    /// Full interviewer/candidate dialogue, formatted turn by turn.
    pub dialogue: String,
    /// Per-turn agent analysis trail.
    pub analysis: String,
    pub stats: ReportStats,
    pub critical_issues: String,
    pub topics_summary: String,
    pub tuning: ModelTuning,
}

/// The capability boundary to the underlying language model.
///
/// Each method corresponds to one judgment schema. A call either returns a
/// conforming result or an error within the backend's own time bound; the
/// core treats a timeout like any other failure and applies the
/// per-component degradation policy.
#[async_trait]
pub trait JudgmentProvider: Send + Sync {
    async fn classify(
        &self,
        req: ClassificationRequest,
    ) -> Result<ClassificationJudgment, ProviderError>;

    async fn assess_technical(
        &self,
        req: TechnicalRequest,
    ) -> Result<TechnicalJudgment, ProviderError>;

    async fn assess_behavioral(
        &self,
        req: BehavioralRequest,
    ) -> Result<BehavioralJudgment, ProviderError>;

    async fn generate_plan(&self, req: PlanRequest) -> Result<PlanJudgment, ProviderError>;

    async fn decide(&self, req: StrategicRequest) -> Result<StrategicJudgment, ProviderError>;

    async fn decide_quick(&self, req: QuickRequest) -> Result<QuickDirective, ProviderError>;

    async fn phrase(&self, req: PhrasingRequest) -> Result<PhrasingJudgment, ProviderError>;

    async fn report(&self, req: ReportRequest) -> Result<ReportJudgment, ProviderError>;
}
