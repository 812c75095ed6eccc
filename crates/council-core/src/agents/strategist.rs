//! Strategic coordination: plan generation, turn-by-turn routing decisions,
//! and session termination.

use crate::patch::StrategicPatch;
use crate::plan::{InterviewPlan, TOPIC_QUESTION_CAP};
use crate::state::{CandidateMetadata, EndReason, SessionState};
use council_proto::{
    Intent, JudgmentProvider, ModelTuning, NextAction, PlanRequest, Protocol, QuickRequest,
    StrategicRequest,
};
use tracing::{debug, info, warn};

/// The only agent whose patch mutates the plan or terminates the session.
///
/// Runs one of three modes per turn: the opening greeting, a fast path for
/// meta-questions and off-topic chatter, or the full decision over both
/// evaluators' output.
#[derive(Debug, Clone)]
pub struct StrategicCoordinator {
    tuning: ModelTuning,
    max_turns: u32,
}

impl StrategicCoordinator {
    pub fn new(tuning: ModelTuning, max_turns: u32) -> Self {
        Self { tuning, max_turns }
    }

    /// Generates the interview plan at session start. Falls back to a local
    /// two-topic plan when generation fails; the session always starts.
    pub async fn create_plan(
        &self,
        metadata: &CandidateMetadata,
        provider: &dyn JudgmentProvider,
    ) -> InterviewPlan {
        let request = PlanRequest {
            role: metadata.role.clone(),
            grade: metadata.target_grade,
            experience: metadata.experience.clone(),
            tuning: self.tuning.clone(),
        };
        match provider.generate_plan(request).await {
            Ok(judgment) => {
                let plan = InterviewPlan::from_judgment(&judgment);
                info!(topics = plan.len(), "Interview plan generated");
                plan
            }
            Err(err) => {
                warn!(error = %err.brief(), "Plan generation failed, using fallback plan");
                InterviewPlan::fallback(
                    &metadata.role,
                    metadata.target_grade,
                    &metadata.experience,
                )
            }
        }
    }

    pub async fn run(
        &self,
        state: &SessionState,
        provider: &dyn JudgmentProvider,
    ) -> StrategicPatch {
        if state.turn_id == 0 {
            return self.opening(state);
        }
        match state.scratch.intent.unwrap_or(Intent::Answer) {
            Intent::Question | Intent::OffTopic => self.quick(state, provider).await,
            Intent::Answer | Intent::Stop => self.full(state, provider).await,
        }
    }

    /// Opening turn: start the plan and direct a greeting, no provider call.
    fn opening(&self, state: &SessionState) -> StrategicPatch {
        let experience_brief: String = state.metadata.experience.chars().take(50).collect();
        let first_topic = state
            .plan
            .topics()
            .first()
            .map(|t| t.label.clone())
            .unwrap_or_else(|| "their background".to_string());
        StrategicPatch {
            start_plan: true,
            directive: format!(
                "Greet {} by name, acknowledge their stated experience ({}), and open \
                 the interview with a question on: {}",
                state.metadata.name, experience_brief, first_topic
            ),
            thought: format!("Opening the interview; first topic is '{first_topic}'"),
            ..StrategicPatch::default()
        }
    }

    /// Fast path: no evaluation happened, so the plan must not move.
    async fn quick(
        &self,
        state: &SessionState,
        provider: &dyn JudgmentProvider,
    ) -> StrategicPatch {
        let intent = state.scratch.intent.unwrap_or(Intent::Answer);
        let request = QuickRequest {
            turn_id: state.turn_id,
            intent,
            message: state.scratch.candidate_message.clone(),
            current_topic: self.current_topic_label(state),
            tuning: self.tuning.clone(),
        };
        let off_topic = intent == Intent::OffTopic;
        match provider.decide_quick(request).await {
            Ok(directive) => StrategicPatch {
                off_topic,
                directive: directive.directive,
                thought: directive.rationale,
                ..StrategicPatch::default()
            },
            Err(err) => {
                warn!(error = %err.brief(), "Quick decision failed");
                let mut patch = StrategicPatch::continue_only(
                    "Briefly acknowledge the candidate and repeat the current question.",
                    format!("Quick decision failed ({}), repeating question", err.brief()),
                );
                patch.off_topic = off_topic;
                patch
            }
        }
    }

    /// Full mode over the evaluators' output.
    async fn full(&self, state: &SessionState, provider: &dyn JudgmentProvider) -> StrategicPatch {
        let technical = state.scratch.technical.as_ref();
        let behavioral = state.scratch.behavioral.as_ref();

        let request = StrategicRequest {
            name: state.metadata.name.clone(),
            role: state.metadata.role.clone(),
            grade: state.metadata.target_grade,
            turn_id: state.turn_id,
            current_topic: self.current_topic_label(state),
            plan_status: state.plan.status_lines(),
            technical_summary: technical
                .map(|j| format!("{}/10 ({:?}, {:?}): {}", j.score, j.accuracy, j.depth, j.rationale))
                .unwrap_or_else(|| "(no technical evaluation this turn)".to_string()),
            behavioral_summary: behavioral
                .map(|j| format!("{:?}, stress {:?}: {}", j.demeanor, j.stress, j.observation))
                .unwrap_or_else(|| "(no behavioral evaluation this turn)".to_string()),
            intent: state.scratch.intent.unwrap_or(Intent::Answer),
            message: state.scratch.candidate_message.clone(),
            hallucination_detected: state.scratch.hallucination_detected,
            correction: technical.and_then(|j| j.correction.clone()),
            tuning: self.tuning.clone(),
        };

        let judgment = match provider.decide(request).await {
            Ok(judgment) => judgment,
            Err(err) => {
                warn!(error = %err.brief(), "Strategic decision failed, continuing current topic");
                return StrategicPatch::continue_only(
                    "Ask the next question on the current topic.",
                    format!("Strategic decision failed ({}), continuing", err.brief()),
                );
            }
        };

        let topic_score = technical.map(|j| j.score).or(judgment.topic_score);
        let questions_after = state
            .plan
            .current_topic()
            .map_or(0, |t| t.questions_asked + 1);
        let cap_reached = questions_after >= TOPIC_QUESTION_CAP;
        let advance = judgment.next_action == NextAction::NextTopic || cap_reached;

        let mut end_reason = None;
        if judgment.next_action == NextAction::Finish {
            end_reason = Some(EndReason::Finish);
        } else if state.plan.is_exhausted() || (advance && state.plan.next_pending().is_none()) {
            end_reason = Some(EndReason::PlanExhausted);
        } else if state.turn_id >= self.max_turns {
            end_reason = Some(EndReason::TurnLimit);
        }

        // Fabrications override whatever the judgment wanted to ask next:
        // the candidate must be challenged, without being handed the answer.
        let (directive, hallucination) = if state.scratch.hallucination_detected {
            let correction_hint = technical
                .and_then(|j| j.correction.as_deref())
                .map(|c| format!(" (internally noted: {c})"))
                .unwrap_or_default();
            (
                format!(
                    "The answer contains a fabrication{correction_hint}. Ask the candidate \
                     to elaborate on the claim they just made. Do not explain what is wrong."
                ),
                true,
            )
        } else {
            (judgment.directive, false)
        };

        let protocol = [judgment.protocol, self.recommended_protocol(state)]
            .into_iter()
            .find(|p| *p != Protocol::Standard);

        if cap_reached && judgment.next_action == NextAction::Continue {
            debug!("Question cap reached, forcing topic transition");
        }

        StrategicPatch {
            topic_score,
            count_question: true,
            advance_topic: advance,
            start_plan: false,
            protocol,
            hallucination,
            off_topic: false,
            contradiction: technical.is_some_and(|j| j.contradiction_detected),
            directive,
            end_reason,
            thought: judgment.rationale,
        }
    }

    fn recommended_protocol(&self, state: &SessionState) -> Protocol {
        state
            .scratch
            .behavioral
            .as_ref()
            .map_or(Protocol::Standard, |j| j.recommended_protocol)
    }

    fn current_topic_label(&self, state: &SessionState) -> String {
        state
            .plan
            .current_topic()
            .map(|t| t.label.clone())
            .unwrap_or_else(|| "General questions".to_string())
    }
}
