//! Technical evaluation of answer turns.

use crate::patch::TechnicalPatch;
use crate::state::SessionState;
use council_proto::{Difficulty, JudgmentProvider, ModelTuning, TechnicalRequest};
use tracing::warn;

/// Scores answer correctness and depth, and flags fabrications.
#[derive(Debug, Clone)]
pub struct TechnicalEvaluator {
    tuning: ModelTuning,
}

impl TechnicalEvaluator {
    pub fn new(tuning: ModelTuning) -> Self {
        Self { tuning }
    }

    pub async fn run(
        &self,
        state: &SessionState,
        provider: &dyn JudgmentProvider,
    ) -> TechnicalPatch {
        let (topic, difficulty) = match state.plan.current_topic() {
            Some(topic) => (topic.label.clone(), topic.difficulty),
            None => ("General questions".to_string(), Difficulty::Medium),
        };

        let request = TechnicalRequest {
            topic,
            difficulty,
            question: state
                .last_interviewer_message()
                .unwrap_or("(interview start)")
                .to_string(),
            answer: state.scratch.candidate_message.clone(),
            tuning: self.tuning.clone(),
        };

        match provider.assess_technical(request).await {
            Ok(judgment) => {
                let judgment = judgment.normalized();
                let mut thought =
                    format!("[{}/10] {}", judgment.score, judgment.rationale);
                if !judgment.issues.is_empty() {
                    thought.push_str(&format!("; issues: {}", judgment.issues.join("; ")));
                }
                if judgment.is_hallucination() {
                    thought.push_str("; HALLUCINATION detected");
                }
                if judgment.fictional_term_detected {
                    thought.push_str("; FICTIONAL TERM used");
                }
                if judgment.contradiction_detected {
                    thought.push_str("; CONTRADICTION with earlier statements");
                }
                TechnicalPatch {
                    judgment: Some(judgment),
                    thought,
                }
            }
            Err(err) => {
                warn!(error = %err.brief(), "Technical evaluation failed");
                TechnicalPatch {
                    judgment: None,
                    thought: format!("Technical evaluation failed ({})", err.brief()),
                }
            }
        }
    }
}
