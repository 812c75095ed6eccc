//! Dialogue rendering: the only agent whose output the candidate sees.

use crate::patch::PhrasingPatch;
use crate::state::SessionState;
use council_proto::{
    Difficulty, Intent, JudgmentProvider, ModelTuning, PhrasingFlags, PhrasingRequest,
};
use tracing::warn;

/// Turns the strategic directive into one natural interviewer message.
///
/// A rendering failure degrades to a static filler line so the candidate
/// always receives a response.
#[derive(Debug, Clone)]
pub struct DialogueRenderer {
    tuning: ModelTuning,
    history_window: usize,
}

const HISTORY_CHAR_LIMIT: usize = 200;
const FILLER: &str = "Alright, let's move on to the next question.";

impl DialogueRenderer {
    pub fn new(tuning: ModelTuning, history_window: usize) -> Self {
        Self {
            tuning,
            history_window,
        }
    }

    pub async fn run(&self, state: &SessionState, provider: &dyn JudgmentProvider) -> PhrasingPatch {
        let intent = state.scratch.intent.unwrap_or(Intent::Answer);
        let (topic, difficulty) = match state.plan.current_topic() {
            Some(topic) => (topic.label.clone(), topic.difficulty),
            None => ("General questions".to_string(), Difficulty::Medium),
        };

        let request = PhrasingRequest {
            name: state.metadata.name.clone(),
            role: state.metadata.role.clone(),
            grade: state.metadata.target_grade,
            experience: state.metadata.experience.clone(),
            turn_id: state.turn_id,
            directive: state.scratch.directive.clone(),
            protocol: state.behavioral.protocol,
            topic,
            difficulty,
            intent,
            message: state.scratch.candidate_message.clone(),
            history: state.recent_history(self.history_window, HISTORY_CHAR_LIMIT),
            flags: PhrasingFlags {
                opening: state.turn_id == 0,
                hallucination_challenge: state.scratch.hallucination_detected,
                topic_transition: state.scratch.topic_advanced,
                offtopic_redirect: intent == Intent::OffTopic,
                meta_question: intent == Intent::Question,
            },
            tuning: self.tuning.clone(),
        };

        match provider.phrase(request).await {
            Ok(judgment) => PhrasingPatch {
                message: clamp_questions(judgment.message),
                thought: judgment.rationale,
            },
            Err(err) => {
                warn!(error = %err.brief(), "Dialogue rendering failed, using filler");
                PhrasingPatch {
                    message: FILLER.to_string(),
                    thought: format!("Rendering failed ({}), sent filler line", err.brief()),
                }
            }
        }
    }
}

/// Cuts a rendered message after its second question mark. The candidate
/// gets one question per turn; a clarifying clause may carry a second, but
/// anything beyond that means the model bundled several questions.
fn clamp_questions(message: String) -> String {
    let mut question_ends = message
        .char_indices()
        .filter(|(_, c)| *c == '?')
        .map(|(idx, c)| idx + c.len_utf8());
    match question_ends.nth(1) {
        Some(end) if end < message.len() => {
            warn!("Rendered message bundled multiple questions, truncating");
            let mut message = message;
            message.truncate(end);
            message
        }
        _ => message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::CandidateMetadata;
    use crate::testing::ScriptedProvider;
    use council_proto::Grade;

    fn state() -> SessionState {
        let mut s = SessionState::new(CandidateMetadata {
            name: "Alex".to_string(),
            role: "Backend Developer".to_string(),
            target_grade: Grade::Middle,
            experience: "Django".to_string(),
        });
        s.begin_turn("an answer");
        s.scratch.directive = "Ask about transaction isolation levels".to_string();
        s
    }

    #[tokio::test]
    async fn test_renders_scripted_message() {
        let provider = ScriptedProvider::new();
        provider.push_phrase("What isolation level would you pick here, and why?");
        let patch = DialogueRenderer::new(ModelTuning::default(), 6)
            .run(&state(), &provider)
            .await;
        assert!(patch.message.contains("isolation level"));
    }

    #[tokio::test]
    async fn test_bundled_questions_are_truncated() {
        let provider = ScriptedProvider::new();
        provider.push_phrase(
            "What is an index? How is it stored? And when would you avoid one?",
        );
        let patch = DialogueRenderer::new(ModelTuning::default(), 6)
            .run(&state(), &provider)
            .await;
        assert_eq!(patch.message.matches('?').count(), 2);
        assert!(patch.message.ends_with('?'));
    }

    #[test]
    fn test_two_questions_pass_unchanged() {
        let message = "Quick check: ready? What is an index?".to_string();
        assert_eq!(clamp_questions(message.clone()), message);
    }

    #[tokio::test]
    async fn test_failure_degrades_to_filler() {
        let provider = ScriptedProvider::new();
        provider.fail_phrase("over capacity");
        let patch = DialogueRenderer::new(ModelTuning::default(), 6)
            .run(&state(), &provider)
            .await;
        assert_eq!(patch.message, FILLER);
    }
}
