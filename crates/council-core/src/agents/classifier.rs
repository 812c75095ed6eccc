//! Intent classification, the first step of every turn.

use crate::patch::ClassificationPatch;
use crate::state::SessionState;
use council_proto::{ClassificationRequest, Intent, JudgmentProvider, ModelTuning};
use tracing::{debug, warn};

/// Classifies each candidate message into exactly one intent.
///
/// Fails open: when classification errors out, the turn proceeds as an
/// answer so the candidate is never blocked on an internal failure.
#[derive(Debug, Clone)]
pub struct IntentClassifier {
    tuning: ModelTuning,
}

impl IntentClassifier {
    pub fn new(tuning: ModelTuning) -> Self {
        Self { tuning }
    }

    pub async fn run(
        &self,
        state: &SessionState,
        provider: &dyn JudgmentProvider,
    ) -> ClassificationPatch {
        // The opening turn carries no real candidate input to classify.
        if state.turn_id == 0 || state.scratch.candidate_message.trim().is_empty() {
            return ClassificationPatch {
                intent: Intent::Answer,
                thought: "Opening turn, no candidate input to classify".to_string(),
            };
        }

        let request = ClassificationRequest {
            question: state
                .last_interviewer_message()
                .unwrap_or("(interview start)")
                .to_string(),
            message: state.scratch.candidate_message.clone(),
            tuning: self.tuning.clone(),
        };

        match provider.classify(request).await {
            Ok(judgment) => {
                debug!(intent = %judgment.intent, "Message classified");
                ClassificationPatch {
                    intent: judgment.intent,
                    thought: judgment.rationale,
                }
            }
            Err(err) => {
                warn!(error = %err.brief(), "Classification failed, treating as answer");
                ClassificationPatch {
                    intent: Intent::Answer,
                    thought: format!("Classification failed ({}), assuming answer", err.brief()),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::CandidateMetadata;
    use crate::testing::ScriptedProvider;
    use council_proto::Grade;

    fn state() -> SessionState {
        SessionState::new(CandidateMetadata {
            name: "Alex".to_string(),
            role: "Backend Developer".to_string(),
            target_grade: Grade::Middle,
            experience: "Django".to_string(),
        })
    }

    #[tokio::test]
    async fn test_opening_turn_skips_provider() {
        let provider = ScriptedProvider::new();
        let mut s = state();
        s.begin_turn("");
        let patch = IntentClassifier::new(ModelTuning::default())
            .run(&s, &provider)
            .await;
        assert_eq!(patch.intent, Intent::Answer);
        assert_eq!(provider.classify_calls(), 0);
    }

    #[tokio::test]
    async fn test_failure_falls_back_to_answer() {
        let provider = ScriptedProvider::new();
        provider.fail_classify("boom");
        let mut s = state();
        s.turn_id = 3;
        s.begin_turn("I would use an index here");
        let patch = IntentClassifier::new(ModelTuning::default())
            .run(&s, &provider)
            .await;
        assert_eq!(patch.intent, Intent::Answer);
        assert!(patch.thought.contains("Classification failed"));
    }

    #[tokio::test]
    async fn test_scripted_intent_is_forwarded() {
        let provider = ScriptedProvider::new();
        provider.push_classification(Intent::Stop, "asked to stop");
        let mut s = state();
        s.turn_id = 2;
        s.begin_turn("let's stop here");
        let patch = IntentClassifier::new(ModelTuning::default())
            .run(&s, &provider)
            .await;
        assert_eq!(patch.intent, Intent::Stop);
    }
}
