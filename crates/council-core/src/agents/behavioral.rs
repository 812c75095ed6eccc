//! Behavioral evaluation of answer turns.

use crate::patch::BehavioralPatch;
use crate::state::SessionState;
use council_proto::{BehavioralRequest, JudgmentProvider, ModelTuning};
use tracing::warn;

/// Assesses manner of communication, blind to technical content. Runs
/// concurrently with the technical evaluator on answer turns.
#[derive(Debug, Clone)]
pub struct BehavioralEvaluator {
    tuning: ModelTuning,
}

impl BehavioralEvaluator {
    pub fn new(tuning: ModelTuning) -> Self {
        Self { tuning }
    }

    pub async fn run(
        &self,
        state: &SessionState,
        provider: &dyn JudgmentProvider,
    ) -> BehavioralPatch {
        let request = BehavioralRequest {
            message: state.scratch.candidate_message.clone(),
            tuning: self.tuning.clone(),
        };

        match provider.assess_behavioral(request).await {
            Ok(judgment) => {
                let thought = format!(
                    "demeanor={:?} stress={:?} clarity={} honesty={}: {}",
                    judgment.demeanor,
                    judgment.stress,
                    judgment.clarity,
                    judgment.honesty,
                    judgment.observation
                );
                BehavioralPatch {
                    judgment: Some(judgment),
                    thought,
                }
            }
            Err(err) => {
                warn!(error = %err.brief(), "Behavioral evaluation failed");
                BehavioralPatch {
                    judgment: None,
                    thought: format!("Behavioral evaluation failed ({})", err.brief()),
                }
            }
        }
    }
}
