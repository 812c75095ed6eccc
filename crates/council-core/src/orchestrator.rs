//! The session orchestrator: one workflow invocation per candidate message.

use crate::agents::{
    BehavioralEvaluator, DialogueRenderer, IntentClassifier, Reporter, StrategicCoordinator,
    TechnicalEvaluator,
};
use crate::config::CouncilConfig;
use crate::patch::{StatePatch, StrategicPatch};
use crate::state::{CandidateMetadata, EndReason, SessionState, TurnRecord};
use council_proto::{Intent, JudgmentProvider};
use std::sync::Arc;
use tracing::{info, warn};

/// Owns the session state and runs the agent workflow.
///
/// Each call to [`process_message`](Self::process_message) is one workflow
/// invocation: classify, evaluate (both evaluators concurrently, on answer
/// turns), coordinate, then render the response or the final report. Exactly
/// one response comes back per invocation, and after the report the session
/// accepts no further messages.
pub struct SessionOrchestrator {
    provider: Arc<dyn JudgmentProvider>,
    classifier: IntentClassifier,
    technical: TechnicalEvaluator,
    behavioral: BehavioralEvaluator,
    strategist: StrategicCoordinator,
    renderer: DialogueRenderer,
    reporter: Reporter,
    state: SessionState,
    active: bool,
}

impl SessionOrchestrator {
    /// Generates the interview plan and runs the opening invocation. The
    /// greeting is available from [`last_response`](Self::last_response).
    pub async fn start(
        config: &CouncilConfig,
        provider: Arc<dyn JudgmentProvider>,
        metadata: CandidateMetadata,
    ) -> Self {
        let strategist = StrategicCoordinator::new(
            config.tuning.strategist_tuning(),
            config.session.max_turns,
        );
        let plan = strategist.create_plan(&metadata, provider.as_ref()).await;
        info!(candidate = %metadata.name, topics = plan.len(), "Session starting");

        let mut state = SessionState::new(metadata);
        state.plan = plan;

        let mut session = Self {
            classifier: IntentClassifier::new(config.tuning.classifier_tuning()),
            technical: TechnicalEvaluator::new(config.tuning.technical_tuning()),
            behavioral: BehavioralEvaluator::new(config.tuning.behavioral_tuning()),
            strategist,
            renderer: DialogueRenderer::new(
                config.tuning.renderer_tuning(),
                config.session.history_window,
            ),
            reporter: Reporter::new(config.tuning.reporter_tuning()),
            provider,
            state,
            active: true,
        };

        // Opening invocation: no candidate input, no turn record.
        session.state.begin_turn("");
        let opening = session
            .strategist
            .run(&session.state, session.provider.as_ref())
            .await;
        session.state.apply(StatePatch::Strategic(opening));
        let greeting = session
            .renderer
            .run(&session.state, session.provider.as_ref())
            .await;
        session.state.apply(StatePatch::Phrasing(greeting));
        session
    }

    /// Runs one workflow invocation over a candidate message and returns the
    /// single response, which is the final report on the terminating turn.
    pub async fn process_message(&mut self, message: &str) -> String {
        if !self.active {
            warn!("Message received after session end, ignoring");
            return self.state.last_response.clone();
        }

        let record_id = self.state.turn_id;
        let question = self.state.last_response.clone();
        self.state.begin_turn(message);

        let classification = self
            .classifier
            .run(&self.state, self.provider.as_ref())
            .await;
        let intent = classification.intent;
        self.state.apply(StatePatch::Classification(classification));

        if intent == Intent::Answer {
            // Both evaluators read the same snapshot; neither sees the
            // other's output, and neither failure cancels the other.
            let (technical, behavioral) = tokio::join!(
                self.technical.run(&self.state, self.provider.as_ref()),
                self.behavioral.run(&self.state, self.provider.as_ref()),
            );
            self.state.apply(StatePatch::Technical(technical));
            self.state.apply(StatePatch::Behavioral(behavioral));
        }

        if intent == Intent::Stop {
            self.state.apply(StatePatch::Strategic(StrategicPatch {
                end_reason: Some(EndReason::StopRequested),
                thought: "Candidate asked to end the interview".to_string(),
                ..StrategicPatch::default()
            }));
        } else {
            let strategic = self
                .strategist
                .run(&self.state, self.provider.as_ref())
                .await;
            self.state.apply(StatePatch::Strategic(strategic));
        }

        if self.state.should_end {
            let report = self.reporter.run(&self.state, self.provider.as_ref()).await;
            self.state.apply(StatePatch::Report(report));
        } else {
            let phrasing = self.renderer.run(&self.state, self.provider.as_ref()).await;
            self.state.apply(StatePatch::Phrasing(phrasing));
        }

        self.state.record_turn(record_id, &question);
        if self.state.should_end {
            info!(
                turns = self.state.turns.len(),
                reason = self
                    .state
                    .scratch
                    .end_reason
                    .map_or("report", |r| r.as_str()),
                "Session ended"
            );
            self.active = false;
        }
        self.state.last_response.clone()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn last_response(&self) -> &str {
        &self.state.last_response
    }

    pub fn last_turn_record(&self) -> Option<&TurnRecord> {
        self.state.turns.last()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }
}
