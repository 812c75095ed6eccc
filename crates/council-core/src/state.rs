//! The single mutable session state.
//!
//! The state aggregate is owned exclusively by the session orchestrator.
//! Agents receive it as an immutable borrow and return a tagged patch; the
//! only mutation path is [`SessionState::apply`], so illegal or overlapping
//! writes cannot happen by construction.

use crate::patch::StatePatch;
use crate::plan::InterviewPlan;
use crate::report::FinalReport;
use council_proto::{
    BehavioralJudgment, Demeanor, Grade, Intent, Protocol, StressLevel, TechnicalJudgment,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Phrases that mark an evaluated answer as not substantively addressing
/// the question. Checked only on turns where a score was recorded, so a
/// meta-question like "can you repeat" on a fast-path turn never counts.
const NON_ANSWER_MARKERS: &[&str] = &[
    "i don't know",
    "i dont know",
    "don't know",
    "no idea",
    "not sure",
    "can you repeat",
    "never heard",
    "skip this",
    "next question",
];

fn is_non_answer(message: &str) -> bool {
    let lower = message.to_lowercase();
    NON_ANSWER_MARKERS.iter().any(|m| lower.contains(m))
}

/// Candidate data collected at session start; immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateMetadata {
    pub name: String,
    pub role: String,
    pub target_grade: Grade,
    pub experience: String,
}

/// Who said a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    Candidate,
    Interviewer,
}

/// One entry in the append-only message history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

/// Running psychological context for the candidate. Demeanor and stress are
/// written by the behavioral evaluator's patch; protocol and the counters by
/// the strategic coordinator's.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BehavioralContext {
    pub demeanor: Demeanor,
    pub protocol: Protocol,
    pub stress: StressLevel,
    pub hallucination_count: u32,
    pub off_topic_count: u32,
    pub contradiction_count: u32,
}

/// One completed candidate turn, immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    pub turn_id: u32,
    /// The interviewer message the candidate was responding to.
    pub agent_visible_message: String,
    /// The candidate's raw message.
    pub user_message: String,
    /// Concatenated tagged thoughts of every agent that acted this turn.
    pub internal_thoughts: String,
}

/// Why the session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    /// The strategic judgment said finish.
    Finish,
    /// No pending topic remains.
    PlanExhausted,
    /// The configured turn limit was reached.
    TurnLimit,
    /// The candidate asked to stop.
    StopRequested,
}

impl EndReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            EndReason::Finish => "finish",
            EndReason::PlanExhausted => "plan_exhausted",
            EndReason::TurnLimit => "turn_limit",
            EndReason::StopRequested => "stop_requested",
        }
    }
}

/// Which agent produced a thought, for the rationale trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentRole {
    Classifier,
    Technical,
    Behavioral,
    Strategist,
    Renderer,
    Reporter,
}

impl AgentRole {
    pub fn tag(&self) -> &'static str {
        match self {
            AgentRole::Classifier => "classifier",
            AgentRole::Technical => "technical",
            AgentRole::Behavioral => "behavioral",
            AgentRole::Strategist => "strategist",
            AgentRole::Renderer => "renderer",
            AgentRole::Reporter => "reporter",
        }
    }
}

/// Per-turn scratch fields, overwritten at the start of every turn.
#[derive(Debug, Clone, Default)]
pub struct TurnScratch {
    pub candidate_message: String,
    pub intent: Option<Intent>,
    pub technical: Option<TechnicalJudgment>,
    pub behavioral: Option<BehavioralJudgment>,
    pub directive: String,
    pub hallucination_detected: bool,
    pub topic_advanced: bool,
    pub end_reason: Option<EndReason>,
    thoughts: Vec<(AgentRole, String)>,
}

impl TurnScratch {
    fn reset(&mut self, candidate_message: &str) {
        *self = TurnScratch {
            candidate_message: candidate_message.to_string(),
            ..TurnScratch::default()
        };
    }

    /// Thoughts of every agent that acted this turn, tagged and joined.
    pub fn joined_thoughts(&self) -> String {
        self.thoughts
            .iter()
            .map(|(role, text)| format!("[{}] {}", role.tag(), text))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn thoughts(&self) -> &[(AgentRole, String)] {
        &self.thoughts
    }
}

/// The session aggregate: candidate metadata, plan, behavioral context,
/// histories, and per-turn scratch. Created at session start, destroyed with
/// the session.
#[derive(Debug)]
pub struct SessionState {
    pub metadata: CandidateMetadata,
    pub plan: InterviewPlan,
    pub behavioral: BehavioralContext,
    /// Append-only message history.
    pub messages: Vec<Message>,
    /// Append-only turn log, one record per completed candidate turn.
    pub turns: Vec<TurnRecord>,
    pub scratch: TurnScratch,
    /// Strictly increasing; 0 means no candidate input yet.
    pub turn_id: u32,
    /// Set exactly once, never unset.
    pub should_end: bool,
    /// Set exactly once by the report patch.
    pub report: Option<FinalReport>,
    /// Answer turns where a technical evaluation recorded a score.
    pub answered_turns: u32,
    /// Subset of `answered_turns` whose candidate message did not
    /// substantively address the question.
    pub unanswered_turns: u32,
    /// The message most recently shown to the candidate.
    pub last_response: String,
}

impl SessionState {
    pub fn new(metadata: CandidateMetadata) -> Self {
        Self {
            metadata,
            plan: InterviewPlan::empty(),
            behavioral: BehavioralContext::default(),
            messages: Vec::new(),
            turns: Vec::new(),
            scratch: TurnScratch::default(),
            turn_id: 0,
            should_end: false,
            report: None,
            answered_turns: 0,
            unanswered_turns: 0,
            last_response: String::new(),
        }
    }

    /// Clears per-turn scratch and stores the incoming candidate message.
    pub fn begin_turn(&mut self, candidate_message: &str) {
        self.scratch.reset(candidate_message);
    }

    /// The most recent interviewer message, if any.
    pub fn last_interviewer_message(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == MessageRole::Interviewer)
            .map(|m| m.content.as_str())
    }

    /// The last `window` history entries, oldest first, each truncated to
    /// `max_chars` characters.
    pub fn recent_history(&self, window: usize, max_chars: usize) -> Vec<String> {
        let start = self.messages.len().saturating_sub(window);
        self.messages[start..]
            .iter()
            .map(|m| {
                let speaker = match m.role {
                    MessageRole::Candidate => "Candidate",
                    MessageRole::Interviewer => "Interviewer",
                };
                let content: String = if m.content.chars().count() > max_chars {
                    let truncated: String = m.content.chars().take(max_chars).collect();
                    format!("{truncated}...")
                } else {
                    m.content.clone()
                };
                format!("{speaker}: {content}")
            })
            .collect()
    }

    pub fn push_thought(&mut self, role: AgentRole, thought: impl Into<String>) {
        self.scratch.thoughts.push((role, thought.into()));
    }

    /// Appends the turn record for the workflow invocation that just
    /// completed. `turn_id` is the counter value when the candidate message
    /// arrived; `question` is the interviewer message it answered.
    pub fn record_turn(&mut self, turn_id: u32, question: &str) {
        self.turns.push(TurnRecord {
            turn_id,
            agent_visible_message: question.to_string(),
            user_message: self.scratch.candidate_message.clone(),
            internal_thoughts: self.scratch.joined_thoughts(),
        });
    }

    /// Applies one tagged patch. This is the sole mutation path for agent
    /// output; the match is exhaustive so a new agent schema cannot be
    /// silently ignored.
    pub fn apply(&mut self, patch: StatePatch) {
        match patch {
            StatePatch::Classification(p) => {
                self.scratch.intent = Some(p.intent);
                self.push_thought(AgentRole::Classifier, p.thought);
            }
            StatePatch::Technical(p) => {
                if let Some(judgment) = p.judgment {
                    self.scratch.hallucination_detected = judgment.is_hallucination();
                    self.scratch.technical = Some(judgment);
                }
                self.push_thought(AgentRole::Technical, p.thought);
            }
            StatePatch::Behavioral(p) => {
                if let Some(judgment) = p.judgment {
                    self.behavioral.demeanor = judgment.demeanor;
                    self.behavioral.stress = judgment.stress;
                    self.scratch.behavioral = Some(judgment);
                }
                self.push_thought(AgentRole::Behavioral, p.thought);
            }
            StatePatch::Strategic(p) => {
                if p.start_plan {
                    self.plan.start();
                }
                if let Some(score) = p.topic_score {
                    self.plan.record_score(score);
                    self.answered_turns += 1;
                    if is_non_answer(&self.scratch.candidate_message) {
                        self.unanswered_turns += 1;
                    }
                }
                if p.count_question {
                    self.plan.note_question();
                }
                if p.advance_topic {
                    self.plan.advance();
                    self.scratch.topic_advanced = true;
                }
                if p.hallucination {
                    self.behavioral.hallucination_count += 1;
                }
                if p.off_topic {
                    self.behavioral.off_topic_count += 1;
                }
                if p.contradiction {
                    self.behavioral.contradiction_count += 1;
                }
                if let Some(protocol) = p.protocol {
                    // Standard never overwrites an escalated protocol.
                    if protocol != Protocol::Standard {
                        self.behavioral.protocol = protocol;
                    }
                }
                self.scratch.directive = p.directive;
                if let Some(reason) = p.end_reason {
                    debug!(reason = reason.as_str(), "Session termination flagged");
                    self.scratch.end_reason = Some(reason);
                    self.should_end = true;
                }
                self.push_thought(AgentRole::Strategist, p.thought);
            }
            StatePatch::Phrasing(p) => {
                if !self.scratch.candidate_message.is_empty() {
                    self.messages.push(Message {
                        role: MessageRole::Candidate,
                        content: self.scratch.candidate_message.clone(),
                    });
                }
                self.messages.push(Message {
                    role: MessageRole::Interviewer,
                    content: p.message.clone(),
                });
                self.last_response = p.message;
                self.turn_id += 1;
                self.push_thought(AgentRole::Renderer, p.thought);
            }
            StatePatch::Report(p) => {
                if self.report.is_none() {
                    self.last_response = p.report.render();
                    self.report = Some(p.report);
                }
                self.should_end = true;
                self.turn_id += 1;
                self.push_thought(AgentRole::Reporter, p.thought);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patch::{ClassificationPatch, PhrasingPatch, StrategicPatch, TechnicalPatch};
    use council_proto::{Accuracy, Depth};

    fn state() -> SessionState {
        SessionState::new(CandidateMetadata {
            name: "Alex".to_string(),
            role: "Backend Developer".to_string(),
            target_grade: Grade::Middle,
            experience: "Django, SQL".to_string(),
        })
    }

    fn hallucinated_judgment() -> TechnicalJudgment {
        TechnicalJudgment {
            score: 1,
            accuracy: Accuracy::Hallucination,
            depth: Depth::Shallow,
            issues: vec![],
            correction: Some("No such release exists".to_string()),
            contradiction_detected: false,
            fictional_term_detected: false,
            rationale: "fabricated feature".to_string(),
        }
    }

    #[test]
    fn test_phrasing_patch_appends_history_and_advances_turn() {
        let mut s = state();
        s.begin_turn("my answer");
        s.apply(StatePatch::Phrasing(PhrasingPatch {
            message: "Next question".to_string(),
            thought: "moving on".to_string(),
        }));

        assert_eq!(s.turn_id, 1);
        assert_eq!(s.messages.len(), 2);
        assert_eq!(s.messages[0].role, MessageRole::Candidate);
        assert_eq!(s.messages[1].role, MessageRole::Interviewer);
        assert_eq!(s.last_response, "Next question");
    }

    #[test]
    fn test_phrasing_patch_skips_empty_candidate_message() {
        let mut s = state();
        s.begin_turn("");
        s.apply(StatePatch::Phrasing(PhrasingPatch {
            message: "Welcome".to_string(),
            thought: String::new(),
        }));
        assert_eq!(s.messages.len(), 1);
        assert_eq!(s.messages[0].role, MessageRole::Interviewer);
    }

    #[test]
    fn test_technical_patch_sets_hallucination_flag() {
        let mut s = state();
        s.begin_turn("Python 4.0 added neural bindings");
        s.apply(StatePatch::Technical(TechnicalPatch {
            judgment: Some(hallucinated_judgment()),
            thought: "fabrication".to_string(),
        }));
        assert!(s.scratch.hallucination_detected);
    }

    #[test]
    fn test_strategic_patch_standard_protocol_never_overwrites() {
        let mut s = state();
        s.behavioral.protocol = Protocol::Rescue;
        s.apply(StatePatch::Strategic(StrategicPatch {
            protocol: Some(Protocol::Standard),
            ..StrategicPatch::default()
        }));
        assert_eq!(s.behavioral.protocol, Protocol::Rescue);

        s.apply(StatePatch::Strategic(StrategicPatch {
            protocol: Some(Protocol::Speedrun),
            ..StrategicPatch::default()
        }));
        assert_eq!(s.behavioral.protocol, Protocol::Speedrun);
    }

    #[test]
    fn test_strategic_patch_increments_counters() {
        let mut s = state();
        s.apply(StatePatch::Strategic(StrategicPatch {
            hallucination: true,
            contradiction: true,
            ..StrategicPatch::default()
        }));
        assert_eq!(s.behavioral.hallucination_count, 1);
        assert_eq!(s.behavioral.contradiction_count, 1);
        assert_eq!(s.behavioral.off_topic_count, 0);
    }

    #[test]
    fn test_scored_non_answer_counts_as_unanswered() {
        let mut s = state();
        s.begin_turn("I don't know, never used it");
        s.apply(StatePatch::Strategic(StrategicPatch {
            topic_score: Some(1),
            ..StrategicPatch::default()
        }));
        assert_eq!(s.answered_turns, 1);
        assert_eq!(s.unanswered_turns, 1);
    }

    #[test]
    fn test_unscored_meta_turn_touches_neither_counter() {
        let mut s = state();
        s.begin_turn("Can you repeat the question?");
        s.apply(StatePatch::Strategic(StrategicPatch::default()));
        assert_eq!(s.answered_turns, 0);
        assert_eq!(s.unanswered_turns, 0);
    }

    #[test]
    fn test_scored_substantive_answer_stays_substantive() {
        let mut s = state();
        s.begin_turn("A B-tree index keeps lookups logarithmic");
        s.apply(StatePatch::Strategic(StrategicPatch {
            topic_score: Some(8),
            ..StrategicPatch::default()
        }));
        assert_eq!(s.answered_turns, 1);
        assert_eq!(s.unanswered_turns, 0);
    }

    #[test]
    fn test_joined_thoughts_are_tagged_in_order() {
        let mut s = state();
        s.begin_turn("hello");
        s.apply(StatePatch::Classification(ClassificationPatch {
            intent: Intent::Answer,
            thought: "an answer".to_string(),
        }));
        s.push_thought(AgentRole::Strategist, "continue");

        let joined = s.scratch.joined_thoughts();
        assert_eq!(joined, "[classifier] an answer\n[strategist] continue");
    }

    #[test]
    fn test_recent_history_truncates_and_windows() {
        let mut s = state();
        for i in 0..10 {
            s.messages.push(Message {
                role: MessageRole::Interviewer,
                content: format!("q{i} {}", "x".repeat(300)),
            });
        }
        let history = s.recent_history(6, 200);
        assert_eq!(history.len(), 6);
        assert!(history[0].starts_with("Interviewer: q4"));
        assert!(history[5].ends_with("..."));
    }

    #[test]
    fn test_begin_turn_resets_scratch() {
        let mut s = state();
        s.begin_turn("first");
        s.push_thought(AgentRole::Classifier, "thought");
        s.scratch.hallucination_detected = true;

        s.begin_turn("second");
        assert_eq!(s.scratch.candidate_message, "second");
        assert!(s.scratch.thoughts().is_empty());
        assert!(!s.scratch.hallucination_detected);
    }
}
