//! Final report generation.

use crate::patch::ReportPatch;
use crate::report::{FinalReport, SkillAssessment, SoftSkills};
use crate::state::SessionState;
use council_proto::{
    JudgmentProvider, ModelTuning, Recommendation, ReportJudgment, ReportRequest, ReportStats,
};
use tracing::{info, warn};

/// Minimum roadmap length; padded from knowledge gaps when the provider
/// returns fewer items.
const MIN_ROADMAP_ITEMS: usize = 3;

/// Produces the hiring verdict once, at session end.
///
/// The provider writes the prose; the verdict constraints are enforced here.
/// Confidence is bounded by the number of substantive answers, and a session
/// with no substantive answers or any confirmed fabrication cannot end in a
/// hire, whatever the candidate claimed about themselves.
#[derive(Debug, Clone)]
pub struct Reporter {
    tuning: ModelTuning,
}

impl Reporter {
    pub fn new(tuning: ModelTuning) -> Self {
        Self { tuning }
    }

    pub async fn run(&self, state: &SessionState, provider: &dyn JudgmentProvider) -> ReportPatch {
        let stats = self.stats(state);
        let request = ReportRequest {
            name: state.metadata.name.clone(),
            role: state.metadata.role.clone(),
            grade: state.metadata.target_grade,
            experience: state.metadata.experience.clone(),
            dialogue: self.dialogue(state),
            analysis: self.analysis(state),
            stats,
            critical_issues: self.critical_issues(state).join("\n"),
            topics_summary: state.plan.status_lines(),
            tuning: self.tuning.clone(),
        };

        match provider.report(request).await {
            Ok(judgment) => {
                let report = self.enforce(state, stats, judgment);
                info!(
                    recommendation = report
                        .recommendation
                        .map_or("unavailable", |r| r.as_str()),
                    confidence = report.confidence,
                    "Final report produced"
                );
                ReportPatch {
                    thought: format!(
                        "Verdict over {} turns, {} substantive answers",
                        stats.total_turns, stats.substantive_answers
                    ),
                    report,
                }
            }
            Err(err) => {
                warn!(error = %err.brief(), "Report generation failed");
                ReportPatch {
                    report: FinalReport::degraded(format!(
                        "Report generation failed ({}). The session log retains the full \
                         dialogue and analysis trail.",
                        err.brief()
                    )),
                    thought: format!("Report generation failed ({})", err.brief()),
                }
            }
        }
    }

    /// Applies the verdict constraints to a raw provider judgment.
    fn enforce(
        &self,
        state: &SessionState,
        stats: ReportStats,
        judgment: ReportJudgment,
    ) -> FinalReport {
        let mut recommendation = judgment.recommendation;
        let mut confidence = judgment.confidence.min(100);

        // Confidence is bounded by evidence, not by prose.
        confidence = match stats.substantive_answers {
            0 => confidence.min(50),
            1 | 2 => confidence.min(80),
            _ => confidence.min(95),
        };
        if stats.substantive_answers == 0 || stats.hallucinations > 0 {
            recommendation = Recommendation::NoHire;
        }

        let mut confirmed_skills = Vec::new();
        let mut knowledge_gaps = Vec::new();
        for topic in state.plan.topics() {
            if let Some(score) = topic.score {
                let assessment = SkillAssessment {
                    topic: topic.label.clone(),
                    score,
                };
                if score >= 7 {
                    confirmed_skills.push(assessment);
                } else {
                    knowledge_gaps.push(assessment);
                }
            }
        }

        let mut roadmap = judgment.roadmap;
        for gap in &knowledge_gaps {
            if roadmap.len() >= MIN_ROADMAP_ITEMS {
                break;
            }
            roadmap.push(format!("Strengthen fundamentals in {}", gap.topic));
        }

        FinalReport {
            assessed_grade: Some(judgment.assessed_grade),
            recommendation: Some(recommendation),
            confidence,
            reasoning: judgment.reasoning,
            critical_issues: self.critical_issues(state),
            confirmed_skills,
            knowledge_gaps,
            soft_skills: Some(SoftSkills {
                clarity: judgment.clarity.min(10),
                honesty: judgment.honesty.min(10),
                engagement: judgment.engagement.min(10),
                notes: judgment.soft_skill_notes,
            }),
            roadmap,
            resources: judgment.resources,
        }
    }

    /// Turn statistics. The terminating turn is still in scratch when the
    /// report runs (its record is appended afterwards), so it is counted
    /// here; the answered/unanswered counters are maintained at patch
    /// application time and already include it.
    fn stats(&self, state: &SessionState) -> ReportStats {
        let in_flight = u32::from(!state.scratch.candidate_message.is_empty());
        ReportStats {
            total_turns: state.turns.len() as u32 + in_flight,
            unanswered: state.unanswered_turns,
            substantive_answers: state.answered_turns.saturating_sub(state.unanswered_turns),
            hallucinations: state.behavioral.hallucination_count,
            off_topic: state.behavioral.off_topic_count,
            contradictions: state.behavioral.contradiction_count,
        }
    }

    fn dialogue(&self, state: &SessionState) -> String {
        let mut parts: Vec<String> = state
            .turns
            .iter()
            .map(|t| {
                format!(
                    "[turn {}]\nInterviewer: {}\nCandidate: {}",
                    t.turn_id, t.agent_visible_message, t.user_message
                )
            })
            .collect();
        if !state.scratch.candidate_message.is_empty() {
            parts.push(format!(
                "[turn {}]\nInterviewer: {}\nCandidate: {}",
                state.turn_id, state.last_response, state.scratch.candidate_message
            ));
        }
        parts.join("\n\n")
    }

    fn analysis(&self, state: &SessionState) -> String {
        let mut parts: Vec<String> = state
            .turns
            .iter()
            .map(|t| format!("[turn {}]\n{}", t.turn_id, t.internal_thoughts))
            .collect();
        if !state.scratch.candidate_message.is_empty() {
            parts.push(format!(
                "[turn {}]\n{}",
                state.turn_id,
                state.scratch.joined_thoughts()
            ));
        }
        parts.join("\n\n")
    }

    fn critical_issues(&self, state: &SessionState) -> Vec<String> {
        let mut issues = Vec::new();
        if state.behavioral.hallucination_count > 0 {
            issues.push(format!(
                "{} fabricated claim(s) detected during the interview",
                state.behavioral.hallucination_count
            ));
        }
        if state.behavioral.contradiction_count > 0 {
            issues.push(format!(
                "{} contradiction(s) with earlier statements",
                state.behavioral.contradiction_count
            ));
        }
        if state.behavioral.off_topic_count > 1 {
            issues.push(format!(
                "Drifted off-topic {} times",
                state.behavioral.off_topic_count
            ));
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{CandidateMetadata, TurnRecord};
    use crate::testing::{scripted_plan, scripted_report, ScriptedProvider};
    use crate::InterviewPlan;
    use council_proto::Grade;

    fn state() -> SessionState {
        SessionState::new(CandidateMetadata {
            name: "Alex".to_string(),
            role: "Backend Developer".to_string(),
            target_grade: Grade::Senior,
            experience: "10 years, Staff Engineer at a FAANG".to_string(),
        })
    }

    fn push_turn(state: &mut SessionState, turn_id: u32, message: &str) {
        state.turns.push(TurnRecord {
            turn_id,
            agent_visible_message: format!("question {turn_id}"),
            user_message: message.to_string(),
            internal_thoughts: String::new(),
        });
    }

    #[tokio::test]
    async fn test_zero_substantive_answers_forces_no_hire() {
        let provider = ScriptedProvider::new();
        let mut judgment = scripted_report();
        judgment.recommendation = Recommendation::StrongHire;
        judgment.confidence = 95;
        provider.push_report(judgment);

        let mut s = state();
        s.answered_turns = 2;
        s.unanswered_turns = 2;
        push_turn(&mut s, 1, "I don't know");
        push_turn(&mut s, 2, "no idea, sorry");

        let patch = Reporter::new(ModelTuning::default()).run(&s, &provider).await;
        let report = patch.report;
        assert_eq!(report.recommendation, Some(Recommendation::NoHire));
        assert!(report.confidence <= 50);
    }

    #[tokio::test]
    async fn test_hallucination_forces_no_hire() {
        let provider = ScriptedProvider::new();
        let mut judgment = scripted_report();
        judgment.recommendation = Recommendation::Hire;
        provider.push_report(judgment);

        let mut s = state();
        s.answered_turns = 4;
        s.behavioral.hallucination_count = 1;
        push_turn(&mut s, 1, "a real answer");

        let patch = Reporter::new(ModelTuning::default()).run(&s, &provider).await;
        assert_eq!(patch.report.recommendation, Some(Recommendation::NoHire));
        assert!(patch.report.critical_issues[0].contains("fabricated"));
    }

    #[tokio::test]
    async fn test_confidence_bands() {
        for (answered, cap) in [(0u32, 50u8), (2, 80), (5, 95)] {
            let provider = ScriptedProvider::new();
            let mut judgment = scripted_report();
            judgment.confidence = 100;
            provider.push_report(judgment);

            let mut s = state();
            s.answered_turns = answered;
            for i in 0..answered {
                push_turn(&mut s, i + 1, "a substantive answer");
            }

            let patch = Reporter::new(ModelTuning::default()).run(&s, &provider).await;
            assert_eq!(patch.report.confidence, cap, "answered={answered}");
        }
    }

    #[tokio::test]
    async fn test_meta_turn_does_not_erode_substantive_count() {
        let provider = ScriptedProvider::new();
        provider.push_report(scripted_report());

        // One evaluated substantive answer, one unscored meta-question turn.
        let mut s = state();
        s.answered_turns = 1;
        push_turn(&mut s, 1, "an index trades write speed for read speed");
        push_turn(&mut s, 2, "Can you repeat the question?");

        let patch = Reporter::new(ModelTuning::default()).run(&s, &provider).await;
        let report = patch.report;
        assert_eq!(report.recommendation, Some(Recommendation::Hire));
        assert_eq!(report.confidence, 70);
    }

    #[tokio::test]
    async fn test_stats_include_the_turn_still_in_scratch() {
        let provider = ScriptedProvider::new();
        let mut judgment = scripted_report();
        judgment.confidence = 100;
        provider.push_report(judgment);

        let mut s = state();
        push_turn(&mut s, 1, "first answer");
        push_turn(&mut s, 2, "second answer");
        s.answered_turns = 3;
        // Terminating turn not yet recorded.
        s.begin_turn("third answer, still being processed");

        let patch = Reporter::new(ModelTuning::default()).run(&s, &provider).await;
        assert!(patch.thought.contains("3 turns"));
        assert!(patch.thought.contains("3 substantive"));
        assert_eq!(patch.report.confidence, 95);
    }

    #[tokio::test]
    async fn test_skills_split_at_seven_and_roadmap_padded() {
        let provider = ScriptedProvider::new();
        let mut judgment = scripted_report();
        judgment.roadmap = vec!["Read about B-trees".to_string()];
        provider.push_report(judgment);

        let mut s = state();
        s.answered_turns = 3;
        push_turn(&mut s, 1, "answer");
        push_turn(&mut s, 2, "answer");
        push_turn(&mut s, 3, "answer");
        s.plan = InterviewPlan::from_judgment(&scripted_plan(3));
        s.plan.start();
        s.plan.record_score(8);
        s.plan.advance();
        s.plan.record_score(4);
        s.plan.advance();
        s.plan.record_score(6);

        let patch = Reporter::new(ModelTuning::default()).run(&s, &provider).await;
        let report = patch.report;
        assert_eq!(report.confirmed_skills.len(), 1);
        assert_eq!(report.knowledge_gaps.len(), 2);
        assert!(report.roadmap.len() >= 3);
    }

    #[tokio::test]
    async fn test_generation_failure_yields_degraded_report() {
        let provider = ScriptedProvider::new();
        provider.fail_report("timeout");
        let patch = Reporter::new(ModelTuning::default())
            .run(&state(), &provider)
            .await;
        assert!(patch.report.recommendation.is_none());
        assert!(patch.report.reasoning.contains("Report generation failed"));
    }
}
