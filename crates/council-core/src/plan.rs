//! The interview plan: an ordered to-do list of topics with progress tracking.

use council_proto::{Difficulty, Grade, PlanJudgment, TopicStatus};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Hard cap on evaluated questions per topic. Guarantees plan coverage
/// within a bounded-length interview.
pub const TOPIC_QUESTION_CAP: u32 = 2;

/// Maximum number of topics kept from a generated plan.
const MAX_PLAN_TOPICS: usize = 8;

/// One unit of subject matter in the interview plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topic {
    /// Stable id assigned at plan creation, 1..N.
    pub id: u32,
    pub label: String,
    pub difficulty: Difficulty,
    pub status: TopicStatus,
    /// Unset until an evaluation lands on this topic; 0-10 once set.
    pub score: Option<u8>,
    /// Evaluated questions asked on this topic.
    pub questions_asked: u32,
    /// Recorded scores of 4 or below.
    pub weak_answers: u32,
}

impl Topic {
    fn new(id: u32, label: impl Into<String>, difficulty: Difficulty) -> Self {
        Self {
            id,
            label: label.into(),
            difficulty,
            status: TopicStatus::Pending,
            score: None,
            questions_asked: 0,
            weak_answers: 0,
        }
    }
}

/// Ordered topic sequence, created once at session start and mutated only
/// through the strategic patch. Plan order defines priority: the next topic
/// is always the lowest-indexed pending one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InterviewPlan {
    topics: Vec<Topic>,
    /// Index of the in_progress topic; equals `topics.len()` once exhausted.
    current: usize,
}

impl InterviewPlan {
    /// Creates an empty plan (used before generation, and by tests).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a plan from a generated judgment, capped at eight topics.
    pub fn from_judgment(judgment: &PlanJudgment) -> Self {
        let topics = judgment
            .topics
            .iter()
            .take(MAX_PLAN_TOPICS)
            .enumerate()
            .map(|(i, t)| Topic::new(i as u32 + 1, t.label.clone(), t.difficulty))
            .collect();
        Self { topics, current: 0 }
    }

    /// Local fallback plan used when plan generation fails: probe the
    /// basics for the role, then the declared experience.
    pub fn fallback(role: &str, grade: Grade, experience: &str) -> Self {
        let base_difficulty = match grade {
            Grade::Junior => Difficulty::Easy,
            Grade::Middle | Grade::Senior => Difficulty::Medium,
        };
        let experience_brief: String = experience.chars().take(50).collect();
        Self {
            topics: vec![
                Topic::new(1, format!("Core skills for {role}"), base_difficulty),
                Topic::new(
                    2,
                    format!("Hands-on experience: {experience_brief}"),
                    Difficulty::Medium,
                ),
            ],
            current: 0,
        }
    }

    /// Marks the first pending topic in_progress. Called once, at the
    /// opening turn.
    pub fn start(&mut self) {
        if let Some(topic) = self.topics.first_mut() {
            if topic.status == TopicStatus::Pending {
                topic.status = TopicStatus::InProgress;
            }
        }
        self.current = 0;
    }

    /// The topic currently in progress, if any.
    pub fn current_topic(&self) -> Option<&Topic> {
        self.topics.get(self.current).filter(|t| t.status == TopicStatus::InProgress)
    }

    /// Records a score on the current topic. Scores of 4 or below also
    /// count as weak answers.
    pub fn record_score(&mut self, score: u8) {
        if let Some(topic) = self.current_mut() {
            let score = score.min(10);
            topic.score = Some(score);
            if score <= 4 {
                topic.weak_answers += 1;
            }
        }
    }

    /// Increments the evaluated-question counter on the current topic.
    pub fn note_question(&mut self) {
        if let Some(topic) = self.current_mut() {
            topic.questions_asked += 1;
        }
    }

    /// True when the current topic has consumed its question budget.
    pub fn at_question_cap(&self) -> bool {
        self.current_topic()
            .is_some_and(|t| t.questions_asked >= TOPIC_QUESTION_CAP)
    }

    /// Completes the current topic and starts the lowest-indexed pending
    /// one. After the last topic completes, the plan is exhausted.
    pub fn advance(&mut self) {
        if let Some(topic) = self.current_mut() {
            topic.status = TopicStatus::Completed;
            debug!(topic = %topic.label, "Topic completed");
        }
        match self.next_pending() {
            Some(idx) => {
                self.topics[idx].status = TopicStatus::InProgress;
                self.current = idx;
            }
            None => {
                self.current = self.topics.len();
            }
        }
    }

    /// Index of the lowest pending topic, if any.
    pub fn next_pending(&self) -> Option<usize> {
        self.topics.iter().position(|t| t.status == TopicStatus::Pending)
    }

    /// True when no topic is in progress and none is pending.
    pub fn is_exhausted(&self) -> bool {
        self.current_topic().is_none() && self.next_pending().is_none()
    }

    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    /// Formats plan progress, one line per topic.
    pub fn status_lines(&self) -> String {
        if self.topics.is_empty() {
            return "(plan is empty)".to_string();
        }
        let mut lines = Vec::with_capacity(self.topics.len());
        for topic in &self.topics {
            let marker = match topic.status {
                TopicStatus::Pending => " ",
                TopicStatus::InProgress => ">",
                TopicStatus::Completed => "x",
                TopicStatus::Skipped => "-",
            };
            let score = topic
                .score
                .map(|s| format!(" ({s}/10)"))
                .unwrap_or_default();
            let weak = if topic.weak_answers > 0 {
                format!(" [{} weak]", topic.weak_answers)
            } else {
                String::new()
            };
            lines.push(format!(
                "{}. [{}] {} [{}]{}{}",
                topic.id, marker, topic.label, topic.difficulty, score, weak
            ));
        }
        lines.join("\n")
    }

    fn current_mut(&mut self) -> Option<&mut Topic> {
        let idx = self.current;
        self.topics
            .get_mut(idx)
            .filter(|t| t.status == TopicStatus::InProgress)
    }

    /// Number of in_progress topics; the plan invariant keeps this at 0 or 1.
    pub fn in_progress_count(&self) -> usize {
        self.topics
            .iter()
            .filter(|t| t.status == TopicStatus::InProgress)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_proto::PlannedTopic;

    fn plan(n: usize) -> InterviewPlan {
        let judgment = PlanJudgment {
            topics: (0..n)
                .map(|i| PlannedTopic {
                    label: format!("Topic {}", i + 1),
                    difficulty: Difficulty::Medium,
                    rationale: String::new(),
                })
                .collect(),
            rationale: String::new(),
        };
        InterviewPlan::from_judgment(&judgment)
    }

    #[test]
    fn test_from_judgment_assigns_sequential_ids() {
        let p = plan(3);
        let ids: Vec<u32> = p.topics().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(p.topics().iter().all(|t| t.status == TopicStatus::Pending));
    }

    #[test]
    fn test_plan_caps_topics_at_eight() {
        let p = plan(12);
        assert_eq!(p.len(), 8);
    }

    #[test]
    fn test_start_marks_first_topic_in_progress() {
        let mut p = plan(3);
        p.start();
        assert_eq!(p.current_topic().unwrap().label, "Topic 1");
        assert_eq!(p.in_progress_count(), 1);
    }

    #[test]
    fn test_advance_moves_to_lowest_pending() {
        let mut p = plan(3);
        p.start();
        p.advance();
        assert_eq!(p.current_topic().unwrap().label, "Topic 2");
        assert_eq!(p.topics()[0].status, TopicStatus::Completed);
        assert_eq!(p.in_progress_count(), 1);
    }

    #[test]
    fn test_advance_past_last_topic_exhausts_plan() {
        let mut p = plan(2);
        p.start();
        p.advance();
        p.advance();
        assert!(p.is_exhausted());
        assert!(p.current_topic().is_none());
    }

    #[test]
    fn test_completed_topic_is_never_reopened() {
        let mut p = plan(2);
        p.start();
        p.advance();
        p.advance();
        // A further advance has nothing to reopen
        p.advance();
        assert!(p.topics().iter().all(|t| t.status == TopicStatus::Completed));
    }

    #[test]
    fn test_record_score_counts_weak_answers() {
        let mut p = plan(1);
        p.start();
        p.record_score(3);
        let t = &p.topics()[0];
        assert_eq!(t.score, Some(3));
        assert_eq!(t.weak_answers, 1);

        let mut p = plan(1);
        p.start();
        p.record_score(8);
        assert_eq!(p.topics()[0].weak_answers, 0);
    }

    #[test]
    fn test_question_cap() {
        let mut p = plan(1);
        p.start();
        assert!(!p.at_question_cap());
        p.note_question();
        assert!(!p.at_question_cap());
        p.note_question();
        assert!(p.at_question_cap());
    }

    #[test]
    fn test_fallback_plan_has_two_topics() {
        let p = InterviewPlan::fallback("Backend Developer", Grade::Junior, "Django, SQL");
        assert_eq!(p.len(), 2);
        assert_eq!(p.topics()[0].difficulty, Difficulty::Easy);
    }

    #[test]
    fn test_status_lines_mark_progress() {
        let mut p = plan(2);
        p.start();
        p.record_score(7);
        let lines = p.status_lines();
        assert!(lines.contains("[>] Topic 1"));
        assert!(lines.contains("(7/10)"));
        assert!(lines.contains("[ ] Topic 2"));
    }
}
