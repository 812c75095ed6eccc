//! Closed enumerations used as session state tags.
//!
//! Every tag the workflow passes around is a closed enum, so an unhandled
//! variant is a compile error at every consumption site rather than a
//! silent fallthrough.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classified purpose of a candidate message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// The candidate is answering the posed question (even partially or
    /// incorrectly).
    Answer,
    /// The candidate asks a counter-question to the interviewer.
    Question,
    /// The candidate drifted away from the interview topic.
    OffTopic,
    /// The candidate wants to end the interview.
    Stop,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Answer => "answer",
            Intent::Question => "question",
            Intent::OffTopic => "off_topic",
            Intent::Stop => "stop",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Factual accuracy of a technical answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Accuracy {
    Exact,
    #[serde(alias = "partially-correct")]
    PartiallyCorrect,
    Incorrect,
    /// The answer asserts a fabricated fact, technology, or citation.
    Hallucination,
}

/// Depth of understanding shown in a technical answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Depth {
    Shallow,
    Adequate,
    Deep,
    Expert,
}

/// Observed manner of communication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Demeanor {
    #[default]
    Normal,
    Verbose,
    Silent,
    Arrogant,
    Stuck,
    Nervous,
}

/// Level of engagement in the dialogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Engagement {
    Low,
    Medium,
    High,
}

/// Observed stress level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StressLevel {
    #[default]
    Low,
    Medium,
    High,
}

/// Behavioral adjustment mode affecting how questions are phrased.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Protocol {
    /// Regular questioning.
    #[default]
    Standard,
    /// The candidate is stuck; simplify and offer hints.
    Rescue,
    /// Rapid-fire short questions.
    Speedrun,
    /// Deliberately hard questions.
    StressTest,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Standard => "standard",
            Protocol::Rescue => "rescue",
            Protocol::Speedrun => "speedrun",
            Protocol::StressTest => "stress_test",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Difficulty of an interview topic, ordered easy < medium < hard < expert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Expert,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Expert => "expert",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of a plan topic.
///
/// Forward transitions are pending -> in_progress -> completed only; a
/// completed topic is never reopened. Skipped is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TopicStatus {
    Pending,
    InProgress,
    Completed,
    Skipped,
}

impl TopicStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TopicStatus::Pending => "pending",
            TopicStatus::InProgress => "in_progress",
            TopicStatus::Completed => "completed",
            TopicStatus::Skipped => "skipped",
        }
    }
}

/// The three fixed candidate grade tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    Junior,
    Middle,
    Senior,
}

impl Grade {
    /// Parses a grade from user input, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "junior" => Some(Grade::Junior),
            "middle" => Some(Grade::Middle),
            "senior" => Some(Grade::Senior),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::Junior => "Junior",
            Grade::Middle => "Middle",
            Grade::Senior => "Senior",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hiring recommendation, ordered lowest to highest tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Recommendation {
    #[serde(rename = "No Hire")]
    NoHire,
    Hire,
    #[serde(rename = "Strong Hire")]
    StrongHire,
}

impl Recommendation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Recommendation::NoHire => "No Hire",
            Recommendation::Hire => "Hire",
            Recommendation::StrongHire => "Strong Hire",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strategic decision on how the interview proceeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NextAction {
    /// Stay on the current topic.
    Continue,
    /// Advance to the next pending topic.
    NextTopic,
    /// End the interview and produce the report.
    Finish,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_serde_round_trip() {
        for intent in [Intent::Answer, Intent::Question, Intent::OffTopic, Intent::Stop] {
            let json = serde_json::to_string(&intent).unwrap();
            let back: Intent = serde_json::from_str(&json).unwrap();
            assert_eq!(intent, back);
        }
        assert_eq!(serde_json::to_string(&Intent::OffTopic).unwrap(), "\"off_topic\"");
    }

    #[test]
    fn test_accuracy_accepts_hyphenated_alias() {
        let acc: Accuracy = serde_json::from_str("\"partially-correct\"").unwrap();
        assert_eq!(acc, Accuracy::PartiallyCorrect);
    }

    #[test]
    fn test_difficulty_ordering() {
        assert!(Difficulty::Easy < Difficulty::Medium);
        assert!(Difficulty::Hard < Difficulty::Expert);
    }

    #[test]
    fn test_recommendation_ordering_and_labels() {
        assert!(Recommendation::NoHire < Recommendation::Hire);
        assert!(Recommendation::Hire < Recommendation::StrongHire);
        assert_eq!(
            serde_json::to_string(&Recommendation::StrongHire).unwrap(),
            "\"Strong Hire\""
        );
    }

    #[test]
    fn test_grade_parse() {
        assert_eq!(Grade::parse("senior"), Some(Grade::Senior));
        assert_eq!(Grade::parse(" Junior "), Some(Grade::Junior));
        assert_eq!(Grade::parse("staff"), None);
    }
}
