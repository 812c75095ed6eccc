//! The final report structure and its plain-text rendering.

use council_proto::{Grade, Recommendation};
use serde::{Deserialize, Serialize};

/// Per-topic outcome listed in the final report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillAssessment {
    pub topic: String,
    /// 0-10 as recorded on the plan.
    pub score: u8,
}

/// Soft-skill sub-scores from the behavioral trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoftSkills {
    pub clarity: u8,
    pub honesty: u8,
    pub engagement: u8,
    pub notes: String,
}

/// The hiring verdict produced once at session end.
///
/// `assessed_grade` and `recommendation` are unset only in the degraded
/// report emitted when report generation itself fails.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalReport {
    pub assessed_grade: Option<Grade>,
    pub recommendation: Option<Recommendation>,
    /// 0-100, after the confidence bands are enforced.
    pub confidence: u8,
    pub reasoning: String,
    pub critical_issues: Vec<String>,
    /// Topics scored 7 or above.
    pub confirmed_skills: Vec<SkillAssessment>,
    /// Topics scored below 7.
    pub knowledge_gaps: Vec<SkillAssessment>,
    pub soft_skills: Option<SoftSkills>,
    /// At least three items when generation succeeds.
    pub roadmap: Vec<String>,
    pub resources: Vec<String>,
}

impl FinalReport {
    /// The degraded report emitted when generation fails: no verdict, only
    /// the failure note. The session still terminates normally.
    pub fn degraded(reason: impl Into<String>) -> Self {
        Self {
            assessed_grade: None,
            recommendation: None,
            confidence: 0,
            reasoning: reason.into(),
            critical_issues: Vec::new(),
            confirmed_skills: Vec::new(),
            knowledge_gaps: Vec::new(),
            soft_skills: None,
            roadmap: Vec::new(),
            resources: Vec::new(),
        }
    }

    /// Renders the report as plain text for display and export.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str("==================== FINAL REPORT ====================\n\n");

        match (&self.assessed_grade, &self.recommendation) {
            (Some(grade), Some(rec)) => {
                out.push_str(&format!("Assessed grade:  {grade}\n"));
                out.push_str(&format!("Recommendation:  {rec}\n"));
                out.push_str(&format!("Confidence:      {}%\n", self.confidence));
            }
            _ => {
                out.push_str("Verdict unavailable.\n");
            }
        }
        out.push('\n');
        out.push_str(&self.reasoning);
        out.push('\n');

        if !self.critical_issues.is_empty() {
            out.push_str("\nCritical issues:\n");
            for issue in &self.critical_issues {
                out.push_str(&format!("  ! {issue}\n"));
            }
        }

        if !self.confirmed_skills.is_empty() {
            out.push_str("\nConfirmed skills:\n");
            for skill in &self.confirmed_skills {
                out.push_str(&format!("  + {} ({}/10)\n", skill.topic, skill.score));
            }
        }
        if !self.knowledge_gaps.is_empty() {
            out.push_str("\nKnowledge gaps:\n");
            for gap in &self.knowledge_gaps {
                out.push_str(&format!("  - {} ({}/10)\n", gap.topic, gap.score));
            }
        }

        if let Some(soft) = &self.soft_skills {
            out.push_str("\nSoft skills:\n");
            out.push_str(&format!("  Clarity:    {}/10\n", soft.clarity));
            out.push_str(&format!("  Honesty:    {}/10\n", soft.honesty));
            out.push_str(&format!("  Engagement: {}/10\n", soft.engagement));
            if !soft.notes.is_empty() {
                out.push_str(&format!("  {}\n", soft.notes));
            }
        }

        if !self.roadmap.is_empty() {
            out.push_str("\nDevelopment roadmap:\n");
            for (i, step) in self.roadmap.iter().enumerate() {
                out.push_str(&format!("  {}. {step}\n", i + 1));
            }
        }
        if !self.resources.is_empty() {
            out.push_str("\nResources:\n");
            for resource in &self.resources {
                out.push_str(&format!("  * {resource}\n"));
            }
        }

        out.push_str("\n======================================================");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_full_report() {
        let report = FinalReport {
            assessed_grade: Some(Grade::Middle),
            recommendation: Some(Recommendation::Hire),
            confidence: 85,
            reasoning: "Solid fundamentals with some gaps in depth.".to_string(),
            critical_issues: vec!["One fabricated API name".to_string()],
            confirmed_skills: vec![SkillAssessment {
                topic: "SQL".to_string(),
                score: 8,
            }],
            knowledge_gaps: vec![SkillAssessment {
                topic: "Async IO".to_string(),
                score: 4,
            }],
            soft_skills: Some(SoftSkills {
                clarity: 7,
                honesty: 8,
                engagement: 6,
                notes: "Direct and composed.".to_string(),
            }),
            roadmap: vec!["Study async runtimes".to_string()],
            resources: vec!["Designing Data-Intensive Applications".to_string()],
        };
        let text = report.render();
        assert!(text.contains("Assessed grade:  Middle"));
        assert!(text.contains("Recommendation:  Hire"));
        assert!(text.contains("Confidence:      85%"));
        assert!(text.contains("+ SQL (8/10)"));
        assert!(text.contains("- Async IO (4/10)"));
        assert!(text.contains("! One fabricated API name"));
        assert!(text.contains("1. Study async runtimes"));
    }

    #[test]
    fn test_degraded_report_has_no_verdict() {
        let report = FinalReport::degraded("report generation failed: timeout");
        let text = report.render();
        assert!(text.contains("Verdict unavailable."));
        assert!(text.contains("report generation failed"));
        assert_eq!(report.confidence, 0);
    }
}
