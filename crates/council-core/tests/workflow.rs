//! End-to-end workflow tests over a scripted provider.

use council_core::testing::{scripted_strategy, scripted_technical, ScriptedProvider};
use council_core::{
    CandidateMetadata, CouncilConfig, SessionLogger, SessionOrchestrator, SessionExport,
};
use council_proto::{Accuracy, Grade, Intent, NextAction, Recommendation, TopicStatus};
use std::sync::Arc;

fn metadata() -> CandidateMetadata {
    CandidateMetadata {
        name: "Alex".to_string(),
        role: "Backend Developer".to_string(),
        target_grade: Grade::Middle,
        experience: "Django, PostgreSQL".to_string(),
    }
}

async fn session(provider: &Arc<ScriptedProvider>) -> SessionOrchestrator {
    session_with(provider, CouncilConfig::default()).await
}

async fn session_with(
    provider: &Arc<ScriptedProvider>,
    config: CouncilConfig,
) -> SessionOrchestrator {
    let provider: Arc<dyn council_proto::JudgmentProvider> = provider.clone();
    SessionOrchestrator::start(&config, provider, metadata()).await
}

#[tokio::test]
async fn test_opening_invocation_greets_and_starts_plan() {
    let provider = Arc::new(ScriptedProvider::new());
    provider.push_phrase("Hi Alex! Let's start with Topic 1: tell me about indexing.");

    let s = session(&provider).await;
    assert_eq!(s.state().turn_id, 1);
    assert!(s.last_response().contains("Topic 1"));
    assert_eq!(s.state().plan.in_progress_count(), 1);
    assert!(s.state().turns.is_empty());
    assert_eq!(provider.plan_calls(), 1);
    assert_eq!(provider.classify_calls(), 0);
}

#[tokio::test]
async fn test_turn_counter_increments_once_per_invocation() {
    let provider = Arc::new(ScriptedProvider::new());
    let mut s = session(&provider).await;
    assert_eq!(s.state().turn_id, 1);

    s.process_message("an answer about b-trees").await;
    assert_eq!(s.state().turn_id, 2);
    s.process_message("another answer").await;
    assert_eq!(s.state().turn_id, 3);
    assert_eq!(s.state().turns.len(), 2);
}

#[tokio::test]
async fn test_answer_turn_runs_both_evaluators() {
    let provider = Arc::new(ScriptedProvider::new());
    let mut s = session(&provider).await;
    s.process_message("indexes speed up lookups at write cost").await;
    assert_eq!(provider.technical_calls(), 1);
    assert_eq!(provider.behavioral_calls(), 1);
    assert_eq!(provider.decide_calls(), 1);
    assert_eq!(provider.phrase_calls(), 2);
}

#[tokio::test]
async fn test_stop_request_goes_straight_to_report() {
    let provider = Arc::new(ScriptedProvider::new());
    let mut s = session(&provider).await;
    provider.push_classification(Intent::Stop, "asked to end");

    let response = s.process_message("I'd like to stop here, thanks").await;
    assert!(response.contains("FINAL REPORT"));
    assert!(!s.is_active());
    assert_eq!(provider.technical_calls(), 0);
    assert_eq!(provider.decide_calls(), 0);
    assert_eq!(provider.report_calls(), 1);
}

#[tokio::test]
async fn test_messages_after_end_are_ignored() {
    let provider = Arc::new(ScriptedProvider::new());
    let mut s = session(&provider).await;
    provider.push_classification(Intent::Stop, "asked to end");
    let report = s.process_message("stop please").await;

    let repeat = s.process_message("hello?").await;
    assert_eq!(repeat, report);
    assert_eq!(provider.report_calls(), 1);
}

#[tokio::test]
async fn test_question_cap_forces_topic_transition() {
    let provider = Arc::new(ScriptedProvider::new());
    let mut s = session(&provider).await;

    s.process_message("first answer").await;
    assert_eq!(s.state().plan.topics()[0].status, TopicStatus::InProgress);
    s.process_message("second answer").await;
    assert_eq!(s.state().plan.topics()[0].status, TopicStatus::Completed);
    assert_eq!(s.state().plan.topics()[1].status, TopicStatus::InProgress);
}

#[tokio::test]
async fn test_at_most_one_topic_in_progress_throughout() {
    let provider = Arc::new(ScriptedProvider::new());
    let mut s = session(&provider).await;
    for i in 0..6 {
        assert!(s.state().plan.in_progress_count() <= 1, "before turn {i}");
        s.process_message("an answer").await;
    }
    // Default plan has three topics at two questions each, so the sixth
    // answer exhausts it and produces the report.
    assert!(!s.is_active());
    assert!(s.last_response().contains("FINAL REPORT"));
}

#[tokio::test]
async fn test_meta_question_takes_fast_path_and_plan_is_untouched() {
    let provider = Arc::new(ScriptedProvider::new());
    let mut s = session(&provider).await;
    provider.push_classification(Intent::Question, "counter-question");
    provider.push_quick("Briefly clarify, then repeat the question");

    s.process_message("Can you repeat the question?").await;
    assert_eq!(provider.technical_calls(), 0);
    assert_eq!(provider.decide_quick_calls(), 1);
    assert_eq!(s.state().plan.topics()[0].questions_asked, 0);
    assert!(s.is_active());
}

#[tokio::test]
async fn test_hallucination_clamps_score_and_increments_counter() {
    let provider = Arc::new(ScriptedProvider::new());
    let mut s = session(&provider).await;
    provider.push_technical(scripted_technical(9, Accuracy::Hallucination));

    s.process_message("Python 4.0 shipped the neural GIL in 2023").await;
    assert_eq!(s.state().behavioral.hallucination_count, 1);
    let topic = &s.state().plan.topics()[0];
    assert!(topic.score.unwrap() <= 1);
    assert_eq!(topic.weak_answers, 1);

    let record = s.state().turns.last().unwrap();
    assert!(record.internal_thoughts.contains("HALLUCINATION"));
}

#[tokio::test]
async fn test_zero_substantive_answers_never_hires() {
    let provider = Arc::new(ScriptedProvider::new());
    let scripted: Arc<dyn council_proto::JudgmentProvider> = provider.clone();
    let mut s = SessionOrchestrator::start(
        &CouncilConfig::default(),
        scripted,
        CandidateMetadata {
            name: "Sam".to_string(),
            role: "Backend Developer".to_string(),
            target_grade: Grade::Senior,
            experience: "10 years, Staff Engineer".to_string(),
        },
    )
    .await;

    while s.is_active() {
        s.process_message("I don't know").await;
    }
    let report = s.state().report.as_ref().unwrap();
    assert_eq!(report.recommendation, Some(Recommendation::NoHire));
    assert!(report.confidence <= 50);
}

#[tokio::test]
async fn test_meta_turn_does_not_force_no_hire_on_a_real_answer() {
    let provider = Arc::new(ScriptedProvider::new());
    let mut s = session(&provider).await;

    // One genuine evaluated answer...
    s.process_message("an index trades write speed for read speed").await;
    // ...then a meta-question turn that must not count against it.
    provider.push_classification(Intent::Question, "counter-question");
    provider.push_quick("Clarify, then repeat the question");
    s.process_message("Can you repeat the question?").await;

    provider.push_classification(Intent::Stop, "asked to end");
    s.process_message("let's stop here").await;

    let report = s.state().report.as_ref().unwrap();
    assert_eq!(report.recommendation, Some(Recommendation::Hire));
    assert_eq!(report.confidence, 70);
}

#[tokio::test]
async fn test_turn_limit_forces_report() {
    let provider = Arc::new(ScriptedProvider::new());
    let mut config = CouncilConfig::default();
    config.session.max_turns = 2;
    // Every decision continues, so only the limit can end the session.
    for _ in 0..10 {
        provider.push_strategy(scripted_strategy(NextAction::Continue, "keep going"));
    }
    let mut s = session_with(&provider, config).await;

    s.process_message("first answer").await;
    assert!(s.is_active());
    let response = s.process_message("second answer").await;
    assert!(!s.is_active());
    assert!(response.contains("FINAL REPORT"));
}

#[tokio::test]
async fn test_evaluator_failure_does_not_end_turn() {
    let provider = Arc::new(ScriptedProvider::new());
    let mut s = session(&provider).await;
    provider.fail_technical("model unavailable");

    let response = s.process_message("an answer").await;
    assert!(s.is_active());
    assert!(!response.is_empty());
    // Behavioral evaluation still ran and landed in the trail.
    assert_eq!(provider.behavioral_calls(), 1);
    let record = s.state().turns.last().unwrap();
    assert!(record.internal_thoughts.contains("Technical evaluation failed"));
}

#[tokio::test]
async fn test_renderer_failure_degrades_to_filler() {
    let provider = Arc::new(ScriptedProvider::new());
    let mut s = session(&provider).await;
    provider.fail_phrase("over capacity");

    let response = s.process_message("an answer").await;
    assert_eq!(response, "Alright, let's move on to the next question.");
    assert!(s.is_active());
}

#[tokio::test]
async fn test_session_export_round_trip() {
    let provider = Arc::new(ScriptedProvider::new());
    let dir = tempfile::tempdir().unwrap();
    let mut logger = SessionLogger::start(dir.path(), "Alex").unwrap();
    let mut s = session(&provider).await;

    s.process_message("first answer").await;
    logger.log_turn(s.last_turn_record().unwrap().clone());
    provider.push_classification(Intent::Stop, "asked to end");
    let report = s.process_message("let's stop").await;
    logger.log_turn(s.last_turn_record().unwrap().clone());
    logger.log_final_report(&report);

    let content = std::fs::read_to_string(logger.path()).unwrap();
    let export: SessionExport = serde_json::from_str(&content).unwrap();
    assert_eq!(export.participant_name, "Alex");
    assert_eq!(export.turns.len(), 2);
    assert_eq!(export.turns[0].user_message, "first answer");
    assert!(export.turns[0].internal_thoughts.contains("[classifier]"));
    assert_eq!(export.final_report.as_deref(), Some(report.as_str()));
}
