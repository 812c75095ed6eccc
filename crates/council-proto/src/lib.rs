//! # council-proto
//!
//! Shared types, error definitions, and traits for the Council Orchestrator.
//!
//! This crate provides the foundational abstractions used across all Council
//! crates, including:
//! - Closed enumerations for intents, judgments, and session state tags
//! - The six judgment schemas produced by the provider boundary
//! - The `JudgmentProvider` trait and per-call model tuning
//! - Common error types

mod error;
mod judgment;
mod provider;
mod tags;

pub use error::ProviderError;
pub use judgment::{
    BehavioralJudgment, ClassificationJudgment, PhrasingJudgment, PlanJudgment, PlannedTopic,
    QuickDirective, ReportJudgment, StrategicJudgment, TechnicalJudgment,
};
pub use provider::{
    BehavioralRequest, ClassificationRequest, JudgmentProvider, ModelTuning, PhrasingFlags,
    PhrasingRequest, PlanRequest, QuickRequest, ReportRequest, ReportStats, StrategicRequest,
    TechnicalRequest,
};
pub use tags::{
    Accuracy, Demeanor, Depth, Difficulty, Engagement, Grade, Intent, NextAction, Protocol,
    Recommendation, StressLevel, TopicStatus,
};
