//! # council-core
//!
//! Core orchestration functionality for the Council interview simulator.
//!
//! This crate provides:
//! - The session orchestrator: a turn-level state machine routing each
//!   candidate message through classification, evaluation, strategy,
//!   and rendering
//! - The interview plan with topic progress tracking
//! - The single mutable session state and its tagged patch types
//! - The six agents that produce judgments through an injected provider
//! - Session logging for JSON export and replay
//! - Configuration loading and management

pub mod agents;
mod config;
mod orchestrator;
mod patch;
mod plan;
mod report;
mod session_log;
mod state;
pub mod testing;

pub use config::{
    ConfigError, CouncilConfig, ProviderConfig, RoleTuning, SessionConfig, TuningConfig,
};
pub use orchestrator::SessionOrchestrator;
pub use patch::{
    BehavioralPatch, ClassificationPatch, PhrasingPatch, ReportPatch, StatePatch, StrategicPatch,
    TechnicalPatch,
};
pub use plan::{InterviewPlan, Topic, TOPIC_QUESTION_CAP};
pub use report::{FinalReport, SkillAssessment, SoftSkills};
pub use session_log::{SessionExport, SessionLogger};
pub use state::{
    AgentRole, BehavioralContext, CandidateMetadata, EndReason, Message, MessageRole,
    SessionState, TurnRecord, TurnScratch,
};
