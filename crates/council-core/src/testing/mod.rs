//! Test doubles for the judgment provider boundary.
//!
//! Public so downstream crates and integration tests can drive full
//! sessions without a network backend.

mod scripted;

pub use scripted::{
    scripted_behavioral, scripted_plan, scripted_report, scripted_strategy, scripted_technical,
    ScriptedProvider,
};
