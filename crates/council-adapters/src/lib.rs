//! # council-adapters
//!
//! Judgment provider backends. The core orchestration is backend-agnostic;
//! this crate supplies the concrete implementations:
//! - [`OpenAiProvider`]: OpenAI-compatible chat completions with enforced
//!   JSON output
//! - [`SemanticRouter`]: embedding-similarity intent classification wrapped
//!   around any inner provider

mod openai;
mod prompts;
mod semantic;

pub use openai::OpenAiProvider;
pub use semantic::SemanticRouter;
