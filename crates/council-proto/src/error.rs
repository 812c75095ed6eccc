//! Error types for the judgment provider boundary.

use thiserror::Error;

/// Errors raised by a [`crate::JudgmentProvider`] backend.
///
/// Every variant is caught at the component boundary by the orchestration
/// core; none of them is ever propagated to the session loop as a crash.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The backend could not be reached or the request failed in transit.
    #[error("transport error: {0}")]
    Transport(String),

    /// The backend responded, but the payload did not conform to the
    /// expected judgment schema.
    #[error("malformed judgment: {0}")]
    Schema(String),

    /// The backend did not respond within its configured bound.
    /// Treated identically to any other failure by the core.
    #[error("provider timed out after {0}s")]
    Timeout(u64),

    /// No credentials were available for the backend.
    #[error("missing credentials: {0}")]
    MissingCredentials(String),
}

impl ProviderError {
    /// Short diagnostic string for the per-turn rationale trail.
    ///
    /// Kept to one line so it can be embedded in an agent thought.
    pub fn brief(&self) -> String {
        let full = self.to_string();
        match full.char_indices().nth(80) {
            Some((idx, _)) => format!("{}...", &full[..idx]),
            None => full,
        }
    }
}
