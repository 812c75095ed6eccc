//! The six agent roles.
//!
//! Each agent reads an immutable borrow of the session state, calls the
//! injected judgment provider, and returns a tagged patch. Agents never
//! mutate state and never see each other's output except through the state.
//! Every agent has an explicit degradation path; a provider failure in one
//! agent never aborts the turn.

mod behavioral;
mod classifier;
mod renderer;
mod reporter;
mod strategist;
mod technical;

pub use behavioral::BehavioralEvaluator;
pub use classifier::IntentClassifier;
pub use renderer::DialogueRenderer;
pub use reporter::Reporter;
pub use strategist::StrategicCoordinator;
pub use technical::TechnicalEvaluator;
