//! Decision engine for Murmur.
//!
//! Maps ranked intent matches onto concrete actions using the knowledge
//! base, learned per-intent preferences, and parameter normalization, and
//! produces the tagged decision result consumed by the dialogue
//! coordinator.

pub mod engine;
pub mod error;
pub mod knowledge;
pub mod learning;
pub mod mapping;
pub mod params;
pub mod selector;

pub use engine::{Alternatives, Decision, DecisionEngine, FailureReason};
pub use error::DecisionError;
pub use knowledge::{KnowledgeBase, KnowledgeEntry};
pub use learning::{JsonLearningPersistence, LearningPersistence, LearningStore};
pub use selector::{ActionSelector, Selection};
