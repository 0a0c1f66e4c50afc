//! Intent resolution for Murmur.
//!
//! Turns a raw command utterance into a ranked list of candidate intents
//! with extracted entities, and adjusts the ranking with short-lived
//! session context.

pub mod booster;
pub mod entities;
pub mod patterns;
pub mod resolver;

pub use booster::ContextBooster;
pub use entities::{EntityExtractor, PRIMARY_ENTITY};
pub use patterns::{ConfidenceTier, PatternBank};
pub use resolver::{IntentMatch, IntentResolver};
