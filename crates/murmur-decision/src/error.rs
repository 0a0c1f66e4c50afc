//! Error types for the decision engine.

use murmur_core::error::MurmurError;
use murmur_core::types::Intent;

/// Errors from action selection.
#[derive(Debug, thiserror::Error)]
pub enum DecisionError {
    /// A knowledge base entry is configured with no actions. This is a
    /// configuration defect: the user sees "could not understand", but the
    /// variant keeps it distinguishable in logs and tests.
    #[error("Knowledge entry for intent '{0}' has no actions")]
    EmptyActionSet(Intent),
    #[error("No knowledge entry for intent '{0}'")]
    UnknownIntent(Intent),
}

impl From<DecisionError> for MurmurError {
    fn from(err: DecisionError) -> Self {
        MurmurError::Decision(err.to_string())
    }
}
