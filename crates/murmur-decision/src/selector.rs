//! Action selection for a resolved intent.

use tracing::warn;

use murmur_core::types::Action;

use crate::error::DecisionError;
use crate::knowledge::KnowledgeEntry;
use crate::learning::LearningStore;

/// Outcome of action selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Exactly one action to dispatch.
    Single(Action),
    /// The selector refuses to pick; the caller must ask the user,
    /// offering these actions.
    NeedsClarification(Vec<Action>),
}

pub struct ActionSelector;

impl ActionSelector {
    /// Pick one action for the entry, or report that clarification is
    /// required.
    ///
    /// A single-action entry short-circuits regardless of flags. With
    /// multiple actions, a context-sensitive entry picks deterministically:
    /// the head of the priority list, overridden by the user's most
    /// frequent past choice when that choice is still in the action set.
    /// Non-context-sensitive entries always defer to the user.
    pub fn select(
        entry: &KnowledgeEntry,
        learning: &LearningStore,
    ) -> Result<Selection, DecisionError> {
        if entry.actions.is_empty() {
            warn!(intent = %entry.intent, "Knowledge entry has no actions");
            return Err(DecisionError::EmptyActionSet(entry.intent));
        }

        if entry.actions.len() == 1 {
            return Ok(Selection::Single(entry.actions[0]));
        }

        if entry.context_sensitive {
            let mut action = entry.priority.first().copied().unwrap_or(entry.actions[0]);
            if let Some(preferred) = learning.preferred(entry.intent) {
                if entry.actions.contains(&preferred) {
                    action = preferred;
                }
            }
            Ok(Selection::Single(action))
        } else {
            Ok(Selection::NeedsClarification(entry.actions.clone()))
        }
    }
}
