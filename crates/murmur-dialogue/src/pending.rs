//! Pending interrupt tracking.
//!
//! A pending interrupt is a suspended dialogue turn awaiting a follow-up
//! answer. At most one may be alive at a time; [`PendingSlot`] enforces
//! that invariant.

use std::collections::HashMap;

use murmur_core::types::{Action, Intent};
use murmur_decision::Alternatives;

/// The suspended turn and everything needed to resume it.
#[derive(Debug, Clone)]
pub enum PendingInterrupt {
    /// An action was held back pending a permission decision. Carries the
    /// full dispatch context so a grant can re-dispatch it.
    SecurityConfirmation {
        resource: String,
        original_command: String,
        intent: Intent,
        action: Action,
        automation_command: String,
        parameters: HashMap<String, String>,
    },
    /// The decision engine needs the user to disambiguate.
    DecisionClarification {
        original_command: String,
        intent: Option<Intent>,
        alternatives: Alternatives,
        prompt: String,
    },
}

impl PendingInterrupt {
    pub fn kind(&self) -> InterruptKind {
        match self {
            PendingInterrupt::SecurityConfirmation { .. } => InterruptKind::SecurityConfirmation,
            PendingInterrupt::DecisionClarification { .. } => InterruptKind::DecisionClarification,
        }
    }
}

/// Discriminant of a pending interrupt, exposed in replies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterruptKind {
    SecurityConfirmation,
    DecisionClarification,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PendingError {
    #[error("An interrupt is already pending")]
    AlreadyPending,
}

/// Holder for the at-most-one pending interrupt.
///
/// `set` rejects a second interrupt while one is outstanding rather than
/// silently overwriting it.
#[derive(Debug, Default)]
pub struct PendingSlot {
    current: Option<PendingInterrupt>,
}

impl PendingSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, interrupt: PendingInterrupt) -> Result<(), PendingError> {
        if self.current.is_some() {
            return Err(PendingError::AlreadyPending);
        }
        self.current = Some(interrupt);
        Ok(())
    }

    pub fn take(&mut self) -> Option<PendingInterrupt> {
        self.current.take()
    }

    pub fn get(&self) -> Option<&PendingInterrupt> {
        self.current.as_ref()
    }

    pub fn is_pending(&self) -> bool {
        self.current.is_some()
    }
}

/// Classification of a free-text answer to a security confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecurityAnswer {
    GrantPermanent,
    DenyPermanent,
    GrantOnce,
    Unrecognized,
}

impl SecurityAnswer {
    pub fn classify(text: &str) -> Self {
        match text.trim().to_lowercase().as_str() {
            "yes" | "y" | "allow" | "allow permanently" | "permanently" => {
                SecurityAnswer::GrantPermanent
            }
            "no" | "n" | "block" | "deny" | "never" => SecurityAnswer::DenyPermanent,
            "this time only" | "once" | "just once" | "temporary" | "temp" => {
                SecurityAnswer::GrantOnce
            }
            _ => SecurityAnswer::Unrecognized,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clarification() -> PendingInterrupt {
        PendingInterrupt::DecisionClarification {
            original_command: "play something".to_string(),
            intent: Some(Intent::PlayMusic),
            alternatives: Alternatives::Intents(vec![Intent::PlayMusic]),
            prompt: "Did you mean: play music?".to_string(),
        }
    }

    fn security() -> PendingInterrupt {
        PendingInterrupt::SecurityConfirmation {
            resource: "newsite.com".to_string(),
            original_command: "open newsite.com".to_string(),
            intent: Intent::OpenWebsite,
            action: Action::OpenWebsite,
            automation_command: "open newsite.com".to_string(),
            parameters: HashMap::new(),
        }
    }

    #[test]
    fn test_slot_starts_empty() {
        let slot = PendingSlot::new();
        assert!(!slot.is_pending());
        assert!(slot.get().is_none());
    }

    #[test]
    fn test_slot_set_and_take() {
        let mut slot = PendingSlot::new();
        slot.set(clarification()).unwrap();
        assert!(slot.is_pending());
        assert_eq!(
            slot.get().unwrap().kind(),
            InterruptKind::DecisionClarification
        );

        let taken = slot.take().unwrap();
        assert_eq!(taken.kind(), InterruptKind::DecisionClarification);
        assert!(!slot.is_pending());
    }

    #[test]
    fn test_second_interrupt_rejected_while_pending() {
        let mut slot = PendingSlot::new();
        slot.set(clarification()).unwrap();

        let err = slot.set(security()).unwrap_err();
        assert_eq!(err, PendingError::AlreadyPending);

        // The original interrupt is untouched.
        assert_eq!(
            slot.get().unwrap().kind(),
            InterruptKind::DecisionClarification
        );
    }

    #[test]
    fn test_slot_reusable_after_take() {
        let mut slot = PendingSlot::new();
        slot.set(clarification()).unwrap();
        slot.take();
        slot.set(security()).unwrap();
        assert_eq!(
            slot.get().unwrap().kind(),
            InterruptKind::SecurityConfirmation
        );
    }

    #[test]
    fn test_take_on_empty_is_none() {
        let mut slot = PendingSlot::new();
        assert!(slot.take().is_none());
    }

    // ---- SecurityAnswer ----

    #[test]
    fn test_classify_grant_permanent() {
        for answer in ["yes", "y", "allow", "allow permanently", "permanently"] {
            assert_eq!(
                SecurityAnswer::classify(answer),
                SecurityAnswer::GrantPermanent,
                "{}",
                answer
            );
        }
    }

    #[test]
    fn test_classify_deny_permanent() {
        for answer in ["no", "n", "block", "deny", "never"] {
            assert_eq!(
                SecurityAnswer::classify(answer),
                SecurityAnswer::DenyPermanent,
                "{}",
                answer
            );
        }
    }

    #[test]
    fn test_classify_grant_once() {
        for answer in ["this time only", "once", "just once", "temporary", "temp"] {
            assert_eq!(
                SecurityAnswer::classify(answer),
                SecurityAnswer::GrantOnce,
                "{}",
                answer
            );
        }
    }

    #[test]
    fn test_classify_trims_and_lowercases() {
        assert_eq!(
            SecurityAnswer::classify("  YES  "),
            SecurityAnswer::GrantPermanent
        );
        assert_eq!(
            SecurityAnswer::classify("This Time Only"),
            SecurityAnswer::GrantOnce
        );
    }

    #[test]
    fn test_classify_unrecognized() {
        for answer in ["maybe", "sure thing", "", "yes please", "nope"] {
            assert_eq!(
                SecurityAnswer::classify(answer),
                SecurityAnswer::Unrecognized,
                "{}",
                answer
            );
        }
    }
}
