//! The dialogue coordinator state machine.
//!
//! Single entry point for all incoming text. While a pending interrupt is
//! outstanding, incoming utterances are matched against its resolution
//! grammar first and never re-enter fresh intent resolution, so a second
//! interrupt can never be created over the first. The whole decision path
//! runs under one mutex: the background listener and the foreground input
//! loop both inject utterances, but only one decision is ever in flight.

use serde_json::json;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use murmur_core::config::DecisionConfig;
use murmur_core::types::{Action, Intent, SessionContext, TurnRecord};
use murmur_decision::{
    Alternatives, Decision, DecisionEngine, FailureReason, LearningStore,
};

use crate::pending::{InterruptKind, PendingInterrupt, PendingSlot, SecurityAnswer};
use crate::traits::{AuditSink, ExecutionOutcome, Executor, GrantScope, PermissionRegistry};

/// Coordinator state, derived from the pending interrupt slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogueState {
    Idle,
    AwaitingSecurityDecision,
    AwaitingClarification,
}

/// What the coordinator has to say back for one utterance.
#[derive(Debug, Clone)]
pub enum SessionReply {
    /// An action was dispatched and completed.
    Executed {
        message: String,
        intent: Intent,
        action: Action,
    },
    /// The turn resolved without dispatching anything (e.g. a denial).
    Acknowledged { message: String },
    /// A pending interrupt wants a follow-up answer.
    NeedsAnswer {
        prompt: String,
        kind: InterruptKind,
    },
    /// Nothing matched; the user should rephrase.
    NotUnderstood { message: String },
    /// Something went wrong; the turn was abandoned and state is idle.
    Failed { message: String },
}

impl SessionReply {
    /// The user-facing text of this reply.
    pub fn text(&self) -> &str {
        match self {
            SessionReply::Executed { message, .. } => message,
            SessionReply::Acknowledged { message } => message,
            SessionReply::NeedsAnswer { prompt, .. } => prompt,
            SessionReply::NotUnderstood { message } => message,
            SessionReply::Failed { message } => message,
        }
    }
}

struct SessionState {
    context: SessionContext,
    learning: LearningStore,
    pending: PendingSlot,
    clarification_retried: bool,
}

/// Top-level dialogue coordinator.
///
/// Owns the session context, the learning counters, and the pending
/// interrupt slot; all three are only touched while the state mutex is
/// held.
pub struct DialogueCoordinator<E, P, A> {
    engine: DecisionEngine,
    executor: E,
    permissions: P,
    audit: A,
    learning_enabled: bool,
    state: Mutex<SessionState>,
}

impl<E, P, A> DialogueCoordinator<E, P, A>
where
    E: Executor,
    P: PermissionRegistry,
    A: AuditSink,
{
    pub fn new(
        config: &DecisionConfig,
        engine: DecisionEngine,
        executor: E,
        permissions: P,
        audit: A,
        learning: LearningStore,
    ) -> Self {
        Self::with_session_context(
            config,
            engine,
            executor,
            permissions,
            audit,
            learning,
            SessionContext::new(config.context_window),
        )
    }

    /// Construct with an explicit session context (pins the time bucket).
    #[allow(clippy::too_many_arguments)]
    pub fn with_session_context(
        config: &DecisionConfig,
        engine: DecisionEngine,
        executor: E,
        permissions: P,
        audit: A,
        learning: LearningStore,
        context: SessionContext,
    ) -> Self {
        Self {
            engine,
            executor,
            permissions,
            audit,
            learning_enabled: config.learning_enabled,
            state: Mutex::new(SessionState {
                context,
                learning,
                pending: PendingSlot::new(),
                clarification_retried: false,
            }),
        }
    }

    /// The only entry point. Routes to the pending interrupt when one is
    /// outstanding, otherwise runs fresh intent resolution.
    pub async fn handle_utterance(&self, text: &str) -> SessionReply {
        let mut state = self.state.lock().await;
        let text = text.trim();

        match state.pending.get().map(PendingInterrupt::kind) {
            Some(InterruptKind::SecurityConfirmation) => {
                self.handle_security_answer(&mut state, text).await
            }
            Some(InterruptKind::DecisionClarification) => {
                self.handle_clarification_answer(&mut state, text).await
            }
            None => self.handle_command(&mut state, text).await,
        }
    }

    /// Alias for answering an outstanding interrupt; `handle_utterance`
    /// already routes by state, this just names the intent at call sites.
    pub async fn handle_interrupt_answer(&self, text: &str) -> SessionReply {
        self.handle_utterance(text).await
    }

    pub async fn dialogue_state(&self) -> DialogueState {
        let state = self.state.lock().await;
        match state.pending.get().map(PendingInterrupt::kind) {
            None => DialogueState::Idle,
            Some(InterruptKind::SecurityConfirmation) => DialogueState::AwaitingSecurityDecision,
            Some(InterruptKind::DecisionClarification) => DialogueState::AwaitingClarification,
        }
    }

    /// Snapshot of the learning counters, for shutdown persistence.
    pub async fn learning_snapshot(&self) -> LearningStore {
        self.state.lock().await.learning.clone()
    }

    async fn handle_command(&self, state: &mut SessionState, command: &str) -> SessionReply {
        let decision = self
            .engine
            .decide(command, &state.context, &state.learning);
        self.apply_decision(state, command, decision).await
    }

    async fn apply_decision(
        &self,
        state: &mut SessionState,
        original_command: &str,
        decision: Decision,
    ) -> SessionReply {
        match decision {
            Decision::Failed { reason } => {
                if let FailureReason::EmptyActionSet(intent) = reason {
                    // Configuration defect: generic reply, loud log.
                    error!(%intent, "Knowledge base entry has no actions");
                    self.audit.record(
                        "dialogue",
                        "empty_action_set",
                        json!({ "intent": intent.to_string() }),
                    );
                }
                let message = match reason {
                    FailureReason::EmptyCommand => "I need a command to work with.".to_string(),
                    _ => "I'm not sure how to help with that. Could you rephrase?".to_string(),
                };
                SessionReply::NotUnderstood { message }
            }
            Decision::NeedsClarification {
                intent,
                confidence,
                message,
                alternatives,
            } => {
                debug!(?intent, confidence, "Clarification required");
                state.clarification_retried = false;
                let interrupt = PendingInterrupt::DecisionClarification {
                    original_command: original_command.to_string(),
                    intent,
                    alternatives,
                    prompt: message.clone(),
                };
                if let Err(e) = state.pending.set(interrupt) {
                    error!(error = %e, "Could not store clarification interrupt");
                    return SessionReply::Failed {
                        message: "I lost track of the conversation. Let's start over.".to_string(),
                    };
                }
                self.audit.record(
                    "dialogue",
                    "clarification_requested",
                    json!({
                        "intent": intent.map(|i| i.to_string()),
                        "confidence": confidence,
                    }),
                );
                SessionReply::NeedsAnswer {
                    prompt: message,
                    kind: InterruptKind::DecisionClarification,
                }
            }
            Decision::Resolved {
                intent,
                action,
                automation_command,
                parameters,
                confidence,
            } => {
                info!(%intent, %action, confidence, "Dispatching action");
                self.dispatch(
                    state,
                    original_command,
                    intent,
                    action,
                    automation_command,
                    parameters,
                )
                .await
            }
        }
    }

    async fn dispatch(
        &self,
        state: &mut SessionState,
        original_command: &str,
        intent: Intent,
        action: Action,
        automation_command: String,
        parameters: std::collections::HashMap<String, String>,
    ) -> SessionReply {
        self.audit.record(
            "dialogue",
            "dispatch",
            json!({
                "id": Uuid::new_v4().to_string(),
                "intent": intent.to_string(),
                "action": action.to_string(),
                "automation_command": automation_command,
            }),
        );

        match self
            .executor
            .execute(action, &automation_command, &parameters)
            .await
        {
            Ok(ExecutionOutcome::Completed(message)) => {
                self.finish_turn(state, original_command, intent, action);
                SessionReply::Executed {
                    message,
                    intent,
                    action,
                }
            }
            Ok(ExecutionOutcome::PermissionRequired { resource }) => {
                let interrupt = PendingInterrupt::SecurityConfirmation {
                    resource: resource.clone(),
                    original_command: original_command.to_string(),
                    intent,
                    action,
                    automation_command,
                    parameters,
                };
                if let Err(e) = state.pending.set(interrupt) {
                    error!(error = %e, "Could not store security interrupt");
                    return SessionReply::Failed {
                        message: "I lost track of the conversation. Let's start over.".to_string(),
                    };
                }
                self.audit
                    .record("dialogue", "security_prompt", json!({ "resource": resource }));
                SessionReply::NeedsAnswer {
                    prompt: format!(
                        "'{}' is new to me. Should I allow access? (yes / no / this time only)",
                        resource
                    ),
                    kind: InterruptKind::SecurityConfirmation,
                }
            }
            Err(e) => {
                error!(error = %e, %action, "Executor failed");
                self.audit.record(
                    "dialogue",
                    "executor_failure",
                    json!({ "action": action.to_string(), "error": e.to_string() }),
                );
                SessionReply::Failed {
                    message: "Something went wrong while carrying that out. Please try again."
                        .to_string(),
                }
            }
        }
    }

    fn finish_turn(
        &self,
        state: &mut SessionState,
        utterance: &str,
        intent: Intent,
        action: Action,
    ) {
        state.context.record_turn(TurnRecord {
            utterance: utterance.to_string(),
            intent,
            action,
        });
        if self.learning_enabled {
            state.learning.record(intent, action);
        }
        self.audit.record(
            "dialogue",
            "turn_completed",
            json!({
                "utterance": utterance,
                "intent": intent.to_string(),
                "action": action.to_string(),
            }),
        );
    }

    async fn handle_security_answer(
        &self,
        state: &mut SessionState,
        answer: &str,
    ) -> SessionReply {
        let classified = SecurityAnswer::classify(answer);
        if classified == SecurityAnswer::Unrecognized {
            // Re-prompt; the interrupt stays armed.
            return SessionReply::NeedsAnswer {
                prompt: "I didn't catch that. Please answer 'yes', 'no', or 'this time only'."
                    .to_string(),
                kind: InterruptKind::SecurityConfirmation,
            };
        }

        let Some(PendingInterrupt::SecurityConfirmation {
            resource,
            original_command,
            intent,
            action,
            automation_command,
            parameters,
        }) = state.pending.take()
        else {
            error!("Security answer routed without a security interrupt");
            return SessionReply::Failed {
                message: "I lost track of the conversation. Let's start over.".to_string(),
            };
        };

        self.audit.record(
            "dialogue",
            "security_decision",
            json!({ "resource": resource, "decision": answer }),
        );

        match classified {
            SecurityAnswer::DenyPermanent => {
                self.permissions.deny(&resource);
                SessionReply::Acknowledged {
                    message: format!(
                        "Understood. '{}' is now blocked; access will be denied from here on.",
                        resource
                    ),
                }
            }
            SecurityAnswer::GrantPermanent | SecurityAnswer::GrantOnce => {
                let (scope, note) = if classified == SecurityAnswer::GrantPermanent {
                    (
                        GrantScope::Permanent,
                        format!("Added '{}' to the trusted list.", resource),
                    )
                } else {
                    (
                        GrantScope::Once,
                        format!("Granting one-time access to '{}'.", resource),
                    )
                };
                self.permissions.grant(&resource, scope);

                // Re-dispatch the held-back action.
                match self
                    .executor
                    .execute(action, &automation_command, &parameters)
                    .await
                {
                    Ok(ExecutionOutcome::Completed(message)) => {
                        self.finish_turn(state, &original_command, intent, action);
                        SessionReply::Executed {
                            message: format!("{} {}", note, message),
                            intent,
                            action,
                        }
                    }
                    Ok(ExecutionOutcome::PermissionRequired { resource }) => {
                        // Do not re-arm the interrupt: a grant that does not
                        // satisfy the executor would ping-pong forever.
                        warn!(%resource, "Executor still requires permission after grant");
                        SessionReply::Failed {
                            message: "That still requires a permission I couldn't obtain."
                                .to_string(),
                        }
                    }
                    Err(e) => {
                        error!(error = %e, "Executor failed after permission grant");
                        SessionReply::Failed {
                            message:
                                "Something went wrong while carrying that out. Please try again."
                                    .to_string(),
                        }
                    }
                }
            }
            SecurityAnswer::Unrecognized => unreachable!("handled above"),
        }
    }

    async fn handle_clarification_answer(
        &self,
        state: &mut SessionState,
        answer: &str,
    ) -> SessionReply {
        let Some(PendingInterrupt::DecisionClarification {
            original_command,
            intent,
            alternatives,
            prompt,
        }) = state.pending.get().cloned()
        else {
            error!("Clarification answer routed without a clarification interrupt");
            return SessionReply::Failed {
                message: "I lost track of the conversation. Let's start over.".to_string(),
            };
        };

        let lowered = answer.to_lowercase();

        // Match the reply against the stored candidates, first match in
        // declared order. Candidate names compare with separators
        // rendered as spaces.
        let resolved = match &alternatives {
            Alternatives::Actions(actions) => actions
                .iter()
                .find(|a| lowered.contains(&a.spoken_name()))
                .and_then(|&action| {
                    intent.map(|intent| {
                        self.engine.decide_forced_action(
                            &original_command,
                            intent,
                            action,
                            &state.context,
                        )
                    })
                }),
            Alternatives::Intents(intents) => intents
                .iter()
                .find(|i| lowered.contains(&i.spoken_name()))
                .map(|&intent| {
                    self.engine.decide_for_intent(
                        &original_command,
                        intent,
                        &state.context,
                        &state.learning,
                    )
                }),
        };

        match resolved {
            Some(decision) => {
                state.pending.take();
                state.clarification_retried = false;
                self.apply_decision(state, &original_command, decision).await
            }
            None if !state.clarification_retried => {
                state.clarification_retried = true;
                SessionReply::NeedsAnswer {
                    prompt: format!("I didn't catch that. {}", prompt),
                    kind: InterruptKind::DecisionClarification,
                }
            }
            None => {
                // Repeated misunderstanding: avoid deadlocking the
                // conversation by treating original + answer as a fresh turn.
                state.pending.take();
                state.clarification_retried = false;
                let combined = format!("{} {}", original_command, answer);
                debug!(combined = %combined, "Clarification fallback, retrying as fresh command");
                self.handle_command(state, &combined).await
            }
        }
    }
}
