//! Dialogue coordination for Murmur.
//!
//! Owns the per-session state machine: serializes decision attempts,
//! tracks at most one pending interrupt (a security confirmation or a
//! clarification request), routes incoming utterances accordingly, and
//! dispatches resolved actions to the external executor collaborator.

pub mod coordinator;
pub mod listener;
pub mod pending;
pub mod security;
pub mod traits;

pub use coordinator::{DialogueCoordinator, DialogueState, SessionReply};
pub use listener::{TranscriptSource, WakeWordListener};
pub use pending::{InterruptKind, PendingError, PendingInterrupt, PendingSlot, SecurityAnswer};
pub use security::DomainGate;
pub use traits::{
    AuditSink, ExecutionOutcome, Executor, ExecutorError, GrantScope, PermissionRegistry,
    PermissionVerdict, TracingAuditSink,
};
