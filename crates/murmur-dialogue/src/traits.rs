//! Collaborator traits consumed by the dialogue coordinator.
//!
//! Literal action execution, permission bookkeeping, and audit logging
//! live outside this core; the coordinator only sees these narrow
//! interfaces.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use murmur_core::types::Action;

/// Outcome of dispatching an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutcome {
    /// The action completed; the string is the human-readable result.
    Completed(String),
    /// The action touches a resource the user has not yet allowed.
    /// Triggers the security confirmation sub-flow.
    PermissionRequired { resource: String },
}

/// Errors raised by the executor collaborator. Caught at the coordinator
/// boundary and never propagated as a crash.
#[derive(Debug, thiserror::Error)]
pub enum ExecutorError {
    #[error("Action execution failed: {0}")]
    Failed(String),
}

/// Executes a resolved action.
#[async_trait]
pub trait Executor: Send + Sync {
    async fn execute(
        &self,
        action: Action,
        automation_command: &str,
        parameters: &HashMap<String, String>,
    ) -> Result<ExecutionOutcome, ExecutorError>;
}

#[async_trait]
impl<T: Executor + ?Sized> Executor for Arc<T> {
    async fn execute(
        &self,
        action: Action,
        automation_command: &str,
        parameters: &HashMap<String, String>,
    ) -> Result<ExecutionOutcome, ExecutorError> {
        (**self).execute(action, automation_command, parameters).await
    }
}

/// Verdict for a resource permission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionVerdict {
    Allowed,
    Denied,
    /// Unknown resource: the user must be asked.
    Ask,
}

/// How long a grant lasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrantScope {
    Permanent,
    Once,
}

/// Permission bookkeeping for guarded resources.
pub trait PermissionRegistry: Send + Sync {
    fn check(&self, resource: &str) -> PermissionVerdict;
    fn grant(&self, resource: &str, scope: GrantScope);
    fn deny(&self, resource: &str);
}

impl<T: PermissionRegistry + ?Sized> PermissionRegistry for Arc<T> {
    fn check(&self, resource: &str) -> PermissionVerdict {
        (**self).check(resource)
    }
    fn grant(&self, resource: &str, scope: GrantScope) {
        (**self).grant(resource, scope)
    }
    fn deny(&self, resource: &str) {
        (**self).deny(resource)
    }
}

/// Fire-and-forget audit trail. Implementations must never fail the
/// decision path.
pub trait AuditSink: Send + Sync {
    fn record(&self, component: &str, event: &str, details: serde_json::Value);
}

impl<T: AuditSink + ?Sized> AuditSink for Arc<T> {
    fn record(&self, component: &str, event: &str, details: serde_json::Value) {
        (**self).record(component, event, details)
    }
}

/// Audit sink that forwards records to the tracing subscriber.
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, component: &str, event: &str, details: serde_json::Value) {
        tracing::info!(component, event, details = %details, "audit");
    }
}
