//! Murmur application binary - composition root.
//!
//! Ties the crates together into a single interactive assistant:
//! 1. Load configuration from TOML
//! 2. Initialize tracing
//! 3. Load the learning counters from disk
//! 4. Wire the stdin producer into the coordinator's command channel
//! 5. Save the learning counters on shutdown
//!
//! Spoken input is out of scope for this binary; embedders with an
//! acoustic pipeline can feed the same channel through
//! `murmur_dialogue::WakeWordListener` with their own `TranscriptSource`.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::AsyncBufReadExt;
use tokio::sync::mpsc;
use tracing::{info, warn};

use murmur_core::config::MurmurConfig;
use murmur_core::types::Action;
use murmur_decision::{DecisionEngine, JsonLearningPersistence, LearningPersistence, LearningStore};
use murmur_dialogue::{
    DialogueCoordinator, DomainGate, ExecutionOutcome, Executor, ExecutorError,
    PermissionRegistry, PermissionVerdict, TracingAuditSink,
};

/// Demo executor: simulates actions and routes website access through the
/// domain gate. Real deployments swap this for an executor that drives
/// the browser and OS.
struct GatedExecutor {
    gate: Arc<DomainGate>,
}

#[async_trait]
impl Executor for GatedExecutor {
    async fn execute(
        &self,
        action: Action,
        automation_command: &str,
        parameters: &HashMap<String, String>,
    ) -> Result<ExecutionOutcome, ExecutorError> {
        if let Some(url) = parameters.get("url") {
            match self.gate.check(url) {
                PermissionVerdict::Denied => {
                    return Ok(ExecutionOutcome::Completed(format!(
                        "Access to {} is restricted.",
                        url
                    )));
                }
                PermissionVerdict::Ask => {
                    return Ok(ExecutionOutcome::PermissionRequired {
                        resource: url.clone(),
                    });
                }
                PermissionVerdict::Allowed => {}
            }
        }
        info!(%action, automation_command, "Simulated execution");
        Ok(ExecutionOutcome::Completed(format!(
            "Done: {}.",
            automation_command
        )))
    }
}

fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join(rest);
        }
    }
    PathBuf::from(path)
}

#[tokio::main]
async fn main() -> murmur_core::Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| expand_home("~/.murmur/config.toml"));
    let config = MurmurConfig::load_or_default(&config_path);

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(&config.general.log_level)
            }),
        )
        .init();

    let data_dir = expand_home(&config.general.data_dir);
    let persistence = JsonLearningPersistence::new(data_dir.join("learning.json"));
    let learning = persistence.load().unwrap_or_else(|e| {
        warn!(error = %e, "Could not load learning data, starting fresh");
        LearningStore::new()
    });

    let gate = Arc::new(DomainGate::with_lists(
        &config.security.trusted_sites,
        &config.security.blocked_sites,
    ));
    let coordinator = DialogueCoordinator::new(
        &config.decision,
        DecisionEngine::new(config.decision.clone()),
        GatedExecutor {
            gate: Arc::clone(&gate),
        },
        Arc::clone(&gate),
        TracingAuditSink,
        learning,
    );

    // One ordered channel; the stdin task is the foreground producer. A
    // wake-word listener task would send into a clone of the same sender.
    let (tx, mut rx) = mpsc::channel::<String>(16);
    tokio::spawn(async move {
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        let mut lines = stdin.lines();
        while let Ok(Some(line)) = lines.next_line().await {
            let line = line.trim().to_string();
            if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
                break;
            }
            if line.is_empty() {
                continue;
            }
            if tx.send(line).await.is_err() {
                break;
            }
        }
        // Dropping the sender ends the session loop.
    });

    println!("Murmur is listening. Type a command, or 'exit' to quit.");
    while let Some(utterance) = rx.recv().await {
        let reply = coordinator.handle_utterance(&utterance).await;
        println!("{}", reply.text());
    }

    persistence.save(&coordinator.learning_snapshot().await)?;
    info!("Session ended");
    Ok(())
}
