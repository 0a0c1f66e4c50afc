//! Background wake-word listener.
//!
//! Watches a stream of transcript fragments for a trigger phrase, then
//! captures a single command within a bounded window and injects it into
//! the shared utterance channel as if it had been typed. On timeout the
//! partial capture is discarded and the listener reverts to idle
//! wake-word watching.
//!
//! The acoustic pipeline itself is external: anything that can produce
//! text fragments implements [`TranscriptSource`].

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::time::{timeout_at, Duration, Instant};
use tracing::{debug, info};

use murmur_core::config::ListenerConfig;

/// Source of transcribed text fragments.
#[async_trait]
pub trait TranscriptSource: Send {
    /// The next fragment, or `None` when the source has ended.
    async fn next_fragment(&mut self) -> Option<String>;
}

enum Capture {
    Command(String),
    TimedOut,
    SourceClosed,
}

/// Wake-word state machine feeding the coordinator's command channel.
pub struct WakeWordListener<S> {
    source: S,
    wake_words: Vec<String>,
    command_timeout: Duration,
    commands: mpsc::Sender<String>,
}

impl<S: TranscriptSource> WakeWordListener<S> {
    pub fn new(source: S, config: &ListenerConfig, commands: mpsc::Sender<String>) -> Self {
        Self {
            source,
            wake_words: config
                .wake_words
                .iter()
                .map(|w| w.to_lowercase())
                .collect(),
            command_timeout: Duration::from_secs(config.command_timeout_secs),
            commands,
        }
    }

    /// Run until the transcript source ends or the command channel closes.
    pub async fn run(mut self) {
        info!(wake_words = ?self.wake_words, "Wake-word listener started");
        loop {
            let Some(fragment) = self.source.next_fragment().await else {
                break;
            };
            let lowered = fragment.to_lowercase();
            if !self.wake_words.iter().any(|w| lowered.contains(w)) {
                continue;
            }
            debug!(fragment = %fragment, "Wake word detected");

            match self.capture_command().await {
                Capture::Command(command) => {
                    if self.commands.send(command).await.is_err() {
                        break;
                    }
                }
                Capture::TimedOut => {
                    debug!("Command capture timed out, back to wake-word watching");
                }
                Capture::SourceClosed => break,
            }
        }
        info!("Wake-word listener stopped");
    }

    /// Wait for the first non-empty fragment within the timeout window.
    async fn capture_command(&mut self) -> Capture {
        let deadline = Instant::now() + self.command_timeout;
        loop {
            match timeout_at(deadline, self.source.next_fragment()).await {
                Ok(Some(fragment)) => {
                    let command = fragment.trim();
                    if !command.is_empty() {
                        return Capture::Command(command.to_string());
                    }
                }
                Ok(None) => return Capture::SourceClosed,
                Err(_) => return Capture::TimedOut,
            }
        }
    }
}
