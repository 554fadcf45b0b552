/// Sync logging trait for structured diagnostics.
///
/// The controller and poller report lifecycle events and failures here;
/// user-facing alerts go through [`crate::Notifier`] instead.

use std::fmt;

use crate::error::{FailureKind, Phase};

/// Structured log entry for a sync operation.
#[derive(Debug, Clone)]
pub struct SyncLog {
    pub component: &'static str,
    pub event: SyncEvent,
}

/// Sync events that can be logged.
#[derive(Debug, Clone)]
pub enum SyncEvent {
    /// Cached data belonged to another backend session and was dropped
    SessionChanged {
        previous: String,
        current: String,
    },
    /// Initial snapshot applied
    Initialized {
        session: String,
        messages: usize,
        participants: usize,
    },
    /// Poll returned at least one changed record
    UpdatesMerged {
        messages_added: usize,
        messages_updated: usize,
        participants_added: usize,
        participants_updated: usize,
    },
    /// Server confirmed a sent message
    MessageSent {
        id: String,
    },
    /// Older page merged
    OlderLoaded {
        added: usize,
    },
    /// Poll task started
    PollStarted {
        interval_ms: u64,
    },
    /// Poll task exited
    PollStopped,
    /// Operation failed
    Failed {
        phase: Phase,
        kind: FailureKind,
        detail: String,
    },
}

impl fmt::Display for SyncEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SessionChanged { previous, current } => {
                write!(f, "session_changed previous={} current={}", previous, current)
            }
            Self::Initialized { session, messages, participants } => {
                write!(f, "initialized session={} messages={} participants={}", session, messages, participants)
            }
            Self::UpdatesMerged { messages_added, messages_updated, participants_added, participants_updated } => {
                write!(
                    f,
                    "updates_merged messages=+{}/~{} participants=+{}/~{}",
                    messages_added, messages_updated, participants_added, participants_updated
                )
            }
            Self::MessageSent { id } => {
                write!(f, "message_sent id={}", id)
            }
            Self::OlderLoaded { added } => {
                write!(f, "older_loaded added={}", added)
            }
            Self::PollStarted { interval_ms } => {
                write!(f, "poll_started interval_ms={}", interval_ms)
            }
            Self::PollStopped => {
                write!(f, "poll_stopped")
            }
            Self::Failed { phase, kind, detail } => {
                write!(f, "failed phase={} kind={}: {}", phase, kind, detail)
            }
        }
    }
}

/// Trait for sync logging. Implementations can write to tracing or discard.
pub trait SyncLogger: Send + Sync {
    fn log(&self, entry: SyncLog);
}

/// Logger that uses the `tracing` crate.
pub struct TracingLogger;

impl SyncLogger for TracingLogger {
    fn log(&self, entry: SyncLog) {
        match &entry.event {
            SyncEvent::Failed { .. } => {
                tracing::warn!(component = entry.component, "{}", entry.event);
            }
            SyncEvent::UpdatesMerged { .. } | SyncEvent::OlderLoaded { .. } => {
                tracing::debug!(component = entry.component, "{}", entry.event);
            }
            _ => {
                tracing::info!(component = entry.component, "{}", entry.event);
            }
        }
    }
}

/// No-op logger that discards all log entries.
pub struct NullLogger;

impl SyncLogger for NullLogger {
    fn log(&self, _entry: SyncLog) {}
}
