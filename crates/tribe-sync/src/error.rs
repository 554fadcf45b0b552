use std::fmt;

use thiserror::Error;

use tribe_api::ApiError;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("message text is empty")]
    EmptyMessage,

    #[error("a message is already being sent")]
    SendInProgress,

    #[error("message is {len} characters, limit is {max}")]
    TooLong { len: usize, max: usize },

    #[error("chat controller was shut down")]
    Cancelled,
}

/// Which controller operation a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Initialize,
    Poll,
    Send,
    LoadOlder,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Initialize => "initialize",
            Self::Poll => "poll",
            Self::Send => "send",
            Self::LoadOlder => "load_older",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Service unreachable or connection dropped.
    Network,
    /// Service answered with a non-success status.
    Server,
    /// Response body did not match the expected shape.
    Decode,
    /// Refused locally before any request was made.
    Rejected,
    /// Controller torn down while the operation was in flight.
    Cancelled,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Network => "network",
            Self::Server => "server",
            Self::Decode => "decode",
            Self::Rejected => "rejected",
            Self::Cancelled => "cancelled",
        })
    }
}

/// A classified failure, shared by the notifier and the sync logger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub phase: Phase,
    pub kind: FailureKind,
    /// Short user-facing text.
    pub message: String,
    /// Underlying error, for diagnostics.
    pub detail: String,
}

impl Failure {
    /// Poll failures stay silent; the next tick is the retry.
    pub fn should_alert(&self) -> bool {
        self.phase != Phase::Poll
            && !matches!(self.kind, FailureKind::Cancelled | FailureKind::Rejected)
    }
}

pub fn classify(phase: Phase, err: &SyncError) -> Failure {
    let kind = match err {
        SyncError::Api(ApiError::Status { .. }) => FailureKind::Server,
        SyncError::Api(ApiError::Decode { .. }) => FailureKind::Decode,
        SyncError::Api(ApiError::Transport { .. } | ApiError::Client(_)) => FailureKind::Network,
        SyncError::EmptyMessage | SyncError::SendInProgress | SyncError::TooLong { .. } => {
            FailureKind::Rejected
        }
        SyncError::Cancelled => FailureKind::Cancelled,
    };

    let message = match phase {
        Phase::Initialize => "Failed to load chat data",
        Phase::Poll => "Failed to poll for updates",
        Phase::Send => "Failed to send message",
        Phase::LoadOlder => "Failed to load older messages",
    };

    Failure {
        phase,
        kind,
        message: message.to_string(),
        detail: err.to_string(),
    }
}
