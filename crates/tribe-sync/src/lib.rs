/// Tribe chat controller.
///
/// Drives the chat screen's data: initial load with session-change
/// detection, fixed-interval delta polling merged by id, and sending.

pub mod clock;
pub mod config;
pub mod controller;
pub mod error;
pub mod logging;
pub mod merge;
pub mod notify;
pub mod poll;

pub use clock::{Clock, SystemClock};
pub use config::{DEFAULT_POLL_INTERVAL, MAX_POLL_INTERVAL, SyncConfig};
pub use controller::{ChatController, MAX_MESSAGE_CHARS, PollOutcome};
pub use error::{Failure, FailureKind, Phase, SyncError, classify};
pub use logging::{NullLogger, SyncEvent, SyncLog, SyncLogger, TracingLogger};
pub use merge::{MergeOutcome, merge_messages, merge_participants};
pub use notify::Notifier;
pub use poll::PollHandle;
