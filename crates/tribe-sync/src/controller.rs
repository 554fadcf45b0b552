use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::debug;
use uuid::Uuid;

use tribe_api::ChatApi;
use tribe_store::{Busy, ChatStore, SyncKind};
use tribe_types::Message;

use crate::clock::{Clock, SystemClock};
use crate::config::SyncConfig;
use crate::error::{FailureKind, Phase, SyncError, classify};
use crate::logging::{SyncEvent, SyncLog, SyncLogger, TracingLogger};
use crate::merge::{MergeOutcome, merge_messages, merge_participants};
use crate::notify::Notifier;

const COMPONENT: &str = "controller";

/// Longest message text the compose box accepts, in characters.
pub const MAX_MESSAGE_CHARS: usize = 1000;

/// What one poll tick merged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollOutcome {
    pub messages: MergeOutcome,
    pub participants: MergeOutcome,
}

impl PollOutcome {
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty() && self.participants.is_empty()
    }
}

/// Screen-level orchestration of the chat service and the store.
///
/// All store writes happen after the awaited fetches resolve, and only while
/// the controller's cancellation token is live.
pub struct ChatController<A: ChatApi> {
    pub(crate) api: Arc<A>,
    pub(crate) store: ChatStore,
    pub(crate) notifier: Arc<dyn Notifier>,
    pub(crate) logger: Arc<dyn SyncLogger>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) config: SyncConfig,
    pub(crate) cancel: CancellationToken,
}

impl<A: ChatApi> ChatController<A> {
    pub fn new(api: Arc<A>, store: ChatStore, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            store,
            notifier,
            logger: Arc::new(TracingLogger),
            clock: Arc::new(SystemClock),
            config: SyncConfig::default(),
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn SyncLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_config(mut self, config: SyncConfig) -> Self {
        self.config = config;
        self
    }

    pub fn store(&self) -> &ChatStore {
        &self.store
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Tear down: stops the poll task and blocks every pending continuation
    /// from touching the store.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    pub fn is_shut_down(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub(crate) fn log(&self, event: SyncEvent) {
        self.logger.log(SyncLog {
            component: COMPONENT,
            event,
        });
    }

    fn ensure_live(&self) -> Result<(), SyncError> {
        if self.cancel.is_cancelled() {
            Err(SyncError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Classify, log and (for alerting phases) surface a failure.
    fn settle<T>(&self, phase: Phase, result: Result<T, SyncError>) -> Result<T, SyncError> {
        if let Err(err) = &result {
            let failure = classify(phase, err);
            if failure.kind == FailureKind::Cancelled {
                debug!(%phase, "operation abandoned after shutdown");
            } else {
                self.log(SyncEvent::Failed {
                    phase,
                    kind: failure.kind,
                    detail: failure.detail.clone(),
                });
            }
            if failure.should_alert() {
                self.notifier.alert(&failure);
            }
        }
        result
    }

    // -- Initialize --

    /// Load server info and a fresh snapshot. Clears the cache first when the
    /// service reports a different session than the cached one.
    ///
    /// A no-op while another initialize or refresh is still loading.
    pub async fn initialize(&self) -> Result<(), SyncError> {
        if !self.store.try_claim_busy(Busy::LoadingMessages) {
            debug!("snapshot load already in flight");
            return Ok(());
        }
        let result = self.load_snapshot().await;
        self.store.set_busy(Busy::LoadingMessages, false);
        self.settle(Phase::Initialize, result)
    }

    /// Pull-to-refresh: same as [`Self::initialize`].
    pub async fn refresh(&self) -> Result<(), SyncError> {
        self.initialize().await
    }

    async fn load_snapshot(&self) -> Result<(), SyncError> {
        let info = self.api.server_info().await?;
        self.ensure_live()?;

        if let Some(previous) = self.store.session_uuid() {
            if previous != info.session_uuid {
                self.log(SyncEvent::SessionChanged {
                    previous,
                    current: info.session_uuid.clone(),
                });
                self.store.clear();
            }
        }
        self.store.set_session_uuid(info.session_uuid.clone());

        self.store.set_busy(Busy::LoadingParticipants, true);
        let fetched = tokio::try_join!(self.api.latest_messages(), self.api.all_participants());
        self.store.set_busy(Busy::LoadingParticipants, false);
        let (messages, participants) = fetched?;
        self.ensure_live()?;

        let now = self.clock.now_ms();
        let (message_count, participant_count) = (messages.len(), participants.len());
        self.store.mutate(|state| {
            state.set_messages(messages);
            state.set_participants(participants);
            state.set_last_sync(SyncKind::Messages, now);
            state.set_last_sync(SyncKind::Participants, now);
        });

        self.log(SyncEvent::Initialized {
            session: info.session_uuid,
            messages: message_count,
            participants: participant_count,
        });
        Ok(())
    }

    // -- Poll --

    /// One delta poll. Failures are logged, never alerted.
    pub async fn poll_once(&self) -> Result<PollOutcome, SyncError> {
        let result = self.poll_updates().await;
        self.settle(Phase::Poll, result)
    }

    async fn poll_updates(&self) -> Result<PollOutcome, SyncError> {
        self.ensure_live()?;

        let now = self.clock.now_ms();
        let (messages_since, participants_since) = self.store.read(|s| {
            (
                s.last_sync(SyncKind::Messages),
                s.last_sync(SyncKind::Participants),
            )
        });

        let (messages, participants) = tokio::try_join!(
            self.api.message_updates(messages_since),
            self.api.participant_updates(participants_since),
        )?;
        self.ensure_live()?;

        if messages.is_empty() && participants.is_empty() {
            return Ok(PollOutcome::default());
        }

        let outcome = self.store.mutate(|state| {
            let outcome = PollOutcome {
                messages: merge_messages(state, messages),
                participants: merge_participants(state, participants),
            };
            // Only a non-empty response moves the cursor.
            if !outcome.messages.is_empty() {
                state.advance_last_sync(SyncKind::Messages, now);
            }
            if !outcome.participants.is_empty() {
                state.advance_last_sync(SyncKind::Participants, now);
            }
            outcome
        });

        self.log(SyncEvent::UpdatesMerged {
            messages_added: outcome.messages.added,
            messages_updated: outcome.messages.updated,
            participants_added: outcome.participants.added,
            participants_updated: outcome.participants.updated,
        });
        Ok(outcome)
    }

    // -- Send --

    /// Post `text` (trimmed) and merge the server's copy into the store.
    /// Nothing is inserted before the service confirms.
    pub async fn send_message(&self, text: &str) -> Result<Message, SyncError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SyncError::EmptyMessage);
        }
        let len = text.chars().count();
        if len > MAX_MESSAGE_CHARS {
            return Err(SyncError::TooLong {
                len,
                max: MAX_MESSAGE_CHARS,
            });
        }
        if !self.store.try_claim_busy(Busy::SendingMessage) {
            return Err(SyncError::SendInProgress);
        }

        let result = self.post_message(text).await;
        self.store.set_busy(Busy::SendingMessage, false);
        self.settle(Phase::Send, result)
    }

    async fn post_message(&self, text: &str) -> Result<Message, SyncError> {
        let message = self.api.send_message(text).await?;
        self.ensure_live()?;

        // Merge rather than append: a poll may already have delivered it.
        self.store
            .mutate(|state| merge_messages(state, vec![message.clone()]));

        self.log(SyncEvent::MessageSent {
            id: message.uuid.to_string(),
        });
        Ok(message)
    }

    // -- Pagination --

    /// Fetch the page before the oldest local message and merge it.
    /// Returns how many messages were new. No-op on an empty store or while
    /// another page is loading.
    pub async fn load_older(&self) -> Result<usize, SyncError> {
        let Some(oldest) = self.store.oldest_message_id() else {
            return Ok(0);
        };
        if !self.store.try_claim_busy(Busy::LoadingOlder) {
            return Ok(0);
        }

        let result = self.fetch_older(oldest).await;
        self.store.set_busy(Busy::LoadingOlder, false);
        self.settle(Phase::LoadOlder, result)
    }

    async fn fetch_older(&self, oldest: Uuid) -> Result<usize, SyncError> {
        let older = self.api.older_messages(oldest).await?;
        self.ensure_live()?;

        if older.is_empty() {
            return Ok(0);
        }
        let outcome = self.store.mutate(|state| merge_messages(state, older));
        self.log(SyncEvent::OlderLoaded {
            added: outcome.added,
        });
        Ok(outcome.added)
    }
}
