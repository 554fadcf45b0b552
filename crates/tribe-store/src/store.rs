use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, info, warn};
use uuid::Uuid;

use tribe_types::{Message, Participant, Timestamp};

use crate::state::{Busy, ChatState, SyncKind};
use crate::{BlobStore, StoreError};

/// Fixed namespace the persisted state lives under.
pub const STORAGE_KEY: &str = "tribe-chat-storage";

const PERSIST_VERSION: u32 = 0;

/// Durable subset of [`ChatState`]: everything except busy flags.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PersistedStateRef<'a> {
    messages: &'a [Message],
    participants: &'a [Participant],
    session_uuid: Option<&'a str>,
    last_message_update_time: Timestamp,
    last_participant_update_time: Timestamp,
}

#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct PersistedState {
    messages: Vec<Message>,
    participants: Vec<Participant>,
    session_uuid: Option<String>,
    last_message_update_time: Timestamp,
    last_participant_update_time: Timestamp,
}

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    state: PersistedStateRef<'a>,
    version: u32,
}

#[derive(Deserialize)]
struct Envelope {
    state: PersistedState,
}

fn encode(state: &ChatState) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(&EnvelopeRef {
        state: PersistedStateRef {
            messages: &state.messages,
            participants: &state.participants,
            session_uuid: state.session_uuid.as_deref(),
            last_message_update_time: state.last_message_update_time,
            last_participant_update_time: state.last_participant_update_time,
        },
        version: PERSIST_VERSION,
    })
}

fn decode(bytes: &[u8]) -> Result<ChatState, serde_json::Error> {
    let envelope: Envelope = serde_json::from_slice(bytes)?;
    let persisted = envelope.state;

    let mut state = ChatState {
        participants: persisted.participants,
        session_uuid: persisted.session_uuid,
        last_message_update_time: persisted.last_message_update_time,
        last_participant_update_time: persisted.last_participant_update_time,
        ..ChatState::default()
    };
    state.set_messages(persisted.messages);
    Ok(state)
}

/// Shared handle to the chat state.
///
/// Every mutation runs under one lock, is written through to the blob store
/// (busy flags excepted), and bumps a revision observers can wait on.
#[derive(Clone)]
pub struct ChatStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    state: Mutex<ChatState>,
    storage: Arc<dyn BlobStore>,
    key: String,
    revision: watch::Sender<u64>,
}

impl ChatStore {
    /// Hydrate from `storage` under [`STORAGE_KEY`].
    pub fn load(storage: Arc<dyn BlobStore>) -> Self {
        Self::load_with_key(storage, STORAGE_KEY)
    }

    /// Hydrate from `storage`. Missing or unreadable data yields an empty state.
    pub fn load_with_key(storage: Arc<dyn BlobStore>, key: impl Into<String>) -> Self {
        let key = key.into();

        let state = match storage.get(&key) {
            Ok(Some(bytes)) => match decode(&bytes) {
                Ok(state) => {
                    info!(
                        messages = state.messages.len(),
                        participants = state.participants.len(),
                        "Restored cached chat state"
                    );
                    state
                }
                Err(e) => {
                    warn!("Discarding corrupt cached chat state: {}", e);
                    ChatState::default()
                }
            },
            Ok(None) => ChatState::default(),
            Err(e) => {
                warn!("Could not read cached chat state: {}", e);
                ChatState::default()
            }
        };

        let (revision, _) = watch::channel(0);
        Self {
            inner: Arc::new(StoreInner {
                state: Mutex::new(state),
                storage,
                key,
                revision,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ChatState> {
        self.inner.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Clone of the current state.
    pub fn snapshot(&self) -> ChatState {
        self.lock().clone()
    }

    pub fn read<T>(&self, f: impl FnOnce(&ChatState) -> T) -> T {
        f(&self.lock())
    }

    /// Receiver whose value changes after every mutation.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.inner.revision.subscribe()
    }

    /// Apply `f` atomically, then persist and notify once.
    pub fn mutate<T>(&self, f: impl FnOnce(&mut ChatState) -> T) -> T {
        let out = {
            let mut state = self.lock();
            let out = f(&mut state);
            if let Err(e) = self.write_through(&state) {
                warn!("Failed to persist chat state: {}", e);
            }
            out
        };
        self.notify();
        out
    }

    /// Write the current state to the blob store now.
    pub fn flush(&self) -> Result<(), StoreError> {
        let state = self.lock();
        self.write_through(&state)
    }

    fn write_through(&self, state: &ChatState) -> Result<(), StoreError> {
        let bytes = encode(state)?;
        self.inner.storage.set(&self.inner.key, &bytes)?;
        debug!(bytes = bytes.len(), "Persisted chat state");
        Ok(())
    }

    fn notify(&self) {
        self.inner.revision.send_modify(|rev| *rev = rev.wrapping_add(1));
    }

    // -- Messages --

    pub fn set_messages(&self, messages: Vec<Message>) {
        self.mutate(|s| s.set_messages(messages));
    }

    pub fn add_message(&self, message: Message) {
        self.mutate(|s| s.add_message(message));
    }

    pub fn update_message(&self, message: Message) -> bool {
        self.mutate(|s| s.update_message(message))
    }

    pub fn contains_message(&self, id: Uuid) -> bool {
        self.read(|s| s.contains_message(id))
    }

    pub fn oldest_message_id(&self) -> Option<Uuid> {
        self.read(|s| s.oldest_message().map(|m| m.uuid))
    }

    // -- Participants --

    pub fn set_participants(&self, participants: Vec<Participant>) {
        self.mutate(|s| s.set_participants(participants));
    }

    pub fn add_participant(&self, participant: Participant) {
        self.mutate(|s| s.add_participant(participant));
    }

    pub fn update_participant(&self, participant: Participant) -> bool {
        self.mutate(|s| s.update_participant(participant))
    }

    pub fn participant(&self, id: Uuid) -> Option<Participant> {
        self.read(|s| s.participant(id).cloned())
    }

    // -- Session / sync bookkeeping --

    pub fn session_uuid(&self) -> Option<String> {
        self.read(|s| s.session_uuid.clone())
    }

    pub fn set_session_uuid(&self, session_uuid: impl Into<String>) {
        let session_uuid = session_uuid.into();
        self.mutate(|s| s.set_session_uuid(session_uuid));
    }

    pub fn last_sync(&self, kind: SyncKind) -> Timestamp {
        self.read(|s| s.last_sync(kind))
    }

    pub fn set_last_sync(&self, kind: SyncKind, time: Timestamp) {
        self.mutate(|s| s.set_last_sync(kind, time));
    }

    pub fn clear(&self) {
        self.mutate(ChatState::clear);
    }

    // -- Busy flags (not persisted) --

    pub fn is_busy(&self, flag: Busy) -> bool {
        self.read(|s| s.busy.get(flag))
    }

    pub fn set_busy(&self, flag: Busy, value: bool) {
        self.lock().busy.set(flag, value);
        self.notify();
    }

    /// Set `flag` only if it is currently clear. Returns whether it was claimed.
    pub fn try_claim_busy(&self, flag: Busy) -> bool {
        let claimed = {
            let mut state = self.lock();
            if state.busy.get(flag) {
                false
            } else {
                state.busy.set(flag, true);
                true
            }
        };
        if claimed {
            self.notify();
        }
        claimed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryBlobStore;

    fn msg(n: u128, sent_at: Timestamp) -> Message {
        Message {
            uuid: Uuid::from_u128(n),
            text: format!("m{}", n),
            attachments: vec![],
            reply_to_message: None,
            reactions: vec![],
            author_uuid: Uuid::from_u128(1000),
            sent_at,
            updated_at: sent_at,
        }
    }

    fn person(n: u128) -> Participant {
        Participant {
            uuid: Uuid::from_u128(n),
            name: format!("p{}", n),
            bio: Some("hi".into()),
            avatar_url: None,
            email: None,
            job_title: None,
            created_at: 1,
            updated_at: 2,
        }
    }

    #[test]
    fn reload_restores_persisted_fields() {
        let storage = Arc::new(MemoryBlobStore::new());

        let store = ChatStore::load(storage.clone());
        store.set_messages(vec![msg(2, 20), msg(1, 10)]);
        store.set_participants(vec![person(1)]);
        store.set_session_uuid("session-a");
        store.set_last_sync(SyncKind::Messages, 111);
        store.set_last_sync(SyncKind::Participants, 222);
        store.set_busy(Busy::LoadingMessages, true);

        let reloaded = ChatStore::load(storage).snapshot();
        assert_eq!(reloaded.messages.len(), 2);
        assert_eq!(reloaded.messages[0].sent_at, 10);
        assert_eq!(reloaded.participants, vec![person(1)]);
        assert_eq!(reloaded.session_uuid.as_deref(), Some("session-a"));
        assert_eq!(reloaded.last_message_update_time, 111);
        assert_eq!(reloaded.last_participant_update_time, 222);
        assert!(!reloaded.busy.loading_messages);
    }

    #[test]
    fn persisted_blob_uses_envelope_layout() {
        let storage = Arc::new(MemoryBlobStore::new());
        let store = ChatStore::load(storage.clone());
        store.set_session_uuid("s");

        let raw = storage.get(STORAGE_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_slice(&raw).unwrap();
        assert_eq!(value["version"], 0);
        assert_eq!(value["state"]["sessionUuid"], "s");
        assert_eq!(value["state"]["lastMessageUpdateTime"], 0);
        assert!(value["state"].get("busy").is_none());
    }

    #[test]
    fn corrupt_blob_loads_empty() {
        let storage = Arc::new(MemoryBlobStore::new());
        storage.set(STORAGE_KEY, b"{not json").unwrap();

        let store = ChatStore::load(storage);
        assert_eq!(store.snapshot(), ChatState::default());
    }

    #[test]
    fn missing_blob_loads_empty() {
        let store = ChatStore::load(Arc::new(MemoryBlobStore::new()));
        assert_eq!(store.snapshot(), ChatState::default());
    }

    #[test]
    fn busy_flags_do_not_write_through() {
        let storage = Arc::new(MemoryBlobStore::new());
        let store = ChatStore::load(storage.clone());
        store.set_busy(Busy::SendingMessage, true);
        assert!(storage.get(STORAGE_KEY).unwrap().is_none());
        assert!(store.is_busy(Busy::SendingMessage));
    }

    #[test]
    fn try_claim_busy_is_exclusive() {
        let store = ChatStore::load(Arc::new(MemoryBlobStore::new()));
        assert!(store.try_claim_busy(Busy::SendingMessage));
        assert!(!store.try_claim_busy(Busy::SendingMessage));
        store.set_busy(Busy::SendingMessage, false);
        assert!(store.try_claim_busy(Busy::SendingMessage));
    }

    #[test]
    fn mutations_bump_revision() {
        let store = ChatStore::load(Arc::new(MemoryBlobStore::new()));
        let rx = store.subscribe();
        let start = *rx.borrow();

        store.add_message(msg(1, 1));
        store.set_busy(Busy::LoadingMessages, true);

        assert_eq!(*rx.borrow(), start + 2);
    }

    #[test]
    fn clear_writes_empty_state() {
        let storage = Arc::new(MemoryBlobStore::new());
        let store = ChatStore::load(storage.clone());
        store.set_messages(vec![msg(1, 1)]);
        store.set_session_uuid("A");
        store.clear();

        let reloaded = ChatStore::load(storage).snapshot();
        assert!(reloaded.messages.is_empty());
        assert_eq!(reloaded.session_uuid, None);
    }
}
