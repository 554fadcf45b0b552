use uuid::Uuid;

use tribe_types::{Message, Participant, Timestamp};

/// Which collection a sync timestamp belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncKind {
    Messages,
    Participants,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Busy {
    LoadingMessages,
    LoadingParticipants,
    SendingMessage,
    /// Fetching a page before the oldest cached message.
    LoadingOlder,
}

/// In-flight indicators. Never persisted and untouched by [`ChatState::clear`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BusyFlags {
    pub loading_messages: bool,
    pub loading_participants: bool,
    pub sending_message: bool,
    pub loading_older: bool,
}

impl BusyFlags {
    pub fn get(&self, flag: Busy) -> bool {
        match flag {
            Busy::LoadingMessages => self.loading_messages,
            Busy::LoadingParticipants => self.loading_participants,
            Busy::SendingMessage => self.sending_message,
            Busy::LoadingOlder => self.loading_older,
        }
    }

    pub fn set(&mut self, flag: Busy, value: bool) {
        match flag {
            Busy::LoadingMessages => self.loading_messages = value,
            Busy::LoadingParticipants => self.loading_participants = value,
            Busy::SendingMessage => self.sending_message = value,
            Busy::LoadingOlder => self.loading_older = value,
        }
    }
}

/// Chat collections and sync bookkeeping.
///
/// `messages` is kept sorted ascending by `sent_at` by every method that
/// inserts. Ids are unique as long as callers route known ids through the
/// `update_*` methods.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatState {
    pub messages: Vec<Message>,
    pub participants: Vec<Participant>,
    pub session_uuid: Option<String>,
    pub last_message_update_time: Timestamp,
    pub last_participant_update_time: Timestamp,
    pub busy: BusyFlags,
}

impl ChatState {
    // -- Messages --

    pub fn set_messages(&mut self, mut messages: Vec<Message>) {
        messages.sort_by_key(|m| m.sent_at);
        self.messages = messages;
    }

    pub fn add_message(&mut self, message: Message) {
        self.messages.push(message);
        self.messages.sort_by_key(|m| m.sent_at);
    }

    /// Replace the message with the same id. Returns false (and changes
    /// nothing) when the id is unknown.
    pub fn update_message(&mut self, message: Message) -> bool {
        match self.messages.iter_mut().find(|m| m.uuid == message.uuid) {
            Some(slot) => {
                *slot = message;
                true
            }
            None => false,
        }
    }

    pub fn contains_message(&self, id: Uuid) -> bool {
        self.messages.iter().any(|m| m.uuid == id)
    }

    pub fn oldest_message(&self) -> Option<&Message> {
        self.messages.first()
    }

    // -- Participants --

    pub fn set_participants(&mut self, participants: Vec<Participant>) {
        self.participants = participants;
    }

    pub fn add_participant(&mut self, participant: Participant) {
        self.participants.push(participant);
    }

    pub fn update_participant(&mut self, participant: Participant) -> bool {
        match self
            .participants
            .iter_mut()
            .find(|p| p.uuid == participant.uuid)
        {
            Some(slot) => {
                *slot = participant;
                true
            }
            None => false,
        }
    }

    pub fn participant(&self, id: Uuid) -> Option<&Participant> {
        self.participants.iter().find(|p| p.uuid == id)
    }

    // -- Session / sync bookkeeping --

    pub fn set_session_uuid(&mut self, session_uuid: impl Into<String>) {
        self.session_uuid = Some(session_uuid.into());
    }

    pub fn last_sync(&self, kind: SyncKind) -> Timestamp {
        match kind {
            SyncKind::Messages => self.last_message_update_time,
            SyncKind::Participants => self.last_participant_update_time,
        }
    }

    pub fn set_last_sync(&mut self, kind: SyncKind, time: Timestamp) {
        match kind {
            SyncKind::Messages => self.last_message_update_time = time,
            SyncKind::Participants => self.last_participant_update_time = time,
        }
    }

    /// Move the sync timestamp forward; an earlier `time` is ignored.
    pub fn advance_last_sync(&mut self, kind: SyncKind, time: Timestamp) {
        if time > self.last_sync(kind) {
            self.set_last_sync(kind, time);
        }
    }

    /// Drop everything cached for the current session. Busy flags survive.
    pub fn clear(&mut self) {
        self.messages.clear();
        self.participants.clear();
        self.session_uuid = None;
        self.last_message_update_time = 0;
        self.last_participant_update_time = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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

    fn person(n: u128, name: &str) -> Participant {
        Participant {
            uuid: Uuid::from_u128(n),
            name: name.into(),
            bio: None,
            avatar_url: None,
            email: None,
            job_title: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    fn is_sorted(state: &ChatState) -> bool {
        state.messages.windows(2).all(|w| w[0].sent_at <= w[1].sent_at)
    }

    #[test]
    fn add_message_keeps_sent_at_order() {
        let mut state = ChatState::default();
        for (i, sent_at) in [50, 10, 30, 30, 5, 70, 0].into_iter().enumerate() {
            state.add_message(msg(i as u128, sent_at));
            assert!(is_sorted(&state));
        }
        assert_eq!(state.messages.len(), 7);
        assert_eq!(state.oldest_message().unwrap().sent_at, 0);
    }

    #[test]
    fn set_messages_sorts_snapshot() {
        let mut state = ChatState::default();
        state.set_messages(vec![msg(1, 300), msg(2, 100), msg(3, 200)]);
        let order: Vec<_> = state.messages.iter().map(|m| m.sent_at).collect();
        assert_eq!(order, vec![100, 200, 300]);
    }

    #[test]
    fn update_message_replaces_in_place() {
        let mut state = ChatState::default();
        state.set_messages(vec![msg(1, 10), msg(2, 20)]);

        let mut edited = msg(2, 20);
        edited.text = "edited".into();
        edited.updated_at = 25;
        assert!(state.update_message(edited.clone()));
        assert!(state.update_message(edited));

        assert_eq!(state.messages.len(), 2);
        assert_eq!(state.messages[1].text, "edited");
    }

    #[test]
    fn update_message_unknown_id_is_noop() {
        let mut state = ChatState::default();
        state.set_messages(vec![msg(1, 10)]);
        let before = state.clone();

        assert!(!state.update_message(msg(9, 5)));
        assert_eq!(state, before);
    }

    #[test]
    fn update_participant_unknown_id_is_noop() {
        let mut state = ChatState::default();
        state.set_participants(vec![person(1, "Ada")]);
        assert!(!state.update_participant(person(2, "Grace")));
        assert!(state.update_participant(person(1, "Ada L.")));
        assert_eq!(state.participants.len(), 1);
        assert_eq!(state.participant(Uuid::from_u128(1)).unwrap().name, "Ada L.");
    }

    #[test]
    fn advance_last_sync_never_moves_back() {
        let mut state = ChatState::default();
        state.advance_last_sync(SyncKind::Messages, 100);
        state.advance_last_sync(SyncKind::Messages, 50);
        assert_eq!(state.last_sync(SyncKind::Messages), 100);
        assert_eq!(state.last_sync(SyncKind::Participants), 0);
    }

    #[test]
    fn clear_keeps_busy_flags() {
        let mut state = ChatState::default();
        state.set_messages(vec![msg(1, 10)]);
        state.set_participants(vec![person(1, "Ada")]);
        state.set_session_uuid("A");
        state.set_last_sync(SyncKind::Messages, 10);
        state.set_last_sync(SyncKind::Participants, 20);
        state.busy.set(Busy::SendingMessage, true);

        state.clear();

        assert!(state.messages.is_empty());
        assert!(state.participants.is_empty());
        assert_eq!(state.session_uuid, None);
        assert_eq!(state.last_message_update_time, 0);
        assert_eq!(state.last_participant_update_time, 0);
        assert!(state.busy.get(Busy::SendingMessage));
    }
}
