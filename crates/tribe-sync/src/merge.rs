use tribe_store::ChatState;
use tribe_types::{Message, Participant};

/// How a batch of updates landed in the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    pub added: usize,
    pub updated: usize,
}

impl MergeOutcome {
    pub fn total(&self) -> usize {
        self.added + self.updated
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Merge by id: replace known messages in place, insert unknown ones in
/// `sent_at` order.
pub fn merge_messages(state: &mut ChatState, updates: Vec<Message>) -> MergeOutcome {
    let mut outcome = MergeOutcome::default();
    for message in updates {
        if state.contains_message(message.uuid) {
            state.update_message(message);
            outcome.updated += 1;
        } else {
            state.add_message(message);
            outcome.added += 1;
        }
    }
    outcome
}

/// Merge by id: replace known participants, append unknown ones.
pub fn merge_participants(state: &mut ChatState, updates: Vec<Participant>) -> MergeOutcome {
    let mut outcome = MergeOutcome::default();
    for participant in updates {
        if state.participant(participant.uuid).is_some() {
            state.update_participant(participant);
            outcome.updated += 1;
        } else {
            state.add_participant(participant);
            outcome.added += 1;
        }
    }
    outcome
}
