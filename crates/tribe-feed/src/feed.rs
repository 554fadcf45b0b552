use chrono::TimeZone;
use uuid::Uuid;

use tribe_types::{Message, Participant, Reaction, Timestamp};

use crate::time::{should_group_message, should_show_date_separator};

/// One badge per distinct reaction value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionBadge {
    pub value: String,
    pub count: usize,
    pub participant_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttachmentView {
    pub uuid: Uuid,
    pub url: String,
    pub aspect_ratio: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReplyPreview {
    pub uuid: Uuid,
    pub author_uuid: Uuid,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MessageRow {
    pub message: Message,
    pub author: Option<Participant>,
    /// Suppress the author header: continues the previous row's run.
    pub grouped: bool,
    pub edited: bool,
    pub reactions: Vec<ReactionBadge>,
    pub attachments: Vec<AttachmentView>,
    pub reply: Option<ReplyPreview>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FeedItem {
    DateSeparator { key: String, timestamp: Timestamp },
    Message(MessageRow),
}

impl FeedItem {
    /// Stable list key.
    pub fn key(&self) -> String {
        match self {
            Self::DateSeparator { key, .. } => key.clone(),
            Self::Message(row) => row.message.uuid.to_string(),
        }
    }
}

pub fn participant_by_id(participants: &[Participant], id: Uuid) -> Option<&Participant> {
    participants.iter().find(|p| p.uuid == id)
}

/// Group reactions by value, in order of first appearance.
pub fn group_reactions(reactions: &[Reaction]) -> Vec<ReactionBadge> {
    let mut badges: Vec<ReactionBadge> = Vec::new();
    for reaction in reactions {
        match badges.iter_mut().find(|b| b.value == reaction.value) {
            Some(badge) => {
                badge.count += 1;
                badge.participant_ids.push(reaction.participant_uuid);
            }
            None => badges.push(ReactionBadge {
                value: reaction.value.clone(),
                count: 1,
                participant_ids: vec![reaction.participant_uuid],
            }),
        }
    }
    badges
}

fn message_row(message: &Message, participants: &[Participant], grouped: bool) -> MessageRow {
    MessageRow {
        author: participant_by_id(participants, message.author_uuid).cloned(),
        grouped,
        edited: message.is_edited(),
        reactions: group_reactions(&message.reactions),
        attachments: message
            .attachments
            .iter()
            .map(|a| AttachmentView {
                uuid: a.uuid,
                url: a.url.clone(),
                aspect_ratio: a.aspect_ratio(),
            })
            .collect(),
        reply: message.reply_to_message.as_ref().map(|r| ReplyPreview {
            uuid: r.uuid,
            author_uuid: r.author_uuid,
            text: r.text.clone(),
        }),
        message: message.clone(),
    }
}

/// Flatten sorted messages into rows interleaved with date separators.
pub fn build_feed<Tz: TimeZone>(
    messages: &[Message],
    participants: &[Participant],
    tz: &Tz,
) -> Vec<FeedItem> {
    let mut items = Vec::with_capacity(messages.len() + 1);
    let mut previous: Option<&Message> = None;

    for message in messages {
        let separator = should_show_date_separator(message, previous, tz);
        if separator {
            items.push(FeedItem::DateSeparator {
                key: format!("date-{}", message.sent_at),
                timestamp: message.sent_at,
            });
        }

        // A separator row breaks the run even when the predicate would group.
        let grouped = !separator && should_group_message(message, previous, tz);
        items.push(FeedItem::Message(message_row(message, participants, grouped)));
        previous = Some(message);
    }

    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tribe_types::{Attachment, AttachmentKind, ReplyMessage};

    const ADA: u128 = 1;
    const GRACE: u128 = 2;

    fn ms(d: u32, h: u32, mi: u32, s: u32) -> Timestamp {
        Utc.with_ymd_and_hms(2024, 1, d, h, mi, s).unwrap().timestamp_millis()
    }

    fn msg(id: u128, author: u128, sent_at: Timestamp) -> Message {
        Message {
            uuid: Uuid::from_u128(id),
            text: format!("m{}", id),
            attachments: vec![],
            reply_to_message: None,
            reactions: vec![],
            author_uuid: Uuid::from_u128(author),
            sent_at,
            updated_at: sent_at,
        }
    }

    fn reaction(who: u128, value: &str) -> Reaction {
        Reaction {
            uuid: Uuid::new_v4(),
            participant_uuid: Uuid::from_u128(who),
            value: value.into(),
        }
    }

    fn kinds(items: &[FeedItem]) -> Vec<String> {
        items
            .iter()
            .map(|i| match i {
                FeedItem::DateSeparator { .. } => "date".to_string(),
                FeedItem::Message(row) if row.grouped => format!("{}+", row.message.text),
                FeedItem::Message(row) => row.message.text.clone(),
            })
            .collect()
    }

    #[test]
    fn empty_feed() {
        assert!(build_feed(&[], &[], &Utc).is_empty());
    }

    #[test]
    fn separators_and_grouping() {
        let messages = vec![
            msg(1, ADA, ms(1, 23, 50, 0)),
            msg(2, ADA, ms(1, 23, 54, 59)),
            msg(3, GRACE, ms(1, 23, 55, 0)),
            msg(4, GRACE, ms(2, 0, 1, 0)),
            msg(5, GRACE, ms(2, 0, 7, 0)),
        ];

        let items = build_feed(&messages, &[], &Utc);
        assert_eq!(
            kinds(&items),
            vec!["date", "m1", "m2+", "m3", "date", "m4", "m5"]
        );
        assert_eq!(items[0].key(), format!("date-{}", ms(1, 23, 50, 0)));
        assert_eq!(items[1].key(), Uuid::from_u128(1).to_string());
    }

    #[test]
    fn rows_resolve_author_and_edited() {
        let ada = Participant {
            uuid: Uuid::from_u128(ADA),
            name: "Ada".into(),
            bio: None,
            avatar_url: None,
            email: None,
            job_title: None,
            created_at: 0,
            updated_at: 0,
        };
        let mut edited = msg(1, ADA, 1000);
        edited.updated_at = 1001;
        let orphan = msg(2, GRACE, 2000);

        let items = build_feed(&[edited, orphan], &[ada], &Utc);
        let FeedItem::Message(first) = &items[1] else {
            panic!("expected message row");
        };
        let FeedItem::Message(second) = &items[2] else {
            panic!("expected message row");
        };
        assert_eq!(first.author.as_ref().map(|p| p.name.as_str()), Some("Ada"));
        assert!(first.edited);
        assert!(second.author.is_none());
        assert!(!second.edited);
    }

    #[test]
    fn reactions_group_by_value_in_first_seen_order() {
        let badges = group_reactions(&[
            reaction(1, "🔥"),
            reaction(2, "👍"),
            reaction(3, "🔥"),
            reaction(4, "🔥"),
        ]);

        assert_eq!(badges.len(), 2);
        assert_eq!(badges[0].value, "🔥");
        assert_eq!(badges[0].count, 3);
        assert_eq!(
            badges[0].participant_ids,
            vec![Uuid::from_u128(1), Uuid::from_u128(3), Uuid::from_u128(4)]
        );
        assert_eq!(badges[1].value, "👍");
        assert_eq!(badges[1].count, 1);
    }

    #[test]
    fn attachments_and_reply_preview() {
        let mut m = msg(1, ADA, 10);
        m.attachments.push(Attachment {
            uuid: Uuid::from_u128(50),
            kind: AttachmentKind::Image,
            url: "https://img.example/a.png".into(),
            width: 1920.0,
            height: 1080.0,
        });
        m.reply_to_message = Some(ReplyMessage {
            uuid: Uuid::from_u128(9),
            text: "original".into(),
            attachments: vec![],
            reactions: vec![],
            author_uuid: Uuid::from_u128(GRACE),
            sent_at: 1,
            updated_at: 1,
        });

        let items = build_feed(&[m], &[], &Utc);
        let FeedItem::Message(row) = &items[1] else {
            panic!("expected message row");
        };
        assert_eq!(row.attachments[0].aspect_ratio, Some(1920.0 / 1080.0));
        assert_eq!(row.reply.as_ref().unwrap().text, "original");
    }
}
