use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Epoch milliseconds, as emitted by the chat service.
pub type Timestamp = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub uuid: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    pub created_at: Timestamp,
    /// Drives participant delta sync.
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentKind {
    Image,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub uuid: Uuid,
    #[serde(rename = "type")]
    pub kind: AttachmentKind,
    pub url: String,
    pub width: f64,
    pub height: f64,
}

impl Attachment {
    /// Display aspect ratio (width / height). `None` for degenerate sizes.
    pub fn aspect_ratio(&self) -> Option<f64> {
        if self.height > 0.0 && self.width > 0.0 {
            Some(self.width / self.height)
        } else {
            None
        }
    }
}

/// One row per participant + value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reaction {
    pub uuid: Uuid,
    pub participant_uuid: Uuid,
    pub value: String,
}

/// The message a reply points at, inlined by the service.
/// Never carries a reply of its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyMessage {
    pub uuid: Uuid,
    pub text: String,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    #[serde(default)]
    pub reactions: Vec<Reaction>,
    pub author_uuid: Uuid,
    pub sent_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub uuid: Uuid,
    pub text: String,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to_message: Option<ReplyMessage>,
    #[serde(default)]
    pub reactions: Vec<Reaction>,
    pub author_uuid: Uuid,
    pub sent_at: Timestamp,
    /// Text edits bump this, never `sent_at`.
    pub updated_at: Timestamp,
}

impl Message {
    pub fn is_edited(&self) -> bool {
        self.updated_at > self.sent_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(sent_at: Timestamp, updated_at: Timestamp) -> Message {
        Message {
            uuid: Uuid::new_v4(),
            text: "hi".into(),
            attachments: vec![],
            reply_to_message: None,
            reactions: vec![],
            author_uuid: Uuid::new_v4(),
            sent_at,
            updated_at,
        }
    }

    #[test]
    fn edited_only_when_updated_after_sent() {
        assert!(!message(1000, 1000).is_edited());
        assert!(message(1000, 1001).is_edited());
    }

    #[test]
    fn decodes_service_message_with_inlined_reply() {
        let json = r#"{
            "uuid": "7f2c1d0e-9a4b-4c55-8b1e-2f3a4b5c6d7e",
            "text": "sounds good",
            "attachments": [{
                "uuid": "0a1b2c3d-4e5f-4a6b-8c7d-9e0f1a2b3c4d",
                "type": "image",
                "url": "https://img.example/cat.png",
                "width": 640,
                "height": 480
            }],
            "replyToMessage": {
                "uuid": "11111111-2222-4333-8444-555555555555",
                "text": "lunch?",
                "attachments": [],
                "reactions": [],
                "authorUuid": "66666666-7777-4888-9999-aaaaaaaaaaaa",
                "sentAt": 1700000000000,
                "updatedAt": 1700000000000
            },
            "reactions": [{
                "uuid": "bbbbbbbb-cccc-4ddd-8eee-ffffffffffff",
                "participantUuid": "66666666-7777-4888-9999-aaaaaaaaaaaa",
                "value": "👍"
            }],
            "authorUuid": "12345678-1234-4234-8234-123456789abc",
            "sentAt": 1700000060000,
            "updatedAt": 1700000090000
        }"#;

        let msg: Message = serde_json::from_str(json).unwrap();
        assert_eq!(msg.text, "sounds good");
        assert_eq!(msg.attachments[0].kind, AttachmentKind::Image);
        assert_eq!(msg.attachments[0].aspect_ratio(), Some(640.0 / 480.0));
        assert_eq!(msg.reply_to_message.as_ref().unwrap().text, "lunch?");
        assert_eq!(msg.reactions[0].value, "👍");
        assert!(msg.is_edited());
    }

    #[test]
    fn participant_optional_fields_may_be_absent() {
        let json = r#"{
            "uuid": "12345678-1234-4234-8234-123456789abc",
            "name": "Ada",
            "createdAt": 1,
            "updatedAt": 2
        }"#;
        let p: Participant = serde_json::from_str(json).unwrap();
        assert_eq!(p.name, "Ada");
        assert!(p.bio.is_none() && p.avatar_url.is_none());

        let out = serde_json::to_value(&p).unwrap();
        assert!(out.get("jobTitle").is_none());
        assert_eq!(out["updatedAt"], 2);
    }

    #[test]
    fn zero_height_attachment_has_no_aspect_ratio() {
        let a = Attachment {
            uuid: Uuid::new_v4(),
            kind: AttachmentKind::Image,
            url: "x".into(),
            width: 100.0,
            height: 0.0,
        };
        assert_eq!(a.aspect_ratio(), None);
    }
}
