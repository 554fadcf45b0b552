pub mod api;
pub mod models;

pub use api::{SendMessageRequest, ServerInfo};
pub use models::{Attachment, AttachmentKind, Message, Participant, Reaction, ReplyMessage, Timestamp};
