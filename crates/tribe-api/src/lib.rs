/// Tribe chat service client.
///
/// A typed request/response mapping over the service's HTTP/JSON endpoints.
/// One request per call, no batching, no caching, no retry.

pub mod client;
pub mod error;
pub mod messages;
pub mod participants;

use tribe_types::{Message, Participant, ServerInfo, Timestamp};
use uuid::Uuid;

pub use client::{ApiConfig, DEFAULT_API_BASE, HttpChatApi};
pub use error::ApiError;

/// The operations the sync controller needs from the chat service.
///
/// Implemented over HTTP by [`HttpChatApi`]; tests substitute in-memory fakes.
pub trait ChatApi: Send + Sync + 'static {
    fn server_info(&self) -> impl Future<Output = Result<ServerInfo, ApiError>> + Send;

    fn all_messages(&self) -> impl Future<Output = Result<Vec<Message>, ApiError>> + Send;

    fn latest_messages(&self) -> impl Future<Output = Result<Vec<Message>, ApiError>> + Send;

    /// Page of messages sent before `before` (pagination cursor).
    fn older_messages(
        &self,
        before: Uuid,
    ) -> impl Future<Output = Result<Vec<Message>, ApiError>> + Send;

    fn message_updates(
        &self,
        since: Timestamp,
    ) -> impl Future<Output = Result<Vec<Message>, ApiError>> + Send;

    /// Returns the record as stored by the service, with its assigned id and timestamps.
    fn send_message(&self, text: &str) -> impl Future<Output = Result<Message, ApiError>> + Send;

    fn all_participants(&self) -> impl Future<Output = Result<Vec<Participant>, ApiError>> + Send;

    fn participant_updates(
        &self,
        since: Timestamp,
    ) -> impl Future<Output = Result<Vec<Participant>, ApiError>> + Send;
}
