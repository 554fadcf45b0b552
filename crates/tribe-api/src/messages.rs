use uuid::Uuid;

use tribe_types::{Message, SendMessageRequest, Timestamp};

use crate::{ApiError, HttpChatApi};

impl HttpChatApi {
    /// `GET /messages/all`: full history.
    pub async fn get_all_messages(&self) -> Result<Vec<Message>, ApiError> {
        self.fetch("/messages/all", self.get("/messages/all")).await
    }

    /// `GET /messages/latest`: most recent page.
    pub async fn get_latest_messages(&self) -> Result<Vec<Message>, ApiError> {
        self.fetch("/messages/latest", self.get("/messages/latest")).await
    }

    /// `GET /messages/older/{uuid}`: the page sent before the reference message.
    pub async fn get_older_messages(&self, before: Uuid) -> Result<Vec<Message>, ApiError> {
        let endpoint = format!("/messages/older/{}", before);
        self.fetch(&endpoint, self.get(&endpoint)).await
    }

    /// `GET /messages/updates/{time}`: messages created or changed after `since`.
    pub async fn get_message_updates(&self, since: Timestamp) -> Result<Vec<Message>, ApiError> {
        let endpoint = format!("/messages/updates/{}", since);
        self.fetch(&endpoint, self.get(&endpoint)).await
    }

    /// `POST /messages/new`
    pub async fn post_message(&self, text: &str) -> Result<Message, ApiError> {
        let body = SendMessageRequest {
            text: text.to_string(),
        };
        self.fetch("/messages/new", self.post("/messages/new").json(&body))
            .await
    }
}
