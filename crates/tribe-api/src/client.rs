use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::debug;
use uuid::Uuid;

use tribe_types::{Message, Participant, ServerInfo, Timestamp};

use crate::{ApiError, ChatApi};

pub const DEFAULT_API_BASE: &str = "https://dummy-chat-server.tribechat.com/api";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base address every endpoint path is appended to.
    pub base_url: String,
    pub request_timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// reqwest-backed [`ChatApi`].
#[derive(Clone)]
pub struct HttpChatApi {
    client: Client,
    base_url: String,
}

impl HttpChatApi {
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(ApiError::Client)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// The service expects a JSON content type even on bodiless requests.
    pub(crate) fn get(&self, endpoint: &str) -> RequestBuilder {
        self.client
            .get(self.url(endpoint))
            .header(CONTENT_TYPE, "application/json")
    }

    /// `RequestBuilder::json` supplies the content type.
    pub(crate) fn post(&self, endpoint: &str) -> RequestBuilder {
        self.client.post(self.url(endpoint))
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// Send one request, require a success status, decode the JSON body.
    pub(crate) async fn fetch<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        request: RequestBuilder,
    ) -> Result<T, ApiError> {
        debug!(base = %self.base_url, endpoint, "chat api request");

        let response = request
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                endpoint: endpoint.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("").to_string(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| ApiError::Transport {
                endpoint: endpoint.to_string(),
                source,
            })?;

        serde_json::from_slice(&body).map_err(|source| ApiError::Decode {
            endpoint: endpoint.to_string(),
            source,
        })
    }
}

impl ChatApi for HttpChatApi {
    async fn server_info(&self) -> Result<ServerInfo, ApiError> {
        self.fetch("/info", self.get("/info")).await
    }

    async fn all_messages(&self) -> Result<Vec<Message>, ApiError> {
        self.get_all_messages().await
    }

    async fn latest_messages(&self) -> Result<Vec<Message>, ApiError> {
        self.get_latest_messages().await
    }

    async fn older_messages(&self, before: Uuid) -> Result<Vec<Message>, ApiError> {
        self.get_older_messages(before).await
    }

    async fn message_updates(&self, since: Timestamp) -> Result<Vec<Message>, ApiError> {
        self.get_message_updates(since).await
    }

    async fn send_message(&self, text: &str) -> Result<Message, ApiError> {
        self.post_message(text).await
    }

    async fn all_participants(&self) -> Result<Vec<Participant>, ApiError> {
        self.get_all_participants().await
    }

    async fn participant_updates(&self, since: Timestamp) -> Result<Vec<Participant>, ApiError> {
        self.get_participant_updates(since).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_points_at_hosted_service() {
        let config = ApiConfig::default();
        assert_eq!(config.base_url, DEFAULT_API_BASE);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn trailing_slash_is_dropped_from_base() {
        let api = HttpChatApi::new(ApiConfig {
            base_url: "http://localhost:8080/api/".into(),
            ..ApiConfig::default()
        })
        .unwrap();
        assert_eq!(api.url("/info"), "http://localhost:8080/api/info");
    }
}
