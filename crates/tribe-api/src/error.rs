use thiserror::Error;

/// Any failure talking to the chat service. Nothing here is retried.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("API error on {endpoint}: {status} {reason}")]
    Status {
        endpoint: String,
        status: u16,
        reason: String,
    },

    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("could not decode response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl ApiError {
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            Self::Status { endpoint, .. }
            | Self::Transport { endpoint, .. }
            | Self::Decode { endpoint, .. } => Some(endpoint),
            Self::Client(_) => None,
        }
    }

    /// HTTP status for server-side rejections.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
