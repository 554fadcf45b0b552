use tribe_types::{Participant, Timestamp};

use crate::{ApiError, HttpChatApi};

impl HttpChatApi {
    pub async fn get_all_participants(&self) -> Result<Vec<Participant>, ApiError> {
        self.fetch("/participants/all", self.get("/participants/all"))
            .await
    }

    pub async fn get_participant_updates(
        &self,
        since: Timestamp,
    ) -> Result<Vec<Participant>, ApiError> {
        let endpoint = format!("/participants/updates/{}", since);
        self.fetch(&endpoint, self.get(&endpoint)).await
    }
}
