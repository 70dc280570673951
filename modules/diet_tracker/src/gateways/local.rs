use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::contract::{
    client::DietTrackerApi,
    error::DietTrackerError,
    model::{DietSummary, Feed, FeedPatch, MutationOutcome, NewFeed, Registration, User},
};
use crate::domain::service::Service;

/// Local implementation of the DietTrackerApi trait that delegates to the domain service
pub struct DietTrackerLocalClient {
    service: Arc<Service>,
}

impl DietTrackerLocalClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl DietTrackerApi for DietTrackerLocalClient {
    async fn register(
        &self,
        presented_token: Option<&str>,
        email: String,
    ) -> Result<Registration, DietTrackerError> {
        self.service
            .register(presented_token, email)
            .await
            .map_err(Into::into)
    }

    async fn resolve_session(&self, token: &str) -> Result<User, DietTrackerError> {
        self.service
            .authenticate(Some(token))
            .await
            .map_err(Into::into)
    }

    async fn create_feed(
        &self,
        session_id: Uuid,
        new_feed: NewFeed,
    ) -> Result<Feed, DietTrackerError> {
        self.service
            .create_feed(session_id, new_feed)
            .await
            .map_err(Into::into)
    }

    async fn update_feed(
        &self,
        session_id: Uuid,
        id: Uuid,
        patch: FeedPatch,
    ) -> Result<(), DietTrackerError> {
        self.service
            .update_feed(session_id, id, patch)
            .await
            .map_err(Into::into)
    }

    async fn delete_feed(
        &self,
        session_id: Uuid,
        id: Uuid,
    ) -> Result<MutationOutcome, DietTrackerError> {
        self.service
            .delete_feed(session_id, id)
            .await
            .map_err(Into::into)
    }

    async fn get_feed(&self, session_id: Uuid, id: Uuid) -> Result<Feed, DietTrackerError> {
        self.service
            .get_feed(session_id, id)
            .await
            .map_err(Into::into)
    }

    async fn list_feeds(&self, session_id: Uuid) -> Result<Vec<Feed>, DietTrackerError> {
        self.service.list_feeds(session_id).await.map_err(Into::into)
    }

    async fn summary(&self, session_id: Uuid) -> Result<DietSummary, DietTrackerError> {
        self.service.summary(session_id).await.map_err(Into::into)
    }
}
