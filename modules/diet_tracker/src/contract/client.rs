use async_trait::async_trait;
use uuid::Uuid;

use crate::contract::{
    error::DietTrackerError,
    model::{DietSummary, Feed, FeedPatch, MutationOutcome, NewFeed, Registration, User},
};

/// Public API of the diet tracker for in-process consumers.
///
/// Every feed operation takes the caller's session id and never sees feeds
/// of other sessions.
#[async_trait]
pub trait DietTrackerApi: Send + Sync {
    /// Register, reusing `presented_token` when it names a known session.
    async fn register(
        &self,
        presented_token: Option<&str>,
        email: String,
    ) -> Result<Registration, DietTrackerError>;

    /// Resolve a raw session token.
    async fn resolve_session(&self, token: &str) -> Result<User, DietTrackerError>;

    async fn create_feed(&self, session_id: Uuid, new_feed: NewFeed)
        -> Result<Feed, DietTrackerError>;

    async fn update_feed(
        &self,
        session_id: Uuid,
        id: Uuid,
        patch: FeedPatch,
    ) -> Result<(), DietTrackerError>;

    /// Idempotent; `Missing` when nothing was deleted.
    async fn delete_feed(
        &self,
        session_id: Uuid,
        id: Uuid,
    ) -> Result<MutationOutcome, DietTrackerError>;

    async fn get_feed(&self, session_id: Uuid, id: Uuid) -> Result<Feed, DietTrackerError>;

    async fn list_feeds(&self, session_id: Uuid) -> Result<Vec<Feed>, DietTrackerError>;

    async fn summary(&self, session_id: Uuid) -> Result<DietSummary, DietTrackerError>;
}
