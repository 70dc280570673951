use async_trait::async_trait;
use uuid::Uuid;

use crate::contract::model::{Feed, FeedPatch, MutationOutcome, User};

/// Port: session token ↔ user identity.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Pure lookup, no side effects.
    async fn resolve(&self, token: Uuid) -> anyhow::Result<Option<User>>;
    /// Mint a fresh token and persist a user bound to it.
    /// Emails are not unique; registering the same email twice yields two users.
    async fn issue(&self, email: &str) -> anyhow::Result<User>;
}

/// Port: persistence of feeds. Every call is scoped by the owning session,
/// a feed belonging to another session behaves exactly like a missing one.
#[async_trait]
pub trait FeedsRepository: Send + Sync {
    /// Insert a fully-formed feed (service assigns id and session).
    async fn insert(&self, feed: Feed) -> anyhow::Result<()>;
    /// Write only the fields present in `patch`.
    async fn update(
        &self,
        session_id: Uuid,
        id: Uuid,
        patch: &FeedPatch,
    ) -> anyhow::Result<MutationOutcome>;
    async fn delete(&self, session_id: Uuid, id: Uuid) -> anyhow::Result<MutationOutcome>;
    async fn find_one(&self, session_id: Uuid, id: Uuid) -> anyhow::Result<Option<Feed>>;
    /// All feeds of the session, oldest meal first.
    async fn list_all(&self, session_id: Uuid) -> anyhow::Result<Vec<Feed>>;
}
