use std::sync::Arc;

use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::contract::model::{
    DietSummary, Feed, FeedPatch, MutationOutcome, NewFeed, Registration, User,
};
use crate::domain::error::DomainError;
use crate::domain::repo::{FeedsRepository, SessionStore};
use crate::domain::summary::summarize;

/// Domain service: session policy, validation and session-scoped feed access.
/// Depends only on the repository ports, not on infra types.
#[derive(Clone)]
pub struct Service {
    sessions: Arc<dyn SessionStore>,
    feeds: Arc<dyn FeedsRepository>,
    config: ServiceConfig,
}

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub max_name_length: usize,
    pub max_description_length: usize,
    pub max_email_length: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_name_length: 255,
            max_description_length: 4096,
            max_email_length: 320,
        }
    }
}

impl Service {
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        feeds: Arc<dyn FeedsRepository>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            sessions,
            feeds,
            config,
        }
    }

    // --- sessions ---

    /// Register an anonymous user.
    ///
    /// A presented token that resolves to a known user is reused as is.
    /// Otherwise a fresh session is issued for `email`.
    #[instrument(name = "diet_tracker.service.register", skip(self, presented_token))]
    pub async fn register(
        &self,
        presented_token: Option<&str>,
        email: String,
    ) -> Result<Registration, DomainError> {
        self.validate_email(&email)?;

        if let Some(raw) = presented_token {
            match self.lookup_token(raw).await? {
                Some(user) => {
                    debug!(session_id = %user.id, "Reusing existing session");
                    return Ok(Registration {
                        user,
                        issued: false,
                    });
                }
                None => warn!("Presented session token is unknown, issuing a new one"),
            }
        }

        let user = self
            .sessions
            .issue(&email)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;

        info!(session_id = %user.id, "Issued new session");
        Ok(Registration { user, issued: true })
    }

    /// Resolve the session a request claims. Missing, malformed or unknown
    /// tokens are all `Unauthenticated`.
    #[instrument(name = "diet_tracker.service.authenticate", skip_all)]
    pub async fn authenticate(&self, token: Option<&str>) -> Result<User, DomainError> {
        let raw = token.ok_or_else(DomainError::unauthenticated)?;
        self.lookup_token(raw)
            .await?
            .ok_or_else(DomainError::unauthenticated)
    }

    async fn lookup_token(&self, raw: &str) -> Result<Option<User>, DomainError> {
        let Ok(token) = Uuid::parse_str(raw.trim()) else {
            debug!("Session token is not a valid id");
            return Ok(None);
        };
        self.sessions
            .resolve(token)
            .await
            .map_err(|e| DomainError::database(e.to_string()))
    }

    // --- feeds ---

    #[instrument(
        name = "diet_tracker.service.create_feed",
        skip(self, new_feed),
        fields(session_id = %session_id)
    )]
    pub async fn create_feed(
        &self,
        session_id: Uuid,
        new_feed: NewFeed,
    ) -> Result<Feed, DomainError> {
        self.validate_name(&new_feed.name)?;
        if let Some(ref description) = new_feed.description {
            self.validate_description(description)?;
        }

        let feed = Feed {
            id: Uuid::new_v4(),
            session_id,
            name: new_feed.name,
            description: new_feed.description,
            date: new_feed.date,
            is_on_diet: new_feed.is_on_diet,
        };

        self.feeds
            .insert(feed.clone())
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;

        info!(feed_id = %feed.id, "Created feed");
        Ok(feed)
    }

    /// Apply a sparse patch. A feed that does not exist for this session is
    /// reported as `FeedNotFound`.
    #[instrument(
        name = "diet_tracker.service.update_feed",
        skip(self, patch),
        fields(session_id = %session_id, feed_id = %id)
    )]
    pub async fn update_feed(
        &self,
        session_id: Uuid,
        id: Uuid,
        patch: FeedPatch,
    ) -> Result<(), DomainError> {
        self.validate_patch(&patch)?;

        let outcome = self
            .feeds
            .update(session_id, id, &patch)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;

        match outcome {
            MutationOutcome::Applied => {
                info!("Updated feed");
                Ok(())
            }
            MutationOutcome::Missing => Err(DomainError::feed_not_found(id)),
        }
    }

    /// Delete is idempotent: the outcome tells whether anything was removed.
    #[instrument(
        name = "diet_tracker.service.delete_feed",
        skip(self),
        fields(session_id = %session_id, feed_id = %id)
    )]
    pub async fn delete_feed(
        &self,
        session_id: Uuid,
        id: Uuid,
    ) -> Result<MutationOutcome, DomainError> {
        let outcome = self
            .feeds
            .delete(session_id, id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;

        match outcome {
            MutationOutcome::Applied => info!("Deleted feed"),
            MutationOutcome::Missing => debug!("Nothing to delete"),
        }
        Ok(outcome)
    }

    #[instrument(
        name = "diet_tracker.service.get_feed",
        skip(self),
        fields(session_id = %session_id, feed_id = %id)
    )]
    pub async fn get_feed(&self, session_id: Uuid, id: Uuid) -> Result<Feed, DomainError> {
        self.feeds
            .find_one(session_id, id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
            .ok_or_else(|| DomainError::feed_not_found(id))
    }

    #[instrument(
        name = "diet_tracker.service.list_feeds",
        skip(self),
        fields(session_id = %session_id)
    )]
    pub async fn list_feeds(&self, session_id: Uuid) -> Result<Vec<Feed>, DomainError> {
        let feeds = self
            .feeds
            .list_all(session_id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;
        debug!("Listed {} feeds", feeds.len());
        Ok(feeds)
    }

    /// Recomputed from a single read on every call.
    #[instrument(
        name = "diet_tracker.service.summary",
        skip(self),
        fields(session_id = %session_id)
    )]
    pub async fn summary(&self, session_id: Uuid) -> Result<DietSummary, DomainError> {
        let feeds = self.list_feeds(session_id).await?;
        Ok(summarize(&feeds))
    }

    // --- validation helpers ---

    fn validate_email(&self, email: &str) -> Result<(), DomainError> {
        let plausible = email.len() <= self.config.max_email_length
            && !email.chars().any(char::is_whitespace)
            && match email.split_once('@') {
                Some((local, domain)) => {
                    !local.is_empty()
                        && !domain.contains('@')
                        && domain
                            .split_once('.')
                            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
                        && !domain.ends_with('.')
                }
                None => false,
            };

        if plausible {
            Ok(())
        } else {
            Err(DomainError::invalid_email(email))
        }
    }

    fn validate_name(&self, name: &str) -> Result<(), DomainError> {
        if name.trim().is_empty() {
            return Err(DomainError::validation("name", "must not be empty"));
        }
        if name.chars().count() > self.config.max_name_length {
            return Err(DomainError::validation(
                "name",
                format!("must be at most {} characters", self.config.max_name_length),
            ));
        }
        Ok(())
    }

    fn validate_description(&self, description: &str) -> Result<(), DomainError> {
        if description.chars().count() > self.config.max_description_length {
            return Err(DomainError::validation(
                "description",
                format!(
                    "must be at most {} characters",
                    self.config.max_description_length
                ),
            ));
        }
        Ok(())
    }

    fn validate_patch(&self, patch: &FeedPatch) -> Result<(), DomainError> {
        if let Some(ref name) = patch.name {
            self.validate_name(name)?;
        }
        if let Some(ref description) = patch.description {
            self.validate_description(description)?;
        }
        Ok(())
    }
}
