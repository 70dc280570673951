use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

/// Anonymous user. `id` doubles as the session token handed out in the
/// session cookie, so resolving a session is a primary-key lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub email: String,
}

/// A logged meal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feed {
    pub id: Uuid,
    /// Owning session; never changes after creation.
    pub session_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    /// When the meal happened, not when it was recorded.
    pub date: DateTime<Utc>,
    /// `None` means the caller never said.
    pub is_on_diet: Option<bool>,
}

/// Data for creating a feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFeed {
    pub name: String,
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    pub is_on_diet: Option<bool>,
}

/// Sparse update: only `Some` fields are written.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FeedPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub is_on_diet: Option<bool>,
}

impl FeedPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.date.is_none()
            && self.is_on_diet.is_none()
    }
}

/// Result of a scoped write that may match nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    Applied,
    /// No feed with that id exists for the calling session.
    Missing,
}

impl MutationOutcome {
    pub fn from_rows_affected(rows: u64) -> Self {
        if rows > 0 {
            Self::Applied
        } else {
            Self::Missing
        }
    }
}

/// Outcome of a registration request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub user: User,
    /// True when a new session token was minted and must be sent to the caller.
    pub issued: bool,
}

/// Per-session diet statistics.
///
/// `inside_diet + outside_diet <= total`: feeds with no flag only count
/// towards `total`. Days without inside-diet feeds are absent from
/// `diet_by_day`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DietSummary {
    pub inside_diet: u64,
    pub outside_diet: u64,
    pub total: u64,
    pub diet_by_day: BTreeMap<NaiveDate, u64>,
}
