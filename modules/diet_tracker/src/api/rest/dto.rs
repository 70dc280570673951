use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::contract::model::{DietSummary, Feed, FeedPatch, NewFeed};

/// REST DTO for registering an anonymous user
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterUserReq {
    pub email: String,
}

/// REST DTO for creating a feed
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateFeedReq {
    pub name: String,
    #[serde(default, deserialize_with = "coerce::present")]
    pub description: Option<String>,
    /// RFC 3339, `YYYY-MM-DD[THH:MM[:SS]]` (UTC) or epoch milliseconds.
    #[serde(deserialize_with = "coerce::date")]
    #[schema(value_type = String, format = DateTime)]
    pub date: DateTime<Utc>,
    pub is_on_diet: bool,
}

/// REST DTO for updating a feed. Absent fields are left untouched;
/// `null` is rejected rather than treated as a clear.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFeedReq {
    #[serde(default, deserialize_with = "coerce::present")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "coerce::present")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "coerce::present_date")]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "coerce::present")]
    pub is_on_diet: Option<bool>,
}

/// REST DTO for feed representation
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedDto {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    pub is_on_diet: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FeedEnvelope {
    pub feed: FeedDto,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FeedListDto {
    pub feeds: Vec<FeedDto>,
}

/// REST DTO for the per-session diet summary
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SummaryDto {
    pub inside_diet: u64,
    pub outside_diet: u64,
    pub total: u64,
    /// `YYYY-MM-DD` (UTC) → inside-diet feeds on that day.
    pub diet_by_day: BTreeMap<String, u64>,
}

// Conversion implementations between REST DTOs and contract models

impl From<Feed> for FeedDto {
    fn from(f: Feed) -> Self {
        Self {
            id: f.id,
            name: f.name,
            description: f.description,
            date: f.date,
            is_on_diet: f.is_on_diet,
        }
    }
}

impl From<CreateFeedReq> for NewFeed {
    fn from(req: CreateFeedReq) -> Self {
        Self {
            name: req.name,
            description: req.description,
            date: req.date,
            is_on_diet: Some(req.is_on_diet),
        }
    }
}

impl From<UpdateFeedReq> for FeedPatch {
    fn from(req: UpdateFeedReq) -> Self {
        Self {
            name: req.name,
            description: req.description,
            date: req.date,
            is_on_diet: req.is_on_diet,
        }
    }
}

impl From<DietSummary> for SummaryDto {
    fn from(s: DietSummary) -> Self {
        Self {
            inside_diet: s.inside_diet,
            outside_diet: s.outside_diet,
            total: s.total,
            diet_by_day: s
                .diet_by_day
                .into_iter()
                .map(|(day, n)| (day.format("%Y-%m-%d").to_string(), n))
                .collect(),
        }
    }
}

/// Lenient input decoding for request bodies.
pub mod coerce {
    use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
    use serde::de::{self, Deserializer, Visitor};
    use serde::Deserialize;
    use std::fmt;

    const NAIVE_FORMATS: &[&str] = &[
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
    ];

    /// Day keys and stored timestamps stay four-digit years.
    fn within_bounds(dt: DateTime<Utc>) -> Option<DateTime<Utc>> {
        (0..=9999).contains(&dt.year()).then_some(dt)
    }

    /// Parse the textual date forms clients send. Zone-less values are UTC.
    /// Instants outside years 0000-9999 (UTC) are rejected.
    pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
        parse_any(raw.trim()).and_then(within_bounds)
    }

    fn parse_any(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        for fmt in NAIVE_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
                return Some(naive.and_utc());
            }
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }

    /// Epoch milliseconds, same year bounds as [`parse_date`].
    pub fn from_millis(ms: i64) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(ms).and_then(within_bounds)
    }

    struct DateVisitor;

    impl Visitor<'_> for DateVisitor {
        type Value = DateTime<Utc>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a date-time string or epoch milliseconds")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            parse_date(v).ok_or_else(|| E::custom(format!("invalid date: '{v}'")))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            from_millis(v).ok_or_else(|| E::custom(format!("timestamp out of range: {v}")))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            let ms = i64::try_from(v)
                .map_err(|_| E::custom(format!("timestamp out of range: {v}")))?;
            self.visit_i64(ms)
        }
    }

    pub fn date<'de, D>(d: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        d.deserialize_any(DateVisitor)
    }

    /// For `#[serde(default)]` fields: a present value must be a real date, not `null`.
    pub fn present_date<'de, D>(d: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        date(d).map(Some)
    }

    /// For `#[serde(default)]` fields: a present value must not be `null`.
    pub fn present<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        T::deserialize(d).map(Some)
    }
}
