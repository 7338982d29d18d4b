//! Activity identifiers, records and output rows.

use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;

use crate::error::ItemError;

static ACTIVITY_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+?)-(\d+)-(\d+)$").expect("static pattern"));

/// Parsed `<type>-<user id>-<epoch seconds>` item identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityId {
    pub activity_type: String,
    pub user_id: u64,
    pub epoch_seconds: i64,
}

impl FromStr for ActivityId {
    type Err = ItemError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let malformed = || ItemError::MalformedActivityId(raw.to_string());
        let caps = ACTIVITY_ID.captures(raw).ok_or_else(malformed)?;

        Ok(Self {
            activity_type: caps[1].to_string(),
            user_id: caps[2].parse().map_err(|_| malformed())?,
            epoch_seconds: caps[3].parse().map_err(|_| malformed())?,
        })
    }
}

/// One activity event read from the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityRecord {
    pub activity_type: String,
    pub user_id: u64,
    pub epoch_seconds: i64,
    /// Display name of the acting user.
    pub user: String,
    /// Normalized article names, in page order.
    pub articles: Vec<String>,
}

impl ActivityRecord {
    pub fn new(id: ActivityId, user: String, articles: Vec<String>) -> Self {
        Self {
            activity_type: id.activity_type,
            user_id: id.user_id,
            epoch_seconds: id.epoch_seconds,
            user,
            articles,
        }
    }

    /// Event time. The raw value has second granularity and is scaled to
    /// milliseconds; `None` when that falls outside the representable range.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.epoch_seconds
            .checked_mul(1000)
            .and_then(DateTime::from_timestamp_millis)
    }
}

/// One exported row: a record with exactly one of its articles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityRow {
    /// Contiguous, zero-based position in the export.
    pub index: usize,
    pub activity_type: String,
    pub user_id: u64,
    pub date: DateTime<Utc>,
    pub user: String,
    /// `None` for activities without any attached file.
    pub article: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_activity_id() {
        let id: ActivityId = "translation-123-1650000000".parse().unwrap();
        assert_eq!(
            id,
            ActivityId {
                activity_type: "translation".to_string(),
                user_id: 123,
                epoch_seconds: 1_650_000_000,
            }
        );
    }

    #[test]
    fn test_type_may_contain_dashes() {
        let id: ActivityId = "approve-suggestion-7-1600000000".parse().unwrap();
        assert_eq!(id.activity_type, "approve-suggestion");
        assert_eq!(id.user_id, 7);
    }

    #[test]
    fn test_malformed_ids() {
        for raw in [
            "",
            "translation",
            "translation-123",
            "translation-abc-1650000000",
            "translation-123-16500x",
            "-123-1650000000",
            "translation-123-1650000000-",
            "translation-99999999999999999999999-1",
        ] {
            let err = raw.parse::<ActivityId>().unwrap_err();
            assert_eq!(err, ItemError::MalformedActivityId(raw.to_string()));
        }
    }

    #[test]
    fn test_timestamp_scaling() {
        let record = ActivityRecord::new(
            "translation-1-1650000000".parse().unwrap(),
            "alice".to_string(),
            vec![],
        );
        let ts = record.timestamp().unwrap();
        assert_eq!(ts.timestamp(), 1_650_000_000);
        assert_eq!(ts.to_rfc3339(), "2022-04-15T05:20:00+00:00");
    }

    #[test]
    fn test_timestamp_out_of_range() {
        let record = ActivityRecord {
            activity_type: "t".to_string(),
            user_id: 1,
            epoch_seconds: i64::MAX / 10,
            user: String::new(),
            articles: vec![],
        };
        assert!(record.timestamp().is_none());
    }
}
