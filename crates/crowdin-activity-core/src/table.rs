//! Flattening records into rows.

use crate::error::FeedError;
use crate::model::{ActivityRecord, ActivityRow};

/// Explode `records` into one row per article.
///
/// A record without articles still yields one row, with no article. Rows
/// follow record order, then article order, and are indexed from zero.
pub fn build(records: &[ActivityRecord]) -> Result<Vec<ActivityRow>, FeedError> {
    let mut rows = Vec::with_capacity(records.iter().map(|r| r.articles.len().max(1)).sum());

    for record in records {
        let date = record
            .timestamp()
            .ok_or(FeedError::TimestampOutOfRange(record.epoch_seconds))?;

        let articles: Vec<Option<&String>> = if record.articles.is_empty() {
            vec![None]
        } else {
            record.articles.iter().map(Some).collect()
        };

        for article in articles {
            rows.push(ActivityRow {
                index: rows.len(),
                activity_type: record.activity_type.clone(),
                user_id: record.user_id,
                date,
                user: record.user.clone(),
                article: article.cloned(),
            });
        }
    }

    Ok(rows)
}
