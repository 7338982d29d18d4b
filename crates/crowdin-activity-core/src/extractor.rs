//! Turns raw list items into activity records.

use crowdin_activity_config::MalformedItemPolicy;
use tracing::{debug, info, warn};

use crate::error::ItemError;
use crate::model::{ActivityId, ActivityRecord};
use crate::normalizer::Normalizer;
use crate::page::RawActivityItem;

/// Where an item's article names come from. Resolved once per item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArticleSource {
    /// Expanded detail table, one file cell per row.
    DetailRows(Vec<Option<String>>),
    /// Filename elements shown inline in the item.
    InlineFiles(Vec<String>),
}

impl ArticleSource {
    /// Detail rows win whenever the item has any.
    pub fn resolve(item: &RawActivityItem) -> Self {
        if item.detail_files.is_empty() {
            ArticleSource::InlineFiles(item.inline_files.clone())
        } else {
            ArticleSource::DetailRows(item.detail_files.clone())
        }
    }

    /// Raw article names, failing on a detail row without a file cell.
    pub fn into_raw_articles(self, item_id: &str) -> Result<Vec<String>, ItemError> {
        match self {
            ArticleSource::DetailRows(rows) => rows
                .into_iter()
                .enumerate()
                .map(|(row, file)| {
                    file.ok_or_else(|| ItemError::UnexpectedArticleStructure {
                        item_id: item_id.to_string(),
                        row,
                    })
                })
                .collect(),
            ArticleSource::InlineFiles(files) => Ok(files),
        }
    }
}

/// Records extracted from one page, plus what was left out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub records: Vec<ActivityRecord>,
    /// Items dropped under [`MalformedItemPolicy::Skip`].
    pub skipped: Vec<ItemError>,
}

/// Builds [`ActivityRecord`]s from list items.
#[derive(Debug, Clone, Default)]
pub struct ActivityExtractor {
    normalizer: Normalizer,
}

impl ActivityExtractor {
    pub fn new(normalizer: Normalizer) -> Self {
        Self { normalizer }
    }

    /// Extract one item. `Ok(None)` for structural items without an id.
    pub fn extract(&self, item: &RawActivityItem) -> Result<Option<ActivityRecord>, ItemError> {
        let Some(raw_id) = item.id.as_deref().filter(|id| !id.is_empty()) else {
            return Ok(None);
        };

        let id: ActivityId = raw_id.parse()?;
        let user = item
            .user
            .clone()
            .ok_or_else(|| ItemError::MissingUserName {
                item_id: raw_id.to_string(),
            })?;

        let articles = ArticleSource::resolve(item)
            .into_raw_articles(raw_id)?
            .iter()
            .map(|raw| self.normalizer.normalize(raw))
            .collect();

        Ok(Some(ActivityRecord::new(id, user, articles)))
    }

    /// Extract every item, in page order.
    pub fn extract_all(
        &self,
        items: &[RawActivityItem],
        policy: MalformedItemPolicy,
    ) -> Result<Extraction, ItemError> {
        info!("Get activity details from {} loaded items...", items.len());
        let mut extraction = Extraction::default();

        for item in items {
            match self.extract(item) {
                Ok(Some(record)) => extraction.records.push(record),
                Ok(None) => debug!("Skipping list item without activity id"),
                Err(e) if policy == MalformedItemPolicy::Skip => {
                    warn!(error = %e, "Skipping malformed activity item");
                    extraction.skipped.push(e);
                }
                Err(e) => return Err(e),
            }
        }

        info!(
            records = extraction.records.len(),
            skipped = extraction.skipped.len(),
            "Extracted activities"
        );
        Ok(extraction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, user: &str) -> RawActivityItem {
        RawActivityItem {
            id: Some(id.to_string()),
            user: Some(user.to_string()),
            ..RawActivityItem::default()
        }
    }

    #[test]
    fn test_detail_rows_take_precedence() {
        let raw = RawActivityItem {
            detail_files: vec![Some("a.md".to_string())],
            inline_files: vec!["b.md".to_string()],
            ..item("translation-1-1", "alice")
        };
        assert_eq!(
            ArticleSource::resolve(&raw),
            ArticleSource::DetailRows(vec![Some("a.md".to_string())])
        );
    }

    #[test]
    fn test_inline_files_used_without_detail_rows() {
        let raw = RawActivityItem {
            inline_files: vec!["b.md".to_string()],
            ..item("translation-1-1", "alice")
        };
        assert_eq!(
            ArticleSource::resolve(&raw),
            ArticleSource::InlineFiles(vec!["b.md".to_string()])
        );
    }

    #[test]
    fn test_detail_row_without_file_cell() {
        let source = ArticleSource::DetailRows(vec![Some("a".to_string()), None]);
        let err = source.into_raw_articles("translation-1-1").unwrap_err();
        assert_eq!(
            err,
            ItemError::UnexpectedArticleStructure {
                item_id: "translation-1-1".to_string(),
                row: 1,
            }
        );
    }

    #[test]
    fn test_extract_normalizes_articles() {
        let raw = RawActivityItem {
            detail_files: vec![
                Some("/translations/p/docs/intro/intro.md".to_string()),
                Some("/translations/p/docs/intro/next_steps.md".to_string()),
            ],
            ..item("translation-42-1650000000", "Alice Doe")
        };

        let record = ActivityExtractor::default().extract(&raw).unwrap().unwrap();
        assert_eq!(record.activity_type, "translation");
        assert_eq!(record.user_id, 42);
        assert_eq!(record.epoch_seconds, 1_650_000_000);
        assert_eq!(record.user, "Alice Doe");
        assert_eq!(record.articles, vec!["intro", "intro/next steps"]);
    }

    #[test]
    fn test_item_without_articles() {
        let record = ActivityExtractor::default()
            .extract(&item("join-5-1600000000", "bob"))
            .unwrap()
            .unwrap();
        assert!(record.articles.is_empty());
    }

    #[test]
    fn test_structural_items_are_skipped() {
        let extractor = ActivityExtractor::default();
        assert_eq!(extractor.extract(&RawActivityItem::default()).unwrap(), None);

        let empty_id = RawActivityItem {
            id: Some(String::new()),
            ..RawActivityItem::default()
        };
        assert_eq!(extractor.extract(&empty_id).unwrap(), None);
    }

    #[test]
    fn test_missing_user_name() {
        let raw = RawActivityItem {
            user: None,
            ..item("translation-1-1", "")
        };
        let err = ActivityExtractor::default().extract(&raw).unwrap_err();
        assert!(matches!(err, ItemError::MissingUserName { .. }));
    }

    #[test]
    fn test_abort_policy_stops_at_malformed_item() {
        let items = vec![item("translation-1-1", "a"), item("garbage", "b")];
        let err = ActivityExtractor::default()
            .extract_all(&items, MalformedItemPolicy::Abort)
            .unwrap_err();
        assert_eq!(err, ItemError::MalformedActivityId("garbage".to_string()));
    }

    #[test]
    fn test_skip_policy_keeps_good_items_in_order() {
        let items = vec![
            item("translation-1-1", "a"),
            item("garbage", "b"),
            RawActivityItem::default(),
            item("vote-3-3", "c"),
        ];
        let extraction = ActivityExtractor::default()
            .extract_all(&items, MalformedItemPolicy::Skip)
            .unwrap();

        let users: Vec<&str> = extraction.records.iter().map(|r| r.user.as_str()).collect();
        assert_eq!(users, vec!["a", "c"]);
        assert_eq!(extraction.skipped.len(), 1);
    }
}
