//! Reveals per-item detail panels before extraction.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::error::{FeedError, Stage};
use crate::page::FeedPage;

/// Outcome of a detail expansion pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExpansionReport {
    /// Controls present when the pass started.
    pub found: usize,
    /// Controls that were found again and activated.
    pub activated: usize,
}

/// Activates every "expand details" control present on the page.
///
/// Best effort: panels are not checked for having rendered. Each control is
/// looked up again by its owning item right before activation, so earlier
/// activations re-rendering or detaching siblings cannot leave a stale
/// handle behind.
pub struct DetailExpander<'a, P: FeedPage + ?Sized> {
    page: &'a P,
    selector: &'a str,
    settle: Duration,
}

impl<'a, P: FeedPage + ?Sized> DetailExpander<'a, P> {
    pub fn new(page: &'a P, selector: &'a str, settle: Duration) -> Self {
        Self {
            page,
            selector,
            settle,
        }
    }

    pub async fn run(&self) -> Result<ExpansionReport, FeedError> {
        let controls = self
            .page
            .detail_controls(self.selector)
            .await
            .map_err(FeedError::DetailControlsUnavailable)?;

        info!("Obtaining details of {} items...", controls.len());
        let mut report = ExpansionReport {
            found: controls.len(),
            activated: 0,
        };

        for control in &controls {
            let activated = self
                .page
                .activate(self.selector, control)
                .await
                .map_err(FeedError::during(Stage::Expansion))?;

            if activated {
                report.activated += 1;
                debug!(owner = ?control.owner, ordinal = control.ordinal, "Expanded details");
            } else {
                warn!(
                    owner = ?control.owner,
                    ordinal = control.ordinal,
                    "Detail control disappeared before activation"
                );
            }

            if !self.settle.is_zero() {
                tokio::time::sleep(self.settle).await;
            }
        }

        info!(
            activated = report.activated,
            found = report.found,
            "Loaded details for all items."
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PageError;
    use crate::fake::{FakeFeed, FeedState};
    use crowdin_activity_config::SelectorConfig;

    fn owners(ids: &[&str]) -> Vec<Option<String>> {
        ids.iter().map(|id| Some(id.to_string())).collect()
    }

    async fn expand(feed: &FakeFeed) -> Result<ExpansionReport, FeedError> {
        let selectors = SelectorConfig::default();
        DetailExpander::new(feed, &selectors.detail_control, Duration::ZERO)
            .run()
            .await
    }

    #[tokio::test]
    async fn test_activates_every_control() {
        let feed = FakeFeed::new(FeedState {
            controls: owners(&["a-1-1", "b-2-2", "c-3-3"]),
            ..FeedState::default()
        });

        let report = expand(&feed).await.unwrap();
        assert_eq!(report, ExpansionReport { found: 3, activated: 3 });
        assert_eq!(feed.activated(), owners(&["a-1-1", "b-2-2", "c-3-3"]));
    }

    #[tokio::test]
    async fn test_detaching_controls_does_not_skip_siblings() {
        // Each activation removes its control from the live collection, which
        // shifts every later control down by one position.
        let feed = FakeFeed::new(FeedState {
            controls: owners(&["a-1-1", "b-2-2", "c-3-3", "d-4-4"]),
            detach_on_activate: true,
            ..FeedState::default()
        });

        let report = expand(&feed).await.unwrap();
        assert_eq!(report.activated, 4);
        assert_eq!(feed.activated(), owners(&["a-1-1", "b-2-2", "c-3-3", "d-4-4"]));
    }

    #[tokio::test]
    async fn test_each_control_of_one_item_is_activated_once() {
        let feed = FakeFeed::new(FeedState {
            controls: vec![
                Some("translation-1-1".to_string()),
                Some("translation-1-1".to_string()),
                None,
                Some("upload-2-2".to_string()),
            ],
            ..FeedState::default()
        });

        let report = expand(&feed).await.unwrap();
        assert_eq!(report, ExpansionReport { found: 4, activated: 4 });
        assert_eq!(feed.activated_controls(), vec![0, 1, 2, 3]);
    }

    #[tokio::test]
    async fn test_no_controls_is_success() {
        let feed = FakeFeed::new(FeedState::default());
        let report = expand(&feed).await.unwrap();
        assert_eq!(report, ExpansionReport::default());
    }

    #[tokio::test]
    async fn test_enumeration_failure() {
        let feed = FakeFeed::new(FeedState {
            fail_enumeration: true,
            ..FeedState::default()
        });

        let err = expand(&feed).await.unwrap_err();
        assert!(matches!(
            err,
            FeedError::DetailControlsUnavailable(PageError::Script(_))
        ));
        assert_eq!(err.stage(), Stage::Expansion);
    }
}
