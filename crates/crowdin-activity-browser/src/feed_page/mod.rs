//! [`FeedPage`] over a CDP page session.

mod scripts;

use async_trait::async_trait;
use crowdin_activity_config::SelectorConfig;
use crowdin_activity_core::{DetailControl, FeedPage, PageError, RawActivityItem};
use tracing::trace;

use crate::cdp::{PageSession, Point};

/// The activity stream as rendered in a Chrome tab.
pub struct CdpFeedPage<'a> {
    page: &'a PageSession,
}

impl<'a> CdpFeedPage<'a> {
    pub fn new(page: &'a PageSession) -> Self {
        Self { page }
    }
}

#[async_trait]
impl FeedPage for CdpFeedPage<'_> {
    async fn count(&self, selector: &str) -> Result<usize, PageError> {
        Ok(self.page.query_selector_all(selector).await?.len())
    }

    async fn exists(&self, selector: &str) -> Result<bool, PageError> {
        Ok(self.page.query_selector(selector).await?.is_some())
    }

    async fn is_interactable(&self, selector: &str) -> Result<bool, PageError> {
        Ok(self
            .page
            .evaluate_as::<bool>(&scripts::is_interactable(selector))
            .await?)
    }

    async fn click(&self, selector: &str) -> Result<(), PageError> {
        let point: Option<Point> = self
            .page
            .evaluate_as(&scripts::click_point(selector))
            .await?;
        let Point { x, y } = point.ok_or_else(|| PageError::ElementNotFound(selector.to_string()))?;

        trace!(selector, x, y, "Clicking");
        self.page.click(x, y).await?;
        Ok(())
    }

    async fn detail_controls(&self, selector: &str) -> Result<Vec<DetailControl>, PageError> {
        Ok(self
            .page
            .evaluate_as(&scripts::detail_controls(selector))
            .await?)
    }

    async fn activate(&self, selector: &str, control: &DetailControl) -> Result<bool, PageError> {
        Ok(self
            .page
            .evaluate_as::<bool>(&scripts::activate(selector, control))
            .await?)
    }

    async fn read_items(
        &self,
        selectors: &SelectorConfig,
    ) -> Result<Option<Vec<RawActivityItem>>, PageError> {
        Ok(self
            .page
            .evaluate_as(&scripts::read_items(selectors))
            .await?)
    }
}
