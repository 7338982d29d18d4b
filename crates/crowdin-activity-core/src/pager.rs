//! "Load more" paging until the project's creation entry is on the page.

use std::time::Duration;

use crowdin_activity_config::{FeedConfig, SelectorConfig};
use tracing::{debug, info, warn};

use crate::error::{FeedError, Stage};
use crate::page::FeedPage;
use crate::wait::poll_until;

/// Outcome of a successful paging run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagingReport {
    /// Number of load-more clicks performed.
    pub cycles: usize,
    /// Items rendered when the history start was observed.
    pub items: usize,
}

/// What a wait after a click observed.
enum Observed {
    HistoryStart,
    NewItem,
}

/// Reveals the whole activity history by repeatedly clicking "load more".
pub struct Pager<'a, P: FeedPage + ?Sized> {
    page: &'a P,
    selectors: &'a SelectorConfig,
    timeout: Duration,
    poll_interval: Duration,
}

impl<'a, P: FeedPage + ?Sized> Pager<'a, P> {
    pub fn new(page: &'a P, selectors: &'a SelectorConfig, feed: &FeedConfig) -> Self {
        Self {
            page,
            selectors,
            timeout: feed.wait_timeout(),
            poll_interval: feed.poll_interval(),
        }
    }

    /// Click "load more" until the history start is rendered.
    ///
    /// The history start marker is checked before every click, so an empty
    /// or already complete feed finishes without touching the control, and
    /// no click ever follows its appearance.
    pub async fn run(&self) -> Result<PagingReport, FeedError> {
        let mut cycles = 0;

        loop {
            if self.history_start_rendered().await? {
                return self.finish(cycles).await;
            }

            let previous = self
                .page
                .count(&self.selectors.items)
                .await
                .map_err(FeedError::during(Stage::Paging))?;
            info!(loaded = previous, "Loading more activities...");

            if !self.wait_for_control().await? {
                return self.finish(cycles).await;
            }

            if let Err(e) = self.page.click(&self.selectors.load_more).await {
                // A control that vanished between the wait and the click is
                // only acceptable if the history start took its place.
                if self.history_start_rendered().await? {
                    debug!(error = %e, "Load-more click failed after history start appeared");
                    return self.finish(cycles).await;
                }
                warn!(error = %e, "Load-more click failed");
                return Err(FeedError::ControlNotInteractable {
                    control: self.selectors.load_more.clone(),
                    timeout: self.timeout,
                });
            }
            cycles += 1;

            match self.wait_for_progress(previous).await? {
                Observed::HistoryStart => return self.finish(cycles).await,
                Observed::NewItem => debug!(cycle = cycles, "New activities rendered"),
            }
        }
    }

    async fn history_start_rendered(&self) -> Result<bool, FeedError> {
        self.page
            .exists(&self.selectors.history_start)
            .await
            .map_err(FeedError::during(Stage::Paging))
    }

    /// Wait for the load-more control. Returns `false` if the history start
    /// showed up instead.
    async fn wait_for_control(&self) -> Result<bool, FeedError> {
        let page = self.page;
        let selectors = self.selectors;

        let observed = poll_until(self.timeout, self.poll_interval, || async move {
            if page.exists(&selectors.history_start).await? {
                return Ok(Some(false));
            }
            Ok(page
                .is_interactable(&selectors.load_more)
                .await?
                .then_some(true))
        })
        .await
        .map_err(FeedError::during(Stage::Paging))?;

        observed.ok_or_else(|| FeedError::ControlNotInteractable {
            control: selectors.load_more.clone(),
            timeout: self.timeout,
        })
    }

    /// Wait until item `previous + 1` or the history start is rendered. The
    /// history start wins when both are present in the same poll.
    async fn wait_for_progress(&self, previous: usize) -> Result<Observed, FeedError> {
        let page = self.page;
        let selectors = self.selectors;
        let position = previous + 1;

        let observed = poll_until(self.timeout, self.poll_interval, || async move {
            if page.exists(&selectors.history_start).await? {
                return Ok(Some(Observed::HistoryStart));
            }
            Ok(page
                .has_item_at(&selectors.items, position)
                .await?
                .then_some(Observed::NewItem))
        })
        .await
        .map_err(FeedError::during(Stage::Paging))?;

        observed.ok_or(FeedError::NoNewContentDetected {
            position,
            timeout: self.timeout,
        })
    }

    async fn finish(&self, cycles: usize) -> Result<PagingReport, FeedError> {
        let items = self
            .page
            .count(&self.selectors.items)
            .await
            .map_err(FeedError::during(Stage::Paging))?;
        info!(cycles, items, "Loaded all items since the project was created.");
        Ok(PagingReport { cycles, items })
    }
}

#[cfg(test)]
#[path = "pager_tests.rs"]
mod tests;
