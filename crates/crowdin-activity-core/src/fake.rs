//! Scripted in-memory page used by the unit tests.

use std::sync::Mutex;

use async_trait::async_trait;
use crowdin_activity_config::SelectorConfig;

use crate::error::PageError;
use crate::page::{DetailControl, FeedPage, RawActivityItem};

#[derive(Debug, Default)]
pub(crate) struct FeedState {
    /// Items currently rendered.
    pub rendered: usize,
    /// Items revealed by each successive load-more click.
    pub batches: Vec<usize>,
    /// Render the history start after this many clicks.
    pub history_start_after: Option<usize>,
    pub load_more_visible: bool,
    pub clicks: usize,
    /// Owners of the detail controls, in document order.
    pub controls: Vec<Option<String>>,
    /// Remove a control from the document once it was activated.
    pub detach_on_activate: bool,
    pub activated: Vec<Option<String>>,
    /// Document-order index, at construction, of each activated control.
    pub activated_controls: Vec<usize>,
    /// Stable identity of each live control, assigned by `FakeFeed::new`.
    pub control_ids: Vec<usize>,
    pub fail_enumeration: bool,
    pub items: Option<Vec<RawActivityItem>>,
}

pub(crate) struct FakeFeed {
    pub state: Mutex<FeedState>,
    selectors: SelectorConfig,
}

impl FakeFeed {
    pub fn new(mut state: FeedState) -> Self {
        state.control_ids = (0..state.controls.len()).collect();
        Self {
            state: Mutex::new(state),
            selectors: SelectorConfig::default(),
        }
    }

    pub fn clicks(&self) -> usize {
        self.state.lock().unwrap().clicks
    }

    pub fn activated(&self) -> Vec<Option<String>> {
        self.state.lock().unwrap().activated.clone()
    }

    pub fn activated_controls(&self) -> Vec<usize> {
        self.state.lock().unwrap().activated_controls.clone()
    }

    fn history_start_rendered(state: &FeedState) -> bool {
        state
            .history_start_after
            .is_some_and(|after| state.clicks >= after)
    }
}

#[async_trait]
impl FeedPage for FakeFeed {
    async fn count(&self, selector: &str) -> Result<usize, PageError> {
        let state = self.state.lock().unwrap();
        if selector == self.selectors.items {
            Ok(state.rendered)
        } else if selector == self.selectors.history_start {
            Ok(usize::from(Self::history_start_rendered(&state)))
        } else if selector == self.selectors.load_more {
            Ok(usize::from(state.load_more_visible))
        } else {
            Ok(0)
        }
    }

    async fn has_item_at(&self, items: &str, position: usize) -> Result<bool, PageError> {
        assert_eq!(items, self.selectors.items);
        Ok(self.state.lock().unwrap().rendered >= position)
    }

    async fn is_interactable(&self, selector: &str) -> Result<bool, PageError> {
        assert_eq!(selector, self.selectors.load_more);
        Ok(self.state.lock().unwrap().load_more_visible)
    }

    async fn click(&self, selector: &str) -> Result<(), PageError> {
        assert_eq!(selector, self.selectors.load_more);
        let mut state = self.state.lock().unwrap();
        if !state.load_more_visible {
            return Err(PageError::ElementNotFound(selector.to_string()));
        }
        let batch = state.batches.get(state.clicks).copied().unwrap_or(0);
        state.clicks += 1;
        state.rendered += batch;
        Ok(())
    }

    async fn detail_controls(&self, selector: &str) -> Result<Vec<DetailControl>, PageError> {
        assert_eq!(selector, self.selectors.detail_control);
        let state = self.state.lock().unwrap();
        if state.fail_enumeration {
            return Err(PageError::Script("querySelectorAll failed".to_string()));
        }
        Ok(state
            .controls
            .iter()
            .enumerate()
            .map(|(ordinal, owner)| DetailControl {
                ordinal,
                owner: owner.clone(),
                index_in_owner: owner.as_ref().map_or(0, |_| {
                    state.controls[..ordinal]
                        .iter()
                        .filter(|o| **o == *owner)
                        .count()
                }),
            })
            .collect())
    }

    async fn activate(&self, _selector: &str, control: &DetailControl) -> Result<bool, PageError> {
        let mut state = self.state.lock().unwrap();
        let position = match &control.owner {
            Some(owner) => state
                .controls
                .iter()
                .enumerate()
                .filter(|(_, o)| o.as_deref() == Some(owner.as_str()))
                .nth(control.index_in_owner)
                .map(|(position, _)| position),
            None => (control.ordinal < state.controls.len()).then_some(control.ordinal),
        };
        let Some(position) = position else {
            return Ok(false);
        };
        let (owner, id) = if state.detach_on_activate {
            (state.controls.remove(position), state.control_ids.remove(position))
        } else {
            (state.controls[position].clone(), state.control_ids[position])
        };
        state.activated.push(owner);
        state.activated_controls.push(id);
        Ok(true)
    }

    async fn read_items(
        &self,
        _selectors: &SelectorConfig,
    ) -> Result<Option<Vec<RawActivityItem>>, PageError> {
        Ok(self.state.lock().unwrap().items.clone())
    }
}
