//! The automation seam between the pipeline and a rendered page.

use async_trait::async_trait;
use crowdin_activity_config::SelectorConfig;
use serde::Deserialize;

use crate::error::PageError;

/// One "expand details" control, as seen when the controls were enumerated.
///
/// `owner` is the id of the closest activity item around the control and
/// `index_in_owner` its position among that item's own controls. Together
/// they are the stable handle used to find the control again at activation
/// time; `ordinal` is only used for controls outside any identified item.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailControl {
    pub ordinal: usize,
    pub owner: Option<String>,
    #[serde(default)]
    pub index_in_owner: usize,
}

/// The data read out of one top-level list item.
///
/// Texts are the rendered, trimmed element texts. `detail_files` has one
/// entry per detail row; `None` marks a row without a file cell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawActivityItem {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub detail_files: Vec<Option<String>>,
    #[serde(default)]
    pub inline_files: Vec<String>,
}

/// Reads and drives the activity stream page.
///
/// All selectors come from the [`SelectorConfig`] contract; implementations
/// must not assume any other page structure.
#[async_trait]
pub trait FeedPage: Send + Sync {
    /// Number of elements currently matching `selector`.
    async fn count(&self, selector: &str) -> Result<usize, PageError>;

    async fn exists(&self, selector: &str) -> Result<bool, PageError> {
        Ok(self.count(selector).await? > 0)
    }

    /// Whether an item is rendered at 1-based `position` among its siblings.
    async fn has_item_at(&self, items: &str, position: usize) -> Result<bool, PageError> {
        self.exists(&format!("{}:nth-child({})", items, position))
            .await
    }

    /// Whether the first match of `selector` is visible and enabled.
    async fn is_interactable(&self, selector: &str) -> Result<bool, PageError>;

    /// Pointer click on the first match of `selector`.
    async fn click(&self, selector: &str) -> Result<(), PageError>;

    /// Enumerate the controls matching `selector`.
    async fn detail_controls(&self, selector: &str) -> Result<Vec<DetailControl>, PageError>;

    /// Activate `control` directly, bypassing visibility and occlusion.
    ///
    /// The control is re-resolved in the live document. Returns `false` when
    /// it can no longer be found.
    async fn activate(&self, selector: &str, control: &DetailControl) -> Result<bool, PageError>;

    /// Read every direct item of the list container, or `None` when the
    /// container is missing.
    async fn read_items(
        &self,
        selectors: &SelectorConfig,
    ) -> Result<Option<Vec<RawActivityItem>>, PageError>;
}
