//! Error kinds for the export pipeline.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Failure reported by a [`FeedPage`](crate::FeedPage) implementation.
#[derive(Debug, Error)]
pub enum PageError {
    /// A script evaluated in the page threw.
    #[error("Script error: {0}")]
    Script(String),

    /// An element that had to be present was not.
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// The page answered with something the caller cannot interpret.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The automation session is gone or not reachable.
    #[error("Page unavailable: {0}")]
    Unavailable(String),
}

/// Pipeline stage a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Setup,
    Paging,
    Expansion,
    Extraction,
    Export,
}

impl Stage {
    /// Process exit code reported for failures in this stage.
    pub fn exit_code(self) -> u8 {
        match self {
            Stage::Setup => 1,
            Stage::Paging => 2,
            Stage::Expansion => 3,
            Stage::Extraction => 4,
            Stage::Export => 5,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Setup => "setup",
            Stage::Paging => "paging",
            Stage::Expansion => "detail expansion",
            Stage::Extraction => "extraction",
            Stage::Export => "export",
        };
        f.write_str(name)
    }
}

/// A single activity item that could not be turned into a record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ItemError {
    #[error("Malformed activity id: {0:?}")]
    MalformedActivityId(String),

    #[error("Activity {item_id} has no user name")]
    MissingUserName { item_id: String },

    #[error("Activity {item_id}: detail row {row} has no file cell")]
    UnexpectedArticleStructure { item_id: String, row: usize },
}

/// Pipeline errors.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    #[error("Control '{control}' did not become interactable within {timeout:?}")]
    ControlNotInteractable { control: String, timeout: Duration },

    #[error("Neither item {position} nor the history start appeared within {timeout:?}")]
    NoNewContentDetected { position: usize, timeout: Duration },

    #[error("Detail controls could not be enumerated: {0}")]
    DetailControlsUnavailable(#[source] PageError),

    #[error("Activity list '{0}' not found")]
    MissingListContainer(String),

    #[error(transparent)]
    Item(#[from] ItemError),

    #[error("Timestamp out of range: {0} seconds")]
    TimestampOutOfRange(i64),

    #[error("Page error during {stage}: {source}")]
    Page {
        stage: Stage,
        #[source]
        source: PageError,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FeedError {
    /// Wrap a page failure with the stage it happened in.
    pub fn during(stage: Stage) -> impl FnOnce(PageError) -> FeedError {
        move |source| FeedError::Page { stage, source }
    }

    /// Stage the failure belongs to.
    pub fn stage(&self) -> Stage {
        match self {
            FeedError::InvalidTarget(_) => Stage::Setup,
            FeedError::ControlNotInteractable { .. } | FeedError::NoNewContentDetected { .. } => {
                Stage::Paging
            }
            FeedError::DetailControlsUnavailable(_) => Stage::Expansion,
            FeedError::MissingListContainer(_)
            | FeedError::Item(_)
            | FeedError::TimestampOutOfRange(_) => Stage::Extraction,
            FeedError::Page { stage, .. } => *stage,
            FeedError::Io(_) => Stage::Export,
        }
    }
}
