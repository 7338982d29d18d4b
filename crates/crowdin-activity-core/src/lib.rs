//! Activity stream export core.
//!
//! Turns a Crowdin project's activity stream page into flat rows:
//!
//! ```text
//! Pager ──► DetailExpander ──► ActivityExtractor ──► table::build ──► export
//!   (load more)   (expand details)   (items → records)   (explode)     (CSV)
//! ```
//!
//! The page itself is reached only through the [`FeedPage`] trait, so every
//! stage can be driven by a real browser or by a scripted page in tests.

mod error;
mod expander;
pub mod export;
mod extractor;
mod model;
mod normalizer;
mod page;
mod pager;
mod pipeline;
pub mod table;
mod wait;

#[cfg(test)]
mod fake;

pub use error::{FeedError, ItemError, PageError, Stage};
pub use expander::{DetailExpander, ExpansionReport};
pub use extractor::{ActivityExtractor, ArticleSource, Extraction};
pub use model::{ActivityId, ActivityRecord, ActivityRow};
pub use normalizer::Normalizer;
pub use page::{DetailControl, FeedPage, RawActivityItem};
pub use pager::{Pager, PagingReport};
pub use pipeline::{activity_stream_url, run_feed, FeedRun};
