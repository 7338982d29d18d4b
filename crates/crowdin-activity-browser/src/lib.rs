//! Chrome backend for the activity stream exporter.
//!
//! Drives a Chrome/Chromium page over the Chrome DevTools Protocol (CDP):
//!
//! ```text
//! ┌──────────────────┐    WebSocket     ┌──────────────────┐
//! │ crowdin-activity │ ◄──────────────► │  Chrome/Chromium │
//! │  (this crate)    │       CDP        │   (headless)     │
//! └──────────────────┘                  └──────────────────┘
//! ```
//!
//! A Chrome already listening on the configured debugging port is reused;
//! otherwise one is launched with the configured flags. Either way the
//! [`BrowserSession`] owns what it acquired and releases it exactly once.
//!
//! [`CdpFeedPage`] implements [`crowdin_activity_core::FeedPage`] on top of
//! a CDP page session.

pub mod cdp;
mod feed_page;
pub mod manager;

pub use cdp::{CdpClient, CdpError, PageSession};
pub use feed_page::CdpFeedPage;
pub use manager::{BrowserError, BrowserSession};
