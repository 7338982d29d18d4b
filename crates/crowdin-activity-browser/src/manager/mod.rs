//! Chrome lifecycle for one export run.
//!
//! Reuses a Chrome already listening on the debugging port, or launches one
//! with a dedicated profile. [`BrowserSession`] owns whatever it acquired.

mod manager_core;
mod manager_types;

pub use manager_core::BrowserSession;
pub use manager_types::BrowserError;

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
