//! # crowdin-activity config
//!
//! Configuration for the activity stream exporter: browser launch options,
//! feed timing, the DOM selector contract and logging.

mod error;
mod loader;
mod schema;
mod validator;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::*;
pub use validator::{ConfigValidator, ValidationError, ValidationResult, ValidationWarning};
