//! Localisation helpers: message templates, duration formatting and the
//! bundled English resources.

pub mod resources;
pub mod template;
pub mod timespan;

pub use template::{format_number, render};
pub use timespan::{TimespanMessage, TimespanUnit, timespan_message};

/// Returned by `TranslateString` when the indices do not resolve.
pub const INVALID_INDEX_FALLBACK: &str = "invalid module/message index";
