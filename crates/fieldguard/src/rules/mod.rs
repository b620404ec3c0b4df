//! Rule catalog.
//!
//! The validator only depends on the [`Rule`](crate::Rule) trait. These are
//! ready-made rules for common checks, split into synchronous predicates and
//! rules that need an async lookup.

mod async_rules;
mod sync_rules;

pub use async_rules::*;
pub use sync_rules::*;

/// Custom message if set, default otherwise.
pub(crate) fn message_or(custom: &Option<String>, default: impl FnOnce() -> String) -> String {
    custom.clone().unwrap_or_else(default)
}
