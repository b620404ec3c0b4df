//! # fieldguard
//!
//! Path-based validation for nested JSON data. Rules are attached to dotted
//! field paths, where `*` stands for every element of an array. On success the
//! validator returns a pruned copy of the input holding only the fields that
//! had rules; on failure it returns every failing field with its messages.
//!
//! ## Example
//!
//! ```rust,ignore
//! use fieldguard::prelude::*;
//! use serde_json::json;
//!
//! let rules = RuleSet::new()
//!     .field("name", vec![rule(RequiredRule::new()), rule(LengthRule::new(2, 50))])
//!     .field("users.*.email", vec![rule(RequiredRule::new()), rule(EmailRule::new())])
//!     .field("bio", vec![rule(NullableRule::new()), rule(TypeRule::string())]);
//!
//! let input = json!({
//!     "name": "Team",
//!     "users": [{"email": "a@x.com", "password": "secret"}],
//!     "bio": null,
//!     "is_admin": true
//! });
//!
//! let clean = Validator::new().validate(&input, &rules).await?;
//! assert_eq!(clean, json!({
//!     "name": "Team",
//!     "users": [{"email": "a@x.com"}],
//!     "bio": null
//! }));
//! ```
//!
//! ## Modes
//!
//! - **Parallel** (default): every field is validated concurrently and all
//!   failures are reported.
//! - **Sequential**: fields run in order and validation stops at the first
//!   field whose `Required` rule failed.
//!
//! ## Error Format
//!
//! [`ValidationErrors::to_api_error`] renders failures for an HTTP layer:
//!
//! ```json
//! {
//!   "error": {
//!     "type": "validation_error",
//!     "message": "The given data was invalid.",
//!     "fields": [
//!       {"field": "users.0.email", "code": "validation", "message": "Invalid email format"}
//!     ]
//!   }
//! }
//! ```

#[macro_use]
mod logging;

mod config;
mod error;
mod expand;
mod field;
mod path;
mod project;
mod resolve;
mod rule;
pub mod rules;
mod validator;


pub use config::{ConfigError, ValidatorConfig, ENV_PREFIX};
pub use error::{
    ApiValidationError, Error, ErrorBody, FieldErrorResponse, RuleError, ValidationErrors,
    DEFAULT_MESSAGE,
};
pub use expand::{expand_path, expand_rules, Expansion, PathExpansion};
pub use field::{validate_field, FieldReport};
pub use path::{has_wildcard, parse_path, PathCache, PathSegment, SEPARATOR, WILDCARD};
pub use project::{project, ValidatedPaths};
pub use resolve::{resolve, resolve_or_null};
pub use rule::{rule, Rule, RuleKind, RuleRef, RuleSet};
pub use validator::{validate, ValidationOutcome, Validator};

// Re-export async_trait for custom rule implementations
pub use async_trait::async_trait;

/// Prelude module for validation
pub mod prelude {
    pub use crate::config::ValidatorConfig;
    pub use crate::error::{Error, RuleError, ValidationErrors};
    pub use crate::rule::{rule, Rule, RuleKind, RuleRef, RuleSet};
    pub use crate::rules::*;
    pub use crate::validator::{validate, ValidationOutcome, Validator};
    pub use async_trait::async_trait;
    pub use serde_json::Value;
}
