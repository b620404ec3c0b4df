//! Validation orchestration.
//!
//! A call moves through three steps:
//!
//! 1. expand every rule path against the input (`expand.rs`),
//! 2. run each concrete field's rules (`field.rs`), either all at once or one
//!    by one with an early stop on a failed `Required` rule,
//! 3. on success, project the validated paths into a pruned copy of the
//!    input (`project.rs`).

use crate::config::ValidatorConfig;
use crate::error::{Error, ValidationErrors};
use crate::expand::{expand_rules, Expansion};
use crate::field::check_field;
use crate::path::PathCache;
use crate::project::{project, ValidatedPaths};
use crate::rule::{RuleRef, RuleSet};
use futures_util::future::join_all;
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Result of the validation phase, before projection.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
    /// Every field passed
    Success(ValidatedPaths),
    /// At least one field failed
    Failure(ValidationErrors),
}

impl ValidationOutcome {
    /// Check if validation succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, ValidationOutcome::Success(_))
    }
}

/// Validates nested input against a [`RuleSet`].
///
/// ## Example
///
/// ```rust,ignore
/// use fieldguard::prelude::*;
/// use serde_json::json;
///
/// let rules = RuleSet::new()
///     .rule("name", RequiredRule::new())
///     .rule("users.*.email", EmailRule::new());
///
/// let input = json!({"name": "Ada", "users": [{"email": "a@x.com"}], "extra": 1});
/// let clean = Validator::new().validate(&input, &rules).await?;
/// assert_eq!(clean, json!({"name": "Ada", "users": [{"email": "a@x.com"}]}));
/// ```
#[derive(Debug, Clone)]
pub struct Validator {
    config: ValidatorConfig,
    cache: Arc<PathCache>,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator {
    /// Create a validator with the default configuration and the global path cache.
    pub fn new() -> Self {
        Self::with_config(ValidatorConfig::default())
    }

    /// Create a validator with the given configuration.
    pub fn with_config(config: ValidatorConfig) -> Self {
        Self {
            config,
            cache: PathCache::global(),
        }
    }

    /// Set parallel mode.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.config.parallel = parallel;
        self
    }

    /// Use a dedicated path cache instead of the global one.
    pub fn cache(mut self, cache: Arc<PathCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Current configuration.
    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// The path cache in use.
    pub fn path_cache(&self) -> &Arc<PathCache> {
        &self.cache
    }

    /// Validate `input` and return a copy holding only the validated fields.
    ///
    /// Anything that is not an object behaves like an empty object.
    pub async fn validate(&self, input: &Value, rules: &RuleSet) -> Result<Value, Error> {
        match self.check(input, rules).await? {
            ValidationOutcome::Success(paths) => Ok(project(input, &paths)),
            ValidationOutcome::Failure(errors) => Err(Error::Validation(errors)),
        }
    }

    /// Validate an owned, already decoded JSON object.
    ///
    /// The map is moved into a `Value` without copying. Callers holding only a
    /// borrowed map should wrap it themselves and use [`validate`](Self::validate).
    pub async fn validate_map(
        &self,
        input: Map<String, Value>,
        rules: &RuleSet,
    ) -> Result<Value, Error> {
        self.validate(&Value::Object(input), rules).await
    }

    /// Validate, then deserialize the pruned data into `T`.
    pub async fn validate_as<T: DeserializeOwned>(
        &self,
        input: &Value,
        rules: &RuleSet,
    ) -> Result<T, Error> {
        let validated = self.validate(input, rules).await?;
        Ok(serde_json::from_value(validated)?)
    }

    /// Run expansion and field validation without projecting the result.
    ///
    /// Only an invalid rule path is returned as `Err`; field failures are
    /// reported through [`ValidationOutcome::Failure`].
    pub async fn check(&self, input: &Value, rules: &RuleSet) -> Result<ValidationOutcome, Error> {
        let Expansion {
            fields,
            placeholders,
        } = expand_rules(rules, input, &self.cache)?;

        let (passed, errors) = if self.config.parallel {
            Self::run_parallel(input, &fields).await
        } else {
            Self::run_sequential(input, &fields).await
        };

        if !errors.is_empty() {
            trace_debug!(
                failed = errors.failure_count(),
                messages = errors.len(),
                parallel = self.config.parallel,
                "validation failed"
            );
            return Ok(ValidationOutcome::Failure(errors));
        }

        Ok(ValidationOutcome::Success(ValidatedPaths {
            fields: passed,
            placeholders: placeholders.into_iter().collect(),
        }))
    }

    /// Validate every field concurrently. Never stops early.
    async fn run_parallel(
        input: &Value,
        fields: &IndexMap<String, Vec<RuleRef>>,
    ) -> (Vec<String>, ValidationErrors) {
        let reports = join_all(
            fields
                .iter()
                .map(|(path, rules)| async move { (path, check_field(path, input, rules).await) }),
        )
        .await;

        let mut passed = Vec::new();
        let mut errors = ValidationErrors::new();
        for (path, report) in reports {
            if report.passed() {
                passed.push(path.clone());
            } else {
                trace_field_failure!(path, report);
                errors.add_all(path.clone(), report.messages);
            }
        }
        (passed, errors)
    }

    /// Validate fields in expansion order, stopping after the first field
    /// whose `Required` rule failed.
    async fn run_sequential(
        input: &Value,
        fields: &IndexMap<String, Vec<RuleRef>>,
    ) -> (Vec<String>, ValidationErrors) {
        let mut passed = Vec::new();
        let mut errors = ValidationErrors::new();

        for (path, rules) in fields {
            let report = check_field(path, input, rules).await;
            if report.passed() {
                passed.push(path.clone());
                continue;
            }

            trace_field_failure!(path, report);
            let stop = report.required_failed;
            errors.add_all(path.clone(), report.messages);
            if stop {
                trace_debug!(path = %path, "required field failed, stopping");
                break;
            }
        }
        (passed, errors)
    }
}

/// Validate `input` against `rules` with a one-off validator.
pub async fn validate(
    input: &Value,
    rules: &RuleSet,
    config: ValidatorConfig,
) -> Result<Value, Error> {
    Validator::with_config(config).validate(input, rules).await
}
