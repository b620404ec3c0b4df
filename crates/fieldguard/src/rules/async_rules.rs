//! Asynchronous validation rules.
//!
//! These rules need an async operation such as a database query. Backend
//! failures are returned as [`RuleError`]s and end up in the field's messages.

use super::message_or;
use crate::error::RuleError;
use crate::rule::{Rule, RuleKind};
use async_trait::async_trait;
use futures_util::future::BoxFuture;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Trait for database lookups used by the async rules.
#[async_trait]
pub trait DatabaseValidator: Send + Sync {
    /// Check if a value exists in a table column.
    async fn exists(&self, table: &str, column: &str, value: &str) -> Result<bool, String>;

    /// Check if a value is unique in a table column.
    async fn is_unique(&self, table: &str, column: &str, value: &str) -> Result<bool, String>;

    /// Check if a value is unique, ignoring the row with `except_id` (for updates).
    async fn is_unique_except(
        &self,
        table: &str,
        column: &str,
        value: &str,
        except_id: &str,
    ) -> Result<bool, String>;
}

/// Text used as the lookup key. Only strings and numbers can be looked up.
fn lookup_key(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Database uniqueness validation rule.
#[derive(Clone)]
pub struct AsyncUniqueRule {
    /// Database table name
    pub table: String,
    /// Column name to check
    pub column: String,
    /// ID to exclude from the check (for updates)
    pub except_id: Option<String>,
    /// Custom error message
    pub message: Option<String>,
    db: Arc<dyn DatabaseValidator>,
}

impl AsyncUniqueRule {
    /// Create a new uniqueness rule.
    pub fn new(
        db: Arc<dyn DatabaseValidator>,
        table: impl Into<String>,
        column: impl Into<String>,
    ) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
            except_id: None,
            message: None,
            db,
        }
    }

    /// Ignore the row with this ID.
    pub fn except(mut self, id: impl Into<String>) -> Self {
        self.except_id = Some(id.into());
        self
    }

    /// Set a custom error message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl fmt::Debug for AsyncUniqueRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncUniqueRule")
            .field("table", &self.table)
            .field("column", &self.column)
            .field("except_id", &self.except_id)
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Rule for AsyncUniqueRule {
    fn rule_name(&self) -> &'static str {
        "async_unique"
    }

    fn message(&self) -> String {
        message_or(&self.message, || {
            format!("Value already exists in {}.{}", self.table, self.column)
        })
    }

    async fn evaluate(&self, value: &Value) -> Result<bool, RuleError> {
        let Some(key) = lookup_key(value) else {
            return Ok(false);
        };

        let result = match &self.except_id {
            Some(id) => {
                self.db
                    .is_unique_except(&self.table, &self.column, &key, id)
                    .await
            }
            None => self.db.is_unique(&self.table, &self.column, &key).await,
        };
        result.map_err(|e| RuleError::new("async_unique", format!("Database error: {}", e)))
    }
}

/// Database existence validation rule.
#[derive(Clone)]
pub struct AsyncExistsRule {
    /// Database table name
    pub table: String,
    /// Column name to check
    pub column: String,
    /// Custom error message
    pub message: Option<String>,
    db: Arc<dyn DatabaseValidator>,
}

impl AsyncExistsRule {
    /// Create a new existence rule.
    pub fn new(
        db: Arc<dyn DatabaseValidator>,
        table: impl Into<String>,
        column: impl Into<String>,
    ) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
            message: None,
            db,
        }
    }

    /// Set a custom error message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl fmt::Debug for AsyncExistsRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncExistsRule")
            .field("table", &self.table)
            .field("column", &self.column)
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Rule for AsyncExistsRule {
    fn rule_name(&self) -> &'static str {
        "async_exists"
    }

    fn message(&self) -> String {
        message_or(&self.message, || {
            format!("Value does not exist in {}.{}", self.table, self.column)
        })
    }

    async fn evaluate(&self, value: &Value) -> Result<bool, RuleError> {
        let Some(key) = lookup_key(value) else {
            return Ok(false);
        };

        self.db
            .exists(&self.table, &self.column, &key)
            .await
            .map_err(|e| RuleError::new("async_exists", format!("Database error: {}", e)))
    }
}

type AsyncPredicate = dyn Fn(Value) -> BoxFuture<'static, Result<bool, RuleError>> + Send + Sync;

/// Rule backed by an async closure.
///
/// The closure receives its own copy of the value so the returned future can
/// be `'static`.
///
/// ## Example
///
/// ```rust,ignore
/// let rule = AsyncFnRule::new("known_sku", "Unknown SKU", move |v| {
///     let catalog = catalog.clone();
///     async move { Ok(catalog.contains(v.as_str().unwrap_or_default()).await) }.boxed()
/// });
/// ```
#[derive(Clone)]
pub struct AsyncFnRule {
    name: &'static str,
    message: String,
    kind: RuleKind,
    predicate: Arc<AsyncPredicate>,
}

impl AsyncFnRule {
    /// Create an async closure rule.
    pub fn new<F>(name: &'static str, message: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(Value) -> BoxFuture<'static, Result<bool, RuleError>> + Send + Sync + 'static,
    {
        Self {
            name,
            message: message.into(),
            kind: RuleKind::Generic,
            predicate: Arc::new(predicate),
        }
    }

    /// Tag the rule with a semantic kind.
    pub fn with_kind(mut self, kind: RuleKind) -> Self {
        self.kind = kind;
        self
    }
}

impl fmt::Debug for AsyncFnRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncFnRule")
            .field("name", &self.name)
            .field("message", &self.message)
            .field("kind", &self.kind)
            .finish()
    }
}

#[async_trait]
impl Rule for AsyncFnRule {
    fn rule_name(&self) -> &'static str {
        self.name
    }

    fn message(&self) -> String {
        self.message.clone()
    }

    fn kind(&self) -> RuleKind {
        self.kind
    }

    async fn evaluate(&self, value: &Value) -> Result<bool, RuleError> {
        (self.predicate)(value.clone()).await
    }
}
