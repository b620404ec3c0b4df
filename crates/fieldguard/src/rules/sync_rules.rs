//! Synchronous validation rules.
//!
//! These rules are pure predicates over a single value. They still implement
//! the async [`Rule`] contract so the validator awaits every rule the same way.

use super::message_or;
use crate::error::RuleError;
use crate::rule::{Rule, RuleKind};
use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::{Arc, OnceLock};

// Pre-compiled regex patterns
static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
static URL_REGEX: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_REGEX.get_or_init(|| {
        // RFC 5322 simplified email regex
        Regex::new(
            r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$"
        ).unwrap()
    })
}

fn url_regex() -> &'static Regex {
    URL_REGEX.get_or_init(|| Regex::new(r"^(https?|ftp)://[^\s/$.?#].[^\s]*$").unwrap())
}

/// Required (non-empty) validation rule.
///
/// Fails on null, blank strings, empty arrays and empty objects. Tagged
/// [`RuleKind::Required`], so it overrides a `NullableRule` on the same field.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RequiredRule {
    /// Custom error message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RequiredRule {
    /// Create a new required rule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom error message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Whether `value` counts as present.
    pub fn is_present(value: &Value) -> bool {
        match value {
            Value::Null => false,
            Value::String(s) => !s.trim().is_empty(),
            Value::Array(items) => !items.is_empty(),
            Value::Object(map) => !map.is_empty(),
            Value::Bool(_) | Value::Number(_) => true,
        }
    }
}

#[async_trait]
impl Rule for RequiredRule {
    fn rule_name(&self) -> &'static str {
        "required"
    }

    fn message(&self) -> String {
        message_or(&self.message, || "This field is required".to_string())
    }

    fn kind(&self) -> RuleKind {
        RuleKind::Required
    }

    async fn evaluate(&self, value: &Value) -> Result<bool, RuleError> {
        Ok(Self::is_present(value))
    }
}

/// Marks a field as nullable.
///
/// The rule itself always passes. Its [`RuleKind::Nullable`] tag tells the
/// validator to skip the field's other rules when the value is null.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NullableRule;

impl NullableRule {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Rule for NullableRule {
    fn rule_name(&self) -> &'static str {
        "nullable"
    }

    fn message(&self) -> String {
        "This field may be null".to_string()
    }

    fn kind(&self) -> RuleKind {
        RuleKind::Nullable
    }

    async fn evaluate(&self, _value: &Value) -> Result<bool, RuleError> {
        Ok(true)
    }
}

/// JSON value types checked by [`TypeRule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Object,
}

impl ValueType {
    fn matches(self, value: &Value) -> bool {
        match self {
            ValueType::String => value.is_string(),
            ValueType::Number => value.is_number(),
            ValueType::Integer => value.is_i64() || value.is_u64(),
            ValueType::Boolean => value.is_boolean(),
            ValueType::Array => value.is_array(),
            ValueType::Object => value.is_object(),
        }
    }

    fn name(self) -> &'static str {
        match self {
            ValueType::String => "a string",
            ValueType::Number => "a number",
            ValueType::Integer => "an integer",
            ValueType::Boolean => "a boolean",
            ValueType::Array => "an array",
            ValueType::Object => "an object",
        }
    }
}

/// Type check rule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TypeRule {
    pub expected: ValueType,
    /// Custom error message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl TypeRule {
    /// Create a type rule for the given type.
    pub fn new(expected: ValueType) -> Self {
        Self {
            expected,
            message: None,
        }
    }

    pub fn string() -> Self {
        Self::new(ValueType::String)
    }

    pub fn number() -> Self {
        Self::new(ValueType::Number)
    }

    pub fn integer() -> Self {
        Self::new(ValueType::Integer)
    }

    pub fn boolean() -> Self {
        Self::new(ValueType::Boolean)
    }

    pub fn array() -> Self {
        Self::new(ValueType::Array)
    }

    pub fn object() -> Self {
        Self::new(ValueType::Object)
    }

    /// Set a custom error message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

#[async_trait]
impl Rule for TypeRule {
    fn rule_name(&self) -> &'static str {
        "type"
    }

    fn message(&self) -> String {
        message_or(&self.message, || {
            format!("This field must be {}", self.expected.name())
        })
    }

    async fn evaluate(&self, value: &Value) -> Result<bool, RuleError> {
        Ok(self.expected.matches(value))
    }
}

/// Length validation rule.
///
/// Counts characters of a string, elements of an array or keys of an object.
/// Any other value fails.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LengthRule {
    /// Minimum length (inclusive)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<usize>,
    /// Maximum length (inclusive)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<usize>,
    /// Custom error message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl LengthRule {
    /// Create a length rule with min and max bounds.
    pub fn new(min: usize, max: usize) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
            message: None,
        }
    }

    /// Create a length rule with only a minimum.
    pub fn min(min: usize) -> Self {
        Self {
            min: Some(min),
            max: None,
            message: None,
        }
    }

    /// Create a length rule with only a maximum.
    pub fn max(max: usize) -> Self {
        Self {
            min: None,
            max: Some(max),
            message: None,
        }
    }

    /// Set a custom error message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    fn length_of(value: &Value) -> Option<usize> {
        match value {
            Value::String(s) => Some(s.chars().count()),
            Value::Array(items) => Some(items.len()),
            Value::Object(map) => Some(map.len()),
            _ => None,
        }
    }
}

#[async_trait]
impl Rule for LengthRule {
    fn rule_name(&self) -> &'static str {
        "length"
    }

    fn message(&self) -> String {
        message_or(&self.message, || match (self.min, self.max) {
            (Some(min), Some(max)) => format!("Length must be between {min} and {max}"),
            (Some(min), None) => format!("Length must be at least {min}"),
            (None, Some(max)) => format!("Length must be at most {max}"),
            (None, None) => "Invalid length".to_string(),
        })
    }

    async fn evaluate(&self, value: &Value) -> Result<bool, RuleError> {
        let Some(len) = Self::length_of(value) else {
            return Ok(false);
        };
        let above_min = self.min.map_or(true, |min| len >= min);
        let below_max = self.max.map_or(true, |max| len <= max);
        Ok(above_min && below_max)
    }
}

/// Numeric range validation rule.
///
/// Non-numeric values fail.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RangeRule {
    /// Minimum value (inclusive)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Maximum value (inclusive)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Custom error message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RangeRule {
    /// Create a range rule with min and max bounds.
    pub fn new(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
            message: None,
        }
    }

    /// Create a range rule with only a minimum.
    pub fn min(min: f64) -> Self {
        Self {
            min: Some(min),
            max: None,
            message: None,
        }
    }

    /// Create a range rule with only a maximum.
    pub fn max(max: f64) -> Self {
        Self {
            min: None,
            max: Some(max),
            message: None,
        }
    }

    /// Set a custom error message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

#[async_trait]
impl Rule for RangeRule {
    fn rule_name(&self) -> &'static str {
        "range"
    }

    fn message(&self) -> String {
        message_or(&self.message, || match (self.min, self.max) {
            (Some(min), Some(max)) => format!("Value must be between {min} and {max}"),
            (Some(min), None) => format!("Value must be at least {min}"),
            (None, Some(max)) => format!("Value must be at most {max}"),
            (None, None) => "Value out of range".to_string(),
        })
    }

    async fn evaluate(&self, value: &Value) -> Result<bool, RuleError> {
        let Some(n) = value.as_f64() else {
            return Ok(false);
        };
        let above_min = self.min.map_or(true, |min| n >= min);
        let below_max = self.max.map_or(true, |max| n <= max);
        Ok(above_min && below_max)
    }
}

/// Email format validation rule.
///
/// Validates that a string is a valid email address according to RFC 5322.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EmailRule {
    /// Custom error message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl EmailRule {
    /// Create a new email rule with default message.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom error message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

#[async_trait]
impl Rule for EmailRule {
    fn rule_name(&self) -> &'static str {
        "email"
    }

    fn message(&self) -> String {
        message_or(&self.message, || "Invalid email format".to_string())
    }

    async fn evaluate(&self, value: &Value) -> Result<bool, RuleError> {
        Ok(value.as_str().is_some_and(|s| email_regex().is_match(s)))
    }
}

/// URL format validation rule.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UrlRule {
    /// Custom error message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl UrlRule {
    /// Create a new URL rule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom error message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

#[async_trait]
impl Rule for UrlRule {
    fn rule_name(&self) -> &'static str {
        "url"
    }

    fn message(&self) -> String {
        message_or(&self.message, || "Invalid URL format".to_string())
    }

    async fn evaluate(&self, value: &Value) -> Result<bool, RuleError> {
        Ok(value.as_str().is_some_and(|s| url_regex().is_match(s)))
    }
}

/// Regex pattern validation rule.
///
/// The pattern is compiled on first use. An invalid pattern is reported as a
/// [`RuleError`] on every evaluation instead of a plain failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegexRule {
    /// The regex pattern
    pub pattern: String,
    /// Compiled regex (not serialized)
    #[serde(skip)]
    compiled: OnceLock<Result<Regex, String>>,
    /// Custom error message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl PartialEq for RegexRule {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern && self.message == other.message
    }
}

impl RegexRule {
    /// Create a new regex rule.
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            compiled: OnceLock::new(),
            message: None,
        }
    }

    /// Set a custom error message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    fn regex(&self) -> Result<&Regex, RuleError> {
        self.compiled
            .get_or_init(|| Regex::new(&self.pattern).map_err(|e| e.to_string()))
            .as_ref()
            .map_err(|e| {
                RuleError::new(
                    "regex",
                    format!("Invalid regex pattern {:?}: {}", self.pattern, e),
                )
            })
    }
}

#[async_trait]
impl Rule for RegexRule {
    fn rule_name(&self) -> &'static str {
        "regex"
    }

    fn message(&self) -> String {
        message_or(&self.message, || {
            format!("Value does not match pattern: {}", self.pattern)
        })
    }

    async fn evaluate(&self, value: &Value) -> Result<bool, RuleError> {
        let regex = self.regex()?;
        Ok(value.as_str().is_some_and(|s| regex.is_match(s)))
    }
}

/// Set membership rule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InRule {
    /// Allowed values
    pub values: Vec<Value>,
    /// Custom error message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl InRule {
    /// Create a membership rule from anything convertible to JSON values.
    pub fn new<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            values: values.into_iter().map(Into::into).collect(),
            message: None,
        }
    }

    /// Set a custom error message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

#[async_trait]
impl Rule for InRule {
    fn rule_name(&self) -> &'static str {
        "in"
    }

    fn message(&self) -> String {
        message_or(&self.message, || {
            "The selected value is invalid".to_string()
        })
    }

    async fn evaluate(&self, value: &Value) -> Result<bool, RuleError> {
        Ok(self.values.contains(value))
    }
}

type Predicate = dyn Fn(&Value) -> bool + Send + Sync;

/// Rule backed by a synchronous closure.
///
/// ## Example
///
/// ```rust,ignore
/// let even = FnRule::new("even", "Value must be even", |v| {
///     v.as_i64().is_some_and(|n| n % 2 == 0)
/// });
/// ```
#[derive(Clone)]
pub struct FnRule {
    name: &'static str,
    message: String,
    kind: RuleKind,
    predicate: Arc<Predicate>,
}

impl FnRule {
    /// Create a closure rule.
    pub fn new<F>(name: &'static str, message: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
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

impl fmt::Debug for FnRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnRule")
            .field("name", &self.name)
            .field("message", &self.message)
            .field("kind", &self.kind)
            .finish()
    }
}

#[async_trait]
impl Rule for FnRule {
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
        Ok((self.predicate)(value))
    }
}
