//! Error types for path validation.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Default top-level message carried by [`ValidationErrors`].
pub const DEFAULT_MESSAGE: &str = "The given data was invalid.";

/// Errors returned by [`Validator::validate`](crate::Validator::validate).
#[derive(Debug, Error)]
pub enum Error {
    /// A rule path was empty. This is a programmer error and aborts the call.
    #[error("invalid path: {0:?}")]
    InvalidPath(String),

    /// One or more fields failed their rules.
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    /// The validated data could not be deserialized into the requested type.
    #[error("failed to deserialize validated data: {0}")]
    Deserialize(#[from] serde_json::Error),
}

impl Error {
    /// Get the field errors if this is a validation failure.
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Error::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

/// Error raised by a rule while evaluating a value.
///
/// This never reaches the caller directly. The validator records it in the
/// field's message list as `"Validation error: <message>"`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RuleError {
    /// The rule code (e.g., "regex", "async_unique")
    pub code: String,
    /// Description of what went wrong
    pub message: String,
}

impl RuleError {
    /// Create a new rule error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Render the error as a field failure message.
    pub fn to_field_message(&self) -> String {
        format!("Validation error: {}", self.message)
    }
}

impl fmt::Display for RuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for RuleError {}

/// Collection of validation failures keyed by concrete field path.
///
/// Paths appear in the order their failures were recorded. Messages for one
/// path keep the order of the rules that produced them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidationErrors {
    message: String,
    /// Map of field path to the failure messages for that field
    #[serde(rename = "errors")]
    fields: IndexMap<String, Vec<String>>,
}

impl Default for ValidationErrors {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationErrors {
    /// Create an empty validation errors collection.
    pub fn new() -> Self {
        Self {
            message: DEFAULT_MESSAGE.to_string(),
            fields: IndexMap::new(),
        }
    }

    /// Replace the top-level message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Top-level message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Add a failure message for a field.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    /// Add multiple failure messages for a field.
    pub fn add_all(&mut self, field: impl Into<String>, messages: Vec<String>) {
        if messages.is_empty() {
            return;
        }
        self.fields.entry(field.into()).or_default().extend(messages);
    }

    /// Merge another collection into this one.
    pub fn merge(&mut self, other: ValidationErrors) {
        for (field, messages) in other.fields {
            self.add_all(field, messages);
        }
    }

    /// Check if there are any errors.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of fields that failed.
    pub fn failure_count(&self) -> usize {
        self.fields.len()
    }

    /// Total number of failure messages across all fields.
    pub fn len(&self) -> usize {
        self.fields.values().map(|v| v.len()).sum()
    }

    /// Get the messages for a specific field.
    pub fn get(&self, field: &str) -> Option<&Vec<String>> {
        self.fields.get(field)
    }

    /// All failing fields and their messages.
    pub fn fields(&self) -> &IndexMap<String, Vec<String>> {
        &self.fields
    }

    /// Get all field paths with errors.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.keys().map(|s| s.as_str()).collect()
    }

    /// Convert to Result - Ok if no errors, Err otherwise.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// Convert to the JSON body a request layer returns with a 422 response.
    pub fn to_api_error(&self) -> ApiValidationError {
        let fields = self
            .fields
            .iter()
            .flat_map(|(field, messages)| {
                messages.iter().map(move |message| FieldErrorResponse {
                    field: field.clone(),
                    code: "validation".to_string(),
                    message: message.clone(),
                })
            })
            .collect();

        ApiValidationError {
            error: ErrorBody {
                error_type: "validation_error".to_string(),
                message: self.message.clone(),
                fields,
            },
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} field(s), {} error(s))",
            self.message,
            self.failure_count(),
            self.len()
        )
    }
}

impl std::error::Error for ValidationErrors {}

/// API response format for validation errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiValidationError {
    pub error: ErrorBody,
}

/// Error body in API response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(rename = "type")]
    pub error_type: String,
    pub message: String,
    pub fields: Vec<FieldErrorResponse>,
}

/// Single field error in API response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldErrorResponse {
    pub field: String,
    pub code: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_error_renders_field_message() {
        let error = RuleError::new("regex", "invalid pattern");
        assert_eq!(error.to_field_message(), "Validation error: invalid pattern");
        assert_eq!(error.to_string(), "[regex] invalid pattern");
    }

    #[test]
    fn validation_errors_add_and_get() {
        let mut errors = ValidationErrors::new();
        errors.add("email", "Invalid email");
        errors.add("email", "Email is required");
        errors.add("age", "Age out of range");

        assert_eq!(errors.len(), 3);
        assert_eq!(errors.failure_count(), 2);
        assert_eq!(errors.get("email").unwrap().len(), 2);
        assert_eq!(errors.field_names(), vec!["email", "age"]);
    }

    #[test]
    fn add_all_ignores_empty_lists() {
        let mut errors = ValidationErrors::new();
        errors.add_all("name", Vec::new());
        assert!(errors.is_empty());
    }

    #[test]
    fn validation_errors_into_result() {
        assert!(ValidationErrors::new().into_result().is_ok());

        let mut errors = ValidationErrors::new();
        errors.add("field", "message");
        assert!(errors.into_result().is_err());
    }

    #[test]
    fn validation_errors_merge() {
        let mut first = ValidationErrors::new();
        first.add("email", "Invalid");

        let mut second = ValidationErrors::new();
        second.add("age", "Out of range");
        second.add("email", "Taken");

        first.merge(second);
        assert_eq!(first.len(), 3);
        assert_eq!(first.get("email").unwrap(), &vec!["Invalid", "Taken"]);
    }

    #[test]
    fn validation_errors_to_api_error() {
        let mut errors = ValidationErrors::new();
        errors.add("users.1.email", "Invalid email format");

        let api_error = errors.to_api_error();
        assert_eq!(api_error.error.error_type, "validation_error");
        assert_eq!(api_error.error.message, DEFAULT_MESSAGE);
        assert_eq!(api_error.error.fields.len(), 1);
        assert_eq!(api_error.error.fields[0].field, "users.1.email");

        let json = serde_json::to_value(&api_error).unwrap();
        assert_eq!(json["error"]["type"], "validation_error");
    }

    #[test]
    fn validation_errors_serialize_keyed_by_path() {
        let mut errors = ValidationErrors::new();
        errors.add("name", "Name is required");

        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json["message"], DEFAULT_MESSAGE);
        assert_eq!(json["errors"]["name"][0], "Name is required");
    }

    #[test]
    fn error_exposes_validation_errors() {
        let mut errors = ValidationErrors::new();
        errors.add("name", "required");
        let error = Error::from(errors);
        assert_eq!(error.validation_errors().unwrap().failure_count(), 1);
        assert!(Error::InvalidPath(String::new())
            .validation_errors()
            .is_none());
    }
}
