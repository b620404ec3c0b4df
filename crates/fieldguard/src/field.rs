//! Validation of a single concrete field.

use crate::resolve::resolve_or_null;
use crate::rule::{has_kind, RuleKind, RuleRef};
use serde_json::Value;

/// Outcome of running one field's rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldReport {
    /// Failure messages in rule order
    pub messages: Vec<String>,
    /// Whether a `Required` rule was among the failures
    pub required_failed: bool,
}

impl FieldReport {
    /// Check if every rule passed.
    pub fn passed(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Validate the value at `path` in `input` against `rules`.
///
/// Returns `None` when every rule passed.
pub async fn validate_field(path: &str, input: &Value, rules: &[RuleRef]) -> Option<Vec<String>> {
    let report = check_field(path, input, rules).await;
    if report.passed() {
        None
    } else {
        Some(report.messages)
    }
}

/// Run every rule for one field and collect the failures.
///
/// A null value with a `Nullable` rule and no `Required` rule is skipped
/// entirely. Otherwise all rules run in order; a rule that fails to evaluate
/// adds a `"Validation error: ..."` message and the next rule still runs.
pub(crate) async fn check_field(path: &str, input: &Value, rules: &[RuleRef]) -> FieldReport {
    let value = resolve_or_null(input, path);

    if value.is_null()
        && has_kind(rules, RuleKind::Nullable)
        && !has_kind(rules, RuleKind::Required)
    {
        trace_trace!(path, "null value on nullable field, rules skipped");
        return FieldReport::default();
    }

    let mut report = FieldReport::default();
    for rule in rules {
        match rule.evaluate(value).await {
            Ok(true) => {}
            Ok(false) => {
                report.messages.push(rule.message());
                if rule.kind() == RuleKind::Required {
                    report.required_failed = true;
                }
            }
            Err(e) => {
                trace_warn!(path, rule = rule.rule_name(), error = %e, "rule evaluation failed");
                report.messages.push(e.to_field_message());
            }
        }
    }
    report
}
