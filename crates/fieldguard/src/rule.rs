//! The rule capability consumed by the validator.

use crate::error::RuleError;
use async_trait::async_trait;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Debug;
use std::sync::Arc;

/// Semantic tag the validator dispatches on.
///
/// Only `Required` and `Nullable` change how a field is validated. Every other
/// rule is `Generic` and opaque to the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    /// Null and empty values fail. Takes precedence over `Nullable`.
    Required,
    /// A null value passes and skips the field's other rules.
    Nullable,
    #[default]
    Generic,
}

/// A single validation rule applied to one value.
///
/// Evaluation is always async so that lookups (database, remote API) and plain
/// predicates share one code path. Returning `Err` reports that the rule could
/// not be evaluated; the validator records it as a failure and moves on.
///
/// ## Example
///
/// ```rust,ignore
/// use fieldguard::prelude::*;
///
/// #[derive(Debug)]
/// struct Positive;
///
/// #[async_trait]
/// impl Rule for Positive {
///     fn rule_name(&self) -> &'static str {
///         "positive"
///     }
///
///     fn message(&self) -> String {
///         "Value must be positive".to_string()
///     }
///
///     async fn evaluate(&self, value: &Value) -> Result<bool, RuleError> {
///         Ok(value.as_f64().is_some_and(|n| n > 0.0))
///     }
/// }
/// ```
#[async_trait]
pub trait Rule: Debug + Send + Sync {
    /// Get the rule name/code.
    fn rule_name(&self) -> &'static str;

    /// Message recorded when the rule fails.
    fn message(&self) -> String;

    /// Semantic tag of the rule.
    fn kind(&self) -> RuleKind {
        RuleKind::Generic
    }

    /// Check `value`. A missing field is passed as `Value::Null`.
    async fn evaluate(&self, value: &Value) -> Result<bool, RuleError>;
}

/// Shared handle to a rule.
pub type RuleRef = Arc<dyn Rule>;

/// Whether any rule in the list carries `kind`.
pub(crate) fn has_kind(rules: &[RuleRef], kind: RuleKind) -> bool {
    rules.iter().any(|r| r.kind() == kind)
}

/// Ordered mapping from rule path to the rules applied at that path.
///
/// ## Example
///
/// ```rust,ignore
/// use fieldguard::prelude::*;
///
/// let rules = RuleSet::new()
///     .rule("name", RequiredRule::new())
///     .field("users.*.email", vec![rule(RequiredRule::new()), rule(EmailRule::new())]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    entries: IndexMap<String, Vec<RuleRef>>,
}

impl RuleSet {
    /// Create an empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the rule list for a path, replacing any previous list.
    pub fn field(mut self, path: impl Into<String>, rules: Vec<RuleRef>) -> Self {
        self.entries.insert(path.into(), rules);
        self
    }

    /// Append one rule to a path's list.
    pub fn rule(mut self, path: impl Into<String>, rule: impl Rule + 'static) -> Self {
        self.push(path, Arc::new(rule));
        self
    }

    /// Append a shared rule to a path's list.
    pub fn push(&mut self, path: impl Into<String>, rule: RuleRef) {
        self.entries.entry(path.into()).or_default().push(rule);
    }

    /// Rules registered for a path.
    pub fn get(&self, path: &str) -> Option<&[RuleRef]> {
        self.entries.get(path).map(|v| v.as_slice())
    }

    /// Iterate paths and their rules in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[RuleRef])> {
        self.entries
            .iter()
            .map(|(path, rules)| (path.as_str(), rules.as_slice()))
    }

    /// Number of rule paths.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no paths are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<P: Into<String>> FromIterator<(P, Vec<RuleRef>)> for RuleSet {
    fn from_iter<I: IntoIterator<Item = (P, Vec<RuleRef>)>>(iter: I) -> Self {
        let mut set = RuleSet::new();
        for (path, rules) in iter {
            set.entries.insert(path.into(), rules);
        }
        set
    }
}

/// Wrap a rule in a shared handle.
pub fn rule(rule: impl Rule + 'static) -> RuleRef {
    Arc::new(rule)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{EmailRule, NullableRule, RequiredRule};

    #[test]
    fn rule_set_preserves_insertion_order() {
        let rules = RuleSet::new()
            .rule("zeta", RequiredRule::new())
            .rule("alpha", RequiredRule::new())
            .rule("zeta", EmailRule::new());

        let paths: Vec<&str> = rules.iter().map(|(p, _)| p).collect();
        assert_eq!(paths, vec!["zeta", "alpha"]);
        assert_eq!(rules.get("zeta").unwrap().len(), 2);
        assert_eq!(rules.len(), 2);
    }

    #[test]
    fn field_replaces_rule_list() {
        let rules = RuleSet::new()
            .rule("name", RequiredRule::new())
            .field("name", vec![rule(NullableRule::new())]);

        let list = rules.get("name").unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].kind(), RuleKind::Nullable);
    }

    #[test]
    fn kind_detection() {
        let list = vec![rule(RequiredRule::new()), rule(EmailRule::new())];
        assert!(has_kind(&list, RuleKind::Required));
        assert!(!has_kind(&list, RuleKind::Nullable));
    }

    #[test]
    fn collects_from_iterator() {
        let rules: RuleSet = vec![("a", vec![rule(RequiredRule::new())])]
            .into_iter()
            .collect();
        assert!(rules.get("a").is_some());
        assert!(!rules.is_empty());
    }

    #[test]
    fn rule_kind_serialization() {
        let json = serde_json::to_string(&RuleKind::Required).unwrap();
        assert_eq!(json, "\"required\"");
        assert_eq!(RuleKind::default(), RuleKind::Generic);
    }
}
