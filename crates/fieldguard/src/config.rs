//! Validator configuration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix for environment variables read by [`ValidatorConfig::from_env`].
pub const ENV_PREFIX: &str = "FIELDGUARD_";

/// Error type for configuration loading failures.
#[derive(Debug)]
pub enum ConfigError {
    /// Environment variable deserialization failed.
    Env(envy::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Env(e) => write!(f, "Configuration error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Env(e) => Some(e),
        }
    }
}

impl From<envy::Error> for ConfigError {
    fn from(err: envy::Error) -> Self {
        ConfigError::Env(err)
    }
}

/// Options for a [`Validator`](crate::Validator).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Validate all fields concurrently (default). When false, fields run one
    /// by one and validation stops at the first field whose `Required` rule
    /// fails.
    pub parallel: bool,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self { parallel: true }
    }
}

impl ValidatorConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set parallel mode.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Load from `FIELDGUARD_*` environment variables.
    ///
    /// Unset variables keep their defaults, so `FIELDGUARD_PARALLEL=false` is
    /// the only thing needed to switch to sequential mode.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(envy::prefixed(ENV_PREFIX).from_env::<Self>()?)
    }

    /// Load from an explicit list of variables, for tests and embedding.
    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Ok(envy::prefixed(ENV_PREFIX).from_iter::<_, Self>(vars)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults_to_parallel() {
        assert!(ValidatorConfig::default().parallel);
        assert!(!ValidatorConfig::new().parallel(false).parallel);
    }

    #[test]
    fn reads_prefixed_variables() {
        let config = ValidatorConfig::from_vars(vars(&[("FIELDGUARD_PARALLEL", "false")])).unwrap();
        assert!(!config.parallel);
    }

    #[test]
    fn unset_variables_keep_defaults() {
        let config = ValidatorConfig::from_vars(vars(&[("OTHER_PARALLEL", "false")])).unwrap();
        assert_eq!(config, ValidatorConfig::default());
    }

    #[test]
    fn invalid_value_is_an_error() {
        let err = ValidatorConfig::from_vars(vars(&[("FIELDGUARD_PARALLEL", "maybe")])).unwrap_err();
        assert!(err.to_string().starts_with("Configuration error"));
    }

    #[test]
    fn deserializes_with_defaults() {
        let config: ValidatorConfig = serde_json::from_str("{}").unwrap();
        assert!(config.parallel);
    }
}
