//! Untyped required-variable check kept for callers of the older API.
#![allow(deprecated)]

use crate::{
    dotenv::{self, LoadOptions},
    error::MissingVariables,
    source::{EnvSource, SystemEnv},
};

/// Checks that a flat list of variables is set, without any typing
///
/// # Example
/// ```no_run
/// # #![allow(deprecated)]
/// use env_loadr::EnvironmentManager;
///
/// let _manager = EnvironmentManager::new(["API_KEY"]).unwrap();
/// let key = EnvironmentManager::get_value("API_KEY");
/// ```
#[deprecated(note = "use `load_env` with a typed schema instead")]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentManager {
    required: Vec<String>,
}

impl EnvironmentManager {
    /// Merge `.env` into the process environment and check every required name
    pub fn new<I, S>(required: I) -> Result<Self, MissingVariables>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let outcome = dotenv::merge_dotenv(&LoadOptions::default());
        for error in &outcome.errors {
            tracing::warn!(%error, "ignoring unreadable dotenv file");
        }
        Self::with_source(required, SystemEnv)
    }

    /// Check every required name against `source`
    pub fn with_source<I, S, E>(required: I, source: E) -> Result<Self, MissingVariables>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        E: EnvSource,
    {
        let required: Vec<String> = required.into_iter().map(Into::into).collect();
        let missing: Vec<String> = required
            .iter()
            .filter(|name| source.var(name).is_none())
            .cloned()
            .collect();

        if !missing.is_empty() {
            return Err(MissingVariables { missing });
        }

        tracing::info!(count = required.len(), "Loaded environment variables");
        Ok(Self { required })
    }

    /// The raw value of `key` from the process environment, or `""` when unset
    pub fn get_value(key: &str) -> String {
        SystemEnv.var(key).unwrap_or_default()
    }

    pub fn required(&self) -> &[String] {
        &self.required
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MapEnv;
    use serial_test::serial;

    #[test]
    fn test_all_present() {
        let env = MapEnv::new().with("API_KEY", "k").with("EMPTY", "");
        let manager = EnvironmentManager::with_source(["API_KEY", "EMPTY"], &env).unwrap();

        assert_eq!(manager.required(), &["API_KEY".to_string(), "EMPTY".to_string()]);
    }

    #[test]
    fn test_lists_every_missing_name() {
        let env = MapEnv::new().with("B", "set");
        let err = EnvironmentManager::with_source(["A", "B", "C"], &env).unwrap_err();

        assert_eq!(err.missing, vec!["A".to_string(), "C".to_string()]);
        assert_eq!(err.to_string(), "Required environment variables were not set: A,C");
    }

    #[test]
    fn test_no_required_names() {
        let manager = EnvironmentManager::with_source(Vec::<String>::new(), MapEnv::new()).unwrap();
        assert!(manager.required().is_empty());
    }

    #[test]
    #[serial]
    fn test_get_value() {
        std::env::set_var("ENV_LOADR_LEGACY_VALUE", "hello");
        std::env::remove_var("ENV_LOADR_LEGACY_UNSET");

        assert_eq!(EnvironmentManager::get_value("ENV_LOADR_LEGACY_VALUE"), "hello");
        assert_eq!(EnvironmentManager::get_value("ENV_LOADR_LEGACY_UNSET"), "");

        std::env::remove_var("ENV_LOADR_LEGACY_VALUE");
    }
}
