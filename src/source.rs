use crate::dotenv::{self, MergeOutcome};
use std::{collections::HashMap, path::Path};

/// Read access to a set of environment variables
///
/// Validation only ever reads through this trait, so it can run against a
/// snapshot instead of the live process environment.
pub trait EnvSource {
    /// The raw value of `key`, or `None` when it is unset
    fn var(&self, key: &str) -> Option<String>;
}

impl<T: EnvSource + ?Sized> EnvSource for &T {
    fn var(&self, key: &str) -> Option<String> {
        (**self).var(key)
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// The live process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnv;

impl EnvSource for SystemEnv {
    fn var(&self, key: &str) -> Option<String> {
        // Non UTF-8 values are still "set"; let validation judge them
        std::env::var_os(key).map(|value| value.to_string_lossy().into_owned())
    }
}

/// An in-memory environment snapshot
///
/// # Example
/// ```rust
/// use env_loadr::{EnvSource, MapEnv};
///
/// let env = MapEnv::new().with("PORT", "3000");
/// assert_eq!(env.var("PORT").as_deref(), Some("3000"));
/// assert_eq!(env.var("HOST"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapEnv {
    vars: HashMap<String, String>,
}

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current process environment
    pub fn from_system() -> Self {
        std::env::vars_os()
            .map(|(key, value)| {
                (
                    key.to_string_lossy().into_owned(),
                    value.to_string_lossy().into_owned(),
                )
            })
            .collect()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.vars.remove(key)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Merge a dotenv file into this snapshot without touching the process.
    ///
    /// Existing keys are only replaced when `override_existing` is true.
    /// A missing file is not an error.
    pub fn merge_dotenv(&mut self, path: impl AsRef<Path>, override_existing: bool) -> MergeOutcome {
        let path = path.as_ref();
        let file = dotenv::read_dotenv(path);

        let mut outcome = MergeOutcome {
            errors: file.errors,
            ..MergeOutcome::default()
        };
        for (key, value) in file.entries {
            if override_existing || !self.vars.contains_key(&key) {
                self.vars.insert(key, value);
                outcome.applied += 1;
            } else {
                outcome.skipped += 1;
            }
        }

        tracing::debug!(
            path = %path.display(),
            applied = outcome.applied,
            skipped = outcome.skipped,
            "merged dotenv file into snapshot"
        );
        outcome
    }
}

impl EnvSource for MapEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapEnv {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}
