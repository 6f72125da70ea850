//! Merging `.env` files into the environment before validation.
//!
//! A missing file is never an error. Unreadable files and malformed lines are
//! reported as [`EnvError::Dotenv`] without echoing line contents, since
//! dotenv files routinely hold secrets.

use crate::error::EnvError;
use std::path::{Path, PathBuf};

/// Path used when no dotenv path is configured, relative to the working directory
pub const DEFAULT_DOTENV_PATH: &str = ".env";

/// Settings for [`load_env`](crate::load_env)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Custom path to the dotenv file, defaults to `.env`
    pub dotenv_path: Option<PathBuf>,
    /// Let dotenv values replace variables that are already set
    pub override_existing: bool,
}

impl LoadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dotenv_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.dotenv_path = Some(path.into());
        self
    }

    pub fn override_existing(mut self, override_existing: bool) -> Self {
        self.override_existing = override_existing;
        self
    }

    /// The dotenv path that will actually be read
    pub fn path(&self) -> &Path {
        self.dotenv_path
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_DOTENV_PATH))
    }
}

/// What a dotenv merge did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeOutcome {
    /// Keys written to the target
    pub applied: usize,
    /// Keys left alone because they were already set
    pub skipped: usize,
    /// Problems reading or parsing the file
    pub errors: Vec<EnvError>,
}

pub(crate) struct DotenvFile {
    pub entries: Vec<(String, String)>,
    pub errors: Vec<EnvError>,
}

fn describe(error: &dotenvy::Error) -> String {
    match error {
        dotenvy::Error::LineParse(_, index) => format!("invalid syntax at position {}", index),
        dotenvy::Error::Io(e) => e.kind().to_string(),
        dotenvy::Error::EnvVar(e) => e.to_string(),
        _ => "unrecognized dotenv error".to_string(),
    }
}

pub(crate) fn read_dotenv(path: &Path) -> DotenvFile {
    let mut file = DotenvFile {
        entries: Vec::new(),
        errors: Vec::new(),
    };

    let iter = match dotenvy::from_path_iter(path) {
        Ok(iter) => iter,
        Err(e) if e.not_found() => {
            tracing::debug!(path = %path.display(), "no dotenv file found");
            return file;
        }
        Err(e) => {
            file.errors.push(EnvError::Dotenv {
                path: path.to_path_buf(),
                detail: describe(&e),
            });
            return file;
        }
    };

    for item in iter {
        match item {
            Ok(entry) => file.entries.push(entry),
            Err(e) => file.errors.push(EnvError::Dotenv {
                path: path.to_path_buf(),
                detail: describe(&e),
            }),
        }
    }

    file
}

/// Merge the configured dotenv file into the process environment.
///
/// Keys that are already set are kept unless `override_existing` is true.
pub fn merge_dotenv(options: &LoadOptions) -> MergeOutcome {
    let path = options.path();
    let file = read_dotenv(path);

    let mut outcome = MergeOutcome {
        errors: file.errors,
        ..MergeOutcome::default()
    };
    for (key, value) in file.entries {
        if options.override_existing || std::env::var_os(&key).is_none() {
            std::env::set_var(&key, value);
            outcome.applied += 1;
        } else {
            outcome.skipped += 1;
        }
    }

    tracing::debug!(
        path = %path.display(),
        applied = outcome.applied,
        skipped = outcome.skipped,
        errors = outcome.errors.len(),
        "merged dotenv file into process environment"
    );
    outcome
}
