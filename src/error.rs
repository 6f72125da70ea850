use crate::kind::Kind;
use colored::Colorize;
use std::{fmt, path::PathBuf};
use thiserror::Error;

/// A single failure found while loading the environment
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EnvError {
    /// A required environment variable is not set
    #[error("Missing required env var: {name}")]
    MissingEnvVar { name: String, expected: Kind },

    /// An environment variable is set but does not match its declared kind
    #[error("{message}")]
    InvalidValue {
        name: String,
        expected: Kind,
        received: String,
        message: String,
    },

    /// The same name was declared more than once in a schema
    #[error("Duplicate schema entry: {name}")]
    DuplicateName { name: String },

    /// A coerced value could not be stored in the Rust field it was declared for
    #[error("{name} cannot be stored as {target}")]
    FieldMismatch {
        name: String,
        expected: Kind,
        target: &'static str,
    },

    /// A kind name that is not one of string, number, boolean, email or url
    #[error("Unsupported type: {kind}")]
    UnsupportedKind { kind: String },

    /// The dotenv file exists but could not be read or parsed.
    ///
    /// `detail` never includes line contents, only positions and I/O kinds.
    #[error("Failed to read {}: {detail}", .path.display())]
    Dotenv { path: PathBuf, detail: String },
}

impl EnvError {
    /// Name of the offending variable, when the error concerns one
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::MissingEnvVar { name, .. }
            | Self::InvalidValue { name, .. }
            | Self::DuplicateName { name }
            | Self::FieldMismatch { name, .. } => Some(name),
            Self::UnsupportedKind { .. } | Self::Dotenv { .. } => None,
        }
    }

    pub fn expected(&self) -> Option<Kind> {
        match self {
            Self::MissingEnvVar { expected, .. }
            | Self::InvalidValue { expected, .. }
            | Self::FieldMismatch { expected, .. } => Some(*expected),
            _ => None,
        }
    }

    /// The raw value that failed validation, untruncated
    pub fn received(&self) -> Option<&str> {
        match self {
            Self::InvalidValue { received, .. } => Some(received),
            _ => None,
        }
    }
}

/// Every failure from one load pass, in the order they were found
#[derive(Debug, Clone, PartialEq)]
pub struct LoadError {
    errors: Vec<EnvError>,
}

impl LoadError {
    pub fn new(errors: Vec<EnvError>) -> Self {
        Self { errors }
    }

    pub fn errors(&self) -> &[EnvError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<EnvError> {
        self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EnvError> {
        self.errors.iter()
    }

    /// Terminal-friendly summary with highlighted names and error count
    pub fn report(&self) -> String {
        let lines = self
            .errors
            .iter()
            .map(|e| match e.name() {
                Some(name) => format!("  - {}: {}", name.magenta().bold(), e),
                None => format!("  - {}", e),
            })
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "Environment validation failed with {} error(s):\n{}",
            self.errors.len().to_string().yellow().bold(),
            lines
        )
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Environment validation failed:")?;
        for error in &self.errors {
            write!(f, "\n- {}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for LoadError {}

impl From<EnvError> for LoadError {
    fn from(error: EnvError) -> Self {
        Self::new(vec![error])
    }
}

impl IntoIterator for LoadError {
    type Item = EnvError;
    type IntoIter = std::vec::IntoIter<EnvError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a LoadError {
    type Item = &'a EnvError;
    type IntoIter = std::slice::Iter<'a, EnvError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

/// Raised by the deprecated `EnvironmentManager` when names are unset
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Required environment variables were not set: {}", .missing.join(","))]
pub struct MissingVariables {
    pub missing: Vec<String>,
}
