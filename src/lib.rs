pub mod dotenv;
pub mod error;
pub mod kind;
pub mod legacy;
pub mod loader;
pub mod macros;
pub mod schema;
pub mod source;
pub mod validate;
pub mod value;

// Re-export main types
pub use dotenv::{LoadOptions, MergeOutcome, merge_dotenv};
pub use error::{EnvError, LoadError, MissingVariables};
pub use kind::Kind;
#[allow(deprecated)]
pub use legacy::EnvironmentManager;
pub use loader::{EnvLoader, load_env, load_env_from};
pub use schema::{Schema, SchemaItem};
pub use source::{EnvSource, MapEnv, SystemEnv};
pub use validate::coerce_and_validate;
pub use value::{EnvRecord, FromValue, Value};

// Re-export macro
pub use env_loadr_macros::define_env;

/// Trait for structs whose fields are loaded from a schema of environment variables
pub trait Load: Sized {
    /// The schema every instance is validated against
    fn schema() -> Schema;

    /// Build the struct from a validated record
    fn from_record(record: EnvRecord) -> Result<Self, LoadError>;

    /// Validate against an explicit source, without touching the process environment
    fn load_from<S: EnvSource>(source: S) -> Result<Self, LoadError> {
        Self::from_record(load_env_from(&Self::schema(), source)?)
    }

    /// Merge the dotenv file described by `options`, then validate the process environment
    fn load_with(options: &LoadOptions) -> Result<Self, LoadError> {
        Self::from_record(load_env(&Self::schema(), options)?)
    }

    /// Load with default options, returning errors instead of panicking
    fn load_or_error() -> Result<Self, LoadError> {
        Self::load_with(&LoadOptions::default())
    }

    /// Load with default options, panicking with a readable report on validation errors
    fn load() -> Self {
        match Self::load_or_error() {
            Ok(loaded) => loaded,
            Err(e) => panic!("{}", e.report()),
        }
    }
}
