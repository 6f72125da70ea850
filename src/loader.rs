use crate::{
    dotenv::{self, LoadOptions},
    error::{EnvError, LoadError},
    schema::SchemaItem,
    source::{EnvSource, SystemEnv},
    validate::coerce_and_validate,
    value::{EnvRecord, Value},
};
use std::collections::HashSet;

/// Validates schema items one at a time, collecting every error
///
/// # Example
/// ```rust
/// use env_loadr::{EnvLoader, Kind, MapEnv, SchemaItem};
///
/// let env = MapEnv::new().with("PORT", "3000");
/// let mut loader = EnvLoader::new(&env);
/// loader.check(&SchemaItem::required("PORT", Kind::Number));
/// loader.check(&SchemaItem::optional("HOST", Kind::String));
///
/// let record = loader.finish().unwrap();
/// assert_eq!(record.get_number("PORT"), Some(3000.0));
/// assert!(record.is_absent("HOST"));
/// ```
pub struct EnvLoader<S> {
    source: S,
    record: EnvRecord,
    errors: Vec<EnvError>,
    seen: HashSet<String>,
}

impl<S: EnvSource> EnvLoader<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            record: EnvRecord::new(),
            errors: Vec::new(),
            seen: HashSet::new(),
        }
    }

    /// Validate one item against the source.
    ///
    /// A name that was already checked is reported as a duplicate and not evaluated again.
    pub fn check(&mut self, item: &SchemaItem) -> Option<&Value> {
        if !self.seen.insert(item.name.clone()) {
            if !self
                .errors
                .iter()
                .any(|e| matches!(e, EnvError::DuplicateName { name } if *name == item.name))
            {
                self.errors.push(EnvError::DuplicateName {
                    name: item.name.clone(),
                });
            }
            return None;
        }

        let raw = self.source.var(&item.name);
        match coerce_and_validate(raw.as_deref(), item) {
            Ok(value) => {
                self.record.insert(item.name.clone(), value);
                self.record.get(&item.name)
            }
            Err(e) => {
                self.errors.push(e);
                None
            }
        }
    }

    /// Record a failure that did not come from a schema item
    pub fn push_error(&mut self, error: EnvError) {
        self.errors.push(error);
    }

    pub fn errors(&self) -> &[EnvError] {
        &self.errors
    }

    /// Return the record, or every collected error
    pub fn finish(self) -> Result<EnvRecord, LoadError> {
        if self.errors.is_empty() {
            Ok(self.record)
        } else {
            Err(LoadError::new(self.errors))
        }
    }
}

/// Validate `schema` against `source`, reporting all failures at once
pub fn load_env_from<S: EnvSource>(schema: &[SchemaItem], source: S) -> Result<EnvRecord, LoadError> {
    let mut loader = EnvLoader::new(source);
    for item in schema {
        loader.check(item);
    }
    finish_logged(loader, schema)
}

/// Merge the dotenv file into the process environment, then validate `schema`.
///
/// Problems reading the dotenv file are logged and skipped; only schema items can fail the load.
///
/// # Example
/// ```no_run
/// use env_loadr::{load_env, Kind, LoadOptions, SchemaItem};
///
/// let schema = [
///     SchemaItem::required("PORT", Kind::Number),
///     SchemaItem::optional("DEBUG", Kind::Boolean),
/// ];
///
/// match load_env(&schema, &LoadOptions::default()) {
///     Ok(env) => println!("port {:?}", env.get_number("PORT")),
///     Err(e) => eprintln!("{}", e.report()),
/// }
/// ```
pub fn load_env(schema: &[SchemaItem], options: &LoadOptions) -> Result<EnvRecord, LoadError> {
    let outcome = dotenv::merge_dotenv(options);

    for error in &outcome.errors {
        tracing::warn!(%error, "ignoring unreadable dotenv file");
    }

    let mut loader = EnvLoader::new(SystemEnv);
    for item in schema {
        loader.check(item);
    }
    finish_logged(loader, schema)
}

fn finish_logged<S: EnvSource>(loader: EnvLoader<S>, schema: &[SchemaItem]) -> Result<EnvRecord, LoadError> {
    let result = loader.finish();
    match &result {
        Ok(record) => tracing::debug!(items = schema.len(), entries = record.len(), "environment validated"),
        Err(e) => tracing::debug!(items = schema.len(), errors = e.len(), "environment validation failed"),
    }
    result
}
