// Helpers called by code generated from `define_env!`.
// The macro itself lives in the env-loadr-macros crate.

use crate::{error::EnvError, kind::Kind, value::EnvRecord, value::FromValue};

/// Move one entry out of the record into its field type, collecting the error on mismatch
#[doc(hidden)]
pub fn take_field<T: FromValue>(
    record: &mut EnvRecord,
    errors: &mut Vec<EnvError>,
    name: &str,
    kind: Kind,
) -> Option<T> {
    match T::from_value(name, kind, record.take(name)) {
        Ok(value) => Some(value),
        Err(e) => {
            errors.push(e);
            None
        }
    }
}
