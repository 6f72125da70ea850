use crate::{error::EnvError, kind::Kind};
use std::fmt;

/// The typed result of validating one raw environment value
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Value {
    String(String),
    Number(f64),
    Boolean(bool),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{}", n),
            Self::Boolean(b) => write!(f, "{}", b),
        }
    }
}

/// Mapping from schema item name to its coerced value, in schema order.
///
/// Optional items that were unset are kept as explicit `None` entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvRecord {
    entries: Vec<(String, Option<Value>)>,
}

impl EnvRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, replacing any previous entry with the same name in place
    pub fn insert(&mut self, name: impl Into<String>, value: Option<Value>) {
        let name = name.into();
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// The coerced value, or `None` when the entry is absent or unknown
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entry(name).and_then(Option::as_ref)
    }

    /// Whether the record has an entry for `name`, including explicit absent ones
    pub fn contains(&self, name: &str) -> bool {
        self.entry(name).is_some()
    }

    /// Whether `name` is present in the record as an explicit absent entry
    pub fn is_absent(&self, name: &str) -> bool {
        matches!(self.entry(name), Some(None))
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    pub fn get_number(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Value::as_number)
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Value::as_bool)
    }

    /// Remove an entry, returning its value
    pub fn take(&mut self, name: &str) -> Option<Value> {
        let index = self.entries.iter().position(|(key, _)| key == name)?;
        self.entries.remove(index).1
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&Value>)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry(&self, name: &str) -> Option<&Option<Value>> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for EnvRecord {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Conversion from a record entry into a Rust field type
pub trait FromValue: Sized {
    fn from_value(name: &str, expected: Kind, value: Option<Value>) -> Result<Self, EnvError>;
}

fn mismatch(name: &str, expected: Kind, target: &'static str) -> EnvError {
    EnvError::FieldMismatch {
        name: name.to_string(),
        expected,
        target,
    }
}

impl FromValue for String {
    fn from_value(name: &str, expected: Kind, value: Option<Value>) -> Result<Self, EnvError> {
        match value {
            Some(Value::String(s)) => Ok(s),
            _ => Err(mismatch(name, expected, "String")),
        }
    }
}

impl FromValue for f64 {
    fn from_value(name: &str, expected: Kind, value: Option<Value>) -> Result<Self, EnvError> {
        match value {
            Some(Value::Number(n)) => Ok(n),
            _ => Err(mismatch(name, expected, "f64")),
        }
    }
}

impl FromValue for bool {
    fn from_value(name: &str, expected: Kind, value: Option<Value>) -> Result<Self, EnvError> {
        match value {
            Some(Value::Boolean(b)) => Ok(b),
            _ => Err(mismatch(name, expected, "bool")),
        }
    }
}

impl FromValue for url::Url {
    fn from_value(name: &str, expected: Kind, value: Option<Value>) -> Result<Self, EnvError> {
        match value {
            Some(Value::String(s)) => {
                url::Url::parse(&s).map_err(|_| mismatch(name, expected, "Url"))
            }
            _ => Err(mismatch(name, expected, "Url")),
        }
    }
}

// Integral numbers only, and only within the target's range.
// The exclusive upper bound is a power of two, so it is exact as f64 where MAX is not.
macro_rules! impl_from_value_int {
    ($($ty:ty),*) => {
        $(
            impl FromValue for $ty {
                fn from_value(name: &str, expected: Kind, value: Option<Value>) -> Result<Self, EnvError> {
                    let sign_bit = if <$ty>::MIN == 0 { 0 } else { 1 };
                    let upper = 2f64.powi((<$ty>::BITS - sign_bit) as i32);
                    match value {
                        Some(Value::Number(n))
                            if n.fract() == 0.0 && n >= <$ty>::MIN as f64 && n < upper =>
                        {
                            Ok(n as $ty)
                        }
                        _ => Err(mismatch(name, expected, stringify!($ty))),
                    }
                }
            }
        )*
    };
}

impl_from_value_int!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(name: &str, expected: Kind, value: Option<Value>) -> Result<Self, EnvError> {
        match value {
            None => Ok(None),
            Some(v) => T::from_value(name, expected, Some(v)).map(Some),
        }
    }
}
