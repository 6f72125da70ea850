use crate::error::EnvError;
use std::{fmt, str::FromStr};

/// The kind of value a schema item expects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub enum Kind {
    String,
    Number,
    Boolean,
    Email,
    Url,
}

impl Kind {
    pub const ALL: [Kind; 5] = [
        Kind::String,
        Kind::Number,
        Kind::Boolean,
        Kind::Email,
        Kind::Url,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Email => "email",
            Self::Url => "url",
        }
    }

    /// Name of the Rust type a coerced value of this kind is carried in
    pub fn rust_type(&self) -> &'static str {
        match self {
            Self::Number => "f64",
            Self::Boolean => "bool",
            Self::String | Self::Email | Self::Url => "String",
        }
    }
}

impl FromStr for Kind {
    type Err = EnvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(Self::String),
            "number" => Ok(Self::Number),
            "boolean" => Ok(Self::Boolean),
            "email" => Ok(Self::Email),
            "url" => Ok(Self::Url),
            _ => Err(EnvError::UnsupportedKind {
                kind: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for Kind {
    type Error = EnvError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Kind> for String {
    fn from(kind: Kind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
