use crate::{error::EnvError, kind::Kind, schema::SchemaItem, value::Value};
use once_cell::sync::Lazy;
use regex::Regex;

/// Longest received value echoed back in an error message
pub const MAX_RECEIVED_CHARS: usize = 100;

/// Loose sanity check, not RFC 5322: one `@`, no whitespace, a dot after the `@`
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("EMAIL_REGEX pattern is valid")
});

/// Cut `value` to `max` characters, appending `…` when anything was dropped
pub fn truncate(value: &str, max: usize) -> String {
    match value.char_indices().nth(max) {
        Some((idx, _)) => format!("{}…", &value[..idx]),
        None => value.to_string(),
    }
}

fn invalid(item: &SchemaItem, raw: &str, requirement: &str) -> EnvError {
    EnvError::InvalidValue {
        name: item.name.clone(),
        expected: item.kind,
        received: raw.to_string(),
        message: format!(
            "{} must be {} (received: \"{}\")",
            item.name,
            requirement,
            truncate(raw, MAX_RECEIVED_CHARS)
        ),
    }
}

fn parse_radix(digits: &str, radix: u32) -> Option<f64> {
    // from_str_radix tolerates a leading sign, prefixed literals do not
    if digits.starts_with(['+', '-']) {
        return None;
    }
    u128::from_str_radix(digits, radix).ok().map(|n| n as f64)
}

fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let prefix = trimmed.get(..2).map(str::to_ascii_lowercase);
    let parsed = match prefix.as_deref() {
        Some("0x") => parse_radix(&trimmed[2..], 16),
        Some("0o") => parse_radix(&trimmed[2..], 8),
        Some("0b") => parse_radix(&trimmed[2..], 2),
        _ => trimmed.parse::<f64>().ok(),
    };
    parsed.filter(|n| n.is_finite())
}

/// Validate one raw value against its schema item.
///
/// Numbers accept decimal `f64` literals and unsigned `0x`/`0o`/`0b` integers,
/// with surrounding whitespace ignored. Blank input is not a number.
///
/// Returns `Ok(None)` only for an unset optional item.
pub fn coerce_and_validate(raw: Option<&str>, item: &SchemaItem) -> Result<Option<Value>, EnvError> {
    let Some(raw) = raw else {
        if item.optional {
            return Ok(None);
        }
        return Err(EnvError::MissingEnvVar {
            name: item.name.clone(),
            expected: item.kind,
        });
    };

    let value = match item.kind {
        Kind::String => {
            if raw.is_empty() && !item.allow_empty {
                return Err(EnvError::InvalidValue {
                    name: item.name.clone(),
                    expected: Kind::String,
                    received: String::new(),
                    message: format!("{} must be a non-empty string", item.name),
                });
            }
            Value::String(raw.to_string())
        }
        Kind::Boolean => {
            if raw.eq_ignore_ascii_case("true") {
                Value::Boolean(true)
            } else if raw.eq_ignore_ascii_case("false") {
                Value::Boolean(false)
            } else {
                return Err(invalid(item, raw, "\"true\" or \"false\""));
            }
        }
        Kind::Number => match parse_number(raw) {
            Some(n) => Value::Number(n),
            None => return Err(invalid(item, raw, "a valid number")),
        },
        Kind::Email => {
            if !EMAIL_REGEX.is_match(raw) {
                return Err(invalid(item, raw, "a valid email"));
            }
            Value::String(raw.to_string())
        }
        Kind::Url => {
            if url::Url::parse(raw).is_err() {
                return Err(invalid(item, raw, "a valid URL"));
            }
            Value::String(raw.to_string())
        }
    };

    Ok(Some(value))
}
