//! Coercion of loosely-typed RPC values into strict types.
//!
//! The public functions in this module are the primitives every entity
//! decoder is built from. Each one takes the name of the wire field it is
//! reading so that failures can report where they happened.

use chrono::{DateTime, FixedOffset};
use serde_json::Value;

use crate::model::Colour;
use crate::{Error, Object, Result};

/// An entity which can be decoded from an RPC payload mapping.
pub trait Decode: Sized {
    /// Name reported when the payload handed to [`Decode::decode`] is not a mapping.
    const KIND: &'static str;

    /// Decode the entity from the fields of a mapping, consuming them.
    fn decode_object(map: Object) -> Result<Self>;

    /// Decode the entity from any payload value.
    fn decode(value: Value) -> Result<Self> {
        into_map(Self::KIND, value).and_then(Self::decode_object)
    }
}

/// Parse a snowflake sent either as a decimal string or as a JSON integer.
///
/// Strings must consist of ASCII digits only; signs, whitespace and
/// out-of-range values are rejected.
pub fn decode_identifier(field: &'static str, value: &Value) -> Result<u64> {
    match *value {
        Value::String(ref s) => {
            let invalid = || Error::InvalidIdentifier {
                field,
                value: s.clone(),
            };
            if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            s.parse::<u64>().map_err(|_| invalid())
        }
        Value::Number(ref n) => n.as_u64().ok_or_else(|| Error::InvalidIdentifier {
            field,
            value: n.to_string(),
        }),
        _ => Err(malformed(field, "a snowflake string or integer")),
    }
}

/// Map a string onto one of a closed set of symbols.
///
/// The input is trimmed and lower-cased before lookup, so `known` should list
/// lower-case names.
pub fn decode_enum_symbol<T: Copy>(
    field: &'static str,
    value: &Value,
    known: &[(&'static str, T)],
) -> Result<T> {
    let raw = value.as_str().ok_or_else(|| malformed(field, "a string"))?;
    let normalized = raw.trim().to_ascii_lowercase();

    known
        .iter()
        .find(|&&(name, _)| name == normalized)
        .map(|&(_, symbol)| symbol)
        .ok_or_else(|| Error::UnknownEnumValue {
            field,
            value: raw.to_owned(),
        })
}

/// Parse a `#RRGGBB` colour string.
pub fn decode_colour(field: &'static str, value: &Value) -> Result<Colour> {
    let raw = value.as_str().ok_or_else(|| malformed(field, "a colour string"))?;
    raw.parse().map_err(|_| Error::InvalidColour {
        field,
        value: raw.to_owned(),
    })
}

/// Parse an RFC 3339 / ISO-8601 date-time string, keeping its offset.
pub fn decode_timestamp(field: &'static str, value: &Value) -> Result<DateTime<FixedOffset>> {
    let raw = value.as_str().ok_or_else(|| malformed(field, "a timestamp string"))?;
    DateTime::parse_from_rfc3339(raw).map_err(|source| Error::InvalidTimestamp {
        field,
        value: raw.to_owned(),
        source,
    })
}

const ICON_TOKEN_LEN: usize = 32;

/// Find the first run of 32 hexadecimal characters in an icon URL.
///
/// CDN icon URLs embed the icon hash as such a token, e.g.
/// `https://cdn.discordapp.com/icons/<server>/<hash>.png`.
pub fn extract_icon_token(url: &str) -> Option<&str> {
    let mut run = 0;
    for (i, b) in url.bytes().enumerate() {
        if !b.is_ascii_hexdigit() {
            run = 0;
            continue;
        }
        run += 1;
        if run == ICON_TOKEN_LEN {
            // the run is pure ASCII, so these are char boundaries
            return Some(&url[i + 1 - ICON_TOKEN_LEN..=i]);
        }
    }
    None
}

/// Parse a float sent either as a JSON number or as a numeric string.
///
/// No range is enforced: a numeric string too large for `f64` decodes to an
/// infinity. Only `NaN` is refused, since it is not a number at all.
pub fn decode_float(field: &'static str, value: &Value) -> Result<f64> {
    let float = match *value {
        Value::Number(ref n) => n.as_f64(),
        Value::String(ref s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    float
        .filter(|f| !f.is_nan())
        .ok_or_else(|| malformed(field, "a number or numeric string"))
}

/// Parse a whole JSON number. Floats are accepted only when they have no
/// fractional part, so `100.0` is `100` but `63.6` is refused.
pub fn decode_integer(field: &'static str, value: &Value) -> Result<i64> {
    let n = match *value {
        Value::Number(ref n) => n,
        _ => return Err(malformed(field, "an integer")),
    };
    if let Some(int) = n.as_i64() {
        return Ok(int);
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Ok(f as i64),
        _ => Err(malformed(field, "an integer")),
    }
}

/// Parse a non-negative JSON integer.
pub fn decode_unsigned(field: &'static str, value: &Value) -> Result<u64> {
    value
        .as_u64()
        .ok_or_else(|| malformed(field, "a non-negative integer"))
}

// Field access helpers shared by the entity decoders

pub(crate) fn malformed(field: &'static str, expected: &'static str) -> Error {
    Error::MalformedField { field, expected }
}

/// Take a required field out of a mapping; `null` counts as absent.
pub(crate) fn remove(map: &mut Object, key: &'static str) -> Result<Value> {
    remove_opt(map, key).ok_or(Error::MissingField(key))
}

/// Take an optional field out of a mapping; `null` counts as absent.
pub(crate) fn remove_opt(map: &mut Object, key: &'static str) -> Option<Value> {
    match map.remove(key) {
        None | Some(Value::Null) => None,
        value => value,
    }
}

pub(crate) fn into_map(field: &'static str, value: Value) -> Result<Object> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(malformed(field, "an object")),
    }
}

pub(crate) fn into_string(field: &'static str, value: Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s),
        _ => Err(malformed(field, "a string")),
    }
}

pub(crate) fn into_bool(field: &'static str, value: Value) -> Result<bool> {
    value.as_bool().ok_or_else(|| malformed(field, "a boolean"))
}

/// Decode every element of an array in order, stopping at the first failure.
pub(crate) fn decode_array<T, F>(field: &'static str, value: Value, f: F) -> Result<Vec<T>>
where
    F: FnMut(Value) -> Result<T>,
{
    match value {
        Value::Array(items) => items.into_iter().map(f).collect(),
        _ => Err(malformed(field, "an array")),
    }
}

pub(crate) fn string(map: &mut Object, key: &'static str) -> Result<String> {
    remove(map, key).and_then(|v| into_string(key, v))
}

pub(crate) fn string_opt(map: &mut Object, key: &'static str) -> Result<Option<String>> {
    remove_opt(map, key).map(|v| into_string(key, v)).transpose()
}

pub(crate) fn boolean(map: &mut Object, key: &'static str) -> Result<bool> {
    remove(map, key).and_then(|v| into_bool(key, v))
}

/// A boolean which is `false` when absent.
pub(crate) fn boolean_or_default(map: &mut Object, key: &'static str) -> Result<bool> {
    remove_opt(map, key)
        .map(|v| into_bool(key, v))
        .unwrap_or(Ok(false))
}

/// A nested entity under `key`.
pub(crate) fn entity<T: Decode>(map: &mut Object, key: &'static str) -> Result<T> {
    remove(map, key)
        .and_then(|v| into_map(key, v))
        .and_then(T::decode_object)
}

pub(crate) fn entity_opt<T: Decode>(map: &mut Object, key: &'static str) -> Result<Option<T>> {
    remove_opt(map, key)
        .map(|v| into_map(key, v).and_then(T::decode_object))
        .transpose()
}

/// A required array of nested entities under `key`.
pub(crate) fn entity_list<T: Decode>(map: &mut Object, key: &'static str) -> Result<Vec<T>> {
    remove(map, key).and_then(|v| {
        decode_array(key, v, |item| into_map(key, item).and_then(T::decode_object))
    })
}
