//! OData URL literal grammar for primitive types.
//!
//! Route values arrive as the raw text the router captured, already
//! percent-decoded. This module turns that text into a [`Value`] of a
//! declared [`PrimitiveKind`], or explains why it cannot.

use super::{PrimitiveKind, Value};
use crate::utils::error::LiteralError;
use chrono::{DateTime, NaiveDate, NaiveTime};
use regex::Regex;
use std::sync::LazyLock;
use uuid::Uuid;

static FLOAT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(\d+(\.\d*)?|\.\d+)([eE][+-]?\d+)?$").expect("valid float regex")
});

static DECIMAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?\d+(\.\d+)?([eE][+-]?\d+)?$").expect("valid decimal regex")
});

static GUID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .expect("valid guid regex")
});

static DURATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-?P(\d+D)?(T(\d+H)?(\d+M)?(\d+(\.\d+)?S)?)?$").expect("valid duration regex")
});

/// Options controlling how permissive literal parsing is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LiteralOptions {
    /// Accept strings (and enum members) without surrounding single quotes.
    ///
    /// Key-as-segment URLs such as `Customers/ALFKI` carry unquoted strings.
    pub allow_unquoted_strings: bool,
}

impl LiteralOptions {
    /// Options for key-as-segment values.
    #[must_use]
    pub const fn unquoted() -> Self {
        Self {
            allow_unquoted_strings: true,
        }
    }
}

/// Parses `raw` as a literal of `kind`.
///
/// # Errors
///
/// Returns [`LiteralError::Malformed`] if the text is not a valid literal of
/// the requested kind, including values out of range for integral kinds.
pub fn parse_primitive(
    raw: &str,
    kind: PrimitiveKind,
    options: LiteralOptions,
) -> Result<Value, LiteralError> {
    let malformed = || LiteralError::malformed(kind.name(), raw);
    let text = raw.trim();

    match kind {
        PrimitiveKind::Boolean => {
            if text.eq_ignore_ascii_case("true") {
                Ok(Value::Boolean(true))
            } else if text.eq_ignore_ascii_case("false") {
                Ok(Value::Boolean(false))
            } else {
                Err(malformed())
            }
        }
        PrimitiveKind::Byte => parse_int::<u8>(text).map(Value::Byte).ok_or_else(malformed),
        PrimitiveKind::SByte => parse_int::<i8>(text).map(Value::SByte).ok_or_else(malformed),
        PrimitiveKind::Int16 => parse_int::<i16>(text).map(Value::Int16).ok_or_else(malformed),
        PrimitiveKind::Int32 => parse_int::<i32>(text).map(Value::Int32).ok_or_else(malformed),
        PrimitiveKind::Int64 => {
            let digits = text
                .strip_suffix('L')
                .or_else(|| text.strip_suffix('l'))
                .unwrap_or(text);
            parse_int::<i64>(digits)
                .map(Value::Int64)
                .ok_or_else(malformed)
        }
        PrimitiveKind::Single => parse_float(text, ['f', 'F'])
            .map(|v| Value::Single(v as f32))
            .ok_or_else(malformed),
        PrimitiveKind::Double => parse_float(text, ['d', 'D'])
            .map(Value::Double)
            .ok_or_else(malformed),
        PrimitiveKind::Decimal => {
            let digits = text
                .strip_suffix('M')
                .or_else(|| text.strip_suffix('m'))
                .unwrap_or(text);
            if DECIMAL_RE.is_match(digits) {
                Ok(Value::Decimal(digits.to_string()))
            } else {
                Err(malformed())
            }
        }
        PrimitiveKind::String => match unquote(text) {
            Some(s) => Ok(Value::String(s)),
            None if options.allow_unquoted_strings && !text.starts_with('\'') => {
                Ok(Value::String(text.to_string()))
            }
            None => Err(malformed()),
        },
        PrimitiveKind::Guid => {
            let body = strip_typed_prefix(text, "guid").unwrap_or(text);
            if GUID_RE.is_match(body) {
                Uuid::parse_str(body).map(Value::Guid).map_err(|_| malformed())
            } else {
                Err(malformed())
            }
        }
        PrimitiveKind::Date => NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .map(Value::Date)
            .map_err(|_| malformed()),
        PrimitiveKind::DateTimeOffset => DateTime::parse_from_rfc3339(text)
            .map(Value::DateTimeOffset)
            .map_err(|_| malformed()),
        PrimitiveKind::TimeOfDay => NaiveTime::parse_from_str(text, "%H:%M:%S%.f")
            .or_else(|_| NaiveTime::parse_from_str(text, "%H:%M"))
            .map(Value::TimeOfDay)
            .map_err(|_| malformed()),
        PrimitiveKind::Duration => {
            let body = strip_typed_prefix(text, "duration").unwrap_or(text);
            if body.len() > 1 && DURATION_RE.is_match(body) && !body.ends_with('T') {
                Ok(Value::Duration(body.to_string()))
            } else {
                Err(malformed())
            }
        }
    }
}

fn parse_int<T: std::str::FromStr>(text: &str) -> Option<T> {
    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
    if unsigned.is_empty() || !unsigned.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

fn parse_float(text: &str, suffixes: [char; 2]) -> Option<f64> {
    match text {
        "INF" => return Some(f64::INFINITY),
        "-INF" => return Some(f64::NEG_INFINITY),
        "NaN" => return Some(f64::NAN),
        _ => {}
    }
    let digits = text.strip_suffix(suffixes).unwrap_or(text);
    if FLOAT_RE.is_match(digits) {
        digits.parse().ok()
    } else {
        None
    }
}

/// Strips a typed-literal prefix such as `guid'...'`, case-insensitively.
fn strip_typed_prefix<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    if !head.eq_ignore_ascii_case(prefix) {
        return None;
    }
    text[prefix.len()..]
        .strip_prefix('\'')
        .and_then(|rest| rest.strip_suffix('\''))
}

/// Removes surrounding single quotes and collapses doubled quotes.
///
/// Returns `None` if `text` is not a well-formed quoted string.
#[must_use]
pub fn unquote(text: &str) -> Option<String> {
    let inner = text.strip_prefix('\'')?.strip_suffix('\'')?;
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\'' {
            // A lone quote inside the body ends the string early.
            if chars.next_if_eq(&'\'').is_none() {
                return None;
            }
        }
        out.push(c);
    }
    Some(out)
}

/// Splits `text` on `separator`, ignoring separators inside single-quoted
/// strings and nested parentheses. Pieces are trimmed.
#[must_use]
pub fn split_quoted(text: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut in_quotes = false;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        match c {
            '\'' => in_quotes = !in_quotes,
            '(' if !in_quotes => depth += 1,
            ')' if !in_quotes => depth = depth.saturating_sub(1),
            c if c == separator && !in_quotes && depth == 0 => {
                parts.push(text[start..i].trim());
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(text[start..].trim());
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str, kind: PrimitiveKind) -> Result<Value, LiteralError> {
        parse_primitive(raw, kind, LiteralOptions::default())
    }

    #[test]
    fn test_integral_literals() {
        assert_eq!(parse("1", PrimitiveKind::Int32), Ok(Value::Int32(1)));
        assert_eq!(parse("-42", PrimitiveKind::Int16), Ok(Value::Int16(-42)));
        assert_eq!(parse("42L", PrimitiveKind::Int64), Ok(Value::Int64(42)));
        assert!(parse("abc", PrimitiveKind::Int32).is_err());
        assert!(parse("1.5", PrimitiveKind::Int32).is_err());
        assert!(parse("256", PrimitiveKind::Byte).is_err());
        assert!(parse("", PrimitiveKind::Int32).is_err());
        assert!(parse("'1'", PrimitiveKind::Int32).is_err());
    }

    #[test]
    fn test_float_literals() {
        assert_eq!(parse("1.5", PrimitiveKind::Double), Ok(Value::Double(1.5)));
        assert_eq!(parse("2d", PrimitiveKind::Double), Ok(Value::Double(2.0)));
        assert_eq!(parse("1e3", PrimitiveKind::Double), Ok(Value::Double(1000.0)));
        assert_eq!(
            parse("-INF", PrimitiveKind::Double),
            Ok(Value::Double(f64::NEG_INFINITY))
        );
        assert!(parse("inf", PrimitiveKind::Double).is_err());
        assert!(parse("1.5.2", PrimitiveKind::Single).is_err());
    }

    #[test]
    fn test_decimal_literal_keeps_text() {
        assert_eq!(
            parse("10.50M", PrimitiveKind::Decimal),
            Ok(Value::Decimal("10.50".into()))
        );
        assert!(parse("ten", PrimitiveKind::Decimal).is_err());
    }

    #[test]
    fn test_string_literals() {
        assert_eq!(
            parse("'O''Neil'", PrimitiveKind::String),
            Ok(Value::String("O'Neil".into()))
        );
        assert!(parse("ALFKI", PrimitiveKind::String).is_err());
        assert!(parse("'bad'quote'", PrimitiveKind::String).is_err());
        assert_eq!(
            parse_primitive("ALFKI", PrimitiveKind::String, LiteralOptions::unquoted()),
            Ok(Value::String("ALFKI".into()))
        );
    }

    #[test]
    fn test_guid_and_temporal_literals() {
        let guid = "01234567-89ab-cdef-0123-456789abcdef";
        assert!(matches!(parse(guid, PrimitiveKind::Guid), Ok(Value::Guid(_))));
        assert!(matches!(
            parse(&format!("guid'{guid}'"), PrimitiveKind::Guid),
            Ok(Value::Guid(_))
        ));
        assert!(parse("0123456789abcdef0123456789abcdef", PrimitiveKind::Guid).is_err());
        assert!(matches!(
            parse("2024-02-29", PrimitiveKind::Date),
            Ok(Value::Date(_))
        ));
        assert!(parse("2023-02-29", PrimitiveKind::Date).is_err());
        assert!(matches!(
            parse("2024-01-01T10:00:00+02:00", PrimitiveKind::DateTimeOffset),
            Ok(Value::DateTimeOffset(_))
        ));
        assert!(matches!(
            parse("13:45", PrimitiveKind::TimeOfDay),
            Ok(Value::TimeOfDay(_))
        ));
    }

    #[test]
    fn test_duration_literals() {
        assert_eq!(
            parse("duration'P1DT2H'", PrimitiveKind::Duration),
            Ok(Value::Duration("P1DT2H".into()))
        );
        assert_eq!(
            parse("PT30M", PrimitiveKind::Duration),
            Ok(Value::Duration("PT30M".into()))
        );
        assert!(parse("P", PrimitiveKind::Duration).is_err());
        assert!(parse("PT", PrimitiveKind::Duration).is_err());
        assert!(parse("1 day", PrimitiveKind::Duration).is_err());
    }

    #[test]
    fn test_boolean_literal() {
        assert_eq!(parse("true", PrimitiveKind::Boolean), Ok(Value::Boolean(true)));
        assert_eq!(parse("FALSE", PrimitiveKind::Boolean), Ok(Value::Boolean(false)));
        assert!(parse("1", PrimitiveKind::Boolean).is_err());
    }

    #[test]
    fn test_split_quoted() {
        assert_eq!(split_quoted("ID=1, Name='a,b'", ','), vec!["ID=1", "Name='a,b'"]);
        assert_eq!(split_quoted("a(b,c),d", ','), vec!["a(b,c)", "d"]);
        assert_eq!(split_quoted("", ','), vec![""]);
    }

    proptest::proptest! {
        #[test]
        fn prop_int32_round_trip(n in proptest::num::i32::ANY) {
            let parsed = parse(&n.to_string(), PrimitiveKind::Int32).unwrap();
            proptest::prop_assert_eq!(parsed, Value::Int32(n));
        }

        #[test]
        fn prop_string_round_trip(s in "[a-zA-Z' ]{0,16}") {
            let literal = Value::String(s.clone()).to_string();
            let parsed = parse(&literal, PrimitiveKind::String).unwrap();
            proptest::prop_assert_eq!(parsed, Value::String(s));
        }
    }
}
