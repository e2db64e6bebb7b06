//! Parsed literal values.

use super::PrimitiveKind;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// A typed value parsed out of a URL token.
///
/// Decimals and durations keep their validated textual form: the engine only
/// needs to carry them through to query evaluation, never to compute with them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value")]
pub enum Value {
    /// `null`
    Null,
    /// Boolean value
    Boolean(bool),
    /// Unsigned 8-bit integer
    Byte(u8),
    /// Signed 8-bit integer
    SByte(i8),
    /// 16-bit integer
    Int16(i16),
    /// 32-bit integer
    Int32(i32),
    /// 64-bit integer
    Int64(i64),
    /// 32-bit float
    Single(f32),
    /// 64-bit float
    Double(f64),
    /// Decimal in canonical text form
    Decimal(String),
    /// String
    String(String),
    /// Guid
    Guid(Uuid),
    /// Calendar date
    Date(NaiveDate),
    /// Date and time with offset
    DateTimeOffset(DateTime<FixedOffset>),
    /// Time of day
    TimeOfDay(NaiveTime),
    /// ISO 8601 duration text, e.g. `P1DT2H`
    Duration(String),
    /// Enum member(s), comma separated for flags enums
    Enum {
        /// Qualified name of the enum type.
        type_name: String,
        /// Member name, or comma separated member names.
        members: String,
    },
}

impl Value {
    /// Returns the primitive kind of this value, `None` for `Null` and enums.
    #[must_use]
    pub fn kind(&self) -> Option<PrimitiveKind> {
        Some(match self {
            Self::Null | Self::Enum { .. } => return None,
            Self::Boolean(_) => PrimitiveKind::Boolean,
            Self::Byte(_) => PrimitiveKind::Byte,
            Self::SByte(_) => PrimitiveKind::SByte,
            Self::Int16(_) => PrimitiveKind::Int16,
            Self::Int32(_) => PrimitiveKind::Int32,
            Self::Int64(_) => PrimitiveKind::Int64,
            Self::Single(_) => PrimitiveKind::Single,
            Self::Double(_) => PrimitiveKind::Double,
            Self::Decimal(_) => PrimitiveKind::Decimal,
            Self::String(_) => PrimitiveKind::String,
            Self::Guid(_) => PrimitiveKind::Guid,
            Self::Date(_) => PrimitiveKind::Date,
            Self::DateTimeOffset(_) => PrimitiveKind::DateTimeOffset,
            Self::TimeOfDay(_) => PrimitiveKind::TimeOfDay,
            Self::Duration(_) => PrimitiveKind::Duration,
        })
    }

    /// Returns true if this is `Null`.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the value as an `i64` if it is integral.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Byte(v) => Some(i64::from(*v)),
            Self::SByte(v) => Some(i64::from(*v)),
            Self::Int16(v) => Some(i64::from(*v)),
            Self::Int32(v) => Some(i64::from(*v)),
            Self::Int64(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the value as a string slice if it is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

/// Formats the value back into URL literal form.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Boolean(v) => write!(f, "{v}"),
            Self::Byte(v) => write!(f, "{v}"),
            Self::SByte(v) => write!(f, "{v}"),
            Self::Int16(v) => write!(f, "{v}"),
            Self::Int32(v) => write!(f, "{v}"),
            Self::Int64(v) => write!(f, "{v}"),
            Self::Single(v) => write_float(f, f64::from(*v)),
            Self::Double(v) => write_float(f, *v),
            Self::Duration(v) => write!(f, "duration'{v}'"),
            Self::Decimal(v) => f.write_str(v),
            Self::String(v) => write!(f, "'{}'", v.replace('\'', "''")),
            Self::Guid(v) => write!(f, "{v}"),
            Self::Date(v) => write!(f, "{}", v.format("%Y-%m-%d")),
            Self::DateTimeOffset(v) => f.write_str(&v.to_rfc3339()),
            Self::TimeOfDay(v) => write!(f, "{}", v.format("%H:%M:%S%.f")),
            Self::Enum { type_name, members } => write!(f, "{type_name}'{members}'"),
        }
    }
}

fn write_float(f: &mut fmt::Formatter<'_>, v: f64) -> fmt::Result {
    if v.is_nan() {
        f.write_str("NaN")
    } else if v.is_infinite() {
        f.write_str(if v > 0.0 { "INF" } else { "-INF" })
    } else {
        write!(f, "{v}")
    }
}
