//! Literal parsing against declared types.
//!
//! Primitive kinds defer to [`parse_primitive`]; enum types need the schema
//! graph to resolve member names, so they are handled here.

use super::schema::SchemaGraph;
use super::types::{EnumType, SchemaType, TypeRef};
use edmpath_common::types::{LiteralOptions, Value, parse_primitive, unquote};
use edmpath_common::utils::error::LiteralError;

/// Parses `raw` as a literal of the declared type `type_ref`.
///
/// Enum literals may be written as `Ns.Type'Member'`, `'Member'`, a bare
/// underlying value, or (when unquoted strings are allowed) a bare member
/// name. Flags enums accept comma separated members.
///
/// # Errors
///
/// Returns a [`LiteralError`] when the text does not parse as the declared
/// type. Structured and collection types have no URL literal form and are
/// always rejected.
pub fn parse_value<G: SchemaGraph + ?Sized>(
    graph: &G,
    raw: &str,
    type_ref: &TypeRef,
    options: LiteralOptions,
) -> Result<Value, LiteralError> {
    match type_ref {
        TypeRef::Primitive(kind) => parse_primitive(raw, *kind, options),
        TypeRef::Enum(id) => match graph.schema_type(*id) {
            SchemaType::Enum(enum_type) => parse_enum(enum_type, raw.trim(), options),
            SchemaType::Structured(t) => Err(LiteralError::malformed(&t.qualified_name, raw)),
        },
        TypeRef::Untyped => Ok(match unquote(raw.trim()) {
            Some(s) => Value::String(s),
            None => Value::String(raw.trim().to_string()),
        }),
        TypeRef::Entity(_) | TypeRef::Complex(_) | TypeRef::Collection(_) => {
            Err(LiteralError::malformed(graph.type_name(type_ref), raw))
        }
    }
}

fn parse_enum(
    enum_type: &EnumType,
    text: &str,
    options: LiteralOptions,
) -> Result<Value, LiteralError> {
    let malformed = || LiteralError::malformed(&enum_type.qualified_name, text);

    let body = match text.find('\'') {
        Some(0) => unquote(text).ok_or_else(malformed)?,
        Some(quote) => {
            let prefix = &text[..quote];
            if prefix != enum_type.qualified_name {
                return Err(LiteralError::TypeMismatch {
                    expected: enum_type.qualified_name.clone(),
                    found: prefix.to_string(),
                });
            }
            unquote(&text[quote..]).ok_or_else(malformed)?
        }
        None if text.parse::<i64>().is_ok() || options.allow_unquoted_strings => text.to_string(),
        None => return Err(malformed()),
    };

    let parts: Vec<&str> = body.split(',').map(str::trim).collect();
    if parts.len() > 1 && !enum_type.is_flags {
        return Err(malformed());
    }
    let mut members = Vec::with_capacity(parts.len());
    for part in parts {
        let member = match part.parse::<i64>() {
            Ok(value) => enum_type.member_by_value(value),
            Err(_) => enum_type.member(part, false),
        };
        let member = member.ok_or_else(|| LiteralError::UnknownMember {
            type_name: enum_type.qualified_name.clone(),
            member: part.to_string(),
        })?;
        members.push(member.name.as_str());
    }

    Ok(Value::Enum {
        type_name: enum_type.qualified_name.clone(),
        members: members.join(","),
    })
}
