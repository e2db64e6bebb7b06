//! Key templates.
//!
//! Keys select one entity out of a collection. Accepted forms:
//!
//! - `Customers({key})` - single key, unnamed
//! - `People(First={first},Last={last})` - named, any order
//! - `People({key})` with the captured value `First='A',Last='B'`
//! - `Customers/{key}` - key as its own segment, unquoted strings allowed

use super::TemplateValue;
use crate::routing::context::{RouteValues, TranslateContext};
use crate::routing::segment::{PathSegment, SegmentKind, write_arguments};
use edmpath_common::types::{LiteralOptions, Value, split_quoted};
use edmpath_common::utils::error::{Specificity, TranslateError};
use edmpath_core::edm::{Property, parse_value};
use edmpath_core::TypeRef;
use smallvec::SmallVec;
use std::fmt;

/// Where the key appears in the URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeySyntax {
    /// `Customers(1)`
    Parenthesis,
    /// `Customers/1`
    Segment,
}

/// The key values a template supplies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyValues {
    /// A single unnamed value.
    Single(TemplateValue),
    /// `name=value` pairs.
    Named(SmallVec<[(String, TemplateValue); 2]>),
}

/// Parses key values against the key of the current entity collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyTemplate {
    syntax: KeySyntax,
    values: KeyValues,
}

impl KeyTemplate {
    /// Creates a key template.
    #[must_use]
    pub fn new(syntax: KeySyntax, values: KeyValues) -> Self {
        Self { syntax, values }
    }

    /// Returns where the key appears in the URL.
    #[must_use]
    pub fn syntax(&self) -> KeySyntax {
        self.syntax
    }

    pub(crate) fn matches(&self, values: &RouteValues) -> bool {
        match &self.values {
            KeyValues::Single(value) => value.is_bound(values),
            KeyValues::Named(pairs) => pairs.iter().all(|(_, v)| v.is_bound(values)),
        }
    }

    pub(crate) fn translate(
        &self,
        ctx: &mut TranslateContext<'_>,
    ) -> Result<PathSegment, TranslateError> {
        let model = ctx.model();
        let entity = match ctx.edm_type() {
            Some(TypeRef::Collection(inner)) => match inner.as_ref() {
                TypeRef::Entity(id) => *id,
                _ => return Err(self.not_keyed(ctx)),
            },
            _ => return Err(self.not_keyed(ctx)),
        };
        let keys = model.key_properties(entity);
        if keys.is_empty() {
            return Err(TranslateError::key_parse(format!(
                "{} declares no key",
                model.type_name(&TypeRef::Entity(entity))
            )));
        }

        let supplied = self.supplied(ctx, keys.len())?;
        let options = match self.syntax {
            KeySyntax::Parenthesis => LiteralOptions::default(),
            KeySyntax::Segment => LiteralOptions::unquoted(),
        };
        let mut parsed: Vec<Option<Value>> = vec![None; keys.len()];
        for (name, raw) in supplied {
            let position = match name {
                Some(name) => keys
                    .iter()
                    .position(|k| ctx.name_lookup().matches(&k.name, name))
                    .ok_or_else(|| {
                        TranslateError::key_parse(format!("`{name}` is not a key property"))
                    })?,
                None => 0,
            };
            if parsed[position].is_some() {
                return Err(TranslateError::key_parse(format!(
                    "key property `{}` is given twice",
                    keys[position].name
                )));
            }
            parsed[position] = Some(parse_key(model, keys[position], raw, options)?);
        }

        let mut values = SmallVec::with_capacity(keys.len());
        for (key, value) in keys.iter().zip(parsed) {
            let value = value.ok_or_else(|| {
                TranslateError::key_parse(format!("key property `{}` is missing", key.name))
            })?;
            values.push((key.name.clone(), value));
        }

        let edm_type = TypeRef::Entity(entity);
        let source = ctx.navigation_source();
        ctx.advance(source, Some(edm_type.clone()));
        Ok(PathSegment::new(
            SegmentKind::Key { values },
            Some(edm_type),
            source,
        ))
    }

    fn not_keyed(&self, ctx: &TranslateContext<'_>) -> TranslateError {
        let found = ctx
            .edm_type()
            .map_or_else(|| "nothing".to_string(), |t| ctx.model().type_name(t));
        let error = TranslateError::key_parse(format!(
            "a key applies to a collection of entities, found {found}"
        ));
        // A bare segment after a single value is most likely something else.
        match self.syntax {
            KeySyntax::Segment => error.with_specificity(Specificity::NoMatch),
            KeySyntax::Parenthesis => error,
        }
    }

    /// Resolves the supplied values to `(name, raw text)` pairs, with `None`
    /// standing for the single unnamed key.
    fn supplied<'a>(
        &'a self,
        ctx: &'a TranslateContext<'_>,
        arity: usize,
    ) -> Result<SmallVec<[(Option<&'a str>, &'a str); 2]>, TranslateError> {
        let values = ctx.route_values();
        let missing = |v: &TemplateValue| {
            TranslateError::key_parse(format!("no route value for key `{v}`"))
        };
        let supplied: SmallVec<[(Option<&str>, &str); 2]> = match &self.values {
            KeyValues::Named(pairs) => pairs
                .iter()
                .map(|(name, v)| {
                    v.resolve(values)
                        .map(|raw| (Some(name.as_str()), raw))
                        .ok_or_else(|| missing(v))
                })
                .collect::<Result<_, _>>()?,
            KeyValues::Single(v) => {
                let raw = v.resolve(values).ok_or_else(|| missing(v))?;
                match (self.syntax, split_named(raw)) {
                    (KeySyntax::Parenthesis, Some(pairs)) => pairs,
                    _ => SmallVec::from_elem((None, raw), 1),
                }
            }
        };

        if supplied.len() != arity {
            return Err(TranslateError::key_parse(format!(
                "expected {arity} key value(s), got {}",
                supplied.len()
            )));
        }
        if arity > 1 && supplied.iter().any(|(name, _)| name.is_none()) {
            return Err(TranslateError::key_parse(
                "a composite key needs named values",
            ));
        }
        Ok(supplied)
    }
}

fn parse_key(
    model: &dyn edmpath_core::SchemaGraph,
    key: &Property,
    raw: &str,
    options: LiteralOptions,
) -> Result<Value, TranslateError> {
    parse_value(model, raw, &key.type_ref, options).map_err(|err| {
        TranslateError::key_parse(format!("key property `{}`: {err}", key.name))
    })
}

/// Splits `ID=1,Name='x'` into named pairs. Returns `None` unless every
/// comma separated part has an `=` outside quotes.
fn split_named(raw: &str) -> Option<SmallVec<[(Option<&str>, &str); 2]>> {
    split_quoted(raw, ',')
        .into_iter()
        .map(|part| {
            let eq = top_level_eq(part)?;
            Some((Some(part[..eq].trim()), part[eq + 1..].trim()))
        })
        .collect()
}

pub(crate) fn top_level_eq(part: &str) -> Option<usize> {
    let mut in_quotes = false;
    for (i, c) in part.char_indices() {
        match c {
            '\'' => in_quotes = !in_quotes,
            '=' if !in_quotes => return Some(i),
            _ => {}
        }
    }
    None
}

impl fmt::Display for KeyTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.values, self.syntax) {
            (KeyValues::Single(v), KeySyntax::Segment) => write!(f, "{v}"),
            (KeyValues::Single(v), KeySyntax::Parenthesis) => write!(f, "({v})"),
            (KeyValues::Named(pairs), _) => write_arguments(f, pairs),
        }
    }
}
