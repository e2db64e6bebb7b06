//! Route pattern compilation.
//!
//! A pattern is a `/`-separated list of segments:
//!
//! | Segment         | First slot                    | Later slots                              |
//! |-----------------|-------------------------------|------------------------------------------|
//! | `$metadata`     | metadata (sole segment)       | rejected                                 |
//! | `$count` etc.   | rejected                      | terminal                                 |
//! | `{name}`        | rejected                      | key as segment, dynamic property         |
//! | `Name`          | entity set, singleton, import | navigation, property, operation, dynamic |
//! | `Ns.Name`       | rejected                      | cast, qualified operation                |
//! | `Name(args)`    | entity set + key, import call | navigation + key, operation call         |
//! | `Ns.Name(args)` | rejected                      | qualified operation call                 |
//!
//! Alternatives the [`Config`] turns off are never emitted.

use super::path_template::{Alternative, PathTemplate, TemplateSlot};
use super::segment::TerminalKind;
use super::template::key::top_level_eq;
use super::template::{
    CastTemplate, DynamicPropertyTemplate, EntitySetTemplate, KeySyntax, KeyTemplate, KeyValues,
    NavigationTemplate, OperationImportTemplate, OperationTemplate, PropertyTemplate,
    SegmentTemplate, SingletonTemplate, TemplateValue, TerminalTemplate,
};
use crate::config::Config;
use edmpath_common::types::{split_quoted, unquote};
use edmpath_common::utils::error::TemplateError;
use edmpath_common::utils::hash::FastHashMap;
use smallvec::{SmallVec, smallvec};

type NamedValues = SmallVec<[(String, TemplateValue); 2]>;

enum Args {
    Empty,
    Single(TemplateValue),
    Named(NamedValues),
}

impl Args {
    fn key_values(&self) -> Option<KeyValues> {
        match self {
            Self::Empty => None,
            Self::Single(value) => Some(KeyValues::Single(value.clone())),
            Self::Named(pairs) => Some(KeyValues::Named(pairs.clone())),
        }
    }

    fn call_arguments(&self) -> Option<NamedValues> {
        match self {
            Self::Empty => Some(SmallVec::new()),
            Self::Single(_) => None,
            Self::Named(pairs) => Some(pairs.clone()),
        }
    }
}

enum Token<'a> {
    Keyword(TerminalKind),
    Placeholder(TemplateValue),
    Literal(&'a str),
    Name { name: &'a str, args: Option<Args> },
}

/// Compiles `pattern` into a [`PathTemplate`].
///
/// # Errors
///
/// Returns a [`TemplateError`] naming the first malformed segment, or the
/// first segment no alternative applies to under `config`.
pub fn compile(pattern: &str, config: &Config) -> Result<PathTemplate, TemplateError> {
    let body = pattern.strip_prefix('/').unwrap_or(pattern);
    if body.trim().is_empty() {
        return Err(TemplateError::new(0, "empty pattern"));
    }
    let texts = split_quoted(body, '/');
    if texts.len() > config.max_segments {
        return Err(TemplateError::new(
            config.max_segments,
            format!(
                "pattern has {} segments, at most {} are allowed",
                texts.len(),
                config.max_segments
            ),
        ));
    }

    let mut compiler = Compiler {
        config,
        occurrences: FastHashMap::default(),
        total: texts.len(),
    };
    let slots = texts
        .iter()
        .enumerate()
        .map(|(index, text)| compiler.slot(index, text))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(PathTemplate::new(pattern, slots))
}

struct Compiler<'c> {
    config: &'c Config,
    occurrences: FastHashMap<String, usize>,
    total: usize,
}

impl Compiler<'_> {
    fn slot(&mut self, index: usize, text: &str) -> Result<TemplateSlot, TemplateError> {
        if text.is_empty() {
            return Err(TemplateError::new(index, "empty segment"));
        }
        let token = self.token(index, text)?;
        let alternatives = if index == 0 {
            self.first(index, token)?
        } else {
            self.later(index, token)?
        };
        if alternatives.is_empty() {
            return Err(TemplateError::new(
                index,
                format!("no template applies to `{text}` with the current options"),
            ));
        }
        Ok(TemplateSlot::new(alternatives))
    }

    fn first(&self, index: usize, token: Token<'_>) -> Result<Vec<Alternative>, TemplateError> {
        let config = self.config;
        match token {
            Token::Keyword(TerminalKind::Metadata) if self.total == 1 => Ok(vec![
                Alternative::single(SegmentTemplate::Terminal(TerminalTemplate::METADATA)),
            ]),
            Token::Keyword(kind) => Err(TemplateError::new(
                index,
                format!("`{kind}` cannot start a path"),
            )),
            Token::Placeholder(_) | Token::Literal(_) => Err(TemplateError::new(
                index,
                "a path must start with a named resource",
            )),
            Token::Name { name, .. } if name.contains('.') => Err(TemplateError::new(
                index,
                format!("qualified name `{name}` cannot start a path"),
            )),
            Token::Name { name, args: None } => Ok(vec![
                Alternative::single(SegmentTemplate::EntitySet(EntitySetTemplate::new(name))),
                Alternative::single(SegmentTemplate::Singleton(SingletonTemplate::new(name))),
                Alternative::single(SegmentTemplate::OperationImport(
                    OperationImportTemplate::new(name, None)
                        .with_bare_function(config.non_parenthesis_empty_function),
                )),
            ]),
            Token::Name {
                name,
                args: Some(args),
            } => {
                let mut alternatives = Vec::new();
                if let Some(values) = args.key_values().filter(|_| config.key_in_parenthesis) {
                    alternatives.push(Alternative::new([
                        SegmentTemplate::EntitySet(EntitySetTemplate::new(name)),
                        SegmentTemplate::Key(KeyTemplate::new(KeySyntax::Parenthesis, values)),
                    ]));
                }
                if let Some(arguments) = args.call_arguments() {
                    alternatives.push(Alternative::single(SegmentTemplate::OperationImport(
                        OperationImportTemplate::new(name, Some(arguments)),
                    )));
                }
                Ok(alternatives)
            }
        }
    }

    fn later(&self, index: usize, token: Token<'_>) -> Result<Vec<Alternative>, TemplateError> {
        let config = self.config;
        let mut alternatives = Vec::new();
        match token {
            Token::Keyword(TerminalKind::Metadata) => {
                return Err(TemplateError::new(
                    index,
                    "`$metadata` must be the only segment",
                ));
            }
            Token::Keyword(kind) => {
                let terminal = match kind {
                    TerminalKind::Count => TerminalTemplate::COUNT,
                    TerminalKind::Value => TerminalTemplate::VALUE,
                    _ => TerminalTemplate::REF,
                };
                alternatives.push(Alternative::single(SegmentTemplate::Terminal(terminal)));
            }
            Token::Placeholder(value) => {
                if config.key_as_segment {
                    alternatives.push(Alternative::single(SegmentTemplate::Key(
                        KeyTemplate::new(KeySyntax::Segment, KeyValues::Single(value.clone())),
                    )));
                }
                alternatives.push(Alternative::single(SegmentTemplate::DynamicProperty(
                    DynamicPropertyTemplate::new(value),
                )));
            }
            Token::Literal(text) => {
                if config.key_as_segment {
                    alternatives.push(Alternative::single(SegmentTemplate::Key(
                        KeyTemplate::new(
                            KeySyntax::Segment,
                            KeyValues::Single(TemplateValue::Literal(text.to_string())),
                        ),
                    )));
                }
            }
            Token::Name { name, args: None } => {
                let qualified = name.contains('.');
                if qualified {
                    alternatives.push(Alternative::single(SegmentTemplate::Cast(
                        CastTemplate::new(name),
                    )));
                } else {
                    alternatives.push(Alternative::single(SegmentTemplate::Navigation(
                        NavigationTemplate::new(name),
                    )));
                    alternatives.push(Alternative::single(SegmentTemplate::Property(
                        PropertyTemplate::new(name),
                    )));
                    alternatives.push(Alternative::single(SegmentTemplate::DynamicProperty(
                        DynamicPropertyTemplate::new(TemplateValue::Literal(name.to_string())),
                    )));
                }
                if self.calls_allowed(qualified) {
                    alternatives.push(Alternative::single(SegmentTemplate::Operation(
                        OperationTemplate::new(name, None)
                            .with_bare_function(config.non_parenthesis_empty_function),
                    )));
                }
            }
            Token::Name {
                name,
                args: Some(args),
            } => {
                let qualified = name.contains('.');
                if !qualified && config.key_in_parenthesis {
                    if let Some(values) = args.key_values() {
                        alternatives.push(Alternative::new([
                            SegmentTemplate::Navigation(NavigationTemplate::new(name)),
                            SegmentTemplate::Key(KeyTemplate::new(KeySyntax::Parenthesis, values)),
                        ]));
                    }
                }
                if let Some(arguments) =
                    args.call_arguments().filter(|_| self.calls_allowed(qualified))
                {
                    alternatives.push(Alternative::single(SegmentTemplate::Operation(
                        OperationTemplate::new(name, Some(arguments)),
                    )));
                }
            }
        }
        Ok(alternatives)
    }

    fn calls_allowed(&self, qualified: bool) -> bool {
        if qualified {
            self.config.qualified_operation_calls
        } else {
            self.config.unqualified_operation_calls
        }
    }

    fn token<'a>(&mut self, index: usize, text: &'a str) -> Result<Token<'a>, TemplateError> {
        if let Some(keyword) = text.strip_prefix('$') {
            return self.keyword(keyword).map(Token::Keyword).ok_or_else(|| {
                TemplateError::new(index, format!("unknown keyword `{text}`"))
            });
        }
        if text.starts_with('{') {
            return self.placeholder(index, text).map(Token::Placeholder);
        }
        if !text.starts_with(|c: char| c.is_alphabetic() || c == '_') {
            if text.starts_with('\'') && unquote(text).is_none() {
                return Err(TemplateError::new(index, "unterminated string literal"));
            }
            return Ok(Token::Literal(text));
        }

        let (name, inner) = split_call(text)
            .ok_or_else(|| {
                TemplateError::new(index, format!("unbalanced parentheses in `{text}`"))
            })?;
        if !is_name(name) {
            return Err(TemplateError::new(index, format!("`{name}` is not a valid name")));
        }
        let args = inner.map(|inner| self.args(index, inner)).transpose()?;
        Ok(Token::Name { name, args })
    }

    fn keyword(&self, keyword: &str) -> Option<TerminalKind> {
        [
            TerminalKind::Metadata,
            TerminalKind::Count,
            TerminalKind::Value,
            TerminalKind::Ref,
        ]
        .into_iter()
        .find(|kind| {
            let expected = &kind.as_str()[1..];
            if self.config.case_insensitive {
                expected.eq_ignore_ascii_case(keyword)
            } else {
                expected == keyword
            }
        })
    }

    fn placeholder(&mut self, index: usize, text: &str) -> Result<TemplateValue, TemplateError> {
        let name = text
            .strip_prefix('{')
            .and_then(|rest| rest.strip_suffix('}'))
            .map(str::trim)
            .filter(|name| is_identifier(name))
            .ok_or_else(|| TemplateError::new(index, format!("malformed placeholder `{text}`")))?;
        let count = self.occurrences.entry(name.to_string()).or_insert(0);
        let occurrence = *count;
        *count += 1;
        Ok(TemplateValue::Placeholder {
            name: name.to_string(),
            occurrence,
        })
    }

    fn value(&mut self, index: usize, text: &str) -> Result<TemplateValue, TemplateError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(TemplateError::new(index, "empty argument value"));
        }
        if text.starts_with('{') {
            return self.placeholder(index, text);
        }
        if text.starts_with('\'') && unquote(text).is_none() {
            return Err(TemplateError::new(index, "unterminated string literal"));
        }
        Ok(TemplateValue::Literal(text.to_string()))
    }

    fn args(&mut self, index: usize, inner: &str) -> Result<Args, TemplateError> {
        let inner = inner.trim();
        if inner.is_empty() {
            return Ok(Args::Empty);
        }
        let pieces = split_quoted(inner, ',');
        if pieces.iter().all(|piece| top_level_eq(piece).is_none()) {
            return match pieces.as_slice() {
                [single] => Ok(Args::Single(self.value(index, single)?)),
                _ => Err(TemplateError::new(
                    index,
                    "several unnamed values; name each one",
                )),
            };
        }

        let mut pairs: NamedValues = smallvec![];
        for piece in pieces {
            let eq = top_level_eq(piece).ok_or_else(|| {
                TemplateError::new(index, "named and unnamed values cannot be mixed")
            })?;
            let name = piece[..eq].trim();
            if !is_identifier(name) {
                return Err(TemplateError::new(
                    index,
                    format!("`{name}` is not a valid argument name"),
                ));
            }
            let value = self.value(index, &piece[eq + 1..])?;
            pairs.push((name.to_string(), value));
        }
        Ok(Args::Named(pairs))
    }
}

/// Splits `Name(args)` into the name and the text between the parentheses.
///
/// The first `(` must close at the very end of the segment.
fn split_call(text: &str) -> Option<(&str, Option<&str>)> {
    let Some(open) = text.find('(') else {
        return (!text.contains(')')).then_some((text, None));
    };
    let inner = text[open + 1..].strip_suffix(')')?;
    let mut depth = 0usize;
    let mut in_quotes = false;
    for c in inner.chars() {
        match c {
            '\'' => in_quotes = !in_quotes,
            '(' if !in_quotes => depth += 1,
            ')' if !in_quotes => depth = depth.checked_sub(1)?,
            _ => {}
        }
    }
    (depth == 0 && !in_quotes).then_some((text[..open].trim_end(), Some(inner)))
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}

fn is_name(text: &str) -> bool {
    text.split('.').all(is_identifier)
}
