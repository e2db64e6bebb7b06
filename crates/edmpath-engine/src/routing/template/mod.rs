//! Segment templates.
//!
//! A [`SegmentTemplate`] is one way of explaining a URL segment. Every
//! variant answers two questions: whether the captured route values are
//! enough to try it ([`SegmentTemplate::matches`]), and what the segment
//! means given the walk so far ([`SegmentTemplate::translate`]).
//!
//! ## Variants
//!
//! - [`source`] - Entity sets and singletons, the roots of a path
//! - [`key`] - Key values, in parentheses or as their own segment
//! - [`cast`] - Casts to a derived type
//! - [`navigation`] - Navigation and structural properties
//! - [`dynamic`] - Properties of open types the schema does not declare
//! - [`operation`] - Bound operations and operation imports, with overload resolution
//! - [`terminal`] - `$metadata`, `$count`, `$value`, and `$ref`

pub mod cast;
pub mod dynamic;
pub mod key;
pub mod navigation;
pub mod operation;
pub mod source;
pub mod terminal;

pub use cast::CastTemplate;
pub use dynamic::DynamicPropertyTemplate;
pub use key::{KeySyntax, KeyTemplate, KeyValues};
pub use navigation::{NavigationTemplate, PropertyTemplate};
pub use operation::{OperationImportTemplate, OperationTemplate};
pub use source::{EntitySetTemplate, SingletonTemplate};
pub use terminal::TerminalTemplate;

use super::context::{RouteValues, TranslateContext};
use super::segment::{PathSegment, TerminalKind};
use edmpath_common::utils::error::TranslateError;
use std::fmt;
use std::sync::Arc;

/// A value in a template: literal text from the pattern, or a placeholder
/// filled from the route values.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TemplateValue {
    /// Literal text, e.g. `1` in `Customers(1)`.
    Literal(String),
    /// A placeholder, e.g. `{key}`.
    Placeholder {
        /// Route value name.
        name: String,
        /// How many earlier occurrences of the same name the pattern has.
        occurrence: usize,
    },
}

impl TemplateValue {
    /// Returns the text this value stands for in a request.
    #[must_use]
    pub fn resolve<'a>(&'a self, values: &'a RouteValues) -> Option<&'a str> {
        match self {
            Self::Literal(text) => Some(text),
            Self::Placeholder { name, occurrence } => values.get(name, *occurrence),
        }
    }

    /// Returns true if the value can be resolved.
    #[must_use]
    pub fn is_bound(&self, values: &RouteValues) -> bool {
        self.resolve(values).is_some()
    }
}

impl fmt::Display for TemplateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(text) => f.write_str(text),
            Self::Placeholder { name, .. } => write!(f, "{{{name}}}"),
        }
    }
}

/// A host-supplied segment kind the engine does not know about.
///
/// Extensions rank below every built-in template, so they only see segments
/// nothing else could explain.
pub trait ExtensionTemplate: Send + Sync + fmt::Debug {
    /// Returns the canonical text of the template, used for ordering and display.
    fn text(&self) -> String;

    /// Returns true if the route values are enough to try this template.
    fn matches(&self, values: &RouteValues) -> bool {
        let _ = values;
        true
    }

    /// Translates the segment, advancing the context on success.
    ///
    /// # Errors
    ///
    /// Returns a [`TranslateError`] when the segment does not apply.
    fn translate(&self, ctx: &mut TranslateContext<'_>) -> Result<PathSegment, TranslateError>;
}

/// One candidate explanation of a URL segment.
#[derive(Debug, Clone)]
pub enum SegmentTemplate {
    /// An entity set.
    EntitySet(EntitySetTemplate),
    /// A singleton.
    Singleton(SingletonTemplate),
    /// Key values.
    Key(KeyTemplate),
    /// A cast to a derived type.
    Cast(CastTemplate),
    /// A navigation property.
    Navigation(NavigationTemplate),
    /// A declared structural property.
    Property(PropertyTemplate),
    /// A dynamic property of an open type.
    DynamicProperty(DynamicPropertyTemplate),
    /// A bound function or action.
    Operation(OperationTemplate),
    /// A function or action import.
    OperationImport(OperationImportTemplate),
    /// `$metadata`, `$count`, `$value`, or `$ref`.
    Terminal(TerminalTemplate),
    /// A host-supplied segment kind.
    Extension(Arc<dyn ExtensionTemplate>),
}

impl SegmentTemplate {
    /// Returns the precedence rank; lower ranks are tried first.
    #[must_use]
    pub fn rank(&self) -> u8 {
        match self {
            Self::Terminal(t) if t.kind() == TerminalKind::Metadata => 0,
            Self::EntitySet(_) => 1,
            Self::Singleton(_) => 2,
            Self::Key(_) => 3,
            Self::Cast(_) => 4,
            Self::Navigation(_) => 5,
            Self::Property(_) => 6,
            Self::Operation(_) | Self::OperationImport(_) => 7,
            Self::Terminal(_) => 8,
            Self::DynamicProperty(_) => 9,
            Self::Extension(_) => 10,
        }
    }

    /// Returns a short name for the template kind.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::EntitySet(_) => "entity set",
            Self::Singleton(_) => "singleton",
            Self::Key(_) => "key",
            Self::Cast(_) => "cast",
            Self::Navigation(_) => "navigation",
            Self::Property(_) => "property",
            Self::DynamicProperty(_) => "dynamic property",
            Self::Operation(_) => "operation",
            Self::OperationImport(_) => "operation import",
            Self::Terminal(_) => "terminal",
            Self::Extension(_) => "extension",
        }
    }

    /// Returns true if the route values are enough to try this template.
    #[must_use]
    pub fn matches(&self, values: &RouteValues) -> bool {
        match self {
            Self::Key(t) => t.matches(values),
            Self::DynamicProperty(t) => t.matches(values),
            Self::Operation(t) => t.matches(values),
            Self::OperationImport(t) => t.matches(values),
            Self::Extension(t) => t.matches(values),
            Self::EntitySet(_)
            | Self::Singleton(_)
            | Self::Cast(_)
            | Self::Navigation(_)
            | Self::Property(_)
            | Self::Terminal(_) => true,
        }
    }

    /// Translates the segment against the walk so far.
    ///
    /// On success the context has advanced past the segment. On failure the
    /// context may be partially updated; the caller restores its snapshot.
    ///
    /// # Errors
    ///
    /// Returns a [`TranslateError`] describing why this template does not
    /// explain the segment.
    pub fn translate(&self, ctx: &mut TranslateContext<'_>) -> Result<PathSegment, TranslateError> {
        match self {
            Self::EntitySet(t) => t.translate(ctx),
            Self::Singleton(t) => t.translate(ctx),
            Self::Key(t) => t.translate(ctx),
            Self::Cast(t) => t.translate(ctx),
            Self::Navigation(t) => t.translate(ctx),
            Self::Property(t) => t.translate(ctx),
            Self::DynamicProperty(t) => t.translate(ctx),
            Self::Operation(t) => t.translate(ctx),
            Self::OperationImport(t) => t.translate(ctx),
            Self::Terminal(t) => t.translate(ctx),
            Self::Extension(t) => t.translate(ctx),
        }
    }
}

impl fmt::Display for SegmentTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EntitySet(t) => write!(f, "{t}"),
            Self::Singleton(t) => write!(f, "{t}"),
            Self::Key(t) => write!(f, "{t}"),
            Self::Cast(t) => write!(f, "{t}"),
            Self::Navigation(t) => write!(f, "{t}"),
            Self::Property(t) => write!(f, "{t}"),
            Self::DynamicProperty(t) => write!(f, "{t}"),
            Self::Operation(t) => write!(f, "{t}"),
            Self::OperationImport(t) => write!(f, "{t}"),
            Self::Terminal(t) => write!(f, "{t}"),
            Self::Extension(t) => f.write_str(&t.text()),
        }
    }
}
