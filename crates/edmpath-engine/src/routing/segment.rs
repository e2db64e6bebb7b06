//! Resulting path segments.

use edmpath_common::types::Value;
use edmpath_core::edm::{EntitySetId, NavigationSourceRef, SingletonId};
use edmpath_core::{OperationId, OperationImportId, OperationKind, TypeId, TypeRef};
use smallvec::SmallVec;
use std::fmt;

/// A segment after which nothing may follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TerminalKind {
    /// `$metadata`
    Metadata,
    /// `$count`
    Count,
    /// `$value`
    Value,
    /// `$ref`
    Ref,
    /// An action, or a function that is not composable.
    Operation,
}

impl TerminalKind {
    /// Returns the URL keyword, or `operation` for operation calls.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Metadata => "$metadata",
            Self::Count => "$count",
            Self::Value => "$value",
            Self::Ref => "$ref",
            Self::Operation => "operation",
        }
    }
}

impl fmt::Display for TerminalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An operation argument.
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterValue {
    /// A literal parsed to the parameter type (`Value::Null` for `null`).
    Literal(Value),
    /// A parameter alias, e.g. `@p`, resolved later from the query string.
    Alias(String),
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => write!(f, "{value}"),
            Self::Alias(name) => f.write_str(name),
        }
    }
}

/// What a path segment addresses.
#[derive(Debug, Clone, PartialEq)]
pub enum SegmentKind {
    /// `$metadata`
    Metadata,
    /// An entity set.
    EntitySet {
        /// Set id.
        id: EntitySetId,
        /// Set name.
        name: String,
    },
    /// A singleton.
    Singleton {
        /// Singleton id.
        id: SingletonId,
        /// Singleton name.
        name: String,
    },
    /// Key values selecting one entity, in key declaration order.
    Key {
        /// Key property names with their parsed values.
        values: SmallVec<[(String, Value); 2]>,
    },
    /// A cast to a derived type.
    TypeCast {
        /// Target type.
        id: TypeId,
        /// Qualified target type name.
        name: String,
    },
    /// A navigation property.
    Navigation {
        /// Type declaring the property.
        declaring_type: TypeId,
        /// Property name.
        name: String,
    },
    /// A declared structural property.
    Property {
        /// Property name.
        name: String,
    },
    /// A property of an open type that the schema does not declare.
    DynamicProperty {
        /// Property name.
        name: String,
    },
    /// `$count`
    Count,
    /// `$value`
    Value,
    /// `$ref`
    Ref,
    /// A bound function or action.
    Operation {
        /// Selected overload.
        id: OperationId,
        /// Qualified operation name.
        name: String,
        /// Function or action.
        kind: OperationKind,
        /// Supplied arguments.
        parameters: Vec<(String, ParameterValue)>,
    },
    /// A function or action import.
    OperationImport {
        /// Selected import.
        id: OperationImportId,
        /// Import name.
        name: String,
        /// Function or action.
        kind: OperationKind,
        /// Supplied arguments.
        parameters: Vec<(String, ParameterValue)>,
    },
    /// A segment produced by an [`ExtensionTemplate`](super::ExtensionTemplate).
    Extension {
        /// The segment text.
        text: String,
    },
}

impl SegmentKind {
    /// Returns a short label for this kind, e.g. `"Navigation"`.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Metadata => "Metadata",
            Self::EntitySet { .. } => "EntitySet",
            Self::Singleton { .. } => "Singleton",
            Self::Key { .. } => "Key",
            Self::TypeCast { .. } => "TypeCast",
            Self::Navigation { .. } => "Navigation",
            Self::Property { .. } => "Property",
            Self::DynamicProperty { .. } => "DynamicProperty",
            Self::Count => "Count",
            Self::Value => "Value",
            Self::Ref => "Ref",
            Self::Operation { .. } => "Operation",
            Self::OperationImport { .. } => "OperationImport",
            Self::Extension { .. } => "Extension",
        }
    }
}

/// One semantic segment of a translated path.
#[derive(Debug, Clone, PartialEq)]
pub struct PathSegment {
    kind: SegmentKind,
    edm_type: Option<TypeRef>,
    navigation_source: Option<NavigationSourceRef>,
}

impl PathSegment {
    /// Creates a segment.
    #[must_use]
    pub fn new(
        kind: SegmentKind,
        edm_type: Option<TypeRef>,
        navigation_source: Option<NavigationSourceRef>,
    ) -> Self {
        Self {
            kind,
            edm_type,
            navigation_source,
        }
    }

    /// Returns what this segment addresses.
    #[must_use]
    pub fn kind(&self) -> &SegmentKind {
        &self.kind
    }

    /// Returns the type this segment yields.
    #[must_use]
    pub fn edm_type(&self) -> Option<&TypeRef> {
        self.edm_type.as_ref()
    }

    /// Returns the navigation source this segment yields.
    #[must_use]
    pub fn navigation_source(&self) -> Option<NavigationSourceRef> {
        self.navigation_source
    }

    fn is_key(&self) -> bool {
        matches!(self.kind, SegmentKind::Key { .. })
    }
}

/// Writes `(a=v,b=w)` argument lists.
pub(crate) fn write_arguments<V: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    args: &[(String, V)],
) -> fmt::Result {
    f.write_str("(")?;
    for (i, (name, value)) in args.iter().enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        write!(f, "{name}={value}")?;
    }
    f.write_str(")")
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            SegmentKind::Metadata => f.write_str("$metadata"),
            SegmentKind::Count => f.write_str("$count"),
            SegmentKind::Value => f.write_str("$value"),
            SegmentKind::Ref => f.write_str("$ref"),
            SegmentKind::EntitySet { name, .. }
            | SegmentKind::Singleton { name, .. }
            | SegmentKind::TypeCast { name, .. }
            | SegmentKind::Navigation { name, .. }
            | SegmentKind::Property { name }
            | SegmentKind::DynamicProperty { name } => f.write_str(name),
            SegmentKind::Key { values } => match values.as_slice() {
                [(_, value)] => write!(f, "({value})"),
                values => write_arguments(f, values),
            },
            SegmentKind::Operation {
                name,
                kind,
                parameters,
                ..
            }
            | SegmentKind::OperationImport {
                name,
                kind,
                parameters,
                ..
            } => {
                f.write_str(name)?;
                if *kind == OperationKind::Function {
                    write_arguments(f, parameters)?;
                }
                Ok(())
            }
            SegmentKind::Extension { text } => f.write_str(text),
        }
    }
}

/// A fully translated path.
#[derive(Debug, Clone, PartialEq)]
pub struct ODataPath {
    segments: Vec<PathSegment>,
    navigation_source: Option<NavigationSourceRef>,
    edm_type: Option<TypeRef>,
    terminal: Option<TerminalKind>,
}

impl ODataPath {
    pub(crate) fn new(
        segments: Vec<PathSegment>,
        navigation_source: Option<NavigationSourceRef>,
        edm_type: Option<TypeRef>,
        terminal: Option<TerminalKind>,
    ) -> Self {
        Self {
            segments,
            navigation_source,
            edm_type,
            terminal,
        }
    }

    /// Returns the segments in order.
    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Iterates over the segments.
    pub fn iter(&self) -> std::slice::Iter<'_, PathSegment> {
        self.segments.iter()
    }

    /// Returns the number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns true if the path has no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns the last segment.
    #[must_use]
    pub fn last(&self) -> Option<&PathSegment> {
        self.segments.last()
    }

    /// Returns the navigation source the path ends in.
    #[must_use]
    pub fn navigation_source(&self) -> Option<NavigationSourceRef> {
        self.navigation_source
    }

    /// Returns the type the path ends in.
    #[must_use]
    pub fn edm_type(&self) -> Option<&TypeRef> {
        self.edm_type.as_ref()
    }

    /// Returns the terminal kind the path ends in, if any.
    #[must_use]
    pub fn terminal(&self) -> Option<TerminalKind> {
        self.terminal
    }
}

impl<'a> IntoIterator for &'a ODataPath {
    type Item = &'a PathSegment;
    type IntoIter = std::slice::Iter<'a, PathSegment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

impl fmt::Display for ODataPath {
    /// Renders the canonical URL path: keys in parentheses, attached to the
    /// segment they select from.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 && !segment.is_key() {
                f.write_str("/")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}
