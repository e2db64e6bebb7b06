//! Error types for edmpath.
//!
//! [`Error`] is the workspace-wide error. Path translation failures are
//! reported as [`TranslateError`], which carries a stable
//! [`TranslateErrorKind`] and the zero-based index of the offending template
//! slot so the HTTP layer can map it to a response without the engine knowing
//! about status codes.

use std::fmt;
use thiserror::Error;

/// Result type alias using the edmpath [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A path could not be translated against the model.
    #[error(transparent)]
    Translate(#[from] TranslateError),

    /// A route pattern could not be compiled.
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// A literal did not parse to its declared type.
    #[error(transparent)]
    Literal(#[from] LiteralError),

    /// The schema graph is inconsistent.
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// The stable error kinds of path translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TranslateErrorKind {
    /// Key arity or value type mismatch in a key segment.
    KeyParse,
    /// Cast target is unknown or not derived from the current type.
    InvalidCast,
    /// No navigation property (or navigation root) with the given name.
    UnknownNavigation,
    /// No bound or unbound operation compatible with the call.
    UnknownOperation,
    /// More than one operation overload is equally specific.
    AmbiguousOperation,
    /// No declared property with the given name, or a dynamic property on a closed type.
    UnknownProperty,
    /// `$count`, `$value`, `$ref` or `$metadata` used where the context forbids it,
    /// or any segment following a terminal one.
    UnsupportedTerminal,
    /// No candidate template recognized the segment.
    NoTemplateMatched,
}

impl TranslateErrorKind {
    /// Returns a stable identifier for this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::KeyParse => "KeyParseError",
            Self::InvalidCast => "InvalidCastError",
            Self::UnknownNavigation => "UnknownNavigationError",
            Self::UnknownOperation => "UnknownOperationError",
            Self::AmbiguousOperation => "AmbiguousOperationError",
            Self::UnknownProperty => "UnknownPropertyError",
            Self::UnsupportedTerminal => "UnsupportedTerminalError",
            Self::NoTemplateMatched => "NoTemplateMatchedError",
        }
    }

    /// Returns true when the request names a resource the model does not have,
    /// as opposed to a malformed key, parameter, or segment combination.
    #[must_use]
    pub const fn is_not_found(self) -> bool {
        matches!(
            self,
            Self::UnknownNavigation
                | Self::UnknownOperation
                | Self::UnknownProperty
                | Self::NoTemplateMatched
        )
    }
}

impl fmt::Display for TranslateErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How much a failed candidate tells about the request.
///
/// When every candidate at a slot fails, the engine reports the error with the
/// highest specificity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Specificity {
    /// The candidate did not recognize the segment at all.
    NoMatch,
    /// The name did not resolve in the schema graph.
    UnknownName,
    /// The name resolved but its use is invalid here.
    Invalid,
}

/// A path translation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslateError {
    kind: TranslateErrorKind,
    segment: usize,
    message: String,
    specificity: Specificity,
}

impl TranslateError {
    /// Creates an error of the given kind at slot 0.
    ///
    /// Specificity defaults from the kind: `NoTemplateMatched` is
    /// [`Specificity::NoMatch`], the `Unknown*` kinds are
    /// [`Specificity::UnknownName`], everything else is [`Specificity::Invalid`].
    pub fn new(kind: TranslateErrorKind, message: impl Into<String>) -> Self {
        let specificity = match kind {
            TranslateErrorKind::NoTemplateMatched => Specificity::NoMatch,
            TranslateErrorKind::UnknownNavigation
            | TranslateErrorKind::UnknownOperation
            | TranslateErrorKind::UnknownProperty => Specificity::UnknownName,
            _ => Specificity::Invalid,
        };
        Self {
            kind,
            segment: 0,
            message: message.into(),
            specificity,
        }
    }

    /// Creates a `KeyParseError`.
    pub fn key_parse(message: impl Into<String>) -> Self {
        Self::new(TranslateErrorKind::KeyParse, message)
    }

    /// Creates an `InvalidCastError`.
    pub fn invalid_cast(message: impl Into<String>) -> Self {
        Self::new(TranslateErrorKind::InvalidCast, message)
    }

    /// Creates an `UnknownNavigationError`.
    pub fn unknown_navigation(message: impl Into<String>) -> Self {
        Self::new(TranslateErrorKind::UnknownNavigation, message)
    }

    /// Creates an `UnknownOperationError`.
    pub fn unknown_operation(message: impl Into<String>) -> Self {
        Self::new(TranslateErrorKind::UnknownOperation, message)
    }

    /// Creates an `AmbiguousOperationError`.
    pub fn ambiguous_operation(message: impl Into<String>) -> Self {
        Self::new(TranslateErrorKind::AmbiguousOperation, message)
    }

    /// Creates an `UnknownPropertyError`.
    pub fn unknown_property(message: impl Into<String>) -> Self {
        Self::new(TranslateErrorKind::UnknownProperty, message)
    }

    /// Creates an `UnsupportedTerminalError`.
    pub fn unsupported_terminal(message: impl Into<String>) -> Self {
        Self::new(TranslateErrorKind::UnsupportedTerminal, message)
    }

    /// Creates a `NoTemplateMatchedError`.
    pub fn no_template_matched(message: impl Into<String>) -> Self {
        Self::new(TranslateErrorKind::NoTemplateMatched, message)
    }

    /// Sets the slot index this error refers to.
    #[must_use]
    pub fn at(mut self, segment: usize) -> Self {
        self.segment = segment;
        self
    }

    /// Overrides the specificity derived from the kind.
    #[must_use]
    pub fn with_specificity(mut self, specificity: Specificity) -> Self {
        self.specificity = specificity;
        self
    }

    /// Returns the error kind.
    #[must_use]
    pub fn kind(&self) -> TranslateErrorKind {
        self.kind
    }

    /// Returns the zero-based index of the offending template slot.
    #[must_use]
    pub fn segment_index(&self) -> usize {
        self.segment
    }

    /// Returns the human readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns how specific this failure is.
    #[must_use]
    pub fn specificity(&self) -> Specificity {
        self.specificity
    }
}

impl fmt::Display for TranslateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at segment {}: {}", self.kind, self.segment, self.message)
    }
}

impl std::error::Error for TranslateError {}

/// A route pattern that could not be compiled.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid route pattern at segment {segment}: {message}")]
pub struct TemplateError {
    /// Zero-based index of the offending pattern segment.
    pub segment: usize,
    /// What went wrong.
    pub message: String,
}

impl TemplateError {
    /// Creates a new template error.
    pub fn new(segment: usize, message: impl Into<String>) -> Self {
        Self {
            segment,
            message: message.into(),
        }
    }
}

/// A literal that does not parse to its declared type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LiteralError {
    /// The text is not a valid literal of the expected type.
    #[error("`{raw}` is not a valid {expected} literal")]
    Malformed {
        /// Expected type name.
        expected: String,
        /// The offending text.
        raw: String,
    },
    /// The literal names a type that differs from the expected one.
    #[error("literal of type {found} where {expected} is expected")]
    TypeMismatch {
        /// Expected type name.
        expected: String,
        /// Type named by the literal.
        found: String,
    },
    /// An enum literal names a member the enum does not declare.
    #[error("{type_name} has no member `{member}`")]
    UnknownMember {
        /// Qualified enum type name.
        type_name: String,
        /// The offending member.
        member: String,
    },
}

impl LiteralError {
    /// Creates a `Malformed` error.
    pub fn malformed(expected: impl Into<String>, raw: impl Into<String>) -> Self {
        Self::Malformed {
            expected: expected.into(),
            raw: raw.into(),
        }
    }
}

/// Inconsistencies found while assembling a schema graph.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// Two schema elements share a name.
    #[error("duplicate {element} `{name}`")]
    Duplicate {
        /// Element kind, e.g. "entity set".
        element: &'static str,
        /// The duplicated name.
        name: String,
    },
    /// A reference names an element that does not exist.
    #[error("unknown {element} `{name}`")]
    Unknown {
        /// Element kind, e.g. "base type".
        element: &'static str,
        /// The unresolved name.
        name: String,
    },
    /// A structural rule is violated.
    #[error("{0}")]
    Invalid(String),
}
