//! Type definitions of the schema graph.

use edmpath_common::types::PrimitiveKind;
use indexmap::IndexMap;
use serde::Serialize;
use smallvec::SmallVec;

/// Identifies a named (structured or enum) type within one model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub(crate) u32);

impl TypeId {
    /// Returns the position of this type in the model's type table.
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A reference to a type as used by properties, parameters, and path
/// segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    /// A primitive type.
    Primitive(PrimitiveKind),
    /// An entity type.
    Entity(TypeId),
    /// A complex type.
    Complex(TypeId),
    /// An enum type.
    Enum(TypeId),
    /// No declared type (dynamic properties of open types).
    Untyped,
    /// A collection of the inner type.
    Collection(Box<TypeRef>),
}

impl TypeRef {
    /// Wraps `element` in a collection.
    #[must_use]
    pub fn collection(element: TypeRef) -> Self {
        Self::Collection(Box::new(element))
    }

    /// Returns true for collection types.
    #[must_use]
    pub fn is_collection(&self) -> bool {
        matches!(self, Self::Collection(_))
    }

    /// Returns the element type of a collection, or `self` for single values.
    #[must_use]
    pub fn element(&self) -> &TypeRef {
        match self {
            Self::Collection(inner) => inner,
            other => other,
        }
    }

    /// Returns the structured type id of a (collection of) entity or complex type.
    #[must_use]
    pub fn structured_id(&self) -> Option<TypeId> {
        match self.element() {
            Self::Entity(id) | Self::Complex(id) => Some(*id),
            _ => None,
        }
    }

    /// Returns the entity type id of a (collection of) entity type.
    #[must_use]
    pub fn entity_id(&self) -> Option<TypeId> {
        match self.element() {
            Self::Entity(id) => Some(*id),
            _ => None,
        }
    }

    /// Returns true for a single entity.
    #[must_use]
    pub fn is_single_entity(&self) -> bool {
        matches!(self, Self::Entity(_))
    }

    /// Returns true for a single primitive, enum, or untyped value.
    #[must_use]
    pub fn is_single_scalar(&self) -> bool {
        matches!(self, Self::Primitive(_) | Self::Enum(_) | Self::Untyped)
    }

    /// Rebuilds a reference of the same shape around another named type.
    ///
    /// Used by type casts, which keep collection-ness and structured kind.
    #[must_use]
    pub fn with_structured(&self, id: TypeId) -> TypeRef {
        match self {
            Self::Collection(inner) => Self::collection(inner.with_structured(id)),
            Self::Complex(_) => Self::Complex(id),
            _ => Self::Entity(id),
        }
    }
}

impl From<PrimitiveKind> for TypeRef {
    fn from(kind: PrimitiveKind) -> Self {
        Self::Primitive(kind)
    }
}

/// A schema type: structured or enum.
#[derive(Debug, Clone)]
pub enum SchemaType {
    /// Entity or complex type.
    Structured(StructuredType),
    /// Enum type.
    Enum(EnumType),
}

impl SchemaType {
    /// Returns the namespace-qualified name.
    #[must_use]
    pub fn qualified_name(&self) -> &str {
        match self {
            Self::Structured(t) => &t.qualified_name,
            Self::Enum(t) => &t.qualified_name,
        }
    }

    /// Returns the structured type, if this is one.
    #[must_use]
    pub fn as_structured(&self) -> Option<&StructuredType> {
        match self {
            Self::Structured(t) => Some(t),
            Self::Enum(_) => None,
        }
    }

    /// Returns the enum type, if this is one.
    #[must_use]
    pub fn as_enum(&self) -> Option<&EnumType> {
        match self {
            Self::Enum(t) => Some(t),
            Self::Structured(_) => None,
        }
    }
}

/// Whether a structured type is an entity or a complex type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StructuredKind {
    /// Has identity and (on the root of its hierarchy) a key.
    Entity,
    /// Value without identity.
    Complex,
}

/// An entity or complex type.
#[derive(Debug, Clone)]
pub struct StructuredType {
    /// Unqualified name.
    pub name: String,
    /// Namespace-qualified name.
    pub qualified_name: String,
    /// Entity or complex.
    pub kind: StructuredKind,
    /// Direct base type.
    pub base: Option<TypeId>,
    /// Abstract types have no instances of their own.
    pub is_abstract: bool,
    /// Open types accept undeclared (dynamic) properties.
    pub is_open: bool,
    /// Media entity types expose a stream through `$value`.
    pub has_stream: bool,
    /// Declared structural properties, in declaration order.
    pub properties: IndexMap<String, Property>,
    /// Declared navigation properties, in declaration order.
    pub navigation_properties: IndexMap<String, NavigationProperty>,
    /// Declared key property names; only set on the root of an entity hierarchy.
    pub key: SmallVec<[String; 2]>,
}

/// A structural property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    /// Property name.
    pub name: String,
    /// Declared type.
    pub type_ref: TypeRef,
    /// Whether the property accepts null.
    pub nullable: bool,
}

/// Number of entities on the far end of a navigation property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Multiplicity {
    /// `0..1`
    ZeroOrOne,
    /// `1`
    One,
    /// `*`
    Many,
}

/// A directed edge from a structured type to an entity type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationProperty {
    /// Property name.
    pub name: String,
    /// Target entity type.
    pub target: TypeId,
    /// Target multiplicity.
    pub multiplicity: Multiplicity,
}

impl NavigationProperty {
    /// Returns the type reached through this navigation.
    #[must_use]
    pub fn target_type(&self) -> TypeRef {
        match self.multiplicity {
            Multiplicity::Many => TypeRef::collection(TypeRef::Entity(self.target)),
            Multiplicity::ZeroOrOne | Multiplicity::One => TypeRef::Entity(self.target),
        }
    }
}

/// An enum type.
#[derive(Debug, Clone)]
pub struct EnumType {
    /// Unqualified name.
    pub name: String,
    /// Namespace-qualified name.
    pub qualified_name: String,
    /// Flags enums allow comma separated member combinations.
    pub is_flags: bool,
    /// Members in declaration order.
    pub members: Vec<EnumMember>,
}

impl EnumType {
    /// Finds a member by name.
    #[must_use]
    pub fn member(&self, name: &str, ignore_case: bool) -> Option<&EnumMember> {
        self.members.iter().find(|m| {
            if ignore_case {
                m.name.eq_ignore_ascii_case(name)
            } else {
                m.name == name
            }
        })
    }

    /// Finds a member by its integral value.
    #[must_use]
    pub fn member_by_value(&self, value: i64) -> Option<&EnumMember> {
        self.members.iter().find(|m| m.value == value)
    }
}

/// A named enum member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumMember {
    /// Member name.
    pub name: String,
    /// Underlying value.
    pub value: i64,
}
