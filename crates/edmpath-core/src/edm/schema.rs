//! The read-only schema graph interface.

use super::container::{EntitySet, EntitySetId, NavigationSourceRef, Singleton, SingletonId};
use super::operation::{Operation, OperationId, OperationImport, OperationImportId};
use super::types::{NavigationProperty, Property, SchemaType, StructuredType, TypeId, TypeRef};

/// How names are compared during lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NameLookup {
    /// Names must match exactly.
    #[default]
    Exact,
    /// Names match ignoring ASCII case.
    IgnoreCase,
}

impl NameLookup {
    /// Compares a declared name against a requested one.
    #[must_use]
    pub fn matches(self, declared: &str, requested: &str) -> bool {
        match self {
            Self::Exact => declared == requested,
            Self::IgnoreCase => declared.eq_ignore_ascii_case(requested),
        }
    }
}

/// A read-only Entity Data Model.
///
/// Implementations are immutable once built and shared across concurrent
/// translations. The required methods are plain table lookups; everything
/// that walks the type hierarchy is provided on top of them.
pub trait SchemaGraph: Send + Sync {
    /// Returns a type by id.
    fn schema_type(&self, id: TypeId) -> &SchemaType;

    /// Finds a type by namespace-qualified name.
    fn find_type(&self, qualified_name: &str, lookup: NameLookup) -> Option<TypeId>;

    /// Returns an entity set by id.
    fn entity_set(&self, id: EntitySetId) -> &EntitySet;

    /// Finds an entity set by name.
    fn find_entity_set(&self, name: &str, lookup: NameLookup) -> Option<EntitySetId>;

    /// Returns a singleton by id.
    fn singleton(&self, id: SingletonId) -> &Singleton;

    /// Finds a singleton by name.
    fn find_singleton(&self, name: &str, lookup: NameLookup) -> Option<SingletonId>;

    /// Returns an operation by id.
    fn operation(&self, id: OperationId) -> &Operation;

    /// Finds bound and unbound operations by name.
    ///
    /// A name containing a dot is matched against qualified names, any other
    /// name against unqualified names. Results are in declaration order.
    fn find_operations(&self, name: &str, lookup: NameLookup) -> Vec<OperationId>;

    /// Returns an operation import by id.
    fn operation_import(&self, id: OperationImportId) -> &OperationImport;

    /// Finds function and action imports by name, in declaration order.
    fn find_operation_imports(&self, name: &str, lookup: NameLookup) -> Vec<OperationImportId>;

    /// Returns the structured type with the given id, `None` for enums.
    fn structured_type(&self, id: TypeId) -> Option<&StructuredType> {
        self.schema_type(id).as_structured()
    }

    /// Returns the direct base type.
    fn base_type(&self, id: TypeId) -> Option<TypeId> {
        self.structured_type(id).and_then(|t| t.base)
    }

    /// Returns how many inheritance steps lead from `ty` up to `ancestor`,
    /// `Some(0)` when they are equal, `None` when unrelated.
    fn derivation_distance(&self, ty: TypeId, ancestor: TypeId) -> Option<usize> {
        let mut current = Some(ty);
        let mut distance = 0;
        while let Some(id) = current {
            if id == ancestor {
                return Some(distance);
            }
            distance += 1;
            current = self.base_type(id);
        }
        None
    }

    /// Returns true if `ty` equals `base` or derives from it.
    fn is_subtype_of(&self, ty: TypeId, base: TypeId) -> bool {
        self.derivation_distance(ty, base).is_some()
    }

    /// Finds a navigation property declared on `ty` or one of its base types.
    ///
    /// Returns the declaring type alongside the property.
    fn find_navigation_property(
        &self,
        ty: TypeId,
        name: &str,
        lookup: NameLookup,
    ) -> Option<(TypeId, &NavigationProperty)> {
        let mut current = Some(ty);
        while let Some(id) = current {
            let structured = self.structured_type(id)?;
            if let Some(nav) = structured
                .navigation_properties
                .values()
                .find(|nav| lookup.matches(&nav.name, name))
            {
                return Some((id, nav));
            }
            current = structured.base;
        }
        None
    }

    /// Finds a structural property declared on `ty` or one of its base types.
    fn find_property(&self, ty: TypeId, name: &str, lookup: NameLookup) -> Option<&Property> {
        let mut current = Some(ty);
        while let Some(id) = current {
            let structured = self.structured_type(id)?;
            if let Some(prop) = structured
                .properties
                .values()
                .find(|prop| lookup.matches(&prop.name, name))
            {
                return Some(prop);
            }
            current = structured.base;
        }
        None
    }

    /// Returns the key properties of an entity type, in key declaration order.
    ///
    /// Keys are declared on the root of the hierarchy; derived types inherit them.
    fn key_properties(&self, ty: TypeId) -> Vec<&Property> {
        let mut current = Some(ty);
        while let Some(id) = current {
            let Some(structured) = self.structured_type(id) else {
                break;
            };
            if !structured.key.is_empty() {
                return structured
                    .key
                    .iter()
                    .filter_map(|name| self.find_property(id, name, NameLookup::Exact))
                    .collect();
            }
            current = structured.base;
        }
        Vec::new()
    }

    /// Returns true if `ty` or one of its base types is open.
    fn is_open(&self, ty: TypeId) -> bool {
        let mut current = Some(ty);
        while let Some(id) = current {
            match self.structured_type(id) {
                Some(structured) if structured.is_open => return true,
                Some(structured) => current = structured.base,
                None => return false,
            }
        }
        false
    }

    /// Returns the navigation source bound to a navigation property, as seen
    /// from `source`.
    fn navigation_target(
        &self,
        source: NavigationSourceRef,
        declaring_type: TypeId,
        navigation: &str,
    ) -> Option<NavigationSourceRef> {
        let bindings = match source {
            NavigationSourceRef::EntitySet(id) => &self.entity_set(id).bindings,
            NavigationSourceRef::Singleton(id) => &self.singleton(id).bindings,
        };
        super::container::find_binding(bindings, declaring_type, navigation)
    }

    /// Returns the name of a navigation source.
    fn navigation_source_name(&self, source: NavigationSourceRef) -> &str {
        match source {
            NavigationSourceRef::EntitySet(id) => &self.entity_set(id).name,
            NavigationSourceRef::Singleton(id) => &self.singleton(id).name,
        }
    }

    /// Returns the type a navigation source yields: a collection for entity
    /// sets, a single entity for singletons.
    fn navigation_source_type(&self, source: NavigationSourceRef) -> TypeRef {
        match source {
            NavigationSourceRef::EntitySet(id) => {
                TypeRef::collection(TypeRef::Entity(self.entity_set(id).entity_type))
            }
            NavigationSourceRef::Singleton(id) => TypeRef::Entity(self.singleton(id).entity_type),
        }
    }

    /// Renders a type reference for messages, e.g. `Collection(Default.Order)`.
    fn type_name(&self, type_ref: &TypeRef) -> String {
        match type_ref {
            TypeRef::Primitive(kind) => kind.name().to_string(),
            TypeRef::Entity(id) | TypeRef::Complex(id) | TypeRef::Enum(id) => {
                self.schema_type(*id).qualified_name().to_string()
            }
            TypeRef::Untyped => "Edm.Untyped".to_string(),
            TypeRef::Collection(inner) => format!("Collection({})", self.type_name(inner)),
        }
    }
}
