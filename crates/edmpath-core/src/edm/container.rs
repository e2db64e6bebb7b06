//! Entity container: entity sets, singletons, and navigation bindings.

use super::types::TypeId;

/// Identifies an entity set within one model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntitySetId(pub(crate) u32);

/// Identifies a singleton within one model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SingletonId(pub(crate) u32);

/// A navigation source: a named root that navigation can start from or
/// arrive at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavigationSourceRef {
    /// An entity set (a collection of entities).
    EntitySet(EntitySetId),
    /// A singleton (exactly one entity).
    Singleton(SingletonId),
}

/// Binds a navigation property, as seen from one navigation source, to the
/// navigation source holding its targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationBinding {
    /// Type declaring the navigation property.
    pub declaring_type: TypeId,
    /// Navigation property name.
    pub navigation: String,
    /// Where the targets live.
    pub target: NavigationSourceRef,
}

/// A named collection of entities of one entity type (or derived types).
#[derive(Debug, Clone)]
pub struct EntitySet {
    /// Set name.
    pub name: String,
    /// Declared entity type.
    pub entity_type: TypeId,
    /// Navigation-target bindings.
    pub bindings: Vec<NavigationBinding>,
}

/// A named single entity.
#[derive(Debug, Clone)]
pub struct Singleton {
    /// Singleton name.
    pub name: String,
    /// Declared entity type.
    pub entity_type: TypeId,
    /// Navigation-target bindings.
    pub bindings: Vec<NavigationBinding>,
}

/// Looks up the binding for a navigation property declared on `declaring_type`.
pub(crate) fn find_binding(
    bindings: &[NavigationBinding],
    declaring_type: TypeId,
    navigation: &str,
) -> Option<NavigationSourceRef> {
    bindings
        .iter()
        .find(|b| b.declaring_type == declaring_type && b.navigation == navigation)
        .map(|b| b.target)
}
