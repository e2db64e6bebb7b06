//! The in-memory schema graph.

use super::container::{EntitySet, EntitySetId, Singleton, SingletonId};
use super::operation::{Operation, OperationId, OperationImport, OperationImportId};
use super::schema::{NameLookup, SchemaGraph};
use super::types::{SchemaType, TypeId};
use edmpath_common::utils::hash::FastHashMap;
use indexmap::IndexMap;
use smallvec::SmallVec;

/// Name index supporting exact and case-insensitive lookups.
///
/// Case-insensitive lookups resolve to the first declared element when two
/// names differ only in case.
#[derive(Debug, Clone)]
pub(crate) struct NameIndex<Id> {
    exact: IndexMap<String, SmallVec<[Id; 1]>>,
    folded: FastHashMap<String, SmallVec<[Id; 1]>>,
}

impl<Id> Default for NameIndex<Id> {
    fn default() -> Self {
        Self {
            exact: IndexMap::new(),
            folded: FastHashMap::default(),
        }
    }
}

impl<Id: Copy> NameIndex<Id> {
    pub(crate) fn insert(&mut self, name: &str, id: Id) {
        self.exact.entry(name.to_string()).or_default().push(id);
        self.folded
            .entry(name.to_ascii_lowercase())
            .or_default()
            .push(id);
    }

    pub(crate) fn contains(&self, name: &str) -> bool {
        self.exact.contains_key(name)
    }

    pub(crate) fn all(&self, name: &str, lookup: NameLookup) -> &[Id] {
        let found = match lookup {
            NameLookup::Exact => self.exact.get(name),
            NameLookup::IgnoreCase => self.folded.get(&name.to_ascii_lowercase()),
        };
        match found {
            Some(ids) => ids.as_slice(),
            None => &[],
        }
    }

    pub(crate) fn first(&self, name: &str, lookup: NameLookup) -> Option<Id> {
        self.all(name, lookup).first().copied()
    }
}

/// An immutable Entity Data Model held in memory.
///
/// Built with [`EdmModelBuilder`](super::EdmModelBuilder). Elements are
/// addressed by small integer ids, so path segments can refer to them
/// without borrowing the model.
#[derive(Debug, Clone)]
pub struct EdmModel {
    pub(crate) namespace: String,
    pub(crate) container_name: String,
    pub(crate) types: Vec<SchemaType>,
    pub(crate) entity_sets: Vec<EntitySet>,
    pub(crate) singletons: Vec<Singleton>,
    pub(crate) operations: Vec<Operation>,
    pub(crate) imports: Vec<OperationImport>,
    pub(crate) type_index: NameIndex<TypeId>,
    pub(crate) entity_set_index: NameIndex<EntitySetId>,
    pub(crate) singleton_index: NameIndex<SingletonId>,
    pub(crate) operation_index: NameIndex<OperationId>,
    pub(crate) qualified_operation_index: NameIndex<OperationId>,
    pub(crate) import_index: NameIndex<OperationImportId>,
}

impl EdmModel {
    /// Returns the schema namespace.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Returns the entity container name.
    #[must_use]
    pub fn container_name(&self) -> &str {
        &self.container_name
    }

    /// Iterates over all types with their ids.
    pub fn types(&self) -> impl Iterator<Item = (TypeId, &SchemaType)> {
        self.types
            .iter()
            .enumerate()
            .map(|(i, t)| (TypeId(i as u32), t))
    }

    /// Iterates over all entity sets with their ids.
    pub fn entity_sets(&self) -> impl Iterator<Item = (EntitySetId, &EntitySet)> {
        self.entity_sets
            .iter()
            .enumerate()
            .map(|(i, s)| (EntitySetId(i as u32), s))
    }

    /// Iterates over all singletons with their ids.
    pub fn singletons(&self) -> impl Iterator<Item = (SingletonId, &Singleton)> {
        self.singletons
            .iter()
            .enumerate()
            .map(|(i, s)| (SingletonId(i as u32), s))
    }

    /// Iterates over all operations with their ids.
    pub fn operations(&self) -> impl Iterator<Item = (OperationId, &Operation)> {
        self.operations
            .iter()
            .enumerate()
            .map(|(i, o)| (OperationId(i as u32), o))
    }

    /// Iterates over all operation imports with their ids.
    pub fn operation_imports(&self) -> impl Iterator<Item = (OperationImportId, &OperationImport)> {
        self.imports
            .iter()
            .enumerate()
            .map(|(i, o)| (OperationImportId(i as u32), o))
    }
}

impl SchemaGraph for EdmModel {
    fn schema_type(&self, id: TypeId) -> &SchemaType {
        &self.types[id.index()]
    }

    fn find_type(&self, qualified_name: &str, lookup: NameLookup) -> Option<TypeId> {
        self.type_index.first(qualified_name, lookup)
    }

    fn entity_set(&self, id: EntitySetId) -> &EntitySet {
        &self.entity_sets[id.0 as usize]
    }

    fn find_entity_set(&self, name: &str, lookup: NameLookup) -> Option<EntitySetId> {
        self.entity_set_index.first(name, lookup)
    }

    fn singleton(&self, id: SingletonId) -> &Singleton {
        &self.singletons[id.0 as usize]
    }

    fn find_singleton(&self, name: &str, lookup: NameLookup) -> Option<SingletonId> {
        self.singleton_index.first(name, lookup)
    }

    fn operation(&self, id: OperationId) -> &Operation {
        &self.operations[id.0 as usize]
    }

    fn find_operations(&self, name: &str, lookup: NameLookup) -> Vec<OperationId> {
        let index = if name.contains('.') {
            &self.qualified_operation_index
        } else {
            &self.operation_index
        };
        index.all(name, lookup).to_vec()
    }

    fn operation_import(&self, id: OperationImportId) -> &OperationImport {
        &self.imports[id.0 as usize]
    }

    fn find_operation_imports(&self, name: &str, lookup: NameLookup) -> Vec<OperationImportId> {
        self.import_index.all(name, lookup).to_vec()
    }
}
