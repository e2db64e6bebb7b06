//! # edmpath-core
//!
//! Core layer for edmpath: the Entity Data Model schema graph that path
//! translation reads.
//!
//! The schema graph is built once, then shared read-only across every
//! translation. It depends only on `edmpath-common`.
//!
//! ## Modules
//!
//! - [`edm`] - Schema graph types, the [`SchemaGraph`](edm::SchemaGraph) trait,
//!   the in-memory [`EdmModel`](edm::EdmModel), and enum-aware literal parsing

pub mod edm;

// Re-export commonly used types
pub use edm::{
    EdmModel, EdmModelBuilder, EntitySetId, Multiplicity, NameLookup, NavigationSourceRef,
    OperationDef, OperationId, OperationImportId, OperationKind, SchemaGraph, SingletonId, TypeId,
    TypeRef,
};
