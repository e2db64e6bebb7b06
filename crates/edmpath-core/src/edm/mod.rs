//! Entity Data Model schema graph.
//!
//! The schema graph declares the types, navigation roots, and operations a
//! service exposes:
//!
//! - [`types`] - Structured, enum, and primitive type references
//! - [`container`] - Entity sets, singletons, and navigation-target bindings
//! - [`operation`] - Functions, actions, and their imports
//! - [`schema`] - The read-only [`SchemaGraph`] trait path translation consumes
//! - [`model`] - [`EdmModel`], the in-memory schema graph
//! - [`builder`] - [`EdmModelBuilder`] for assembling a model in code
//! - [`literal`] - Literal parsing against declared types, enums included
//! - [`sample`] - Small reference models

pub mod builder;
pub mod container;
pub mod literal;
pub mod model;
pub mod operation;
pub mod sample;
pub mod schema;
pub mod types;

pub use builder::EdmModelBuilder;
pub use container::{
    EntitySet, EntitySetId, NavigationBinding, NavigationSourceRef, Singleton, SingletonId,
};
pub use literal::parse_value;
pub use model::EdmModel;
pub use operation::{
    Operation, OperationDef, OperationId, OperationImport, OperationImportId, OperationKind,
    Parameter,
};
pub use schema::{NameLookup, SchemaGraph};
pub use types::{
    EnumMember, EnumType, Multiplicity, NavigationProperty, Property, SchemaType, StructuredKind,
    StructuredType, TypeId, TypeRef,
};
