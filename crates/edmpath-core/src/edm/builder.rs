//! Assembling an [`EdmModel`] in code.
//!
//! The builder hands out ids as elements are declared, so later declarations
//! can refer to earlier ones. Structural mistakes are collected and reported
//! by [`EdmModelBuilder::build`], which validates the whole graph at once.

use super::container::{
    EntitySet, EntitySetId, NavigationBinding, NavigationSourceRef, Singleton, SingletonId,
};
use super::model::{EdmModel, NameIndex};
use super::operation::{
    Operation, OperationDef, OperationId, OperationImport, OperationImportId, OperationKind,
    Parameter,
};
use super::types::{
    EnumMember, EnumType, Multiplicity, NavigationProperty, Property, SchemaType, StructuredKind,
    StructuredType, TypeId, TypeRef,
};
use edmpath_common::utils::error::ModelError;
use indexmap::IndexMap;
use smallvec::SmallVec;

/// Builder for [`EdmModel`].
///
/// # Examples
///
/// ```
/// use edmpath_common::types::PrimitiveKind;
/// use edmpath_core::edm::{EdmModelBuilder, Multiplicity};
///
/// let mut builder = EdmModelBuilder::new("Default");
/// let customer = builder.entity_type("Customer");
/// builder
///     .property(customer, "ID", PrimitiveKind::Int32)
///     .key(customer, &["ID"]);
/// builder.entity_set("Customers", customer);
/// let model = builder.build().unwrap();
/// assert_eq!(model.namespace(), "Default");
/// ```
#[derive(Debug)]
pub struct EdmModelBuilder {
    namespace: String,
    container_name: String,
    types: Vec<SchemaType>,
    entity_sets: Vec<EntitySet>,
    singletons: Vec<Singleton>,
    operations: Vec<Operation>,
    imports: Vec<OperationImport>,
    errors: Vec<ModelError>,
}

impl EdmModelBuilder {
    /// Creates a builder for a single-schema model in `namespace`.
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            container_name: "Container".to_string(),
            types: Vec::new(),
            entity_sets: Vec::new(),
            singletons: Vec::new(),
            operations: Vec::new(),
            imports: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Sets the entity container name (default `Container`).
    pub fn container_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.container_name = name.into();
        self
    }

    /// Declares an entity type without a base type.
    pub fn entity_type(&mut self, name: &str) -> TypeId {
        self.structured(name, StructuredKind::Entity, None)
    }

    /// Declares an entity type deriving from `base`.
    pub fn derived_entity_type(&mut self, name: &str, base: TypeId) -> TypeId {
        self.structured(name, StructuredKind::Entity, Some(base))
    }

    /// Declares a complex type without a base type.
    pub fn complex_type(&mut self, name: &str) -> TypeId {
        self.structured(name, StructuredKind::Complex, None)
    }

    /// Declares a complex type deriving from `base`.
    pub fn derived_complex_type(&mut self, name: &str, base: TypeId) -> TypeId {
        self.structured(name, StructuredKind::Complex, Some(base))
    }

    fn structured(&mut self, name: &str, kind: StructuredKind, base: Option<TypeId>) -> TypeId {
        if let Some(base) = base {
            match self.types.get(base.index()) {
                Some(SchemaType::Structured(b)) if b.kind == kind => {}
                _ => self.errors.push(ModelError::Invalid(format!(
                    "`{name}` cannot derive from type #{}",
                    base.index()
                ))),
            }
        }
        self.push_type(SchemaType::Structured(StructuredType {
            name: name.to_string(),
            qualified_name: self.qualify(name),
            kind,
            base,
            is_abstract: false,
            is_open: false,
            has_stream: false,
            properties: IndexMap::new(),
            navigation_properties: IndexMap::new(),
            key: SmallVec::new(),
        }))
    }

    /// Declares an enum type with the given members.
    pub fn enum_type(&mut self, name: &str, members: &[(&str, i64)]) -> TypeId {
        self.enum_type_inner(name, members, false)
    }

    /// Declares a flags enum type with the given members.
    pub fn flags_enum_type(&mut self, name: &str, members: &[(&str, i64)]) -> TypeId {
        self.enum_type_inner(name, members, true)
    }

    fn enum_type_inner(&mut self, name: &str, members: &[(&str, i64)], is_flags: bool) -> TypeId {
        self.push_type(SchemaType::Enum(EnumType {
            name: name.to_string(),
            qualified_name: self.qualify(name),
            is_flags,
            members: members
                .iter()
                .map(|(name, value)| EnumMember {
                    name: (*name).to_string(),
                    value: *value,
                })
                .collect(),
        }))
    }

    fn push_type(&mut self, ty: SchemaType) -> TypeId {
        let id = TypeId(self.types.len() as u32);
        self.types.push(ty);
        id
    }

    fn qualify(&self, name: &str) -> String {
        format!("{}.{}", self.namespace, name)
    }

    /// Returns the reference shape matching a declared type's kind.
    #[must_use]
    pub fn type_ref(&self, id: TypeId) -> TypeRef {
        match self.types.get(id.index()) {
            Some(SchemaType::Structured(t)) if t.kind == StructuredKind::Complex => {
                TypeRef::Complex(id)
            }
            Some(SchemaType::Enum(_)) => TypeRef::Enum(id),
            _ => TypeRef::Entity(id),
        }
    }

    fn structured_mut(&mut self, ty: TypeId, what: &str) -> Option<&mut StructuredType> {
        match self.types.get_mut(ty.index()) {
            Some(SchemaType::Structured(t)) => Some(t),
            _ => {
                self.errors.push(ModelError::Invalid(format!(
                    "{what} requires a structured type, got type #{}",
                    ty.index()
                )));
                None
            }
        }
    }

    /// Marks a structured type open.
    pub fn open_type(&mut self, ty: TypeId) -> &mut Self {
        if let Some(t) = self.structured_mut(ty, "open_type") {
            t.is_open = true;
        }
        self
    }

    /// Marks a structured type abstract.
    pub fn abstract_type(&mut self, ty: TypeId) -> &mut Self {
        if let Some(t) = self.structured_mut(ty, "abstract_type") {
            t.is_abstract = true;
        }
        self
    }

    /// Marks an entity type as a media entity exposing a stream.
    pub fn media_type(&mut self, ty: TypeId) -> &mut Self {
        if let Some(t) = self.structured_mut(ty, "media_type") {
            t.has_stream = true;
        }
        self
    }

    /// Declares a nullable structural property.
    pub fn property(&mut self, ty: TypeId, name: &str, type_ref: impl Into<TypeRef>) -> &mut Self {
        let type_ref = type_ref.into();
        if let Some(t) = self.structured_mut(ty, "property") {
            let previous = t.properties.insert(
                name.to_string(),
                Property {
                    name: name.to_string(),
                    type_ref,
                    nullable: true,
                },
            );
            if previous.is_some() {
                let element = format!("{}.{name}", t.qualified_name);
                self.errors.push(ModelError::Duplicate {
                    element: "property",
                    name: element,
                });
            }
        }
        self
    }

    /// Declares the key of an entity type. The named properties must be
    /// declared on the same type.
    pub fn key(&mut self, ty: TypeId, names: &[&str]) -> &mut Self {
        if let Some(t) = self.structured_mut(ty, "key") {
            t.key = names.iter().map(|n| (*n).to_string()).collect();
            for name in names {
                if let Some(prop) = t.properties.get_mut(*name) {
                    prop.nullable = false;
                }
            }
        }
        self
    }

    /// Declares a navigation property.
    pub fn navigation(
        &mut self,
        ty: TypeId,
        name: &str,
        target: TypeId,
        multiplicity: Multiplicity,
    ) -> &mut Self {
        if let Some(t) = self.structured_mut(ty, "navigation") {
            let previous = t.navigation_properties.insert(
                name.to_string(),
                NavigationProperty {
                    name: name.to_string(),
                    target,
                    multiplicity,
                },
            );
            if previous.is_some() {
                let element = format!("{}.{name}", t.qualified_name);
                self.errors.push(ModelError::Duplicate {
                    element: "navigation property",
                    name: element,
                });
            }
        }
        self
    }

    /// Declares an entity set.
    pub fn entity_set(&mut self, name: &str, entity_type: TypeId) -> EntitySetId {
        let id = EntitySetId(self.entity_sets.len() as u32);
        self.entity_sets.push(EntitySet {
            name: name.to_string(),
            entity_type,
            bindings: Vec::new(),
        });
        id
    }

    /// Declares a singleton.
    pub fn singleton(&mut self, name: &str, entity_type: TypeId) -> SingletonId {
        let id = SingletonId(self.singletons.len() as u32);
        self.singletons.push(Singleton {
            name: name.to_string(),
            entity_type,
            bindings: Vec::new(),
        });
        id
    }

    /// Binds a navigation property, as seen from `source`, to `target`.
    pub fn bind(
        &mut self,
        source: NavigationSourceRef,
        declaring_type: TypeId,
        navigation: &str,
        target: NavigationSourceRef,
    ) -> &mut Self {
        let binding = NavigationBinding {
            declaring_type,
            navigation: navigation.to_string(),
            target,
        };
        let bindings = match source {
            NavigationSourceRef::EntitySet(id) => self
                .entity_sets
                .get_mut(id.0 as usize)
                .map(|s| &mut s.bindings),
            NavigationSourceRef::Singleton(id) => self
                .singletons
                .get_mut(id.0 as usize)
                .map(|s| &mut s.bindings),
        };
        match bindings {
            Some(bindings) => bindings.push(binding),
            None => self
                .errors
                .push(ModelError::Invalid(format!("binding from unknown source {source:?}"))),
        }
        self
    }

    /// Declares an operation.
    pub fn operation(&mut self, def: OperationDef) -> OperationId {
        let id = OperationId(self.operations.len() as u32);
        let is_bound = def.binding.is_some();
        let mut parameters = Vec::with_capacity(def.parameters.len() + 1);
        if let Some((name, type_ref)) = def.binding {
            parameters.push(Parameter {
                name,
                type_ref,
                optional: false,
                nullable: false,
            });
        }
        parameters.extend(def.parameters);
        self.operations.push(Operation {
            qualified_name: self.qualify(&def.name),
            namespace: self.namespace.clone(),
            name: def.name,
            kind: def.kind,
            is_bound,
            parameters,
            return_type: def.return_type,
            entity_set_path: def.entity_set_path,
            is_composable: def.is_composable,
        });
        id
    }

    /// Exposes an unbound function at the service root.
    pub fn function_import(
        &mut self,
        name: &str,
        operation: OperationId,
        entity_set: Option<EntitySetId>,
    ) -> OperationImportId {
        self.import(name, OperationKind::Function, operation, entity_set)
    }

    /// Exposes an unbound action at the service root.
    pub fn action_import(
        &mut self,
        name: &str,
        operation: OperationId,
        entity_set: Option<EntitySetId>,
    ) -> OperationImportId {
        self.import(name, OperationKind::Action, operation, entity_set)
    }

    fn import(
        &mut self,
        name: &str,
        kind: OperationKind,
        operation: OperationId,
        entity_set: Option<EntitySetId>,
    ) -> OperationImportId {
        let id = OperationImportId(self.imports.len() as u32);
        self.imports.push(OperationImport {
            name: name.to_string(),
            kind,
            operation,
            entity_set,
        });
        id
    }

    /// Validates the declarations and builds the model.
    ///
    /// # Errors
    ///
    /// Returns the first [`ModelError`] found: duplicate names, keys that are
    /// missing or not primitive, navigation targets that are not entity types,
    /// bindings that do not match the declared navigation, or malformed
    /// operations.
    pub fn build(self) -> Result<EdmModel, ModelError> {
        if let Some(err) = self.errors.into_iter().next() {
            return Err(err);
        }

        let mut model = EdmModel {
            namespace: self.namespace,
            container_name: self.container_name,
            types: self.types,
            entity_sets: self.entity_sets,
            singletons: self.singletons,
            operations: self.operations,
            imports: self.imports,
            type_index: NameIndex::default(),
            entity_set_index: NameIndex::default(),
            singleton_index: NameIndex::default(),
            operation_index: NameIndex::default(),
            qualified_operation_index: NameIndex::default(),
            import_index: NameIndex::default(),
        };

        index_types(&mut model)?;
        validate_types(&model)?;
        index_container(&mut model)?;
        validate_bindings(&model)?;
        index_operations(&mut model)?;
        Ok(model)
    }
}

fn index_types(model: &mut EdmModel) -> Result<(), ModelError> {
    for (i, ty) in model.types.iter().enumerate() {
        let name = ty.qualified_name();
        if model.type_index.contains(name) {
            return Err(ModelError::Duplicate {
                element: "type",
                name: name.to_string(),
            });
        }
        model.type_index.insert(name, TypeId(i as u32));
    }
    Ok(())
}

fn is_entity(model: &EdmModel, id: TypeId) -> bool {
    matches!(
        model.types.get(id.index()),
        Some(SchemaType::Structured(t)) if t.kind == StructuredKind::Entity
    )
}

fn is_related(model: &EdmModel, a: TypeId, b: TypeId) -> bool {
    let derives = |from: TypeId, to: TypeId| {
        let mut current = Some(from);
        while let Some(id) = current {
            if id == to {
                return true;
            }
            current = model.types[id.index()].as_structured().and_then(|t| t.base);
        }
        false
    };
    derives(a, b) || derives(b, a)
}

fn validate_types(model: &EdmModel) -> Result<(), ModelError> {
    for ty in &model.types {
        let SchemaType::Structured(t) = ty else {
            continue;
        };
        for nav in t.navigation_properties.values() {
            if !is_entity(model, nav.target) {
                return Err(ModelError::Invalid(format!(
                    "navigation `{}.{}` must target an entity type",
                    t.qualified_name, nav.name
                )));
            }
        }
        if t.key.is_empty() {
            continue;
        }
        if t.kind != StructuredKind::Entity || t.base.is_some() {
            return Err(ModelError::Invalid(format!(
                "`{}` declares a key but is not the root of an entity hierarchy",
                t.qualified_name
            )));
        }
        for name in &t.key {
            let Some(prop) = t.properties.get(name) else {
                return Err(ModelError::Unknown {
                    element: "key property",
                    name: format!("{}.{name}", t.qualified_name),
                });
            };
            if !matches!(prop.type_ref, TypeRef::Primitive(_) | TypeRef::Enum(_)) {
                return Err(ModelError::Invalid(format!(
                    "key property `{}.{name}` must be primitive or enum",
                    t.qualified_name
                )));
            }
        }
    }
    Ok(())
}

fn has_key(model: &EdmModel, ty: TypeId) -> bool {
    let mut current = Some(ty);
    while let Some(id) = current {
        match model.types[id.index()].as_structured() {
            Some(t) if !t.key.is_empty() => return true,
            Some(t) => current = t.base,
            None => return false,
        }
    }
    false
}

fn index_container(model: &mut EdmModel) -> Result<(), ModelError> {
    let mut names = NameIndex::<()>::default();
    for (i, set) in model.entity_sets.iter().enumerate() {
        if names.contains(&set.name) {
            return Err(ModelError::Duplicate {
                element: "entity set",
                name: set.name.clone(),
            });
        }
        if !is_entity(model, set.entity_type) || !has_key(model, set.entity_type) {
            return Err(ModelError::Invalid(format!(
                "entity set `{}` requires an entity type with a key",
                set.name
            )));
        }
        names.insert(&set.name, ());
        model
            .entity_set_index
            .insert(&set.name, EntitySetId(i as u32));
    }
    for (i, singleton) in model.singletons.iter().enumerate() {
        if names.contains(&singleton.name) {
            return Err(ModelError::Duplicate {
                element: "singleton",
                name: singleton.name.clone(),
            });
        }
        if !is_entity(model, singleton.entity_type) {
            return Err(ModelError::Invalid(format!(
                "singleton `{}` requires an entity type",
                singleton.name
            )));
        }
        names.insert(&singleton.name, ());
        model
            .singleton_index
            .insert(&singleton.name, SingletonId(i as u32));
    }
    Ok(())
}

fn source_entity_type(model: &EdmModel, source: NavigationSourceRef) -> Option<TypeId> {
    match source {
        NavigationSourceRef::EntitySet(id) => {
            model.entity_sets.get(id.0 as usize).map(|s| s.entity_type)
        }
        NavigationSourceRef::Singleton(id) => {
            model.singletons.get(id.0 as usize).map(|s| s.entity_type)
        }
    }
}

fn validate_bindings(model: &EdmModel) -> Result<(), ModelError> {
    let sources = model
        .entity_sets
        .iter()
        .map(|s| (&s.name, s.entity_type, &s.bindings))
        .chain(
            model
                .singletons
                .iter()
                .map(|s| (&s.name, s.entity_type, &s.bindings)),
        );
    for (name, entity_type, bindings) in sources {
        for binding in bindings {
            let nav = model.types[binding.declaring_type.index()]
                .as_structured()
                .and_then(|t| t.navigation_properties.get(&binding.navigation));
            let Some(nav) = nav else {
                return Err(ModelError::Unknown {
                    element: "bound navigation property",
                    name: format!("{name}/{}", binding.navigation),
                });
            };
            // Complex types are reached through a property of the source's entities.
            let declared_on_complex = model.types[binding.declaring_type.index()]
                .as_structured()
                .is_some_and(|t| t.kind == StructuredKind::Complex);
            if !declared_on_complex && !is_related(model, entity_type, binding.declaring_type) {
                return Err(ModelError::Invalid(format!(
                    "`{name}` cannot bind `{}`: declaring type is unrelated",
                    binding.navigation
                )));
            }
            let target_ok = source_entity_type(model, binding.target)
                .is_some_and(|target| is_related(model, target, nav.target));
            if !target_ok {
                return Err(ModelError::Invalid(format!(
                    "`{name}/{}` is bound to a navigation source of an unrelated type",
                    binding.navigation
                )));
            }
        }
    }
    Ok(())
}

fn index_operations(model: &mut EdmModel) -> Result<(), ModelError> {
    for (i, op) in model.operations.iter().enumerate() {
        let mut seen = NameIndex::<()>::default();
        for param in &op.parameters {
            if seen.contains(&param.name) {
                return Err(ModelError::Duplicate {
                    element: "parameter",
                    name: format!("{}/{}", op.qualified_name, param.name),
                });
            }
            seen.insert(&param.name, ());
        }
        if let Some(path) = &op.entity_set_path {
            let binding_name = op.binding_parameter().map(|p| p.name.as_str());
            let head = path.split('/').next();
            if binding_name.is_none() || head != binding_name {
                return Err(ModelError::Invalid(format!(
                    "entity set path `{path}` of `{}` must start at the binding parameter",
                    op.qualified_name
                )));
            }
        }
        let id = OperationId(i as u32);
        model.operation_index.insert(&op.name, id);
        model
            .qualified_operation_index
            .insert(&op.qualified_name, id);
    }
    for (i, import) in model.imports.iter().enumerate() {
        let Some(op) = model.operations.get(import.operation.0 as usize) else {
            return Err(ModelError::Unknown {
                element: "imported operation",
                name: import.name.clone(),
            });
        };
        if op.is_bound || op.kind != import.kind {
            return Err(ModelError::Invalid(format!(
                "{} import `{}` must import an unbound {}",
                import.kind.as_str(),
                import.name,
                import.kind.as_str()
            )));
        }
        model
            .import_index
            .insert(&import.name, OperationImportId(i as u32));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edm::SchemaGraph;
    use edmpath_common::types::PrimitiveKind;

    #[test]
    fn test_build_minimal_model() {
        let mut builder = EdmModelBuilder::new("Default");
        let customer = builder.entity_type("Customer");
        builder
            .property(customer, "ID", PrimitiveKind::Int32)
            .key(customer, &["ID"]);
        builder.entity_set("Customers", customer);
        let model = builder.build().unwrap();
        assert_eq!(model.entity_sets().count(), 1);
        let keys = model.key_properties(customer);
        assert_eq!(keys.len(), 1);
        assert!(!keys[0].nullable);
    }

    #[test]
    fn test_duplicate_type_rejected() {
        let mut builder = EdmModelBuilder::new("Default");
        builder.complex_type("Address");
        builder.complex_type("Address");
        assert!(matches!(
            builder.build(),
            Err(ModelError::Duplicate { element: "type", .. })
        ));
    }

    #[test]
    fn test_entity_set_requires_key() {
        let mut builder = EdmModelBuilder::new("Default");
        let customer = builder.entity_type("Customer");
        builder.entity_set("Customers", customer);
        assert!(matches!(builder.build(), Err(ModelError::Invalid(_))));
    }

    #[test]
    fn test_key_on_derived_type_rejected() {
        let mut builder = EdmModelBuilder::new("Default");
        let base = builder.entity_type("Base");
        builder.property(base, "ID", PrimitiveKind::Int32).key(base, &["ID"]);
        let derived = builder.derived_entity_type("Derived", base);
        builder
            .property(derived, "Code", PrimitiveKind::String)
            .key(derived, &["Code"]);
        assert!(matches!(builder.build(), Err(ModelError::Invalid(_))));
    }

    #[test]
    fn test_complex_key_rejected() {
        let mut builder = EdmModelBuilder::new("Default");
        let address = builder.complex_type("Address");
        let customer = builder.entity_type("Customer");
        builder
            .property(customer, "Home", TypeRef::Complex(address))
            .key(customer, &["Home"]);
        assert!(matches!(builder.build(), Err(ModelError::Invalid(_))));
    }

    #[test]
    fn test_entity_cannot_derive_from_complex() {
        let mut builder = EdmModelBuilder::new("Default");
        let address = builder.complex_type("Address");
        builder.derived_entity_type("Customer", address);
        assert!(builder.build().is_err());
    }

    #[test]
    fn test_binding_must_name_declared_navigation() {
        let mut builder = EdmModelBuilder::new("Default");
        let customer = builder.entity_type("Customer");
        builder
            .property(customer, "ID", PrimitiveKind::Int32)
            .key(customer, &["ID"]);
        let customers = builder.entity_set("Customers", customer);
        let source = NavigationSourceRef::EntitySet(customers);
        builder.bind(source, customer, "Orders", source);
        assert!(matches!(
            builder.build(),
            Err(ModelError::Unknown { .. })
        ));
    }

    #[test]
    fn test_binding_through_complex_type() {
        let mut builder = EdmModelBuilder::new("Default");
        let country = builder.entity_type("Country");
        builder
            .property(country, "Code", PrimitiveKind::String)
            .key(country, &["Code"]);
        let address = builder.complex_type("Address");
        builder.navigation(address, "Country", country, Multiplicity::One);
        let customer = builder.entity_type("Customer");
        builder
            .property(customer, "ID", PrimitiveKind::Int32)
            .key(customer, &["ID"])
            .property(customer, "Address", TypeRef::Complex(address));
        let customers = NavigationSourceRef::EntitySet(builder.entity_set("Customers", customer));
        let countries = NavigationSourceRef::EntitySet(builder.entity_set("Countries", country));
        builder.bind(customers, address, "Country", countries);

        let model = builder.build().unwrap();
        assert_eq!(
            model.navigation_target(customers, address, "Country"),
            Some(countries)
        );
    }

    #[test]
    fn test_binding_from_unrelated_entity_rejected() {
        let mut builder = EdmModelBuilder::new("Default");
        let order = builder.entity_type("Order");
        builder
            .property(order, "ID", PrimitiveKind::Int32)
            .key(order, &["ID"])
            .navigation(order, "Next", order, Multiplicity::ZeroOrOne);
        let customer = builder.entity_type("Customer");
        builder
            .property(customer, "ID", PrimitiveKind::Int32)
            .key(customer, &["ID"]);
        let customers = NavigationSourceRef::EntitySet(builder.entity_set("Customers", customer));
        let orders = NavigationSourceRef::EntitySet(builder.entity_set("Orders", order));
        builder.bind(customers, order, "Next", orders);
        assert!(matches!(builder.build(), Err(ModelError::Invalid(_))));
    }

    #[test]
    fn test_import_must_be_unbound() {
        let mut builder = EdmModelBuilder::new("Default");
        let customer = builder.entity_type("Customer");
        builder
            .property(customer, "ID", PrimitiveKind::Int32)
            .key(customer, &["ID"]);
        let op = builder.operation(
            OperationDef::function("Rank")
                .bound_to(TypeRef::Entity(customer))
                .returns(PrimitiveKind::Int32),
        );
        builder.function_import("Rank", op, None);
        assert!(matches!(builder.build(), Err(ModelError::Invalid(_))));
    }

    #[test]
    fn test_entity_set_path_must_start_at_binding() {
        let mut builder = EdmModelBuilder::new("Default");
        let customer = builder.entity_type("Customer");
        builder
            .property(customer, "ID", PrimitiveKind::Int32)
            .key(customer, &["ID"]);
        builder.operation(
            OperationDef::function("Top")
                .returns(TypeRef::collection(TypeRef::Entity(customer)))
                .entity_set_path("bindingParameter/Orders"),
        );
        assert!(matches!(builder.build(), Err(ModelError::Invalid(_))));
    }

    #[test]
    fn test_type_ref_follows_kind() {
        let mut builder = EdmModelBuilder::new("Default");
        let address = builder.complex_type("Address");
        let color = builder.enum_type("Color", &[("Red", 0)]);
        let customer = builder.entity_type("Customer");
        assert_eq!(builder.type_ref(address), TypeRef::Complex(address));
        assert_eq!(builder.type_ref(color), TypeRef::Enum(color));
        assert_eq!(builder.type_ref(customer), TypeRef::Entity(customer));
    }
}
