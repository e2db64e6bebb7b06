//! Functions, actions, and operation imports.

use super::container::EntitySetId;
use super::types::TypeRef;
use serde::Serialize;

/// Identifies an operation within one model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OperationId(pub(crate) u32);

/// Identifies an operation import within one model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OperationImportId(pub(crate) u32);

/// Function or action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum OperationKind {
    /// Side-effect free, invoked with GET, parameters in the URL.
    Function,
    /// May have side effects, invoked with POST, parameters in the body.
    Action,
}

impl OperationKind {
    /// Returns `"function"` or `"action"`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::Action => "action",
        }
    }
}

/// An operation parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// Parameter name.
    pub name: String,
    /// Declared type.
    pub type_ref: TypeRef,
    /// Optional parameters may be omitted from a call.
    pub optional: bool,
    /// Whether `null` is accepted.
    pub nullable: bool,
}

/// A function or action.
#[derive(Debug, Clone)]
pub struct Operation {
    /// Namespace.
    pub namespace: String,
    /// Unqualified name.
    pub name: String,
    /// Namespace-qualified name.
    pub qualified_name: String,
    /// Function or action.
    pub kind: OperationKind,
    /// Bound operations take the binding parameter first.
    pub is_bound: bool,
    /// Parameters, binding parameter first when bound.
    pub parameters: Vec<Parameter>,
    /// Return type; `None` for actions without a result.
    pub return_type: Option<TypeRef>,
    /// Path from the binding parameter to the returned entities' navigation
    /// source, e.g. `bindingParameter/Orders`.
    pub entity_set_path: Option<String>,
    /// Composable functions may be followed by further segments.
    pub is_composable: bool,
}

impl Operation {
    /// Returns the binding parameter of a bound operation.
    #[must_use]
    pub fn binding_parameter(&self) -> Option<&Parameter> {
        if self.is_bound {
            self.parameters.first()
        } else {
            None
        }
    }

    /// Returns the parameters a caller supplies, i.e. all but the binding one.
    #[must_use]
    pub fn call_parameters(&self) -> &[Parameter] {
        if self.is_bound {
            self.parameters.get(1..).unwrap_or(&[])
        } else {
            &self.parameters
        }
    }
}

/// An operation declaration, as handed to
/// [`EdmModelBuilder::operation`](super::EdmModelBuilder::operation).
#[derive(Debug, Clone)]
pub struct OperationDef {
    pub(crate) name: String,
    pub(crate) kind: OperationKind,
    pub(crate) binding: Option<(String, TypeRef)>,
    pub(crate) parameters: Vec<Parameter>,
    pub(crate) return_type: Option<TypeRef>,
    pub(crate) entity_set_path: Option<String>,
    pub(crate) is_composable: bool,
}

impl OperationDef {
    /// Starts a function declaration.
    pub fn function(name: impl Into<String>) -> Self {
        Self::new(name, OperationKind::Function)
    }

    /// Starts an action declaration.
    pub fn action(name: impl Into<String>) -> Self {
        Self::new(name, OperationKind::Action)
    }

    fn new(name: impl Into<String>, kind: OperationKind) -> Self {
        Self {
            name: name.into(),
            kind,
            binding: None,
            parameters: Vec::new(),
            return_type: None,
            entity_set_path: None,
            is_composable: false,
        }
    }

    /// Binds the operation to `type_ref` through a parameter named `bindingParameter`.
    pub fn bound_to(mut self, type_ref: TypeRef) -> Self {
        self.binding = Some(("bindingParameter".to_string(), type_ref));
        self
    }

    /// Adds a required, non-nullable parameter.
    pub fn parameter(mut self, name: impl Into<String>, type_ref: impl Into<TypeRef>) -> Self {
        self.parameters.push(Parameter {
            name: name.into(),
            type_ref: type_ref.into(),
            optional: false,
            nullable: false,
        });
        self
    }

    /// Adds an optional, nullable parameter.
    pub fn optional_parameter(
        mut self,
        name: impl Into<String>,
        type_ref: impl Into<TypeRef>,
    ) -> Self {
        self.parameters.push(Parameter {
            name: name.into(),
            type_ref: type_ref.into(),
            optional: true,
            nullable: true,
        });
        self
    }

    /// Sets the return type.
    pub fn returns(mut self, type_ref: impl Into<TypeRef>) -> Self {
        self.return_type = Some(type_ref.into());
        self
    }

    /// Sets the entity-set path of the returned entities.
    pub fn entity_set_path(mut self, path: impl Into<String>) -> Self {
        self.entity_set_path = Some(path.into());
        self
    }

    /// Marks a function composable.
    pub fn composable(mut self) -> Self {
        self.is_composable = true;
        self
    }
}

/// Exposes an unbound operation at the service root.
#[derive(Debug, Clone)]
pub struct OperationImport {
    /// Import name, unqualified.
    pub name: String,
    /// Function import or action import.
    pub kind: OperationKind,
    /// The imported operation.
    pub operation: OperationId,
    /// Entity set holding returned entities.
    pub entity_set: Option<EntitySetId>,
}
