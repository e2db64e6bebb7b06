//! Bound operation and operation import templates.
//!
//! Both resolve overloads the same way. A candidate must accept the call
//! syntax (parentheses mean a function), its binding parameter must accept
//! the current type, and the supplied arguments must name declared
//! parameters, cover the required ones, and parse to their types. Among the
//! survivors the one closest to the current type in the inheritance chain
//! wins, then the one leaving out the fewest optional parameters.

use super::TemplateValue;
use crate::routing::context::{RouteValues, TranslateContext};
use crate::routing::segment::{
    ParameterValue, PathSegment, SegmentKind, TerminalKind, write_arguments,
};
use edmpath_common::types::{LiteralOptions, Value};
use edmpath_common::utils::error::{Specificity, TranslateError};
use edmpath_core::edm::{Operation, Parameter, parse_value};
use edmpath_core::{NameLookup, NavigationSourceRef, OperationKind, SchemaGraph, TypeRef};
use smallvec::SmallVec;
use std::fmt;

/// Arguments written in a template, `None` when the call has no parentheses.
pub type Arguments = Option<SmallVec<[(String, TemplateValue); 2]>>;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Call {
    name: String,
    arguments: Arguments,
    allow_bare_function: bool,
}

impl Call {
    fn matches(&self, values: &RouteValues) -> bool {
        self.arguments
            .iter()
            .flatten()
            .all(|(_, value)| value.is_bound(values))
    }

    fn accepts_syntax(&self, op: &Operation) -> bool {
        match (&self.arguments, op.kind) {
            (Some(_), OperationKind::Function) | (None, OperationKind::Action) => true,
            (Some(_), OperationKind::Action) => false,
            (None, OperationKind::Function) => {
                self.allow_bare_function && op.call_parameters().is_empty()
            }
        }
    }

    /// Binds the supplied arguments to `declared`, in declaration order.
    ///
    /// Returns the number of optional parameters left out, or `None` if the
    /// arguments do not fit.
    fn bind(
        &self,
        model: &dyn SchemaGraph,
        lookup: NameLookup,
        declared: &[Parameter],
        values: &RouteValues,
    ) -> Option<(usize, Vec<(String, ParameterValue)>)> {
        let mut bound: Vec<Option<ParameterValue>> = vec![None; declared.len()];
        for (name, value) in self.arguments.iter().flatten() {
            let position = declared.iter().position(|p| lookup.matches(&p.name, name))?;
            if bound[position].is_some() {
                return None;
            }
            let param = &declared[position];
            let raw = value.resolve(values)?.trim();
            let value = if raw == "null" {
                if !param.nullable {
                    return None;
                }
                ParameterValue::Literal(Value::Null)
            } else if raw.starts_with('@') {
                ParameterValue::Alias(raw.to_string())
            } else {
                ParameterValue::Literal(
                    parse_value(model, raw, &param.type_ref, LiteralOptions::default()).ok()?,
                )
            };
            bound[position] = Some(value);
        }

        let mut omitted = 0;
        let mut parameters = Vec::with_capacity(bound.len());
        for (param, value) in declared.iter().zip(bound) {
            match value {
                Some(value) => parameters.push((param.name.clone(), value)),
                None if param.optional => omitted += 1,
                None => return None,
            }
        }
        Some((omitted, parameters))
    }
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        match &self.arguments {
            Some(args) => write_arguments(f, args),
            None => Ok(()),
        }
    }
}

struct Candidate<Id> {
    id: Id,
    rank: (usize, usize),
    parameters: Vec<(String, ParameterValue)>,
}

/// Picks the most specific candidate.
fn select<Id: Copy>(
    name: &str,
    candidates: Vec<Candidate<Id>>,
) -> Result<(Id, Vec<(String, ParameterValue)>), TranslateError> {
    let Some(best) = candidates.iter().map(|c| c.rank).min() else {
        return Err(TranslateError::unknown_operation(format!(
            "no overload of `{name}` accepts this call"
        ))
        .with_specificity(Specificity::Invalid));
    };
    let mut winners = candidates.into_iter().filter(|c| c.rank == best);
    let winner = winners
        .next()
        .ok_or_else(|| TranslateError::unknown_operation(format!("no overload of `{name}`")))?;
    let others = winners.count();
    if others > 0 {
        return Err(TranslateError::ambiguous_operation(format!(
            "{} overloads of `{name}` match equally well",
            others + 1
        )));
    }
    Ok((winner.id, winner.parameters))
}

/// Inheritance steps from `current` up to `binding`, when the binding
/// parameter accepts the current value.
fn binding_distance(
    model: &dyn SchemaGraph,
    binding: &TypeRef,
    current: &TypeRef,
) -> Option<usize> {
    if binding.is_collection() != current.is_collection() {
        return None;
    }
    match (binding.element(), current.element()) {
        (
            TypeRef::Entity(b) | TypeRef::Complex(b),
            TypeRef::Entity(c) | TypeRef::Complex(c),
        ) => model.derivation_distance(*c, *b),
        (b, c) => (b == c).then_some(0),
    }
}

/// Follows an entity-set path such as `bindingParameter/Orders` from the
/// binding value's navigation source.
fn entity_set_path_target(
    model: &dyn SchemaGraph,
    op: &Operation,
    source: Option<NavigationSourceRef>,
    binding_value: &TypeRef,
) -> Option<NavigationSourceRef> {
    let path = op.entity_set_path.as_deref()?;
    let mut source = source?;
    let mut entity = binding_value.entity_id()?;
    for step in path.split('/').skip(1) {
        if step.contains('.') {
            entity = model.find_type(step, NameLookup::Exact)?;
            continue;
        }
        let (declaring, nav) = model.find_navigation_property(entity, step, NameLookup::Exact)?;
        source = model.navigation_target(source, declaring, &nav.name)?;
        entity = nav.target;
    }
    Some(source)
}

/// Action parameters travel in the request body.
fn url_parameters(op: &Operation) -> &[Parameter] {
    match op.kind {
        OperationKind::Function => op.call_parameters(),
        OperationKind::Action => &[],
    }
}

fn is_terminal(op: &Operation) -> bool {
    op.kind == OperationKind::Action || !op.is_composable
}

/// Calls a bound function or action on the current value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationTemplate {
    call: Call,
}

impl OperationTemplate {
    /// Creates a template calling `name` with `arguments`.
    pub fn new(name: impl Into<String>, arguments: Arguments) -> Self {
        Self {
            call: Call {
                name: name.into(),
                arguments,
                allow_bare_function: false,
            },
        }
    }

    /// Lets parameterless functions be called without parentheses.
    #[must_use]
    pub fn with_bare_function(mut self, enabled: bool) -> Self {
        self.call.allow_bare_function = enabled;
        self
    }

    /// Returns the operation name as written in the pattern.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.call.name
    }

    pub(crate) fn matches(&self, values: &RouteValues) -> bool {
        self.call.matches(values)
    }

    pub(crate) fn translate(
        &self,
        ctx: &mut TranslateContext<'_>,
    ) -> Result<PathSegment, TranslateError> {
        let model = ctx.model();
        let lookup = ctx.name_lookup();
        let name = &self.call.name;

        let bound: Vec<_> = model
            .find_operations(name, lookup)
            .into_iter()
            .filter(|id| model.operation(*id).is_bound)
            .collect();
        if bound.is_empty() {
            return Err(TranslateError::unknown_operation(format!(
                "no bound operation named `{name}`"
            )));
        }
        let current = ctx.edm_type().cloned().ok_or_else(|| {
            TranslateError::unknown_operation(format!("`{name}` needs a value to bind to"))
                .with_specificity(Specificity::Invalid)
        })?;

        let mut candidates = Vec::new();
        for id in bound {
            let op = model.operation(id);
            if !self.call.accepts_syntax(op) {
                continue;
            }
            let Some(binding) = op.binding_parameter() else {
                continue;
            };
            let Some(distance) = binding_distance(model, &binding.type_ref, &current) else {
                continue;
            };
            let Some((omitted, parameters)) =
                self.call
                    .bind(model, lookup, url_parameters(op), ctx.route_values())
            else {
                continue;
            };
            candidates.push(Candidate {
                id,
                rank: (distance, omitted),
                parameters,
            });
        }

        let (id, parameters) = select(name, candidates)?;
        let op = model.operation(id);
        let edm_type = op.return_type.clone();
        let source = entity_set_path_target(model, op, ctx.navigation_source(), &current);
        ctx.advance(source, edm_type.clone());
        if is_terminal(op) {
            ctx.mark_terminal(TerminalKind::Operation);
        }
        Ok(PathSegment::new(
            SegmentKind::Operation {
                id,
                name: op.qualified_name.clone(),
                kind: op.kind,
                parameters,
            },
            edm_type,
            source,
        ))
    }
}

impl fmt::Display for OperationTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.call)
    }
}

/// Calls a function or action import at the service root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationImportTemplate {
    call: Call,
}

impl OperationImportTemplate {
    /// Creates a template calling the import `name` with `arguments`.
    pub fn new(name: impl Into<String>, arguments: Arguments) -> Self {
        Self {
            call: Call {
                name: name.into(),
                arguments,
                allow_bare_function: false,
            },
        }
    }

    /// Lets parameterless function imports be called without parentheses.
    #[must_use]
    pub fn with_bare_function(mut self, enabled: bool) -> Self {
        self.call.allow_bare_function = enabled;
        self
    }

    /// Returns the import name as written in the pattern.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.call.name
    }

    pub(crate) fn matches(&self, values: &RouteValues) -> bool {
        self.call.matches(values)
    }

    pub(crate) fn translate(
        &self,
        ctx: &mut TranslateContext<'_>,
    ) -> Result<PathSegment, TranslateError> {
        let model = ctx.model();
        let lookup = ctx.name_lookup();
        let name = &self.call.name;

        let imports = model.find_operation_imports(name, lookup);
        if imports.is_empty() {
            return Err(TranslateError::unknown_operation(format!(
                "no operation import named `{name}`"
            )));
        }

        let mut candidates = Vec::new();
        for id in imports {
            let op = model.operation(model.operation_import(id).operation);
            if !self.call.accepts_syntax(op) {
                continue;
            }
            if let Some((omitted, parameters)) =
                self.call
                    .bind(model, lookup, url_parameters(op), ctx.route_values())
            {
                candidates.push(Candidate {
                    id,
                    rank: (0, omitted),
                    parameters,
                });
            }
        }

        let (id, parameters) = select(name, candidates)?;
        let import = model.operation_import(id);
        let op = model.operation(import.operation);
        let edm_type = op.return_type.clone();
        let source = import.entity_set.map(NavigationSourceRef::EntitySet);
        ctx.advance(source, edm_type.clone());
        if is_terminal(op) {
            ctx.mark_terminal(TerminalKind::Operation);
        }
        Ok(PathSegment::new(
            SegmentKind::OperationImport {
                id,
                name: import.name.clone(),
                kind: op.kind,
                parameters,
            },
            edm_type,
            source,
        ))
    }
}

impl fmt::Display for OperationImportTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.call)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::context::RequestInfo;
    use crate::routing::template::key::{KeySyntax, KeyTemplate, KeyValues};
    use crate::routing::template::{CastTemplate, EntitySetTemplate};
    use edmpath_common::utils::error::TranslateErrorKind;
    use edmpath_core::edm::{EdmModel, sample};
    use smallvec::smallvec;

    fn literal(text: &str) -> TemplateValue {
        TemplateValue::Literal(text.to_string())
    }

    fn args(pairs: &[(&str, &str)]) -> Arguments {
        Some(
            pairs
                .iter()
                .map(|(name, value)| ((*name).to_string(), literal(value)))
                .collect(),
        )
    }

    fn customer_one(model: &EdmModel) -> TranslateContext<'_> {
        let mut ctx = TranslateContext::new(model, RequestInfo::default());
        EntitySetTemplate::new("Customers").translate(&mut ctx).unwrap();
        KeyTemplate::new(KeySyntax::Parenthesis, KeyValues::Single(literal("1")))
            .translate(&mut ctx)
            .unwrap();
        ctx
    }

    fn operation_name(segment: &PathSegment) -> &str {
        match segment.kind() {
            SegmentKind::Operation { name, .. } | SegmentKind::OperationImport { name, .. } => name,
            other => panic!("expected operation, got {other:?}"),
        }
    }

    #[test]
    fn test_overload_by_parameters() {
        let model = sample::customer_order_model().unwrap();
        let orders = model.find_entity_set("Orders", NameLookup::Exact).unwrap();

        let mut ctx = customer_one(&model);
        let segment = OperationTemplate::new("GetTopOrders", args(&[]))
            .translate(&mut ctx)
            .unwrap();
        assert_eq!(segment.to_string(), "Default.GetTopOrders()");
        assert_eq!(ctx.navigation_source(), Some(NavigationSourceRef::EntitySet(orders)));
        assert_eq!(ctx.terminal(), None);

        let mut ctx = customer_one(&model);
        let segment = OperationTemplate::new("Default.GetTopOrders", args(&[("n", "5")]))
            .translate(&mut ctx)
            .unwrap();
        assert_eq!(segment.to_string(), "Default.GetTopOrders(n=5)");
    }

    #[test]
    fn test_most_derived_binding_wins() {
        let model = sample::customer_order_model().unwrap();
        let mut ctx = customer_one(&model);
        CastTemplate::new("Default.SpecialCustomer")
            .translate(&mut ctx)
            .unwrap();
        let segment = OperationTemplate::new("Describe", args(&[]))
            .translate(&mut ctx)
            .unwrap();
        let SegmentKind::Operation { id, .. } = segment.kind() else {
            panic!("expected operation");
        };
        let binding = model.operation(*id).binding_parameter().unwrap();
        let special = model
            .find_type("Default.SpecialCustomer", NameLookup::Exact)
            .unwrap();
        assert_eq!(binding.type_ref, TypeRef::Entity(special));
        assert_eq!(ctx.terminal(), Some(TerminalKind::Operation));
    }

    #[test]
    fn test_ambiguous_overloads() {
        let model = sample::customer_order_model().unwrap();
        let mut ctx = TranslateContext::new(&model, RequestInfo::default());
        EntitySetTemplate::new("Orders").translate(&mut ctx).unwrap();
        let snapshot = ctx.snapshot();

        let err = OperationTemplate::new("Find", args(&[("value", "5")]))
            .translate(&mut ctx)
            .unwrap_err();
        assert_eq!(err.kind(), TranslateErrorKind::AmbiguousOperation);

        ctx.restore(snapshot);
        let segment = OperationTemplate::new("Find", args(&[("value", "5000000000")]))
            .translate(&mut ctx)
            .unwrap();
        assert_eq!(operation_name(&segment), "Default.Find");
    }

    #[test]
    fn test_optional_parameters() {
        let model = sample::customer_order_model().unwrap();
        let mut ctx = customer_one(&model);
        let segment = OperationTemplate::new("GetOrdersSince", args(&[("since", "2024-01-31")]))
            .translate(&mut ctx)
            .unwrap();
        assert_eq!(segment.to_string(), "Default.GetOrdersSince(since=2024-01-31)");

        let mut ctx = customer_one(&model);
        let segment = OperationTemplate::new(
            "GetOrdersSince",
            args(&[("max", "null"), ("since", "@start")]),
        )
        .translate(&mut ctx)
        .unwrap();
        assert_eq!(segment.to_string(), "Default.GetOrdersSince(since=@start,max=null)");
    }

    #[test]
    fn test_incompatible_calls() {
        let model = sample::customer_order_model().unwrap();

        // Required parameter missing.
        let mut ctx = customer_one(&model);
        let err = OperationTemplate::new("GetOrdersSince", args(&[]))
            .translate(&mut ctx)
            .unwrap_err();
        assert_eq!(err.kind(), TranslateErrorKind::UnknownOperation);
        assert_eq!(err.specificity(), Specificity::Invalid);

        // Null for a non-nullable parameter.
        let mut ctx = customer_one(&model);
        assert!(
            OperationTemplate::new("GetTopOrders", args(&[("n", "null")]))
                .translate(&mut ctx)
                .is_err()
        );

        // A string where the parameter is an Int32.
        let mut ctx = customer_one(&model);
        let err = OperationTemplate::new("GetTopOrders", args(&[("n", "'abc'")]))
            .translate(&mut ctx)
            .unwrap_err();
        assert_eq!(err.kind(), TranslateErrorKind::UnknownOperation);

        // Bound to a single customer, not the collection.
        let mut ctx = TranslateContext::new(&model, RequestInfo::default());
        EntitySetTemplate::new("Customers").translate(&mut ctx).unwrap();
        assert!(
            OperationTemplate::new("GetTopOrders", args(&[]))
                .translate(&mut ctx)
                .is_err()
        );

        // Unknown name.
        let mut ctx = customer_one(&model);
        let err = OperationTemplate::new("Nope", args(&[]))
            .translate(&mut ctx)
            .unwrap_err();
        assert_eq!(err.specificity(), Specificity::UnknownName);
    }

    #[test]
    fn test_collection_bound_function() {
        let model = sample::customer_order_model().unwrap();
        let customers = model.find_entity_set("Customers", NameLookup::Exact).unwrap();
        let mut ctx = TranslateContext::new(&model, RequestInfo::default());
        EntitySetTemplate::new("Customers").translate(&mut ctx).unwrap();
        OperationTemplate::new("GetMostValuable", args(&[]))
            .translate(&mut ctx)
            .unwrap();
        assert_eq!(ctx.navigation_source(), Some(NavigationSourceRef::EntitySet(customers)));
    }

    #[test]
    fn test_enum_parameter() {
        let model = sample::customer_order_model().unwrap();
        let mut ctx = TranslateContext::new(&model, RequestInfo::default());
        EntitySetTemplate::new("Customers").translate(&mut ctx).unwrap();
        let segment = OperationTemplate::new(
            "CountByLevel",
            args(&[("level", "Default.CustomerLevel'Gold'")]),
        )
        .translate(&mut ctx)
        .unwrap();
        assert_eq!(
            segment.to_string(),
            "Default.CountByLevel(level=Default.CustomerLevel'Gold')"
        );
    }

    #[test]
    fn test_action_syntax() {
        let model = sample::customer_order_model().unwrap();

        let mut ctx = customer_one(&model);
        let segment = OperationTemplate::new("Rate", None).translate(&mut ctx).unwrap();
        assert_eq!(segment.to_string(), "Default.Rate");
        assert_eq!(ctx.terminal(), Some(TerminalKind::Operation));
        assert_eq!(ctx.edm_type(), None);

        // Parentheses call functions only.
        let mut ctx = customer_one(&model);
        assert!(
            OperationTemplate::new("Rate", args(&[]))
                .translate(&mut ctx)
                .is_err()
        );
    }

    #[test]
    fn test_bare_function_needs_opt_in() {
        let model = sample::customer_order_model().unwrap();
        let mut ctx = customer_one(&model);
        assert!(
            OperationTemplate::new("GetTopOrders", None)
                .translate(&mut ctx)
                .is_err()
        );
        let mut ctx = customer_one(&model);
        assert!(
            OperationTemplate::new("GetTopOrders", None)
                .with_bare_function(true)
                .translate(&mut ctx)
                .is_ok()
        );
    }

    #[test]
    fn test_imports() {
        let model = sample::customer_order_model().unwrap();
        let customers = model.find_entity_set("Customers", NameLookup::Exact).unwrap();

        let mut ctx = TranslateContext::new(&model, RequestInfo::default());
        let segment =
            OperationImportTemplate::new("GetCustomersByCity", args(&[("city", "'Oslo'")]))
                .translate(&mut ctx)
                .unwrap();
        assert_eq!(segment.to_string(), "GetCustomersByCity(city='Oslo')");
        assert_eq!(ctx.navigation_source(), Some(NavigationSourceRef::EntitySet(customers)));
        assert_eq!(ctx.terminal(), None);

        let mut ctx = TranslateContext::new(&model, RequestInfo::default());
        OperationImportTemplate::new("GetCustomerCount", args(&[]))
            .translate(&mut ctx)
            .unwrap();
        assert_eq!(ctx.terminal(), Some(TerminalKind::Operation));

        let mut ctx = TranslateContext::new(&model, RequestInfo::default());
        OperationImportTemplate::new("ResetDataSource", None)
            .translate(&mut ctx)
            .unwrap();
        assert_eq!(ctx.terminal(), Some(TerminalKind::Operation));
    }

    #[test]
    fn test_matches_placeholders() {
        let template = OperationTemplate::new(
            "GetTopOrders",
            Some(smallvec![(
                "n".to_string(),
                TemplateValue::Placeholder {
                    name: "n".to_string(),
                    occurrence: 0,
                }
            )]),
        );
        assert!(!template.matches(&RouteValues::new()));
        assert!(template.matches(&RouteValues::new().with("n", "3")));
        assert_eq!(template.to_string(), "GetTopOrders(n={n})");
    }
}
