//! Type cast templates.

use crate::routing::context::TranslateContext;
use crate::routing::segment::{PathSegment, SegmentKind};
use edmpath_common::utils::error::{Specificity, TranslateError};
use std::fmt;

/// Narrows the current (element) type to a derived type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CastTemplate {
    qualified_name: String,
}

impl CastTemplate {
    /// Creates a cast to the type named `qualified_name`.
    pub fn new(qualified_name: impl Into<String>) -> Self {
        Self {
            qualified_name: qualified_name.into(),
        }
    }

    /// Returns the target type name as written in the pattern.
    #[must_use]
    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    pub(crate) fn translate(
        &self,
        ctx: &mut TranslateContext<'_>,
    ) -> Result<PathSegment, TranslateError> {
        let model = ctx.model();
        let target = model
            .find_type(&self.qualified_name, ctx.name_lookup())
            .ok_or_else(|| {
                TranslateError::invalid_cast(format!("no type named `{}`", self.qualified_name))
                    .with_specificity(Specificity::UnknownName)
            })?;

        let current = ctx.edm_type().cloned().ok_or_else(|| {
            TranslateError::invalid_cast("a cast needs a structured type to narrow")
        })?;
        let Some(current_id) = current.structured_id() else {
            return Err(TranslateError::invalid_cast(format!(
                "cannot cast {} to a structured type",
                model.type_name(&current)
            )));
        };

        let same_kind = match (model.structured_type(target), model.structured_type(current_id)) {
            (Some(t), Some(c)) => t.kind == c.kind,
            _ => false,
        };
        if !same_kind || !model.is_subtype_of(target, current_id) {
            return Err(TranslateError::invalid_cast(format!(
                "{} does not derive from {}",
                model.schema_type(target).qualified_name(),
                model.schema_type(current_id).qualified_name()
            )));
        }

        let edm_type = current.with_structured(target);
        let source = ctx.navigation_source();
        ctx.advance(source, Some(edm_type.clone()));
        Ok(PathSegment::new(
            SegmentKind::TypeCast {
                id: target,
                name: model.schema_type(target).qualified_name().to_string(),
            },
            Some(edm_type),
            source,
        ))
    }
}

impl fmt::Display for CastTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.qualified_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::context::RequestInfo;
    use crate::routing::template::EntitySetTemplate;
    use edmpath_common::utils::error::TranslateErrorKind;
    use edmpath_core::edm::sample;
    use edmpath_core::{NameLookup, SchemaGraph, TypeRef};

    fn cast_on_customers(name: &str) -> (Result<PathSegment, TranslateError>, Option<TypeRef>) {
        let model = sample::customer_order_model().unwrap();
        let mut ctx = TranslateContext::new(&model, RequestInfo::default());
        EntitySetTemplate::new("Customers").translate(&mut ctx).unwrap();
        let result = CastTemplate::new(name).translate(&mut ctx);
        let ty = ctx.edm_type().cloned();
        (result, ty)
    }

    #[test]
    fn test_cast_to_derived_keeps_collection() {
        let model = sample::customer_order_model().unwrap();
        let special = model
            .find_type("Default.SpecialCustomer", NameLookup::Exact)
            .unwrap();
        let (result, ty) = cast_on_customers("Default.SpecialCustomer");
        assert!(result.is_ok());
        assert_eq!(ty, Some(TypeRef::collection(TypeRef::Entity(special))));
    }

    #[test]
    fn test_cast_to_same_type_allowed() {
        let (result, _) = cast_on_customers("Default.Customer");
        assert!(result.is_ok());
    }

    #[test]
    fn test_cast_to_unrelated_type() {
        let (result, _) = cast_on_customers("Default.Order");
        let err = result.unwrap_err();
        assert_eq!(err.kind(), TranslateErrorKind::InvalidCast);
        assert_eq!(err.specificity(), Specificity::Invalid);
    }

    #[test]
    fn test_cast_to_unknown_type() {
        let (result, _) = cast_on_customers("Default.Nope");
        let err = result.unwrap_err();
        assert_eq!(err.kind(), TranslateErrorKind::InvalidCast);
        assert_eq!(err.specificity(), Specificity::UnknownName);
    }

    #[test]
    fn test_cast_to_complex_from_entity() {
        let (result, _) = cast_on_customers("Default.Address");
        assert_eq!(result.unwrap_err().kind(), TranslateErrorKind::InvalidCast);
    }
}
