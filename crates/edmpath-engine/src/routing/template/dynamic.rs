//! Dynamic property templates.

use super::TemplateValue;
use crate::routing::context::{RouteValues, TranslateContext};
use crate::routing::segment::{PathSegment, SegmentKind};
use edmpath_common::utils::error::{Specificity, TranslateError};
use edmpath_core::TypeRef;
use std::fmt;

/// Selects a property the schema does not declare, on an open type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DynamicPropertyTemplate {
    name: TemplateValue,
}

impl DynamicPropertyTemplate {
    /// Creates a template whose property name is literal or captured.
    #[must_use]
    pub fn new(name: TemplateValue) -> Self {
        Self { name }
    }

    pub(crate) fn matches(&self, values: &RouteValues) -> bool {
        self.name.is_bound(values)
    }

    pub(crate) fn translate(
        &self,
        ctx: &mut TranslateContext<'_>,
    ) -> Result<PathSegment, TranslateError> {
        let model = ctx.model();
        let name = self
            .name
            .resolve(ctx.route_values())
            .ok_or_else(|| {
                TranslateError::unknown_property(format!("no route value for `{}`", self.name))
            })?
            .to_string();

        let structured = match ctx.edm_type() {
            Some(TypeRef::Entity(id) | TypeRef::Complex(id)) => *id,
            _ => {
                return Err(TranslateError::unknown_property(format!(
                    "`{name}` needs a single structured value"
                )));
            }
        };
        if !model.is_open(structured) {
            return Err(TranslateError::unknown_property(format!(
                "{} has no property `{name}` and is not open",
                model.schema_type(structured).qualified_name()
            )));
        }
        let lookup = ctx.name_lookup();
        if model.find_property(structured, &name, lookup).is_some()
            || model.find_navigation_property(structured, &name, lookup).is_some()
        {
            return Err(TranslateError::unknown_property(format!(
                "`{name}` is declared, not dynamic"
            ))
            .with_specificity(Specificity::NoMatch));
        }

        ctx.advance(None, Some(TypeRef::Untyped));
        Ok(PathSegment::new(
            SegmentKind::DynamicProperty { name },
            Some(TypeRef::Untyped),
            None,
        ))
    }
}

impl fmt::Display for DynamicPropertyTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::context::RequestInfo;
    use crate::routing::template::key::{KeySyntax, KeyTemplate, KeyValues};
    use crate::routing::template::EntitySetTemplate;
    use edmpath_common::utils::error::TranslateErrorKind;
    use edmpath_core::edm::{EdmModel, sample};

    fn single_customer(model: &EdmModel) -> TranslateContext<'_> {
        let mut ctx = TranslateContext::new(model, RequestInfo::default())
            .with_route_values(RouteValues::new().with("prop", "Mood"));
        EntitySetTemplate::new("Customers").translate(&mut ctx).unwrap();
        KeyTemplate::new(
            KeySyntax::Parenthesis,
            KeyValues::Single(TemplateValue::Literal("1".to_string())),
        )
        .translate(&mut ctx)
        .unwrap();
        ctx
    }

    #[test]
    fn test_dynamic_on_open_type() {
        let model = sample::open_type_model().unwrap();
        let mut ctx = single_customer(&model);
        let template = DynamicPropertyTemplate::new(TemplateValue::Placeholder {
            name: "prop".to_string(),
            occurrence: 0,
        });
        let segment = template.translate(&mut ctx).unwrap();
        assert_eq!(segment.to_string(), "Mood");
        assert_eq!(ctx.edm_type(), Some(&TypeRef::Untyped));
        assert_eq!(ctx.navigation_source(), None);
    }

    #[test]
    fn test_dynamic_on_closed_type() {
        let model = sample::customer_order_model().unwrap();
        let mut ctx = single_customer(&model);
        let template = DynamicPropertyTemplate::new(TemplateValue::Literal("Mood".to_string()));
        let err = template.translate(&mut ctx).unwrap_err();
        assert_eq!(err.kind(), TranslateErrorKind::UnknownProperty);
    }

    #[test]
    fn test_declared_name_is_not_dynamic() {
        let model = sample::open_type_model().unwrap();
        let mut ctx = single_customer(&model);
        let template = DynamicPropertyTemplate::new(TemplateValue::Literal("Name".to_string()));
        assert!(template.translate(&mut ctx).is_err());
    }
}
