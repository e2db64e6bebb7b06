//! Navigation and structural property templates.

use crate::routing::context::TranslateContext;
use crate::routing::segment::{PathSegment, SegmentKind};
use edmpath_common::utils::error::{Specificity, TranslateError};
use edmpath_core::TypeRef;
use std::fmt;

/// Follows a navigation property from a single entity or complex value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationTemplate {
    name: String,
}

impl NavigationTemplate {
    /// Creates a template for the navigation property `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Returns the property name as written in the pattern.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn translate(
        &self,
        ctx: &mut TranslateContext<'_>,
    ) -> Result<PathSegment, TranslateError> {
        let model = ctx.model();
        let origin = match ctx.edm_type() {
            Some(TypeRef::Entity(id) | TypeRef::Complex(id)) => *id,
            Some(TypeRef::Collection(inner)) => {
                let declared = inner.structured_id().is_some_and(|id| {
                    model
                        .find_navigation_property(id, &self.name, ctx.name_lookup())
                        .is_some()
                });
                let error = TranslateError::unknown_navigation(format!(
                    "cannot navigate `{}` from a collection; select one entity first",
                    self.name
                ));
                return Err(if declared {
                    error.with_specificity(Specificity::Invalid)
                } else {
                    error
                });
            }
            _ => {
                return Err(TranslateError::unknown_navigation(format!(
                    "`{}` needs a single structured value to navigate from",
                    self.name
                )));
            }
        };

        let (declaring, nav) = model
            .find_navigation_property(origin, &self.name, ctx.name_lookup())
            .ok_or_else(|| {
                TranslateError::unknown_navigation(format!(
                    "{} has no navigation property `{}`",
                    model.schema_type(origin).qualified_name(),
                    self.name
                ))
            })?;

        let edm_type = nav.target_type();
        // Bindings are keyed by declaring type, so a complex value reached
        // through a property resolves against its entity's source.
        let source = ctx
            .navigation_source()
            .and_then(|source| model.navigation_target(source, declaring, &nav.name));
        ctx.advance(source, Some(edm_type.clone()));
        Ok(PathSegment::new(
            SegmentKind::Navigation {
                declaring_type: declaring,
                name: nav.name.clone(),
            },
            Some(edm_type),
            source,
        ))
    }
}

impl fmt::Display for NavigationTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Selects a declared structural property of a single structured value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyTemplate {
    name: String,
}

impl PropertyTemplate {
    /// Creates a template for the property `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Returns the property name as written in the pattern.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn translate(
        &self,
        ctx: &mut TranslateContext<'_>,
    ) -> Result<PathSegment, TranslateError> {
        let model = ctx.model();
        let structured = match ctx.edm_type() {
            Some(TypeRef::Entity(id) | TypeRef::Complex(id)) => *id,
            Some(TypeRef::Collection(inner)) => {
                let declared = inner.structured_id().is_some_and(|id| {
                    model.find_property(id, &self.name, ctx.name_lookup()).is_some()
                });
                let error = TranslateError::unknown_property(format!(
                    "cannot select `{}` from a collection",
                    self.name
                ));
                return Err(if declared {
                    error.with_specificity(Specificity::Invalid)
                } else {
                    error
                });
            }
            _ => {
                return Err(TranslateError::unknown_property(format!(
                    "`{}` needs a structured value",
                    self.name
                )));
            }
        };

        let property = model
            .find_property(structured, &self.name, ctx.name_lookup())
            .ok_or_else(|| {
                TranslateError::unknown_property(format!(
                    "{} has no property `{}`",
                    model.schema_type(structured).qualified_name(),
                    self.name
                ))
            })?;

        let edm_type = property.type_ref.clone();
        // Complex values still live in the entity's navigation source.
        let source = match edm_type.element() {
            TypeRef::Complex(_) => ctx.navigation_source(),
            _ => None,
        };
        ctx.advance(source, Some(edm_type.clone()));
        Ok(PathSegment::new(
            SegmentKind::Property {
                name: property.name.clone(),
            },
            Some(edm_type),
            source,
        ))
    }
}

impl fmt::Display for PropertyTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
