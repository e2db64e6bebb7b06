//! Entity set and singleton templates.

use crate::routing::context::TranslateContext;
use crate::routing::segment::{PathSegment, SegmentKind};
use edmpath_common::utils::error::TranslateError;
use edmpath_core::NavigationSourceRef;
use std::fmt;

/// Resolves the first segment to an entity set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitySetTemplate {
    name: String,
}

impl EntitySetTemplate {
    /// Creates a template for the entity set `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Returns the entity set name as written in the pattern.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn translate(
        &self,
        ctx: &mut TranslateContext<'_>,
    ) -> Result<PathSegment, TranslateError> {
        let model = ctx.model();
        let id = model
            .find_entity_set(&self.name, ctx.name_lookup())
            .ok_or_else(|| {
                TranslateError::unknown_navigation(format!("no entity set named `{}`", self.name))
            })?;
        let source = NavigationSourceRef::EntitySet(id);
        let edm_type = model.navigation_source_type(source);
        ctx.advance(Some(source), Some(edm_type.clone()));
        Ok(PathSegment::new(
            SegmentKind::EntitySet {
                id,
                name: model.entity_set(id).name.clone(),
            },
            Some(edm_type),
            Some(source),
        ))
    }
}

impl fmt::Display for EntitySetTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Resolves the first segment to a singleton.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingletonTemplate {
    name: String,
}

impl SingletonTemplate {
    /// Creates a template for the singleton `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Returns the singleton name as written in the pattern.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn translate(
        &self,
        ctx: &mut TranslateContext<'_>,
    ) -> Result<PathSegment, TranslateError> {
        let model = ctx.model();
        let id = model
            .find_singleton(&self.name, ctx.name_lookup())
            .ok_or_else(|| {
                TranslateError::unknown_navigation(format!("no singleton named `{}`", self.name))
            })?;
        let source = NavigationSourceRef::Singleton(id);
        let edm_type = model.navigation_source_type(source);
        ctx.advance(Some(source), Some(edm_type.clone()));
        Ok(PathSegment::new(
            SegmentKind::Singleton {
                id,
                name: model.singleton(id).name.clone(),
            },
            Some(edm_type),
            Some(source),
        ))
    }
}

impl fmt::Display for SingletonTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::context::RequestInfo;
    use edmpath_core::edm::sample;
    use edmpath_core::{NameLookup, TypeRef};

    #[test]
    fn test_entity_set_resolves() {
        let model = sample::customer_order_model().unwrap();
        let mut ctx = TranslateContext::new(&model, RequestInfo::default());
        let segment = EntitySetTemplate::new("Customers").translate(&mut ctx).unwrap();
        assert!(matches!(
            segment.kind(),
            SegmentKind::EntitySet { name, .. } if name == "Customers"
        ));
        assert!(ctx.edm_type().is_some_and(TypeRef::is_collection));
    }

    #[test]
    fn test_case_insensitive_uses_declared_name() {
        let model = sample::customer_order_model().unwrap();
        let mut ctx = TranslateContext::new(&model, RequestInfo::default())
            .with_name_lookup(NameLookup::IgnoreCase);
        let segment = EntitySetTemplate::new("customers").translate(&mut ctx).unwrap();
        assert_eq!(segment.to_string(), "Customers");
    }

    #[test]
    fn test_unknown_entity_set() {
        let model = sample::customer_order_model().unwrap();
        let mut ctx = TranslateContext::new(&model, RequestInfo::default());
        let err = EntitySetTemplate::new("Nope").translate(&mut ctx).unwrap_err();
        assert_eq!(err.kind(), edmpath_common::utils::error::TranslateErrorKind::UnknownNavigation);
    }

    #[test]
    fn test_singleton_is_single_entity() {
        let model = sample::customer_order_model().unwrap();
        let mut ctx = TranslateContext::new(&model, RequestInfo::default());
        SingletonTemplate::new("Me").translate(&mut ctx).unwrap();
        assert!(ctx.edm_type().is_some_and(TypeRef::is_single_entity));
    }
}
