//! `$metadata`, `$count`, `$value`, and `$ref`.

use crate::routing::context::TranslateContext;
use crate::routing::segment::{PathSegment, SegmentKind, TerminalKind};
use edmpath_common::types::PrimitiveKind;
use edmpath_common::utils::error::TranslateError;
use edmpath_core::{SchemaGraph, TypeId, TypeRef};
use std::fmt;

/// A terminal keyword segment.
///
/// Terminal segments leave the navigation source and type unchanged; they
/// only mark the walk as finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalTemplate {
    kind: TerminalKind,
}

impl TerminalTemplate {
    /// `$metadata`
    pub const METADATA: Self = Self::new(TerminalKind::Metadata);
    /// `$count`
    pub const COUNT: Self = Self::new(TerminalKind::Count);
    /// `$value`
    pub const VALUE: Self = Self::new(TerminalKind::Value);
    /// `$ref`
    pub const REF: Self = Self::new(TerminalKind::Ref);

    const fn new(kind: TerminalKind) -> Self {
        Self { kind }
    }

    /// Returns the terminal kind.
    #[must_use]
    pub fn kind(&self) -> TerminalKind {
        self.kind
    }

    pub(crate) fn translate(
        &self,
        ctx: &mut TranslateContext<'_>,
    ) -> Result<PathSegment, TranslateError> {
        let model = ctx.model();
        let current = ctx.edm_type();
        let describe = || {
            current.map_or_else(|| "the service root".to_string(), |t| model.type_name(t))
        };

        let (kind, segment_type) = match self.kind {
            TerminalKind::Metadata => {
                if !ctx.is_at_root() {
                    return Err(TranslateError::unsupported_terminal(
                        "$metadata must be the only segment",
                    ));
                }
                (SegmentKind::Metadata, None)
            }
            TerminalKind::Count => match current {
                Some(ty) if ty.is_collection() => (
                    SegmentKind::Count,
                    Some(TypeRef::Primitive(PrimitiveKind::Int32)),
                ),
                _ => {
                    return Err(TranslateError::unsupported_terminal(format!(
                        "$count applies to collections, not {}",
                        describe()
                    )));
                }
            },
            TerminalKind::Value => match current {
                Some(ty) if ty.is_single_scalar() => (SegmentKind::Value, Some(ty.clone())),
                Some(TypeRef::Entity(id)) if has_stream(model, *id) => {
                    (SegmentKind::Value, Some(TypeRef::Entity(*id)))
                }
                _ => {
                    return Err(TranslateError::unsupported_terminal(format!(
                        "$value applies to single primitive values and media entities, not {}",
                        describe()
                    )));
                }
            },
            TerminalKind::Ref => match current {
                Some(ty) if ty.entity_id().is_some() => (SegmentKind::Ref, Some(ty.clone())),
                _ => {
                    return Err(TranslateError::unsupported_terminal(format!(
                        "$ref applies to entities, not {}",
                        describe()
                    )));
                }
            },
            TerminalKind::Operation => {
                return Err(TranslateError::unsupported_terminal(
                    "operations are not terminal templates",
                ));
            }
        };

        let source = ctx.navigation_source();
        ctx.mark_terminal(self.kind);
        Ok(PathSegment::new(kind, segment_type, source))
    }
}

fn has_stream(model: &dyn SchemaGraph, entity: TypeId) -> bool {
    let mut current = Some(entity);
    while let Some(id) = current {
        match model.structured_type(id) {
            Some(t) if t.has_stream => return true,
            Some(t) => current = t.base,
            None => return false,
        }
    }
    false
}

impl fmt::Display for TerminalTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::context::RequestInfo;
    use crate::routing::template::key::{KeySyntax, KeyTemplate, KeyValues};
    use crate::routing::template::{EntitySetTemplate, PropertyTemplate, TemplateValue};
    use edmpath_common::utils::error::TranslateErrorKind;
    use edmpath_core::edm::{EdmModel, sample};

    fn key_one() -> KeyTemplate {
        KeyTemplate::new(
            KeySyntax::Parenthesis,
            KeyValues::Single(TemplateValue::Literal("1".to_string())),
        )
    }

    fn entity_set<'m>(model: &'m EdmModel, name: &str) -> TranslateContext<'m> {
        let mut ctx = TranslateContext::new(model, RequestInfo::default());
        EntitySetTemplate::new(name).translate(&mut ctx).unwrap();
        ctx
    }

    #[test]
    fn test_count_on_collection() {
        let model = sample::customer_order_model().unwrap();
        let mut ctx = entity_set(&model, "Customers");
        let before = ctx.edm_type().cloned();
        let segment = TerminalTemplate::COUNT.translate(&mut ctx).unwrap();
        assert_eq!(
            segment.edm_type(),
            Some(&TypeRef::Primitive(PrimitiveKind::Int32))
        );
        assert_eq!(ctx.edm_type().cloned(), before);
        assert_eq!(ctx.terminal(), Some(TerminalKind::Count));
    }

    #[test]
    fn test_count_on_single_entity() {
        let model = sample::customer_order_model().unwrap();
        let mut ctx = entity_set(&model, "Customers");
        key_one().translate(&mut ctx).unwrap();
        let err = TerminalTemplate::COUNT.translate(&mut ctx).unwrap_err();
        assert_eq!(err.kind(), TranslateErrorKind::UnsupportedTerminal);
    }

    #[test]
    fn test_value_rules() {
        let model = sample::customer_order_model().unwrap();

        let mut ctx = entity_set(&model, "Customers");
        key_one().translate(&mut ctx).unwrap();
        assert!(TerminalTemplate::VALUE.translate(&mut ctx).is_err());
        PropertyTemplate::new("FirstName").translate(&mut ctx).unwrap();
        assert!(TerminalTemplate::VALUE.translate(&mut ctx).is_ok());

        let mut ctx = entity_set(&model, "Photos");
        key_one().translate(&mut ctx).unwrap();
        assert!(TerminalTemplate::VALUE.translate(&mut ctx).is_ok());
    }

    #[test]
    fn test_ref_rules() {
        let model = sample::customer_order_model().unwrap();
        let mut ctx = entity_set(&model, "Customers");
        assert!(TerminalTemplate::REF.translate(&mut ctx).is_ok());

        let mut ctx = entity_set(&model, "Customers");
        key_one().translate(&mut ctx).unwrap();
        PropertyTemplate::new("Address").translate(&mut ctx).unwrap();
        assert!(TerminalTemplate::REF.translate(&mut ctx).is_err());
    }

    #[test]
    fn test_metadata_only_at_root() {
        let model = sample::customer_order_model().unwrap();
        let mut ctx = TranslateContext::new(&model, RequestInfo::default());
        assert!(TerminalTemplate::METADATA.translate(&mut ctx).is_ok());

        let mut ctx = entity_set(&model, "Customers");
        assert!(TerminalTemplate::METADATA.translate(&mut ctx).is_err());
    }
}
