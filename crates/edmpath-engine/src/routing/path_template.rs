//! Compiled route patterns.

use super::context::{RouteValues, TranslateContext};
use super::segment::PathSegment;
use super::template::{ExtensionTemplate, SegmentTemplate};
use edmpath_common::utils::error::TranslateError;
use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;

/// One way of explaining a URL segment: a single template, or a short run
/// that shares the segment (navigation followed by key for `Orders(1)`).
#[derive(Debug, Clone)]
pub struct Alternative {
    templates: SmallVec<[SegmentTemplate; 2]>,
}

impl Alternative {
    /// Creates an alternative from the templates it chains.
    pub fn new(templates: impl IntoIterator<Item = SegmentTemplate>) -> Self {
        Self {
            templates: templates.into_iter().collect(),
        }
    }

    /// Creates an alternative of a single template.
    #[must_use]
    pub fn single(template: SegmentTemplate) -> Self {
        Self::new([template])
    }

    /// Returns the chained templates.
    #[must_use]
    pub fn templates(&self) -> &[SegmentTemplate] {
        &self.templates
    }

    /// Returns the rank of the leading template.
    #[must_use]
    pub fn rank(&self) -> u8 {
        self.templates.first().map_or(u8::MAX, SegmentTemplate::rank)
    }

    /// Returns true if every template can be tried with `values`.
    #[must_use]
    pub fn matches(&self, values: &RouteValues) -> bool {
        self.templates.iter().all(|t| t.matches(values))
    }

    /// Translates every template in turn.
    ///
    /// # Errors
    ///
    /// Returns the first template's error; the context may be partially
    /// advanced and should be restored by the caller.
    pub fn translate(
        &self,
        ctx: &mut TranslateContext<'_>,
    ) -> Result<SmallVec<[PathSegment; 2]>, TranslateError> {
        self.templates.iter().map(|t| t.translate(ctx)).collect()
    }
}

impl fmt::Display for Alternative {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for template in &self.templates {
            write!(f, "{template}")?;
        }
        Ok(())
    }
}

/// The candidate alternatives for one URL segment, in the order they are
/// tried.
///
/// Alternatives are sorted by rank, then by canonical text, so the order
/// never depends on how the slot was assembled.
#[derive(Debug, Clone, Default)]
pub struct TemplateSlot {
    alternatives: Vec<Alternative>,
}

impl TemplateSlot {
    /// Creates a slot, sorting the alternatives and dropping duplicates.
    #[must_use]
    pub fn new(alternatives: Vec<Alternative>) -> Self {
        let mut slot = Self { alternatives };
        slot.normalize();
        slot
    }

    /// Returns the alternatives in trial order.
    #[must_use]
    pub fn alternatives(&self) -> &[Alternative] {
        &self.alternatives
    }

    /// Adds an alternative, keeping the trial order.
    #[must_use]
    pub fn with_alternative(mut self, alternative: Alternative) -> Self {
        self.alternatives.push(alternative);
        self.normalize();
        self
    }

    fn normalize(&mut self) {
        let mut keyed: Vec<_> = self
            .alternatives
            .drain(..)
            .map(|alt| ((alt.rank(), alt.to_string()), alt))
            .collect();
        keyed.sort_by(|a, b| a.0.cmp(&b.0));
        keyed.dedup_by(|a, b| a.0 == b.0);
        self.alternatives = keyed.into_iter().map(|(_, alt)| alt).collect();
    }
}

/// A route pattern compiled into slots.
///
/// Immutable once built and shared across requests.
#[derive(Debug, Clone)]
pub struct PathTemplate {
    pattern: String,
    slots: Vec<TemplateSlot>,
}

impl PathTemplate {
    /// Creates a template from already built slots.
    pub fn new(pattern: impl Into<String>, slots: Vec<TemplateSlot>) -> Self {
        Self {
            pattern: pattern.into(),
            slots,
        }
    }

    /// Returns the pattern this template was compiled from.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Returns the slots in URL order.
    #[must_use]
    pub fn slots(&self) -> &[TemplateSlot] {
        &self.slots
    }

    /// Returns the number of slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true if the template has no slots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Adds a host-supplied template to the slot at `index`, or to a new
    /// trailing slot when `index` is past the end.
    #[must_use]
    pub fn with_extension(mut self, index: usize, extension: Arc<dyn ExtensionTemplate>) -> Self {
        let alternative = Alternative::single(SegmentTemplate::Extension(extension));
        match self.slots.get_mut(index) {
            Some(slot) => *slot = std::mem::take(slot).with_alternative(alternative),
            None => self.slots.push(TemplateSlot::new(vec![alternative])),
        }
        self
    }
}

impl fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::template::{
        EntitySetTemplate, KeySyntax, KeyTemplate, KeyValues, NavigationTemplate,
        PropertyTemplate, SingletonTemplate, TemplateValue, TerminalTemplate,
    };

    fn key(name: &str) -> SegmentTemplate {
        SegmentTemplate::Key(KeyTemplate::new(
            KeySyntax::Parenthesis,
            KeyValues::Single(TemplateValue::Placeholder {
                name: name.to_string(),
                occurrence: 0,
            }),
        ))
    }

    #[derive(Debug)]
    struct Echo;

    impl ExtensionTemplate for Echo {
        fn text(&self) -> String {
            "echo".to_string()
        }

        fn translate(
            &self,
            _ctx: &mut TranslateContext<'_>,
        ) -> Result<PathSegment, TranslateError> {
            Err(TranslateError::no_template_matched("echo"))
        }
    }

    #[test]
    fn test_slot_order_is_rank_then_text() {
        let slot = TemplateSlot::new(vec![
            Alternative::single(SegmentTemplate::Property(PropertyTemplate::new("Orders"))),
            Alternative::single(SegmentTemplate::Terminal(TerminalTemplate::COUNT)),
            Alternative::new([
                SegmentTemplate::Navigation(NavigationTemplate::new("Orders")),
                key("key"),
            ]),
            Alternative::single(SegmentTemplate::Singleton(SingletonTemplate::new("B"))),
            Alternative::single(SegmentTemplate::EntitySet(EntitySetTemplate::new("B"))),
            Alternative::single(SegmentTemplate::EntitySet(EntitySetTemplate::new("A"))),
        ]);
        let order: Vec<String> = slot.alternatives().iter().map(ToString::to_string).collect();
        assert_eq!(order, ["A", "B", "B", "Orders({key})", "Orders", "$count"]);
        assert_eq!(slot.alternatives()[2].rank(), 2);
    }

    #[test]
    fn test_slot_drops_duplicates() {
        let nav = || Alternative::single(SegmentTemplate::Navigation(NavigationTemplate::new("X")));
        let slot = TemplateSlot::new(vec![nav(), nav()]);
        assert_eq!(slot.alternatives().len(), 1);
    }

    #[test]
    fn test_alternative_matches_needs_every_value() {
        let alt = Alternative::new([
            SegmentTemplate::Navigation(NavigationTemplate::new("Orders")),
            key("key"),
        ]);
        assert!(!alt.matches(&RouteValues::new()));
        assert!(alt.matches(&RouteValues::new().with("key", "1")));
    }

    #[test]
    fn test_extension_ranks_last() {
        let template = PathTemplate::new(
            "Customers",
            vec![TemplateSlot::new(vec![Alternative::single(
                SegmentTemplate::EntitySet(EntitySetTemplate::new("Customers")),
            )])],
        )
        .with_extension(0, Arc::new(Echo))
        .with_extension(5, Arc::new(Echo));

        assert_eq!(template.len(), 2);
        let first = template.slots()[0].alternatives();
        assert_eq!(first.len(), 2);
        assert_eq!(first[1].to_string(), "echo");
        assert_eq!(template.to_string(), "Customers");
    }
}
