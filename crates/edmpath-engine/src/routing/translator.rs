//! Path template to `ODataPath` translator.
//!
//! Walks the slots of a [`PathTemplate`] in order. At each slot the
//! alternatives are tried in their fixed order and the first one that both
//! matches the route values and translates wins. A failed alternative's
//! changes to the walk state are rolled back. When every alternative fails,
//! the most specific error is reported against the slot and the walk stops.

use super::context::TranslateContext;
use super::path_template::{PathTemplate, TemplateSlot};
use super::segment::{ODataPath, PathSegment};
use edmpath_common::utils::error::{Specificity, TranslateError};
use smallvec::SmallVec;

/// Translates `template` against the request described by `ctx`.
///
/// # Errors
///
/// Returns the error of the first slot no alternative explains, with its
/// zero-based slot index.
pub fn translate(
    template: &PathTemplate,
    ctx: TranslateContext<'_>,
) -> Result<ODataPath, TranslateError> {
    Translator::new().translate(template, ctx)
}

/// The slot-by-slot walk.
#[derive(Debug, Default, Clone, Copy)]
pub struct Translator;

impl Translator {
    /// Creates a translator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Translates `template`, consuming the context.
    ///
    /// # Errors
    ///
    /// Returns the error of the first slot no alternative explains. No
    /// partial path is returned.
    pub fn translate(
        &self,
        template: &PathTemplate,
        mut ctx: TranslateContext<'_>,
    ) -> Result<ODataPath, TranslateError> {
        tracing::debug!(
            "translating {} for {} {}",
            template.pattern(),
            ctx.request().method(),
            ctx.request().path()
        );

        let mut segments: Vec<PathSegment> = Vec::with_capacity(template.len());
        for (index, slot) in template.slots().iter().enumerate() {
            if let Some(terminal) = ctx.terminal() {
                return Err(TranslateError::unsupported_terminal(format!(
                    "nothing may follow {terminal}"
                ))
                .at(index));
            }
            let produced = self
                .translate_slot(index, slot, &mut ctx)
                .map_err(|e| e.at(index))?;
            segments.extend(produced);
        }

        let path = ODataPath::new(
            segments,
            ctx.navigation_source(),
            ctx.edm_type().cloned(),
            ctx.terminal(),
        );
        tracing::debug!("translated {} to {}", template.pattern(), path);
        Ok(path)
    }

    fn translate_slot(
        &self,
        index: usize,
        slot: &TemplateSlot,
        ctx: &mut TranslateContext<'_>,
    ) -> Result<SmallVec<[PathSegment; 2]>, TranslateError> {
        let mut best: Option<TranslateError> = None;

        for alternative in slot.alternatives() {
            if !alternative.matches(ctx.route_values()) {
                tracing::trace!("slot {}: `{}` lacks route values", index, alternative);
                continue;
            }
            let snapshot = ctx.snapshot();
            match alternative.translate(ctx) {
                Ok(segments) => {
                    tracing::trace!("slot {}: `{}` accepted", index, alternative);
                    return Ok(segments);
                }
                Err(err) => {
                    tracing::trace!("slot {}: `{}` rejected: {}", index, alternative, err);
                    ctx.restore(snapshot);
                    // Ties keep the earlier candidate.
                    if best
                        .as_ref()
                        .is_none_or(|b| err.specificity() > b.specificity())
                    {
                        best = Some(err);
                    }
                }
            }
        }

        match best {
            Some(err) if err.specificity() > Specificity::NoMatch => Err(err),
            _ => {
                let text = slot
                    .alternatives()
                    .first()
                    .map(ToString::to_string)
                    .unwrap_or_default();
                Err(TranslateError::no_template_matched(format!(
                    "no template explains `{text}`"
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::routing::context::{RequestInfo, RouteValues};
    use crate::routing::pattern::compile;
    use crate::routing::segment::{SegmentKind, TerminalKind};
    use edmpath_common::types::{PrimitiveKind, Value};
    use edmpath_common::utils::error::TranslateErrorKind;
    use edmpath_core::edm::{EdmModel, EdmModelBuilder, sample};
    use edmpath_core::{Multiplicity, NameLookup, NavigationSourceRef, SchemaGraph, TypeRef};
    use proptest::prelude::*;

    fn route_values(pairs: &[(&str, &str)]) -> RouteValues {
        let mut values = RouteValues::new();
        for (name, value) in pairs {
            values.insert(*name, *value);
        }
        values
    }

    fn run_on(
        model: &EdmModel,
        config: &Config,
        pattern: &str,
        pairs: &[(&str, &str)],
    ) -> Result<ODataPath, TranslateError> {
        let template = compile(pattern, config).unwrap();
        let ctx = TranslateContext::new(model, RequestInfo::new("GET", pattern))
            .with_route_values(route_values(pairs))
            .with_name_lookup(config.name_lookup());
        translate(&template, ctx)
    }

    fn run(pattern: &str, pairs: &[(&str, &str)]) -> Result<ODataPath, TranslateError> {
        let model = sample::customer_order_model().unwrap();
        run_on(&model, &Config::default(), pattern, pairs)
    }

    fn entity(model: &EdmModel, name: &str) -> TypeRef {
        TypeRef::Entity(model.find_type(name, NameLookup::Exact).unwrap())
    }

    fn assert_error(
        result: Result<ODataPath, TranslateError>,
        kind: TranslateErrorKind,
        segment: usize,
    ) {
        let err = result.unwrap_err();
        assert_eq!(err.kind(), kind, "{err}");
        assert_eq!(err.segment_index(), segment, "{err}");
    }

    // === Roots ===

    #[test]
    fn test_metadata() {
        let path = run("$metadata", &[]).unwrap();
        assert_eq!(path.len(), 1);
        assert_eq!(path.terminal(), Some(TerminalKind::Metadata));
        assert_eq!(path.edm_type(), None);
        assert_eq!(path.to_string(), "$metadata");
    }

    #[test]
    fn test_entity_set_root() {
        let model = sample::customer_order_model().unwrap();
        let path = run_on(&model, &Config::default(), "Customers", &[]).unwrap();
        let customers = model.find_entity_set("Customers", NameLookup::Exact).unwrap();
        assert_eq!(
            path.edm_type(),
            Some(&TypeRef::collection(entity(&model, "Default.Customer")))
        );
        assert_eq!(
            path.navigation_source(),
            Some(NavigationSourceRef::EntitySet(customers))
        );
    }

    #[test]
    fn test_singleton_root() {
        let model = sample::customer_order_model().unwrap();
        let path = run_on(&model, &Config::default(), "Me/Orders", &[]).unwrap();
        assert!(matches!(path.segments()[0].kind(), SegmentKind::Singleton { .. }));
        assert_eq!(
            path.edm_type(),
            Some(&TypeRef::collection(entity(&model, "Default.Order")))
        );
    }

    #[test]
    fn test_unknown_root() {
        let result = run("Invoices", &[]);
        let err = result.clone().unwrap_err();
        assert!(err.kind().is_not_found());
        assert_error(result, TranslateErrorKind::UnknownNavigation, 0);
    }

    #[test]
    fn test_import_root() {
        let path = run("GetVipCustomers()/$count", &[]).unwrap();
        assert!(matches!(
            path.segments()[0].kind(),
            SegmentKind::OperationImport { .. }
        ));
        assert_eq!(path.terminal(), Some(TerminalKind::Count));

        let path = run("GetCustomersByCity(city={city})", &[("city", "'Oslo'")]).unwrap();
        assert_eq!(path.to_string(), "GetCustomersByCity(city='Oslo')");
    }

    // === Keys ===

    #[test]
    fn test_customers_orders_scenario() {
        let model = sample::customer_order_model().unwrap();
        let orders = model.find_entity_set("Orders", NameLookup::Exact).unwrap();
        let path = run_on(
            &model,
            &Config::default(),
            "Customers({key})/Orders({key})",
            &[("key", "1"), ("key", "10")],
        )
        .unwrap();

        assert_eq!(path.to_string(), "Customers(1)/Orders(10)");
        assert_eq!(path.len(), 4);
        assert_eq!(path.edm_type(), Some(&entity(&model, "Default.Order")));
        assert_eq!(
            path.navigation_source(),
            Some(NavigationSourceRef::EntitySet(orders))
        );
        let SegmentKind::Key { values } = path.segments()[3].kind() else {
            panic!("expected key segment");
        };
        assert_eq!(values[0], ("ID".to_string(), Value::Int32(10)));
    }

    #[test]
    fn test_single_value_serves_every_occurrence() {
        let path = run("Customers({key})/Orders({key})", &[("key", "7")]).unwrap();
        assert_eq!(path.to_string(), "Customers(7)/Orders(7)");
    }

    #[test]
    fn test_key_parse_error() {
        assert_error(
            run("Customers({key})", &[("key", "abc")]),
            TranslateErrorKind::KeyParse,
            0,
        );
        assert_error(
            run("Customers({key})/Orders({id})", &[("key", "1"), ("id", "x")]),
            TranslateErrorKind::KeyParse,
            1,
        );
    }

    #[test]
    fn test_key_as_segment() {
        let path = run("Customers/{key}/Orders", &[("key", "5")]).unwrap();
        assert_eq!(path.to_string(), "Customers(5)/Orders");
    }

    #[test]
    fn test_missing_route_value() {
        assert_error(
            run("Customers({key})", &[]),
            TranslateErrorKind::NoTemplateMatched,
            0,
        );
    }

    // === Casts and navigation ===

    #[test]
    fn test_cast_then_navigation() {
        let model = sample::customer_order_model().unwrap();
        let path = run_on(
            &model,
            &Config::default(),
            "Customers({key})/Default.SpecialCustomer/SpecialOrders",
            &[("key", "1")],
        )
        .unwrap();
        assert_eq!(
            path.edm_type(),
            Some(&TypeRef::collection(entity(&model, "Default.SpecialOrder")))
        );
    }

    #[test]
    fn test_invalid_cast() {
        assert_error(
            run("Customers/Default.Order", &[]),
            TranslateErrorKind::InvalidCast,
            1,
        );
    }

    #[test]
    fn test_unknown_navigation() {
        assert_error(
            run("Customers({key})/Invoices", &[("key", "1")]),
            TranslateErrorKind::UnknownNavigation,
            1,
        );
        assert_error(
            run("Customers/Orders", &[]),
            TranslateErrorKind::UnknownNavigation,
            1,
        );
    }

    #[test]
    fn test_property_path() {
        let path = run("Customers({key})/Address/City", &[("key", "1")]).unwrap();
        assert_eq!(
            path.edm_type(),
            Some(&TypeRef::Primitive(PrimitiveKind::String))
        );
        let path = run("Customers({key})/FirstName/$value", &[("key", "1")]).unwrap();
        assert_eq!(path.terminal(), Some(TerminalKind::Value));
    }

    fn address_country_model(bound: bool) -> EdmModel {
        let mut b = EdmModelBuilder::new("Geo");
        let country = b.entity_type("Country");
        b.property(country, "Code", PrimitiveKind::String)
            .key(country, &["Code"]);
        let address = b.complex_type("Address");
        b.property(address, "City", PrimitiveKind::String)
            .navigation(address, "Country", country, Multiplicity::One);
        let customer = b.entity_type("Customer");
        b.property(customer, "ID", PrimitiveKind::Int32)
            .key(customer, &["ID"])
            .property(customer, "Address", TypeRef::Complex(address));

        let customers = NavigationSourceRef::EntitySet(b.entity_set("Customers", customer));
        let countries = NavigationSourceRef::EntitySet(b.entity_set("Countries", country));
        if bound {
            b.bind(customers, address, "Country", countries);
        }
        b.build().unwrap()
    }

    #[test]
    fn test_navigation_from_complex_value() {
        let model = address_country_model(true);
        let path = run_on(
            &model,
            &Config::default(),
            "Customers({key})/Address/Country",
            &[("key", "1")],
        )
        .unwrap();
        let countries = model.find_entity_set("Countries", NameLookup::Exact).unwrap();
        assert_eq!(path.len(), 4);
        assert!(matches!(
            path.segments()[3].kind(),
            SegmentKind::Navigation { name, .. } if name == "Country"
        ));
        assert_eq!(path.edm_type(), Some(&entity(&model, "Geo.Country")));
        assert_eq!(
            path.navigation_source(),
            Some(NavigationSourceRef::EntitySet(countries))
        );
        assert_eq!(path.to_string(), "Customers(1)/Address/Country");
    }

    #[test]
    fn test_unbound_navigation_from_complex_value() {
        let model = address_country_model(false);
        let path = run_on(
            &model,
            &Config::default(),
            "Customers({key})/Address/Country",
            &[("key", "1")],
        )
        .unwrap();
        assert_eq!(path.edm_type(), Some(&entity(&model, "Geo.Country")));
        assert_eq!(path.navigation_source(), None);
    }

    // === Operations ===

    #[test]
    fn test_composable_function_chain() {
        let path = run(
            "Customers({key})/Default.GetTopOrders(n={n})/$count",
            &[("key", "1"), ("n", "3")],
        )
        .unwrap();
        assert_eq!(path.terminal(), Some(TerminalKind::Count));
        assert_eq!(
            path.to_string(),
            "Customers(1)/Default.GetTopOrders(n=3)/$count"
        );
    }

    #[test]
    fn test_overload_ambiguity() {
        assert_error(
            run("Orders/Find(value={v})", &[("v", "5")]),
            TranslateErrorKind::AmbiguousOperation,
            1,
        );
        assert!(run("Orders/Find(value={v})", &[("v", "5000000000")]).is_ok());
    }

    #[test]
    fn test_action_is_terminal() {
        let path = run("Customers({key})/Rate", &[("key", "1")]).unwrap();
        assert_eq!(path.terminal(), Some(TerminalKind::Operation));
        assert_error(
            run("Customers({key})/Rate/$count", &[("key", "1")]),
            TranslateErrorKind::UnsupportedTerminal,
            2,
        );
    }

    // === Terminals ===

    #[test]
    fn test_count_on_single_entity() {
        assert_error(
            run("Customers({key})/$count", &[("key", "1")]),
            TranslateErrorKind::UnsupportedTerminal,
            1,
        );
    }

    #[test]
    fn test_nothing_after_terminal() {
        assert_error(
            run("Customers/$count/$value", &[]),
            TranslateErrorKind::UnsupportedTerminal,
            2,
        );
    }

    // === Dynamic properties ===

    #[test]
    fn test_dynamic_property_on_open_type() {
        let model = sample::open_type_model().unwrap();
        let path = run_on(
            &model,
            &Config::default(),
            "Customers({key})/{prop}",
            &[("key", "1"), ("prop", "Mood")],
        )
        .unwrap();
        assert!(matches!(
            path.segments()[2].kind(),
            SegmentKind::DynamicProperty { name } if name == "Mood"
        ));
        assert_eq!(path.edm_type(), Some(&TypeRef::Untyped));
        assert_eq!(path.navigation_source(), None);
    }

    #[test]
    fn test_dynamic_property_on_closed_type() {
        assert_error(
            run("Customers({key})/{prop}", &[("key", "1"), ("prop", "Mood")]),
            TranslateErrorKind::UnknownProperty,
            1,
        );
    }

    // === Options ===

    #[test]
    fn test_case_insensitive_lookup() {
        let model = sample::customer_order_model().unwrap();
        let pattern = "customers({key})/ORDERS/$Count";
        let config = Config::default().with_case_insensitive(true);
        let path = run_on(&model, &config, pattern, &[("key", "1")]).unwrap();
        assert_eq!(path.to_string(), "Customers(1)/Orders/$count");

        let exact = run_on(&model, &Config::default(), "customers", &[]);
        assert_error(exact, TranslateErrorKind::UnknownNavigation, 0);
    }

    #[test]
    fn test_request_info_does_not_affect_result() {
        let model = sample::customer_order_model().unwrap();
        let template = compile("Customers({key})", &Config::default()).unwrap();
        let values = route_values(&[("key", "1")]);
        let get = TranslateContext::new(&model, RequestInfo::new("GET", "/Customers(1)"))
            .with_route_values(values.clone());
        let post = TranslateContext::new(
            &model,
            RequestInfo::new("POST", "/odata/Customers(1)").with_service_root("/odata"),
        )
        .with_route_values(values);
        assert_eq!(translate(&template, get), translate(&template, post));
    }

    // === Properties ===

    proptest! {
        #[test]
        fn test_key_round_trip(id in any::<i32>()) {
            let key = id.to_string();
            let path = run("Customers({key})", &[("key", key.as_str())]).unwrap();
            prop_assert_eq!(path.to_string(), format!("Customers({id})"));
        }

        #[test]
        fn test_translation_is_idempotent(raw in "[A-Za-z0-9'@-]{0,8}") {
            let first = run("Customers({key})/Orders", &[("key", raw.as_str())]);
            let second = run("Customers({key})/Orders", &[("key", raw.as_str())]);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn test_key_failures_name_the_key_slot(raw in "[A-Za-z][A-Za-z0-9]{0,8}") {
            let err = run("Customers({key})/Orders", &[("key", raw.as_str())]).unwrap_err();
            prop_assert_eq!(err.kind(), TranslateErrorKind::KeyParse);
            prop_assert_eq!(err.segment_index(), 0);
        }
    }
}
