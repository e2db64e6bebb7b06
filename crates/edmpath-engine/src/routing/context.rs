//! Translation context.
//!
//! One context is created per request and owned by a single walk. It holds
//! the schema graph, the originating request, the captured route values, and
//! the walk state (navigation source, type, and terminal kind reached so far).

use super::segment::TerminalKind;
use edmpath_core::{NameLookup, NavigationSourceRef, SchemaGraph, TypeRef};
use indexmap::IndexMap;
use smallvec::SmallVec;

/// The parts of the originating HTTP request that translation may consult.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestInfo {
    method: String,
    service_root: String,
    path: String,
    headers: IndexMap<String, String>,
}

impl RequestInfo {
    /// Creates request info for `method` and `path`.
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            ..Self::default()
        }
    }

    /// Sets the service root URL.
    pub fn with_service_root(mut self, root: impl Into<String>) -> Self {
        self.service_root = root.into();
        self
    }

    /// Adds a header. Header names are stored lowercased.
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    /// Returns the HTTP method.
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Returns the service root URL.
    #[must_use]
    pub fn service_root(&self) -> &str {
        &self.service_root
    }

    /// Returns the request path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns a header value, looked up case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}

/// Route values captured by the router: placeholder name to the captured
/// text, one entry per occurrence of the placeholder in the pattern.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteValues {
    values: IndexMap<String, SmallVec<[String; 1]>>,
}

impl RouteValues {
    /// Creates an empty set of route values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a captured value for `name`.
    ///
    /// The n-th insert for a name is read by the n-th occurrence of the
    /// placeholder in the pattern.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values
            .entry(name.into())
            .or_default()
            .push(value.into());
    }

    /// Builder form of [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Returns the value captured for an occurrence of `name`.
    ///
    /// A name captured once answers every occurrence.
    #[must_use]
    pub fn get(&self, name: &str, occurrence: usize) -> Option<&str> {
        let captured = self.values.get(name)?;
        let value = match captured.as_slice() {
            [only] => only,
            many => many.get(occurrence)?,
        };
        Some(value.as_str())
    }

    /// Returns true if `name` was captured at all.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Returns the number of distinct names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if nothing was captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over names and their captured values, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RouteValues {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut values = Self::new();
        for (name, value) in iter {
            values.insert(name, value);
        }
        values
    }
}

/// The walk state: where translation stands after the segments so far.
///
/// Taken as a snapshot before each candidate and restored when it fails.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkState {
    navigation_source: Option<NavigationSourceRef>,
    edm_type: Option<TypeRef>,
    terminal: Option<TerminalKind>,
}

/// Context for one translation walk.
pub struct TranslateContext<'m> {
    model: &'m dyn SchemaGraph,
    request: RequestInfo,
    route_values: RouteValues,
    lookup: NameLookup,
    state: WalkState,
}

impl<'m> TranslateContext<'m> {
    /// Creates a context over `model` for `request`, with no route values.
    pub fn new(model: &'m dyn SchemaGraph, request: RequestInfo) -> Self {
        Self {
            model,
            request,
            route_values: RouteValues::new(),
            lookup: NameLookup::Exact,
            state: WalkState::default(),
        }
    }

    /// Sets the captured route values.
    #[must_use]
    pub fn with_route_values(mut self, values: RouteValues) -> Self {
        self.route_values = values;
        self
    }

    /// Sets how schema names are compared.
    #[must_use]
    pub fn with_name_lookup(mut self, lookup: NameLookup) -> Self {
        self.lookup = lookup;
        self
    }

    /// Returns the schema graph.
    #[must_use]
    pub fn model(&self) -> &'m dyn SchemaGraph {
        self.model
    }

    /// Returns the originating request.
    #[must_use]
    pub fn request(&self) -> &RequestInfo {
        &self.request
    }

    /// Returns the captured route values.
    #[must_use]
    pub fn route_values(&self) -> &RouteValues {
        &self.route_values
    }

    /// Returns how schema names are compared.
    #[must_use]
    pub fn name_lookup(&self) -> NameLookup {
        self.lookup
    }

    /// Returns the navigation source reached so far.
    #[must_use]
    pub fn navigation_source(&self) -> Option<NavigationSourceRef> {
        self.state.navigation_source
    }

    /// Returns the type reached so far.
    #[must_use]
    pub fn edm_type(&self) -> Option<&TypeRef> {
        self.state.edm_type.as_ref()
    }

    /// Returns the terminal kind reached so far.
    #[must_use]
    pub fn terminal(&self) -> Option<TerminalKind> {
        self.state.terminal
    }

    /// Moves the walk to a new navigation source and type.
    ///
    /// The two only ever change together.
    pub fn advance(
        &mut self,
        navigation_source: Option<NavigationSourceRef>,
        edm_type: Option<TypeRef>,
    ) {
        self.state.navigation_source = navigation_source;
        self.state.edm_type = edm_type;
    }

    /// Records that the walk reached a terminal segment.
    pub fn mark_terminal(&mut self, kind: TerminalKind) {
        self.state.terminal = Some(kind);
    }

    /// Returns a copy of the walk state.
    #[must_use]
    pub fn snapshot(&self) -> WalkState {
        self.state.clone()
    }

    /// Restores a snapshot taken with [`snapshot`](Self::snapshot).
    pub fn restore(&mut self, state: WalkState) {
        self.state = state;
    }

    /// Returns true before any segment has been translated.
    #[must_use]
    pub fn is_at_root(&self) -> bool {
        self.state == WalkState::default()
    }
}

impl std::fmt::Debug for TranslateContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslateContext")
            .field("request", &self.request)
            .field("route_values", &self.route_values)
            .field("lookup", &self.lookup)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edmpath_core::edm::sample;

    #[test]
    fn test_route_values_occurrences() {
        let values = RouteValues::new()
            .with("key", "1")
            .with("key", "10")
            .with("name", "x");
        assert_eq!(values.get("key", 0), Some("1"));
        assert_eq!(values.get("key", 1), Some("10"));
        assert_eq!(values.get("key", 2), None);
        assert_eq!(values.get("name", 3), Some("x"));
        assert_eq!(values.get("missing", 0), None);
        assert_eq!(values.len(), 2);
    }

    #[test]
    fn test_request_headers_case_insensitive() {
        let request = RequestInfo::new("GET", "/odata/Customers")
            .with_service_root("http://localhost/odata")
            .with_header("OData-Version", "4.0");
        assert_eq!(request.header("odata-version"), Some("4.0"));
        assert_eq!(request.method(), "GET");
    }

    #[test]
    fn test_snapshot_restore() {
        let model = sample::customer_order_model().unwrap();
        let customers = model.find_entity_set("Customers", NameLookup::Exact).unwrap();
        let mut ctx = TranslateContext::new(&model, RequestInfo::default());
        assert!(ctx.is_at_root());

        let snapshot = ctx.snapshot();
        let source = NavigationSourceRef::EntitySet(customers);
        ctx.advance(Some(source), Some(model.navigation_source_type(source)));
        ctx.mark_terminal(TerminalKind::Count);
        assert_eq!(ctx.navigation_source(), Some(source));

        ctx.restore(snapshot);
        assert!(ctx.is_at_root());
        assert_eq!(ctx.terminal(), None);
    }
}
