//! Compile-once route table.

use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;

use edmpath_common::utils::error::Result;
use edmpath_core::SchemaGraph;

use crate::config::Config;
use crate::routing::{ODataPath, PathTemplate, RequestInfo, RouteValues, TranslateContext};
use crate::routing::{compile, translate};

/// Route patterns compiled against one schema graph.
///
/// Each pattern is compiled once, on first use, and handed out as a shared
/// [`PathTemplate`]. Reads take a shared lock; only the first registration of
/// a pattern takes the write lock.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use edmpath_core::edm::sample;
/// use edmpath_engine::{RequestInfo, RouteTable, RouteValues};
///
/// let model = sample::customer_order_model().unwrap();
/// let table = RouteTable::new(Arc::new(model));
/// let path = table
///     .translate(
///         "Customers({key})/Orders",
///         RequestInfo::new("GET", "/Customers(1)/Orders"),
///         RouteValues::new().with("key", "1"),
///     )
///     .unwrap();
/// assert_eq!(path.to_string(), "Customers(1)/Orders");
/// ```
pub struct RouteTable {
    /// The schema graph every translation runs against.
    model: Arc<dyn SchemaGraph>,
    /// Compilation and lookup options.
    config: Config,
    /// Compiled templates by pattern, in registration order.
    templates: RwLock<IndexMap<String, Arc<PathTemplate>>>,
}

impl RouteTable {
    /// Creates an empty table with the default configuration.
    #[must_use]
    pub fn new(model: Arc<dyn SchemaGraph>) -> Self {
        Self {
            model,
            config: Config::default(),
            templates: RwLock::new(IndexMap::new()),
        }
    }

    /// Replaces the configuration, dropping templates compiled under the old one.
    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self.templates.get_mut().clear();
        self
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the schema graph.
    #[must_use]
    pub fn model(&self) -> &dyn SchemaGraph {
        self.model.as_ref()
    }

    /// Compiles `pattern` unless it is already registered.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern does not compile.
    pub fn register(&self, pattern: &str) -> Result<Arc<PathTemplate>> {
        if let Some(template) = self.templates.read().get(pattern) {
            return Ok(Arc::clone(template));
        }

        let mut templates = self.templates.write();
        // Another thread may have compiled it while we waited for the lock.
        if let Some(template) = templates.get(pattern) {
            return Ok(Arc::clone(template));
        }
        let template = Arc::new(compile(pattern, &self.config)?);
        tracing::debug!("registered route {} ({} slots)", pattern, template.len());
        templates.insert(pattern.to_string(), Arc::clone(&template));
        Ok(template)
    }

    /// Returns the compiled template for `pattern`, if registered.
    #[must_use]
    pub fn template(&self, pattern: &str) -> Option<Arc<PathTemplate>> {
        self.templates.read().get(pattern).cloned()
    }

    /// Returns the number of registered patterns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.read().len()
    }

    /// Returns true if no pattern is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.read().is_empty()
    }

    /// Returns the registered patterns in registration order.
    #[must_use]
    pub fn patterns(&self) -> Vec<String> {
        self.templates.read().keys().cloned().collect()
    }

    /// Translates a request matched to `pattern`, registering the pattern
    /// first if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern does not compile or the request does
    /// not translate.
    pub fn translate(
        &self,
        pattern: &str,
        request: RequestInfo,
        values: RouteValues,
    ) -> Result<ODataPath> {
        let template = self.register(pattern)?;
        let ctx = TranslateContext::new(self.model.as_ref(), request)
            .with_route_values(values)
            .with_name_lookup(self.config.name_lookup());
        Ok(translate(&template, ctx)?)
    }
}

impl std::fmt::Debug for RouteTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteTable")
            .field("config", &self.config)
            .field("patterns", &self.patterns())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edmpath_common::utils::error::{Error, TranslateErrorKind};
    use edmpath_core::edm::sample;

    fn table() -> RouteTable {
        RouteTable::new(Arc::new(sample::customer_order_model().unwrap()))
    }

    #[test]
    fn test_register_compiles_once() {
        let table = table();
        assert!(table.is_empty());
        let first = table.register("Customers({key})").unwrap();
        let second = table.register("Customers({key})").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(table.len(), 1);
        assert!(table.template("Customers({key})").is_some());
        assert!(table.template("Orders").is_none());
    }

    #[test]
    fn test_patterns_keep_registration_order() {
        let table = table();
        table.register("Orders").unwrap();
        table.register("Customers").unwrap();
        table.register("$metadata").unwrap();
        assert_eq!(table.patterns(), ["Orders", "Customers", "$metadata"]);
    }

    #[test]
    fn test_invalid_pattern() {
        let table = table();
        let err = table.register("Customers//Orders").unwrap_err();
        assert!(matches!(err, Error::Template(ref e) if e.segment == 1));
        assert!(table.is_empty());
    }

    #[test]
    fn test_translate_errors_surface() {
        let table = table();
        let err = table
            .translate(
                "Customers({key})/$count",
                RequestInfo::new("GET", "/Customers(1)/$count"),
                RouteValues::new().with("key", "1"),
            )
            .unwrap_err();
        let Error::Translate(err) = err else {
            panic!("expected a translate error");
        };
        assert_eq!(err.kind(), TranslateErrorKind::UnsupportedTerminal);
        assert_eq!(err.segment_index(), 1);
    }

    #[test]
    fn test_config_applies() {
        let table = table().with_config(Config::default().with_case_insensitive(true));
        assert!(table.config().case_insensitive);
        let path = table
            .translate(
                "customers({key})",
                RequestInfo::default(),
                RouteValues::new().with("key", "3"),
            )
            .unwrap();
        assert_eq!(path.to_string(), "Customers(3)");
    }

    #[test]
    fn test_concurrent_translation() {
        let table = table();
        std::thread::scope(|scope| {
            for id in 0..8 {
                let table = &table;
                scope.spawn(move || {
                    let path = table
                        .translate(
                            "Customers({key})/Orders({order})",
                            RequestInfo::default(),
                            RouteValues::new()
                                .with("key", id.to_string())
                                .with("order", "1"),
                        )
                        .unwrap();
                    assert_eq!(path.to_string(), format!("Customers({id})/Orders(1)"));
                });
            }
        });
        assert_eq!(table.len(), 1);
    }
}
