//! # edmpath
//!
//! Turns a routed request URL into a typed, schema-checked OData path.
//!
//! If you're new here, start with [`RouteTable`]: register the route
//! patterns your web framework matches, then hand each matched request and
//! its captured route values to [`RouteTable::translate`]. The result is an
//! [`ODataPath`] that knows, segment by segment, which entity set, type, key
//! or operation the URL refers to.
//!
//! ## Pattern syntax
//!
//! | Segment | Meaning |
//! | ------- | ------- |
//! | `Customers` | Entity set, singleton, or operation import |
//! | `Customers({key})` | Entity set with a key |
//! | `Orders(ID={id},Line={line})` | Composite key |
//! | `{key}` | Key as its own segment, or a dynamic property |
//! | `Default.SpecialCustomer` | Type cast |
//! | `Default.GetTopOrders(n={n})` | Bound function call |
//! | `$metadata`, `$count`, `$value`, `$ref` | Terminal segments |
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use edmpath::{RequestInfo, RouteTable, RouteValues, sample};
//!
//! let table = RouteTable::new(Arc::new(sample::customer_order_model()?));
//!
//! let path = table.translate(
//!     "Customers({key})/Orders({key})",
//!     RequestInfo::new("GET", "/Customers(1)/Orders(10)"),
//!     RouteValues::new().with("key", "1").with("key", "10"),
//! )?;
//! assert_eq!(path.to_string(), "Customers(1)/Orders(10)");
//! # Ok::<(), edmpath::Error>(())
//! ```

// Entry points
pub use edmpath_engine::{Config, RouteTable, Translator, translate};

// Templates and the translation context, for hosts that compile their own
pub use edmpath_engine::routing::{
    ExtensionTemplate, ODataPath, ParameterValue, PathSegment, PathTemplate, RequestInfo,
    RouteValues, SegmentKind, SegmentTemplate, TerminalKind, TranslateContext, compile,
};

// The schema graph
pub use edmpath_core::edm::{self, sample};
pub use edmpath_core::{
    EdmModel, EdmModelBuilder, NameLookup, NavigationSourceRef, OperationDef, OperationKind,
    SchemaGraph, TypeRef,
};

// Values and errors
pub use edmpath_common::types::{PrimitiveKind, Value};
pub use edmpath_common::utils::error::{
    Error, Result, TemplateError, TranslateError, TranslateErrorKind,
};
