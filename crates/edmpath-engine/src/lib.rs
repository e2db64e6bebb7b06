//! # edmpath-engine
//!
//! Path translation for edmpath: route patterns compiled into segment
//! templates, and the walk that turns a matched request into a typed
//! [`ODataPath`](routing::ODataPath).
//!
//! ## Modules
//!
//! - [`config`] - Translation options
//! - [`routing`] - Templates, translation context, the translator, and results
//! - [`table`] - Compile-once route table shared across requests

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod routing;
pub mod table;

pub use config::Config;
pub use routing::{
    ExtensionTemplate, ODataPath, PathSegment, PathTemplate, RequestInfo, RouteValues,
    SegmentKind, SegmentTemplate, TerminalKind, TranslateContext, Translator, translate,
};
pub use table::RouteTable;
