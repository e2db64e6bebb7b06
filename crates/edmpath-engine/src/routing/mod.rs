//! Path translation.
//!
//! A route pattern such as `Customers({key})/Orders` compiles into a
//! [`PathTemplate`]: one slot per URL segment, each slot holding the
//! candidate [`SegmentTemplate`]s that could explain it. Translation walks
//! the slots with a [`TranslateContext`] carrying the navigation source and
//! type reached so far, and yields an [`ODataPath`].
//!
//! ## Submodules
//!
//! - [`context`] - Request info, route values, and the walk state
//! - [`template`] - The segment template variants
//! - [`path_template`] - Slots, alternatives, and their ordering
//! - [`pattern`] - Route pattern compilation
//! - [`segment`] - Resulting path segments
//! - [`translator`] - The walk

pub mod context;
pub mod path_template;
pub mod pattern;
pub mod segment;
pub mod template;
pub mod translator;

pub use context::{RequestInfo, RouteValues, TranslateContext, WalkState};
pub use path_template::{Alternative, PathTemplate, TemplateSlot};
pub use pattern::compile;
pub use segment::{ODataPath, ParameterValue, PathSegment, SegmentKind, TerminalKind};
pub use template::{ExtensionTemplate, SegmentTemplate, TemplateValue};
pub use translator::{Translator, translate};
