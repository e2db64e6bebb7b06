//! Core type definitions for edmpath.
//!
//! This module contains the value-level types used throughout path translation:
//! - Primitive kinds ([`PrimitiveKind`])
//! - Parsed values ([`Value`])
//! - The OData URL literal grammar ([`parse_primitive`])

mod literal;
mod primitive;
mod value;

pub use literal::{LiteralOptions, parse_primitive, split_quoted, unquote};
pub use primitive::PrimitiveKind;
pub use value::Value;
