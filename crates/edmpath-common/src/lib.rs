//! # edmpath-common
//!
//! Foundation layer for edmpath: primitive types, literal values, and errors.
//!
//! This crate provides the building blocks used by all other edmpath crates.
//! It has no internal dependencies and should be kept minimal.
//!
//! ## Modules
//!
//! - [`types`] - EDM primitive kinds, parsed values, and the URL literal grammar
//! - [`utils`] - Utility functions and helpers (hashing, errors)

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod types;
pub mod utils;

// Re-export commonly used types at crate root
pub use types::{LiteralOptions, PrimitiveKind, Value, parse_primitive};
pub use utils::error::{Error, Result};
