//! Translation options.

use edmpath_core::NameLookup;
use serde::{Deserialize, Serialize};

/// Options for compiling route patterns and translating paths.
///
/// Missing fields take their defaults when deserialized, so hosts can keep
/// only the settings they change in their own configuration files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Resolve schema names ignoring ASCII case.
    pub case_insensitive: bool,
    /// Accept keys as their own segment (`Customers/1`).
    pub key_as_segment: bool,
    /// Accept keys in parentheses (`Customers(1)`).
    pub key_in_parenthesis: bool,
    /// Accept namespace-qualified bound operation calls.
    pub qualified_operation_calls: bool,
    /// Accept unqualified bound operation calls.
    pub unqualified_operation_calls: bool,
    /// Accept parameterless functions called without parentheses.
    pub non_parenthesis_empty_function: bool,
    /// Maximum number of segments in a route pattern.
    pub max_segments: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            case_insensitive: false,
            key_as_segment: true,
            key_in_parenthesis: true,
            qualified_operation_calls: true,
            unqualified_operation_calls: true,
            non_parenthesis_empty_function: false,
            max_segments: 64,
        }
    }
}

impl Config {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables case-insensitive name resolution.
    pub fn with_case_insensitive(mut self, enabled: bool) -> Self {
        self.case_insensitive = enabled;
        self
    }

    /// Enables or disables key-as-segment syntax.
    pub fn with_key_as_segment(mut self, enabled: bool) -> Self {
        self.key_as_segment = enabled;
        self
    }

    /// Enables or disables parenthesized keys.
    pub fn with_key_in_parenthesis(mut self, enabled: bool) -> Self {
        self.key_in_parenthesis = enabled;
        self
    }

    /// Enables or disables qualified operation calls.
    pub fn with_qualified_operation_calls(mut self, enabled: bool) -> Self {
        self.qualified_operation_calls = enabled;
        self
    }

    /// Enables or disables unqualified operation calls.
    pub fn with_unqualified_operation_calls(mut self, enabled: bool) -> Self {
        self.unqualified_operation_calls = enabled;
        self
    }

    /// Enables or disables calling parameterless functions without parentheses.
    pub fn with_non_parenthesis_empty_function(mut self, enabled: bool) -> Self {
        self.non_parenthesis_empty_function = enabled;
        self
    }

    /// Sets the maximum number of pattern segments.
    pub fn with_max_segments(mut self, max: usize) -> Self {
        self.max_segments = max;
        self
    }

    /// Returns the name comparison these options call for.
    #[must_use]
    pub fn name_lookup(&self) -> NameLookup {
        if self.case_insensitive {
            NameLookup::IgnoreCase
        } else {
            NameLookup::Exact
        }
    }
}
