//! Configuration types for case converters.
//!
//! # Examples
//!
//! ```rust
//! use convention::{CaseConverter, ConverterOptions};
//!
//! // Defer tokenization until the first rendering is requested.
//! let lazy = ConverterOptions { parse_on_init: false };
//! let converter = CaseConverter::with_options("someValue", &lazy);
//! assert_eq!(converter.to_snake_case(), "some_value");
//! ```

use serde::{Deserialize, Serialize};

/// Options applied when a [`CaseConverter`](crate::CaseConverter) is created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ConverterOptions {
    /// Tokenize the original value at construction time.
    ///
    /// When false the canonical tokens are computed on first use. Either way
    /// they are computed at most once.
    ///
    /// # Default
    ///
    /// `true`
    pub parse_on_init: bool,
}

impl Default for ConverterOptions {
    fn default() -> Self {
        Self {
            parse_on_init: true,
        }
    }
}
