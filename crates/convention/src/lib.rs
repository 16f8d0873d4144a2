//! Automap naming-convention layer.
//!
//! Turns identifier-like strings into a convention-independent token form and
//! renders that form back out in any of nine naming conventions. The mapper
//! uses it to match JSON keys against model field names regardless of how
//! either side spells them.
//!
//! ## What we do
//!
//! - Tokenization: separators (`.`, `-`, `_`, space) and uppercase letters
//!   become word boundaries, everything is lowercased
//! - Generation: camel, Pascal, snake, kebab (param), space, dot, constant,
//!   lower and upper case
//! - Memoization: a [`CaseConverter`] renders each convention at most once
//! - Caching: a [`ConverterLibrary`] keeps one converter per distinct string
//!
//! ## Invariants worth knowing
//!
//! - Only ASCII bytes are rewritten; other bytes pass through unchanged
//! - Tokenizing canonical tokens returns them unchanged
//! - Acronyms are not grouped: `HTTPServer` tokenizes to `h t t p server`
//! - Cached renderings are never invalidated; the wrapped value is immutable
//!
//! ```rust
//! use convention::{convert, Convention};
//!
//! let name = convert("mesageOne");
//! assert_eq!(name.to_snake_case(), "mesage_one");
//! assert_eq!(name.to_convention(Convention::Constant), "MESAGE_ONE");
//! assert!(name.equals(&convert("MESAGE-ONE"), Some(Convention::Lower)));
//! ```

mod case;
mod config;
mod converter;
mod error;
mod generate;
mod library;
mod token;

pub use crate::case::Convention;
pub use crate::config::ConverterOptions;
pub use crate::converter::{convert, CaseConverter};
pub use crate::error::ConventionError;
pub use crate::generate::{
    render, to_camel_case, to_constant_case, to_dot_case, to_kebab_case, to_lower_case,
    to_pascal_case, to_snake_case, to_space_separated, to_upper_case,
};
pub use crate::library::ConverterLibrary;
pub use crate::token::{tokenize, CanonicalTokens};
