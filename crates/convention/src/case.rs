//! The closed set of naming conventions.
//!
//! # Examples
//!
//! ```rust
//! use convention::Convention;
//!
//! let parsed: Convention = "SNAKECASE".parse().unwrap();
//! assert_eq!(parsed, Convention::Snake);
//! assert_eq!(parsed.to_string(), "snake_case");
//!
//! // The parser runs names through the tokenizer, so spelling style is free.
//! assert_eq!("paramCase".parse::<Convention>().unwrap(), Convention::Kebab);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConventionError;
use crate::generate::render;
use crate::token::tokenize;

/// Textual rendering style for a multi-word identifier.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Convention {
    /// `camelCase`
    #[default]
    #[serde(rename = "camel_case", alias = "camel")]
    Camel,
    /// `PascalCase`
    #[serde(rename = "pascal_case", alias = "pascal")]
    Pascal,
    /// `snake_case`
    #[serde(rename = "snake_case", alias = "snake")]
    Snake,
    /// `kebab-case`, also known as param-case.
    #[serde(rename = "kebab_case", alias = "kebab", alias = "param_case")]
    Kebab,
    /// `space separated`
    #[serde(rename = "space_separated", alias = "space")]
    Space,
    /// `dot.case`
    #[serde(rename = "dot_case", alias = "dot")]
    Dot,
    /// `CONST_CASE`
    #[serde(rename = "constant_case", alias = "constant", alias = "const")]
    Constant,
    /// `lowercase`, word boundaries dropped.
    #[serde(rename = "lower_case", alias = "lower")]
    Lower,
    /// `UPPERCASE`, word boundaries dropped.
    #[serde(rename = "upper_case", alias = "upper")]
    Upper,
}

impl Convention {
    /// Number of conventions; size of per-converter memo tables.
    pub const COUNT: usize = 9;

    /// Every convention, in declaration order.
    pub const ALL: [Convention; Convention::COUNT] = [
        Convention::Camel,
        Convention::Pascal,
        Convention::Snake,
        Convention::Kebab,
        Convention::Space,
        Convention::Dot,
        Convention::Constant,
        Convention::Lower,
        Convention::Upper,
    ];

    /// Conventions warmed by [`ConverterLibrary::parse_all`](crate::ConverterLibrary::parse_all)
    /// when no explicit list is given.
    pub const STANDARD: [Convention; 6] = [
        Convention::Camel,
        Convention::Dot,
        Convention::Kebab,
        Convention::Pascal,
        Convention::Snake,
        Convention::Space,
    ];

    pub(crate) fn index(self) -> usize {
        self as usize
    }

    /// Stable configuration name of the convention.
    pub fn name(self) -> &'static str {
        match self {
            Convention::Camel => "camel_case",
            Convention::Pascal => "pascal_case",
            Convention::Snake => "snake_case",
            Convention::Kebab => "kebab_case",
            Convention::Space => "space_separated",
            Convention::Dot => "dot_case",
            Convention::Constant => "constant_case",
            Convention::Lower => "lower_case",
            Convention::Upper => "upper_case",
        }
    }

    /// True for the two conventions that drop word boundaries entirely.
    pub fn is_case_fold(self) -> bool {
        matches!(self, Convention::Lower | Convention::Upper)
    }
}

impl fmt::Display for Convention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Convention {
    type Err = ConventionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded = render(Convention::Lower, &tokenize(s));
        let convention = match folded.as_str() {
            "camel" | "camelcase" => Convention::Camel,
            "pascal" | "pascalcase" => Convention::Pascal,
            "snake" | "snakecase" => Convention::Snake,
            "kebab" | "kebabcase" | "param" | "paramcase" => Convention::Kebab,
            "space" | "spaceseparated" | "spacecase" => Convention::Space,
            "dot" | "dotcase" | "dotseparated" => Convention::Dot,
            "const" | "constcase" | "constant" | "constantcase" => Convention::Constant,
            "lower" | "lowercase" => Convention::Lower,
            "upper" | "uppercase" => Convention::Upper,
            _ => return Err(ConventionError::Unknown(s.to_string())),
        };
        Ok(convention)
    }
}
