use std::cmp::Ordering;
use std::sync::OnceLock;

use crate::case::Convention;
use crate::config::ConverterOptions;
use crate::generate::{folded, render};
use crate::token::{tokenize, CanonicalTokens};

/// Wraps one string and memoizes its renderings.
///
/// The original value never changes, so cached outputs are never invalidated:
/// each convention is rendered at most once and every accessor takes `&self`.
#[derive(Debug, Clone)]
pub struct CaseConverter {
    value: String,
    tokens: OnceLock<CanonicalTokens>,
    outputs: [OnceLock<String>; Convention::COUNT],
}

impl CaseConverter {
    /// Creates a converter with default options (eager tokenization).
    pub fn new(value: impl Into<String>) -> Self {
        Self::with_options(value, &ConverterOptions::default())
    }

    pub fn with_options(value: impl Into<String>, options: &ConverterOptions) -> Self {
        let value = value.into();
        let tokens = OnceLock::new();
        if options.parse_on_init {
            let _ = tokens.set(tokenize(&value));
        }
        Self {
            value,
            tokens,
            outputs: std::array::from_fn(|_| OnceLock::new()),
        }
    }

    /// The original string.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Canonical tokens of the original string, computed on first use.
    pub fn tokens(&self) -> &CanonicalTokens {
        self.tokens.get_or_init(|| tokenize(&self.value))
    }

    /// Renders and memoizes each given convention; already cached entries are
    /// left untouched.
    pub fn parse(&self, conventions: &[Convention]) {
        for &convention in conventions {
            self.to_convention(convention);
        }
    }

    /// Memoized rendering of `convention`, computed on demand.
    pub fn to_convention(&self, convention: Convention) -> &str {
        self.outputs[convention.index()].get_or_init(|| render(convention, self.tokens()))
    }

    /// Cache peek: the rendering if it was already computed, `None` otherwise.
    pub fn peek(&self, convention: Convention) -> Option<&str> {
        self.outputs[convention.index()].get().map(String::as_str)
    }

    /// Convention-aware equality.
    ///
    /// - `None`: canonical tokens compared exactly
    /// - `Lower` / `Upper`: tokens compared with boundaries dropped and case folded
    /// - any other convention: the two renderings compared as strings
    pub fn equals(&self, other: &CaseConverter, convention: Option<Convention>) -> bool {
        self.compare(other, convention) == Ordering::Equal
    }

    /// Convention-aware ordering.
    ///
    /// Token and folded forms order the shorter form first, then byte by
    /// byte. Named conventions compare their renderings as strings.
    pub fn compare(&self, other: &CaseConverter, convention: Option<Convention>) -> Ordering {
        match convention {
            None => length_first(self.tokens().as_bytes(), other.tokens().as_bytes()),
            Some(fold @ (Convention::Lower | Convention::Upper)) => {
                let upper = fold == Convention::Upper;
                let left: Vec<u8> = folded(self.tokens().as_bytes(), upper).collect();
                let right: Vec<u8> = folded(other.tokens().as_bytes(), upper).collect();
                length_first(&left, &right)
            }
            Some(convention) => self
                .to_convention(convention)
                .cmp(other.to_convention(convention)),
        }
    }

    pub fn to_camel_case(&self) -> &str {
        self.to_convention(Convention::Camel)
    }

    pub fn to_pascal_case(&self) -> &str {
        self.to_convention(Convention::Pascal)
    }

    pub fn to_snake_case(&self) -> &str {
        self.to_convention(Convention::Snake)
    }

    pub fn to_kebab_case(&self) -> &str {
        self.to_convention(Convention::Kebab)
    }

    /// Alias of [`to_kebab_case`](Self::to_kebab_case).
    pub fn to_param_case(&self) -> &str {
        self.to_convention(Convention::Kebab)
    }

    pub fn to_space_separated(&self) -> &str {
        self.to_convention(Convention::Space)
    }

    pub fn to_dot_case(&self) -> &str {
        self.to_convention(Convention::Dot)
    }

    pub fn to_constant_case(&self) -> &str {
        self.to_convention(Convention::Constant)
    }

    pub fn to_lower_case(&self) -> &str {
        self.to_convention(Convention::Lower)
    }

    pub fn to_upper_case(&self) -> &str {
        self.to_convention(Convention::Upper)
    }
}

fn length_first(left: &[u8], right: &[u8]) -> Ordering {
    left.len().cmp(&right.len()).then_with(|| left.cmp(right))
}

/// Shorthand for [`CaseConverter::new`].
pub fn convert(value: &str) -> CaseConverter {
    CaseConverter::new(value)
}
