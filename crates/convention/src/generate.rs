//! Case generators: pure functions from [`CanonicalTokens`] to one
//! convention's string form.
//!
//! Three families:
//!
//! - separator based (`snake_case`, `kebab-case`, `dot.case`, `space separated`,
//!   `CONST_CASE`): word boundaries become the convention's separator
//! - capitalization based (`camelCase`, `PascalCase`): boundaries are removed
//!   and the following letter is uppercased
//! - trim only (`lowercase`, `UPPERCASE`): boundaries are removed
//!
//! Every generator collapses repeated boundaries and ignores boundaries at the
//! edges, so it is total over any byte buffer, canonical or not.
//!
//! ```rust
//! use convention::{render, tokenize, Convention};
//!
//! let tokens = tokenize("testingString101Hello");
//! assert_eq!(render(Convention::Pascal, &tokens), "TestingString101Hello");
//! assert_eq!(render(Convention::Snake, &tokens), "testing_string101_hello");
//! assert_eq!(render(Convention::Constant, &tokens), "TESTING_STRING101_HELLO");
//! ```

use crate::case::Convention;
use crate::token::{CanonicalTokens, SEPARATOR};

#[derive(Clone, Copy)]
enum Shift {
    Keep,
    Upper,
}

impl Shift {
    fn apply(self, byte: u8) -> u8 {
        match self {
            Shift::Keep => byte,
            Shift::Upper => byte.to_ascii_uppercase(),
        }
    }
}

/// Renders `tokens` in the given convention.
pub fn render(convention: Convention, tokens: &CanonicalTokens) -> String {
    render_bytes(convention, tokens.as_bytes())
}

pub(crate) fn render_bytes(convention: Convention, tokens: &[u8]) -> String {
    match convention {
        Convention::Camel => capitalized(tokens, false),
        Convention::Pascal => capitalized(tokens, true),
        Convention::Snake => separated(tokens, b'_', Shift::Keep),
        Convention::Kebab => separated(tokens, b'-', Shift::Keep),
        Convention::Space => separated(tokens, b' ', Shift::Keep),
        Convention::Dot => separated(tokens, b'.', Shift::Keep),
        Convention::Constant => separated(tokens, b'_', Shift::Upper),
        Convention::Lower => trimmed(tokens, Shift::Keep),
        Convention::Upper => trimmed(tokens, Shift::Upper),
    }
}

pub fn to_camel_case(tokens: &CanonicalTokens) -> String {
    capitalized(tokens.as_bytes(), false)
}

pub fn to_pascal_case(tokens: &CanonicalTokens) -> String {
    capitalized(tokens.as_bytes(), true)
}

pub fn to_snake_case(tokens: &CanonicalTokens) -> String {
    separated(tokens.as_bytes(), b'_', Shift::Keep)
}

/// Same output as param-case.
pub fn to_kebab_case(tokens: &CanonicalTokens) -> String {
    separated(tokens.as_bytes(), b'-', Shift::Keep)
}

pub fn to_space_separated(tokens: &CanonicalTokens) -> String {
    separated(tokens.as_bytes(), b' ', Shift::Keep)
}

pub fn to_dot_case(tokens: &CanonicalTokens) -> String {
    separated(tokens.as_bytes(), b'.', Shift::Keep)
}

pub fn to_constant_case(tokens: &CanonicalTokens) -> String {
    separated(tokens.as_bytes(), b'_', Shift::Upper)
}

pub fn to_lower_case(tokens: &CanonicalTokens) -> String {
    trimmed(tokens.as_bytes(), Shift::Keep)
}

pub fn to_upper_case(tokens: &CanonicalTokens) -> String {
    trimmed(tokens.as_bytes(), Shift::Upper)
}

/// Word-folded bytes used by the `LOWER`/`UPPER` comparison modes; no allocation.
pub(crate) fn folded(tokens: &[u8], upper: bool) -> impl Iterator<Item = u8> + '_ {
    let shift = if upper { Shift::Upper } else { Shift::Keep };
    tokens
        .iter()
        .filter(|&&byte| byte != SEPARATOR)
        .map(move |&byte| shift.apply(byte))
}

fn separated(tokens: &[u8], separator: u8, shift: Shift) -> String {
    let mut out = Vec::with_capacity(tokens.len());
    let mut pending = false;

    for &byte in tokens {
        if byte == SEPARATOR {
            pending = !out.is_empty();
            continue;
        }
        if pending {
            out.push(separator);
            pending = false;
        }
        out.push(shift.apply(byte));
    }

    finish(out)
}

fn capitalized(tokens: &[u8], capitalize_first: bool) -> String {
    let mut out = Vec::with_capacity(tokens.len());
    let mut capitalize = capitalize_first;

    for &byte in tokens {
        if byte == SEPARATOR {
            // camelCase keeps its first word lowercase even after a stray
            // leading boundary.
            capitalize = capitalize_first || !out.is_empty();
            continue;
        }
        out.push(if capitalize {
            byte.to_ascii_uppercase()
        } else {
            byte
        });
        capitalize = false;
    }

    finish(out)
}

fn trimmed(tokens: &[u8], shift: Shift) -> String {
    let out: Vec<u8> = tokens
        .iter()
        .filter(|&&byte| byte != SEPARATOR)
        .map(|&byte| shift.apply(byte))
        .collect();
    finish(out)
}

fn finish(out: Vec<u8>) -> String {
    String::from_utf8(out)
        .unwrap_or_else(|err| String::from_utf8_lossy(err.as_bytes()).into_owned())
}
