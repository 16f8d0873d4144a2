use std::fmt;

/// Marker byte separating words inside [`CanonicalTokens`].
pub(crate) const SEPARATOR: u8 = b' ';

/// Convention-independent form of an identifier: lowercase words joined by a
/// single space, with no leading, trailing or repeated separators.
///
/// Tokenizing a value that is already canonical yields the same value.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CanonicalTokens(Vec<u8>);

impl CanonicalTokens {
    /// Raw token bytes, words separated by ASCII space.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Token buffer as text.
    pub fn as_str(&self) -> &str {
        // Only ASCII bytes are ever inserted or rewritten, so the buffer is
        // still valid UTF-8.
        std::str::from_utf8(&self.0).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the individual words.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.as_str().split(' ').filter(|word| !word.is_empty())
    }
}

impl AsRef<str> for CanonicalTokens {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for CanonicalTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns true for the four word separators: `.`, `-`, `_` and space.
pub(crate) fn is_separator(byte: u8) -> bool {
    matches!(byte, b'.' | b'-' | b'_' | b' ')
}

/// Tokenizes an identifier-like string into [`CanonicalTokens`].
///
/// Single pass over the UTF-8 bytes:
///
/// - a separator (`.`, `-`, `_`, space) becomes one word boundary
/// - an ASCII uppercase letter that is not the first byte opens a new word
///   and is lowercased
/// - everything else is lowercased (ASCII only) and copied
///
/// Runs of boundaries collapse and edges are trimmed, so the output is
/// canonical. Acronyms are not grouped: `"HTTPServer"` becomes
/// `"h t t p server"`.
pub fn tokenize(input: &str) -> CanonicalTokens {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len() * 2);

    for (index, &byte) in bytes.iter().enumerate() {
        if is_separator(byte) {
            push_boundary(&mut out);
        } else if index != 0 && byte.is_ascii_uppercase() {
            push_boundary(&mut out);
            out.push(byte.to_ascii_lowercase());
        } else {
            out.push(byte.to_ascii_lowercase());
        }
    }

    if out.last() == Some(&SEPARATOR) {
        out.pop();
    }

    CanonicalTokens(out)
}

fn push_boundary(out: &mut Vec<u8>) {
    if matches!(out.last(), Some(&last) if last != SEPARATOR) {
        out.push(SEPARATOR);
    }
}
