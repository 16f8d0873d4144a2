use std::cmp::Ordering;

use fxhash::FxHashMap;

use crate::case::Convention;
use crate::config::ConverterOptions;
use crate::converter::CaseConverter;

/// Keyed cache of [`CaseConverter`]s, one per distinct string seen.
///
/// Field names repeat across every record of a mapping run; keeping one
/// converter per name means each is tokenized and rendered once. Entries are
/// only removed through [`delete`](Self::delete) and [`clear`](Self::clear).
#[derive(Debug, Clone, Default)]
pub struct ConverterLibrary {
    entries: FxHashMap<String, CaseConverter>,
    options: ConverterOptions,
}

impl ConverterLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Library whose new converters are created with `options`.
    pub fn with_options(options: ConverterOptions) -> Self {
        Self {
            entries: FxHashMap::default(),
            options,
        }
    }

    /// Creates (or replaces) the converter for `entry`.
    pub fn register(&mut self, entry: &str) -> &CaseConverter {
        let converter = CaseConverter::with_options(entry, &self.options);
        self.entries.insert(entry.to_owned(), converter);
        &self.entries[entry]
    }

    /// Cached converter for `entry`, created on first encounter.
    pub fn get_or_register(&mut self, entry: &str) -> &CaseConverter {
        if !self.entries.contains_key(entry) {
            let converter = CaseConverter::with_options(entry, &self.options);
            self.entries.insert(entry.to_owned(), converter);
        }
        &self.entries[entry]
    }

    pub fn get(&self, entry: &str) -> Option<&CaseConverter> {
        self.entries.get(entry)
    }

    pub fn has(&self, entry: &str) -> bool {
        self.entries.contains_key(entry)
    }

    pub fn delete(&mut self, entry: &str) -> bool {
        self.entries.remove(entry).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Raw strings currently cached, in no particular order.
    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Convention-aware equality of two raw strings, registering both.
    pub fn equals(&mut self, left: &str, right: &str, convention: Option<Convention>) -> bool {
        self.compare(left, right, convention) == Ordering::Equal
    }

    /// Convention-aware ordering of two raw strings, registering both.
    pub fn compare(&mut self, left: &str, right: &str, convention: Option<Convention>) -> Ordering {
        self.get_or_register(left);
        self.get_or_register(right);
        self.entries[left].compare(&self.entries[right], convention)
    }

    /// Renders `conventions` (default: [`Convention::STANDARD`]) for one cached
    /// entry. Returns false when `entry` is not cached.
    pub fn parse(&self, entry: &str, conventions: Option<&[Convention]>) -> bool {
        match self.entries.get(entry) {
            Some(converter) => {
                converter.parse(conventions.unwrap_or(&Convention::STANDARD));
                true
            }
            None => false,
        }
    }

    /// Pre-warms every cached entry before a high-volume run.
    pub fn parse_all(&self, conventions: Option<&[Convention]>) {
        let conventions = conventions.unwrap_or(&Convention::STANDARD);
        for converter in self.entries.values() {
            converter.parse(conventions);
        }
    }
}
