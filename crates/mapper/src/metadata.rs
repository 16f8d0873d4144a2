//! Per-property override side-table.
//!
//! Declarations are made once per (model, property) before the model is first
//! parsed; [`RegisteredType::parse`](crate::RegisteredType::parse) queries the
//! table for every declared property without an explicit definition.

use std::any::TypeId;
use std::collections::HashMap;

use crate::model::{Model, ModelRef};

/// Overrides recorded for one property.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PropertyMetadata {
    /// Type to map the property's value into.
    pub nested: Option<ModelRef>,
    /// Skip the property during mapping.
    pub ignore: bool,
}

#[derive(Debug, Clone, Default)]
pub struct MetadataTable {
    entries: HashMap<(TypeId, String), PropertyMetadata>,
}

impl MetadataTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares the nested type of `T::property`.
    pub fn declare_type<T: Model>(&mut self, property: &str, nested: ModelRef) -> &mut Self {
        self.entry::<T>(property).nested = Some(nested);
        self
    }

    /// Marks `T::property` as ignored.
    pub fn declare_ignored<T: Model>(&mut self, property: &str) -> &mut Self {
        self.entry::<T>(property).ignore = true;
        self
    }

    pub fn lookup(&self, model: &ModelRef, property: &str) -> Option<&PropertyMetadata> {
        self.entries.get(&(model.id(), property.to_owned()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry<T: Model>(&mut self, property: &str) -> &mut PropertyMetadata {
        self.entries
            .entry((TypeId::of::<T>(), property.to_owned()))
            .or_default()
    }
}
