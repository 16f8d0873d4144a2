use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use convention::{Convention, ConverterLibrary};
use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, trace};

use crate::config::{FieldValidator, MapperOptions, Transformer};
use crate::error::{HookKind, MapError};
use crate::metadata::MetadataTable;
use crate::model::{FactoryInput, Mapped, Model, ModelRef};

/// Field correspondence and hooks for one model type.
///
/// The correspondence table is derived from a template instance the first
/// time the type is parsed. Explicit [`define`](Self::define) calls made
/// before that are kept as is; auto-derivation only fills the gaps.
pub struct RegisteredType {
    model: ModelRef,
    options: MapperOptions,
    template: Option<Box<dyn Model>>,
    properties: &'static [&'static str],
    ignored: HashSet<String>,
    // internal field -> external key
    source_mappings: IndexMap<String, String>,
    // external key -> internal field
    foreign_mappings: IndexMap<String, String>,
    type_mappings: HashMap<String, ModelRef>,
    transformers: HashMap<String, Transformer>,
    validators: HashMap<String, FieldValidator>,
    parsed: bool,
}

impl RegisteredType {
    pub fn new(model: ModelRef, options: MapperOptions) -> Self {
        Self {
            model,
            options,
            template: None,
            properties: &[],
            ignored: HashSet::new(),
            source_mappings: IndexMap::new(),
            foreign_mappings: IndexMap::new(),
            type_mappings: HashMap::new(),
            transformers: HashMap::new(),
            validators: HashMap::new(),
            parsed: false,
        }
    }

    pub fn model(&self) -> ModelRef {
        self.model
    }

    pub fn options(&self) -> &MapperOptions {
        &self.options
    }

    pub fn is_parsed(&self) -> bool {
        self.parsed
    }

    /// Derives the external key of every declared property not explicitly
    /// defined, in the configured convention. Runs once.
    pub fn parse(
        &mut self,
        library: &mut ConverterLibrary,
        metadata: &MetadataTable,
    ) -> Result<(), MapError> {
        if self.parsed {
            return Ok(());
        }

        let template = self.take_template()?;
        let convention = self.options.config.convention;
        let derive_type = self.options.config.derive_type;

        for &property in self.properties {
            // explicit definitions are final, metadata included
            if self.source_mappings.contains_key(property) {
                continue;
            }

            let declared = metadata
                .lookup(&self.model, property)
                .copied()
                .unwrap_or_default();
            if declared.ignore {
                self.ignored.insert(property.to_owned());
            }

            let external = library
                .get_or_register(property)
                .to_convention(convention)
                .to_owned();
            self.foreign_mappings
                .entry(external.clone())
                .or_insert_with(|| property.to_owned());
            self.source_mappings.insert(property.to_owned(), external);

            let nested = declared.nested.or_else(|| {
                if derive_type {
                    template.default_type(property)
                } else {
                    None
                }
            });
            if let Some(nested) = nested {
                self.type_mappings.insert(property.to_owned(), nested);
            }
        }

        self.template = Some(template);
        self.parsed = true;
        debug!(
            model = self.model.name(),
            convention = %convention,
            fields = self.source_mappings.len(),
            nested = self.type_mappings.len(),
            "parse"
        );
        Ok(())
    }

    /// Maps `external` onto `source` (default: a field named `external`),
    /// optionally into a nested type. The first definition of an external key
    /// wins; later ones are ignored.
    pub fn define(
        &mut self,
        external: &str,
        source: Option<&str>,
        nested: Option<ModelRef>,
    ) -> Result<&mut Self, MapError> {
        let source = source.unwrap_or(external);
        let template = self.take_template()?;
        self.template = Some(template);

        if !self.properties.iter().any(|property| *property == source) {
            return Err(MapError::UnknownSourceField {
                model: self.model.name(),
                field: source.to_owned(),
            });
        }

        if !self.foreign_mappings.contains_key(external) {
            self.source_mappings
                .entry(source.to_owned())
                .or_insert_with(|| external.to_owned());
            self.foreign_mappings
                .insert(external.to_owned(), source.to_owned());
            if let Some(nested) = nested {
                self.type_mappings.insert(source.to_owned(), nested);
            }
            debug!(
                model = self.model.name(),
                external,
                field = source,
                nested = nested.map(|n| n.name()),
                "define"
            );
        }

        Ok(self)
    }

    /// Skips a field, or an external key, during mapping.
    pub fn ignore(&mut self, key: &str) -> &mut Self {
        self.ignored.insert(key.to_owned());
        self
    }

    pub fn is_ignored(&self, key: &str) -> bool {
        self.ignored.contains(key)
    }

    /// Registers the validator for an internal field.
    pub fn validate<F>(&mut self, field: &str, validator: F) -> Result<&mut Self, MapError>
    where
        F: Fn(&Mapped) -> bool + Send + Sync + 'static,
    {
        if self.validators.contains_key(field) {
            return Err(MapError::DuplicateHook {
                model: self.model.name(),
                key: field.to_owned(),
                hook: HookKind::Validator,
            });
        }
        self.validators.insert(field.to_owned(), Arc::new(validator));
        Ok(self)
    }

    /// Registers the transformer for an external key.
    pub fn transform<F>(&mut self, external: &str, transformer: F) -> Result<&mut Self, MapError>
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        if self.transformers.contains_key(external) {
            return Err(MapError::DuplicateHook {
                model: self.model.name(),
                key: external.to_owned(),
                hook: HookKind::Transformer,
            });
        }
        self.transformers
            .insert(external.to_owned(), Arc::new(transformer));
        Ok(self)
    }

    /// Internal field an external key is mapped to.
    pub fn key_mapping(&self, external: &str) -> Option<&str> {
        self.foreign_mappings.get(external).map(String::as_str)
    }

    /// External key derived or defined for an internal field.
    pub fn external_key(&self, field: &str) -> Option<&str> {
        self.source_mappings.get(field).map(String::as_str)
    }

    pub fn nested_type(&self, field: &str) -> Option<ModelRef> {
        self.type_mappings.get(field).copied()
    }

    /// `(internal, external)` pairs in the order they were recorded.
    pub fn mappings(&self) -> impl Iterator<Item = (&str, &str)> {
        self.source_mappings
            .iter()
            .map(|(field, external)| (field.as_str(), external.as_str()))
    }

    pub(crate) fn transformer(&self, external: &str) -> Option<&Transformer> {
        self.transformers.get(external)
    }

    pub(crate) fn field_validator(&self, field: &str) -> Option<&FieldValidator> {
        self.validators.get(field)
    }

    /// Case-insensitive fallback for a key with no mapping: compares the key's
    /// lowercase form against each non-ignored field in declaration order and
    /// caches the first hit.
    pub fn match_key(&mut self, library: &mut ConverterLibrary, key: &str) -> Option<String> {
        for &field in self.properties {
            if self.ignored.contains(field) {
                continue;
            }
            if library.equals(field, key, Some(Convention::Lower)) {
                trace!(model = self.model.name(), key, field, "auto_match");
                self.foreign_mappings
                    .insert(key.to_owned(), field.to_owned());
                return Some(field.to_owned());
            }
        }
        None
    }

    fn take_template(&mut self) -> Result<Box<dyn Model>, MapError> {
        if let Some(template) = self.template.take() {
            return Ok(template);
        }
        let template = match self.options.construct(&self.model, FactoryInput::empty()) {
            Ok(template) => template,
            Err(source) => {
                let err = MapError::Construction {
                    model: self.model.name(),
                    source,
                };
                match self.options.error_handler.as_ref().and_then(|handler| handler(&err)) {
                    Some(template) => template,
                    None => return Err(err),
                }
            }
        };
        self.properties = template.properties();
        Ok(template)
    }
}

impl std::fmt::Debug for RegisteredType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredType")
            .field("model", &self.model)
            .field("options", &self.options)
            .field("parsed", &self.parsed)
            .field("source_mappings", &self.source_mappings)
            .field("ignored", &self.ignored)
            .finish_non_exhaustive()
    }
}
