//! Automap mapping layer.
//!
//! Populates typed models from untyped JSON records whose keys may not match
//! the model's field names in spelling or casing.
//!
//! ## What we do here
//!
//! - **Register types** - each model type gets a [`RegisteredType`] holding
//!   its field correspondence, nested types and hooks
//! - **Derive key mappings** - field names are converted into the configured
//!   naming convention once per type, through a shared
//!   [`ConverterLibrary`](convention::ConverterLibrary)
//! - **Auto-match** - optionally fall back to case-insensitive matching for
//!   keys with no mapping
//! - **Recurse** - fields with a nested type are mapped into that type; arrays
//!   map element by element
//! - **Log everything** - structured logs via tracing
//!
//! ## Main entry point
//!
//! Create a [`Mapper`], optionally register types with per-type options, then
//! call [`Mapper::map`] (or the typed [`Mapper::map_into`]).
//!
//! ```
//! use convention::Convention;
//! use mapper::{AssignError, Mapped, Mapper, MapperConfig, Model, ModelRef};
//! use serde_json::json;
//!
//! #[derive(Default)]
//! struct Account {
//!     display_name: String,
//! }
//!
//! impl Model for Account {
//!     fn properties(&self) -> &'static [&'static str] {
//!         &["displayName"]
//!     }
//!
//!     fn assign(&mut self, property: &str, value: Mapped) -> Result<(), AssignError> {
//!         match property {
//!             "displayName" => self.display_name = value.into_data()?,
//!             other => return Err(AssignError::UnknownProperty(other.to_string())),
//!         }
//!         Ok(())
//!     }
//! }
//!
//! let mut mapper = Mapper::with_config(MapperConfig {
//!     convention: Convention::Snake,
//!     ..MapperConfig::default()
//! })
//! .unwrap();
//!
//! let account: Account = mapper
//!     .map_into(&json!({ "display_name": "Ada" }), ModelRef::defaulted::<Account>())
//!     .unwrap();
//! assert_eq!(account.display_name, "Ada");
//! ```
use std::any::TypeId;
use std::collections::HashMap;

use convention::ConverterLibrary;
use serde_json::{Map, Value};
use tracing::{debug, trace, warn, Level};

mod config;
mod error;
mod metadata;
mod model;
mod registered;
pub mod transforms;

pub use crate::config::{
    ConfigOverrides, ErrorHandler, Factory, FieldValidator, InstanceValidator, MapperConfig,
    MapperOptions, RegisterOptions, Transformer,
};
pub use crate::error::{AssignError, ConstructError, HookKind, MapError};
pub use crate::metadata::{MetadataTable, PropertyMetadata};
pub use crate::model::{AsAny, Construct, FactoryInput, Mapped, Model, ModelRef};
pub use crate::registered::RegisteredType;

/// Registry of model types plus the shared converter cache and metadata.
///
/// Registration and mapping take `&mut self`; share a mapper across threads
/// behind a lock.
#[derive(Debug, Default)]
pub struct Mapper {
    options: MapperOptions,
    registry: HashMap<TypeId, RegisteredType>,
    library: ConverterLibrary,
    metadata: MetadataTable,
}

/// One resolved input key, collected before any recursion.
struct FieldStep<'a> {
    value: &'a Value,
    field: String,
    nested: Option<ModelRef>,
    transformer: Option<Transformer>,
    validator: Option<FieldValidator>,
}

impl Mapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: MapperConfig) -> Result<Self, MapError> {
        Self::with_options(MapperOptions::new(config))
    }

    /// Mapper whose defaults apply to every type not registered with its own
    /// options, including types auto-registered during mapping.
    pub fn with_options(options: MapperOptions) -> Result<Self, MapError> {
        options.config.validate()?;
        Ok(Self {
            options,
            ..Self::default()
        })
    }

    pub fn options(&self) -> &MapperOptions {
        &self.options
    }

    pub fn metadata(&self) -> &MetadataTable {
        &self.metadata
    }

    /// Per-property declarations; make them before the type is first mapped.
    pub fn metadata_mut(&mut self) -> &mut MetadataTable {
        &mut self.metadata
    }

    pub fn library(&self) -> &ConverterLibrary {
        &self.library
    }

    pub fn library_mut(&mut self) -> &mut ConverterLibrary {
        &mut self.library
    }

    /// Registers `model` with the mapper's defaults.
    pub fn register(&mut self, model: ModelRef) -> Result<&mut RegisteredType, MapError> {
        self.register_with(model, RegisterOptions::default())
    }

    /// Registers `model` with the defaults and a custom factory.
    pub fn register_factory<F>(
        &mut self,
        model: ModelRef,
        factory: F,
    ) -> Result<&mut RegisteredType, MapError>
    where
        F: Fn(&ModelRef, FactoryInput<'_>) -> Result<Box<dyn Model>, ConstructError>
            + Send
            + Sync
            + 'static,
    {
        self.register_with(model, RegisterOptions::new().factory(factory))
    }

    /// Registers `model` with `options` merged over the mapper's defaults.
    pub fn register_with(
        &mut self,
        model: ModelRef,
        options: RegisterOptions,
    ) -> Result<&mut RegisteredType, MapError> {
        if self.registry.contains_key(&model.id()) {
            return Err(MapError::DuplicateRegistration {
                model: model.name(),
            });
        }
        let options = options.merge_over(&self.options);
        options.config.validate()?;
        debug!(model = model.name(), options = ?options, "register");
        Ok(self
            .registry
            .entry(model.id())
            .or_insert_with(|| RegisteredType::new(model, options)))
    }

    /// Replaces the registration of `model`, keeping its previous options.
    pub fn override_type(&mut self, model: ModelRef) -> Result<&mut RegisteredType, MapError> {
        self.override_with(model, RegisterOptions::default())
    }

    pub fn override_factory<F>(
        &mut self,
        model: ModelRef,
        factory: F,
    ) -> Result<&mut RegisteredType, MapError>
    where
        F: Fn(&ModelRef, FactoryInput<'_>) -> Result<Box<dyn Model>, ConstructError>
            + Send
            + Sync
            + 'static,
    {
        self.override_with(model, RegisterOptions::new().factory(factory))
    }

    /// Replaces the registration of `model` with `options` merged over its
    /// previous options. Definitions and hooks start over.
    pub fn override_with(
        &mut self,
        model: ModelRef,
        options: RegisterOptions,
    ) -> Result<&mut RegisteredType, MapError> {
        let Some(slot) = self.registry.get_mut(&model.id()) else {
            return Err(MapError::NotRegistered {
                model: model.name(),
            });
        };
        let options = options.merge_over(slot.options());
        options.config.validate()?;
        debug!(model = model.name(), options = ?options, "override");
        *slot = RegisteredType::new(model, options);
        Ok(slot)
    }

    pub fn is_registered(&self, model: &ModelRef) -> bool {
        self.registry.contains_key(&model.id())
    }

    pub fn registered(&self, model: &ModelRef) -> Option<&RegisteredType> {
        self.registry.get(&model.id())
    }

    pub fn registered_mut(&mut self, model: &ModelRef) -> Option<&mut RegisteredType> {
        self.registry.get_mut(&model.id())
    }

    /// Parses every registered type now instead of on first use.
    pub fn optimize(&mut self) -> Result<(), MapError> {
        for registered in self.registry.values_mut() {
            registered.parse(&mut self.library, &self.metadata)?;
        }
        debug!(types = self.registry.len(), "optimize");
        Ok(())
    }

    /// Maps `data` into `model`.
    ///
    /// - arrays map element by element into [`Mapped::List`]
    /// - objects are walked field by field
    /// - other scalars go straight to the factory
    /// - `null` yields [`Mapped::Absent`]
    pub fn map(&mut self, data: &Value, model: ModelRef) -> Result<Mapped, MapError> {
        self.map_with_params(data, model, &[])
    }

    /// [`map`](Self::map) with extra positional parameters for the factory.
    pub fn map_with_params(
        &mut self,
        data: &Value,
        model: ModelRef,
        params: &[Value],
    ) -> Result<Mapped, MapError> {
        let span = tracing::span!(Level::DEBUG, "mapper.map", model = model.name());
        let _guard = span.enter();

        match self.map_value(data, model, params, 0) {
            Ok(mapped) => Ok(mapped),
            Err(err) => {
                warn!(model = model.name(), error = %err, "map_failure");
                Err(err)
            }
        }
    }

    /// Maps `data` into one `T`.
    pub fn map_into<T: Model>(&mut self, data: &Value, model: ModelRef) -> Result<T, MapError> {
        self.map(data, model)?
            .into_model()
            .map_err(|source| MapError::Shape {
                model: model.name(),
                source,
            })
    }

    /// Maps an array into a list of `T`.
    pub fn map_all<T: Model>(&mut self, data: &Value, model: ModelRef) -> Result<Vec<T>, MapError> {
        self.map(data, model)?
            .into_models()
            .map_err(|source| MapError::Shape {
                model: model.name(),
                source,
            })
    }

    fn map_value(
        &mut self,
        data: &Value,
        model: ModelRef,
        params: &[Value],
        depth: usize,
    ) -> Result<Mapped, MapError> {
        let limit = self.options.config.max_depth;
        if depth >= limit {
            return Err(MapError::RecursionLimit {
                model: model.name(),
                limit,
            });
        }

        match data {
            Value::Null => Ok(Mapped::Absent),
            Value::Array(items) => {
                let mut list = Vec::with_capacity(items.len());
                let mut element_params = Vec::with_capacity(params.len() + 1);
                for (index, item) in items.iter().enumerate() {
                    element_params.clear();
                    element_params.push(Value::from(index));
                    element_params.extend_from_slice(params);
                    list.push(self.map_value(item, model, &element_params, depth)?);
                }
                Ok(Mapped::List(list))
            }
            Value::Object(fields) => self.map_object(data, fields, model, params, depth),
            scalar => self.map_scalar(scalar, model, params),
        }
    }

    fn map_scalar(
        &mut self,
        data: &Value,
        model: ModelRef,
        params: &[Value],
    ) -> Result<Mapped, MapError> {
        let options = registered_entry(&mut self.registry, &self.options, model)
            .options()
            .clone();
        let instance = construct_instance(&options, &model, FactoryInput::new(Some(data), params))?;
        Ok(instance.map_or(Mapped::Absent, Mapped::Instance))
    }

    fn map_object(
        &mut self,
        data: &Value,
        fields: &Map<String, Value>,
        model: ModelRef,
        params: &[Value],
        depth: usize,
    ) -> Result<Mapped, MapError> {
        let registered = registered_entry(&mut self.registry, &self.options, model);
        registered.parse(&mut self.library, &self.metadata)?;
        let options = registered.options().clone();

        let (input, fields) = match options.config.relative_key.as_deref() {
            Some(key) => {
                let inner = fields.get(key);
                (inner, inner.and_then(Value::as_object))
            }
            None => (Some(data), Some(fields)),
        };

        let Some(mut instance) =
            construct_instance(&options, &model, FactoryInput::new(input, params))?
        else {
            return Ok(Mapped::Absent);
        };

        if !options.config.no_key_mapping {
            if let Some(fields) = fields {
                let steps = match self.registry.get_mut(&model.id()) {
                    Some(registered) => resolve_fields(
                        registered,
                        &mut self.library,
                        fields,
                        options.config.key_auto_match,
                    ),
                    None => Vec::new(),
                };

                for step in steps {
                    let transformed;
                    let value = match &step.transformer {
                        Some(transform) => {
                            transformed = transform(step.value.clone());
                            &transformed
                        }
                        None => step.value,
                    };

                    let mapped = match step.nested {
                        Some(nested) => self
                            .map_value(value, nested, params, depth + 1)
                            .map_err(|source| MapError::Nested {
                                model: model.name(),
                                field: step.field.clone(),
                                source: Box::new(source),
                            })?,
                        None => Mapped::Data(value.clone()),
                    };

                    if let Some(validator) = &step.validator {
                        if !validator(&mapped) {
                            return Err(MapError::InvalidField {
                                model: model.name(),
                                field: step.field,
                            });
                        }
                    }

                    if let Err(source) = instance.assign(&step.field, mapped) {
                        return Err(MapError::Mapping {
                            model: model.name(),
                            field: step.field,
                            source,
                        });
                    }
                }
            }

            if let Some(validator) = &options.validator {
                if !validator(&*instance) {
                    return Err(MapError::InvalidInstance {
                        model: model.name(),
                    });
                }
            }
        }

        Ok(Mapped::Instance(instance))
    }
}

/// Registration for `model`, auto-registered with `defaults` on first use.
fn registered_entry<'r>(
    registry: &'r mut HashMap<TypeId, RegisteredType>,
    defaults: &MapperOptions,
    model: ModelRef,
) -> &'r mut RegisteredType {
    registry.entry(model.id()).or_insert_with(|| {
        debug!(model = model.name(), "auto_register");
        RegisteredType::new(model, defaults.clone())
    })
}

/// Runs the factory; a failure is offered to the error handler, whose answer
/// replaces the instance (`None` meaning absent).
fn construct_instance(
    options: &MapperOptions,
    model: &ModelRef,
    input: FactoryInput<'_>,
) -> Result<Option<Box<dyn Model>>, MapError> {
    match options.construct(model, input) {
        Ok(instance) => Ok(Some(instance)),
        Err(source) => {
            let err = MapError::Construction {
                model: model.name(),
                source,
            };
            match &options.error_handler {
                Some(handler) => {
                    let recovered = handler(&err);
                    warn!(
                        model = model.name(),
                        error = %err,
                        recovered = recovered.is_some(),
                        "construction_recovered"
                    );
                    Ok(recovered)
                }
                None => Err(err),
            }
        }
    }
}

fn resolve_fields<'a>(
    registered: &mut RegisteredType,
    library: &mut ConverterLibrary,
    fields: &'a Map<String, Value>,
    auto_match: bool,
) -> Vec<FieldStep<'a>> {
    let mut steps = Vec::with_capacity(fields.len());

    for (key, value) in fields {
        if registered.is_ignored(key) {
            continue;
        }

        let field = match registered.key_mapping(key) {
            Some(field) => field.to_owned(),
            None if auto_match => match registered.match_key(library, key) {
                Some(field) => field,
                None => {
                    trace!(model = registered.model().name(), key = %key, "unmatched_key");
                    continue;
                }
            },
            None => {
                trace!(model = registered.model().name(), key = %key, "unmapped_key");
                continue;
            }
        };

        if registered.is_ignored(&field) {
            continue;
        }

        steps.push(FieldStep {
            value,
            nested: registered.nested_type(&field),
            transformer: registered.transformer(key).cloned(),
            validator: registered.field_validator(&field).cloned(),
            field,
        });
    }

    steps
}
