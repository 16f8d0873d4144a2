//! Configuration types for the mapper.
//!
//! [`MapperConfig`] holds the serializable knobs, [`MapperOptions`] adds the
//! hooks (factory, error handler, instance validator) and
//! [`RegisterOptions`] carries per-type overrides merged over a base.
//!
//! # Quick Start
//!
//! ```rust
//! use convention::Convention;
//! use mapper::{MapperConfig, RegisterOptions};
//!
//! let config = MapperConfig {
//!     convention: Convention::Snake,
//!     key_auto_match: true,
//!     ..MapperConfig::default()
//! };
//! config.validate().expect("valid configuration");
//!
//! let options = RegisterOptions::new().relative_key("data");
//! assert_eq!(options.overrides.relative_key.as_deref(), Some("data"));
//! ```
use std::fmt;
use std::sync::Arc;

use convention::Convention;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ConstructError, MapError};
use crate::model::{FactoryInput, Mapped, Model, ModelRef};

/// Builds an instance for a model type.
pub type Factory =
    Arc<dyn Fn(&ModelRef, FactoryInput<'_>) -> Result<Box<dyn Model>, ConstructError> + Send + Sync>;

/// Offered construction failures; `Some` replaces the failed instance, `None`
/// makes the result absent.
pub type ErrorHandler = Arc<dyn Fn(&MapError) -> Option<Box<dyn Model>> + Send + Sync>;

/// Whole-instance check run after all fields are assigned.
pub type InstanceValidator = Arc<dyn Fn(&dyn Model) -> bool + Send + Sync>;

/// Per-field check run on the mapped value before it is assigned.
pub type FieldValidator = Arc<dyn Fn(&Mapped) -> bool + Send + Sync>;

/// Rewrites an incoming value before it is mapped.
pub type Transformer = Arc<dyn Fn(Value) -> Value + Send + Sync>;

/// Serializable mapper settings.
///
/// # Default
///
/// ```rust
/// use convention::Convention;
/// use mapper::MapperConfig;
///
/// let config = MapperConfig::default();
/// assert_eq!(config.convention, Convention::Camel);
/// assert!(!config.key_auto_match);
/// assert_eq!(config.max_depth, 64);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MapperConfig {
    /// Convention external keys are derived in.
    pub convention: Convention,

    /// Infer nested types from the template instance's default values.
    pub derive_type: bool,

    /// Skip field walking; return the factory result as is.
    pub no_key_mapping: bool,

    /// Fall back to case-insensitive matching for unmapped keys.
    pub key_auto_match: bool,

    /// Sub-object of the input to map instead of the input itself.
    pub relative_key: Option<String>,

    /// Maximum nesting depth before [`MapError::RecursionLimit`].
    pub max_depth: usize,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            convention: Convention::Camel,
            derive_type: false,
            no_key_mapping: false,
            key_auto_match: false,
            relative_key: None,
            max_depth: 64,
        }
    }
}

impl MapperConfig {
    pub fn validate(&self) -> Result<(), MapError> {
        if self.max_depth == 0 {
            return Err(MapError::Config("max_depth must be at least 1".into()));
        }
        if matches!(self.relative_key.as_deref(), Some("")) {
            return Err(MapError::Config("relative_key must not be empty".into()));
        }
        Ok(())
    }
}

/// Settings plus hooks. Clones share the hooks.
#[derive(Clone, Default)]
pub struct MapperOptions {
    pub config: MapperConfig,
    pub factory: Option<Factory>,
    pub error_handler: Option<ErrorHandler>,
    pub validator: Option<InstanceValidator>,
}

impl MapperOptions {
    pub fn new(config: MapperConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn with_factory<F>(mut self, factory: F) -> Self
    where
        F: Fn(&ModelRef, FactoryInput<'_>) -> Result<Box<dyn Model>, ConstructError>
            + Send
            + Sync
            + 'static,
    {
        self.factory = Some(Arc::new(factory));
        self
    }

    pub fn with_error_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&MapError) -> Option<Box<dyn Model>> + Send + Sync + 'static,
    {
        self.error_handler = Some(Arc::new(handler));
        self
    }

    pub fn with_validator<F>(mut self, validator: F) -> Self
    where
        F: Fn(&dyn Model) -> bool + Send + Sync + 'static,
    {
        self.validator = Some(Arc::new(validator));
        self
    }

    /// Builds an instance with the registered factory, or the type's own
    /// constructor when none is set.
    pub(crate) fn construct(
        &self,
        model: &ModelRef,
        input: FactoryInput<'_>,
    ) -> Result<Box<dyn Model>, ConstructError> {
        match &self.factory {
            Some(factory) => factory(model, input),
            None => model.construct(input),
        }
    }
}

impl fmt::Debug for MapperOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapperOptions")
            .field("config", &self.config)
            .field("factory", &self.factory.is_some())
            .field("error_handler", &self.error_handler.is_some())
            .field("validator", &self.validator.is_some())
            .finish()
    }
}

/// Optional per-type replacements for [`MapperConfig`] fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ConfigOverrides {
    pub convention: Option<Convention>,
    pub derive_type: Option<bool>,
    pub no_key_mapping: Option<bool>,
    pub key_auto_match: Option<bool>,
    pub relative_key: Option<String>,
}

impl ConfigOverrides {
    pub fn apply(&self, base: &MapperConfig) -> MapperConfig {
        MapperConfig {
            convention: self.convention.unwrap_or(base.convention),
            derive_type: self.derive_type.unwrap_or(base.derive_type),
            no_key_mapping: self.no_key_mapping.unwrap_or(base.no_key_mapping),
            key_auto_match: self.key_auto_match.unwrap_or(base.key_auto_match),
            relative_key: self
                .relative_key
                .clone()
                .or_else(|| base.relative_key.clone()),
            max_depth: base.max_depth,
        }
    }
}

/// Overrides and hooks applied when registering or overriding one type.
#[derive(Clone, Default)]
pub struct RegisterOptions {
    pub overrides: ConfigOverrides,
    pub factory: Option<Factory>,
    pub error_handler: Option<ErrorHandler>,
    pub validator: Option<InstanceValidator>,
}

impl RegisterOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_overrides(overrides: ConfigOverrides) -> Self {
        Self {
            overrides,
            ..Self::default()
        }
    }

    pub fn convention(mut self, convention: Convention) -> Self {
        self.overrides.convention = Some(convention);
        self
    }

    pub fn derive_type(mut self, enabled: bool) -> Self {
        self.overrides.derive_type = Some(enabled);
        self
    }

    pub fn no_key_mapping(mut self, enabled: bool) -> Self {
        self.overrides.no_key_mapping = Some(enabled);
        self
    }

    pub fn key_auto_match(mut self, enabled: bool) -> Self {
        self.overrides.key_auto_match = Some(enabled);
        self
    }

    pub fn relative_key(mut self, key: impl Into<String>) -> Self {
        self.overrides.relative_key = Some(key.into());
        self
    }

    pub fn factory<F>(mut self, factory: F) -> Self
    where
        F: Fn(&ModelRef, FactoryInput<'_>) -> Result<Box<dyn Model>, ConstructError>
            + Send
            + Sync
            + 'static,
    {
        self.factory = Some(Arc::new(factory));
        self
    }

    pub fn error_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&MapError) -> Option<Box<dyn Model>> + Send + Sync + 'static,
    {
        self.error_handler = Some(Arc::new(handler));
        self
    }

    pub fn validator<F>(mut self, validator: F) -> Self
    where
        F: Fn(&dyn Model) -> bool + Send + Sync + 'static,
    {
        self.validator = Some(Arc::new(validator));
        self
    }

    /// Fields set here win; everything else comes from `base`.
    pub fn merge_over(self, base: &MapperOptions) -> MapperOptions {
        MapperOptions {
            config: self.overrides.apply(&base.config),
            factory: self.factory.or_else(|| base.factory.clone()),
            error_handler: self.error_handler.or_else(|| base.error_handler.clone()),
            validator: self.validator.or_else(|| base.validator.clone()),
        }
    }
}

impl fmt::Debug for RegisterOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterOptions")
            .field("overrides", &self.overrides)
            .field("factory", &self.factory.is_some())
            .field("error_handler", &self.error_handler.is_some())
            .field("validator", &self.validator.is_some())
            .finish()
    }
}
