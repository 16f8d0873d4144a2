//! YAML configuration file support for automap.
//!
//! Mapper defaults and per-type registration settings can live in a single
//! YAML file and be applied at runtime. Types are keyed by their short Rust
//! name (what [`ModelRef::name`] returns).
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! version: "1.0"
//!
//! defaults:
//!   convention: snake_case
//!   key_auto_match: true
//!   max_depth: 32
//!
//! types:
//!   Message:
//!     convention: kebab_case
//!     relative_key: data
//!     define:
//!       foo: mesageOne
//!     ignore:
//!       - someValue
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use mapper::{ConfigOverrides, MapError, Mapper, MapperConfig, ModelRef, RegisterOptions, RegisteredType};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur when loading YAML configuration files
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),

    #[error("mapper rejected configuration: {0}")]
    Mapper(#[from] MapError),
}

/// Top-level YAML configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AutomapConfig {
    /// Configuration format version
    pub version: String,

    /// Optional configuration name/description
    #[serde(default)]
    pub name: Option<String>,

    /// Settings for every type without its own entry
    #[serde(default)]
    pub defaults: MapperConfig,

    /// Per-type settings keyed by short type name
    #[serde(default)]
    pub types: HashMap<String, TypeConfig>,
}

impl AutomapConfig {
    /// Load a YAML configuration file from the given path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML configuration from a string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: AutomapConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;

        self.defaults
            .validate()
            .map_err(|err| ConfigLoadError::Validation(format!("defaults: {err}")))?;

        for (name, ty) in &self.types {
            ty.overrides
                .apply(&self.defaults)
                .validate()
                .map_err(|err| ConfigLoadError::Validation(format!("types.{name}: {err}")))?;
        }

        Ok(())
    }

    /// Mapper using [`defaults`](Self::defaults).
    pub fn build_mapper(&self) -> Result<Mapper, ConfigLoadError> {
        Ok(Mapper::with_config(self.defaults.clone())?)
    }

    /// Registers `model` with its entry under `types`, if any: overrides,
    /// explicit definitions and ignored keys.
    pub fn register<'m>(
        &self,
        mapper: &'m mut Mapper,
        model: ModelRef,
    ) -> Result<&'m mut RegisteredType, ConfigLoadError> {
        let Some(ty) = self.types.get(model.name()) else {
            return Ok(mapper.register(model)?);
        };

        let registered =
            mapper.register_with(model, RegisterOptions::from_overrides(ty.overrides.clone()))?;
        for (external, field) in &ty.define {
            registered.define(external, Some(field), None)?;
        }
        for key in &ty.ignore {
            registered.ignore(key);
        }
        debug!(
            model = model.name(),
            defines = ty.define.len(),
            ignored = ty.ignore.len(),
            "config_register"
        );
        Ok(registered)
    }
}

impl Default for AutomapConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            name: None,
            defaults: MapperConfig::default(),
            types: HashMap::new(),
        }
    }
}

/// Registration settings for one type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TypeConfig {
    #[serde(flatten)]
    pub overrides: ConfigOverrides,

    /// External key -> internal field
    #[serde(default)]
    pub define: BTreeMap<String, String>,

    /// Fields or external keys skipped during mapping
    #[serde(default)]
    pub ignore: Vec<String>,
}
