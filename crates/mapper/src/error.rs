//! Error types produced by the mapper crate.
//!
//! # Error Categories
//!
//! | Error | Category | Recoverable via `error_handler` |
//! |-------|----------|---------------------------------|
//! | [`DuplicateRegistration`](MapError::DuplicateRegistration) | Registration | no |
//! | [`NotRegistered`](MapError::NotRegistered) | Registration | no |
//! | [`UnknownSourceField`](MapError::UnknownSourceField) | Registration | no |
//! | [`DuplicateHook`](MapError::DuplicateHook) | Registration | no |
//! | [`Config`](MapError::Config) | Registration | no |
//! | [`Construction`](MapError::Construction) | Per instance | yes |
//! | [`Mapping`](MapError::Mapping) | Per instance | no |
//! | [`Nested`](MapError::Nested) | Per instance | no |
//! | [`InvalidField`](MapError::InvalidField) | Validation | no |
//! | [`InvalidInstance`](MapError::InvalidInstance) | Validation | no |
//! | [`RecursionLimit`](MapError::RecursionLimit) | Per instance | no |
//! | [`Shape`](MapError::Shape) | Extraction | no |
//!
//! Unmapped input keys and failed auto-matches are not errors; those keys are
//! dropped.
use thiserror::Error;

/// Errors raised while registering types or mapping data.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum MapError {
    /// The type already has a registration; use an override instead.
    #[error("{model} already registered, override it to change its mapping")]
    DuplicateRegistration { model: &'static str },

    #[error("{model} not registered, register it before overriding")]
    NotRegistered { model: &'static str },

    /// An explicit definition names a field the model does not declare.
    #[error("field `{field}` not found on {model}")]
    UnknownSourceField { model: &'static str, field: String },

    /// A second validator or transformer for the same key.
    #[error("key `{key}` of {model} already has a {hook} defined")]
    DuplicateHook {
        model: &'static str,
        key: String,
        hook: HookKind,
    },

    /// The factory failed to produce an instance.
    #[error("failed to construct {model}: {source}")]
    Construction {
        model: &'static str,
        #[source]
        source: ConstructError,
    },

    /// Writing a resolved value onto the instance failed.
    #[error("failed to assign `{field}` on {model}: {source}")]
    Mapping {
        model: &'static str,
        field: String,
        #[source]
        source: AssignError,
    },

    /// A nested field failed to map; the parent's `error_handler` never sees
    /// it.
    #[error("failed to map `{field}` of {model}: {source}")]
    Nested {
        model: &'static str,
        field: String,
        #[source]
        source: Box<MapError>,
    },

    #[error("validation failed for `{field}` on {model}")]
    InvalidField { model: &'static str, field: String },

    #[error("validation failed for {model} instance")]
    InvalidInstance { model: &'static str },

    /// Nested mapping went deeper than the configured `max_depth`.
    #[error("recursion limit of {limit} reached while mapping {model}")]
    RecursionLimit { model: &'static str, limit: usize },

    /// A mapping result did not have the shape the caller asked for.
    #[error("unexpected mapping result for {model}: {source}")]
    Shape {
        model: &'static str,
        #[source]
        source: AssignError,
    },

    #[error("invalid mapper configuration: {0}")]
    Config(String),
}

impl MapError {
    /// True for errors raised by registration calls rather than by mapping data.
    pub fn is_registration_error(&self) -> bool {
        matches!(
            self,
            MapError::DuplicateRegistration { .. }
                | MapError::NotRegistered { .. }
                | MapError::UnknownSourceField { .. }
                | MapError::DuplicateHook { .. }
                | MapError::Config(_)
        )
    }

    /// True for the errors a per-type `error_handler` is offered.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, MapError::Construction { .. })
    }

    /// The innermost error behind any [`Nested`](MapError::Nested) layers.
    pub fn root_cause(&self) -> &MapError {
        let mut err = self;
        while let MapError::Nested { source, .. } = err {
            err = source;
        }
        err
    }
}

/// Which per-key hook a [`MapError::DuplicateHook`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookKind {
    Validator,
    Transformer,
}

impl std::fmt::Display for HookKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HookKind::Validator => f.write_str("validator"),
            HookKind::Transformer => f.write_str("transformation"),
        }
    }
}

/// Raised by factories and [`Construct`](crate::Construct) implementations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ConstructError {
    /// The model cannot be built without input data.
    #[error("a value is required")]
    MissingValue,

    #[error("invalid input: {0}")]
    Invalid(String),

    #[error(transparent)]
    Data(#[from] serde_json::Error),
}

/// Raised by [`Model::assign`](crate::Model::assign) and the typed
/// [`Mapped`](crate::Mapped) extractors.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AssignError {
    #[error("unknown property `{0}`")]
    UnknownProperty(String),

    /// The mapped value had a different shape than the property expects.
    #[error("expected {expected}, found {found}")]
    Shape {
        expected: &'static str,
        found: &'static str,
    },

    #[error(transparent)]
    Data(#[from] serde_json::Error),
}
