//! Workspace umbrella crate for automap.
//!
//! This crate stitches together naming-convention conversion and the mapper
//! so callers can turn JSON text into typed models with a single API entry
//! point.

pub mod config;

pub use config::{AutomapConfig, ConfigLoadError, TypeConfig};
pub use convention::{
    CanonicalTokens, CaseConverter, Convention, ConventionError, ConverterLibrary,
    ConverterOptions, convert, render, tokenize,
};
pub use mapper::{
    AsAny, AssignError, ConfigOverrides, Construct, ConstructError, ErrorHandler, Factory,
    FactoryInput, FieldValidator, HookKind, InstanceValidator, MapError, Mapped, Mapper,
    MapperConfig, MapperOptions, MetadataTable, Model, ModelRef, PropertyMetadata,
    RegisterOptions, RegisteredType, Transformer, transforms,
};

use std::error::Error;
use std::fmt;
use std::sync::{Arc, OnceLock, RwLock};
use std::time::{Duration, Instant};

use serde_json::Value;
use tracing::info;

/// Errors that can occur while taking JSON text through the mapper.
#[derive(Debug)]
pub enum PipelineError {
    Parse(serde_json::Error),
    Map(MapError),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Parse(err) => write!(f, "invalid JSON input: {err}"),
            PipelineError::Map(err) => write!(f, "mapping failure: {err}"),
        }
    }
}

impl Error for PipelineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PipelineError::Parse(err) => Some(err),
            PipelineError::Map(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(value: serde_json::Error) -> Self {
        PipelineError::Parse(value)
    }
}

impl From<MapError> for PipelineError {
    fn from(value: MapError) -> Self {
        PipelineError::Map(value)
    }
}

/// Metrics observer for pipeline stages.
pub trait PipelineMetrics: Send + Sync {
    fn record_parse(&self, latency: Duration, result: Result<(), &serde_json::Error>);
    fn record_map(&self, latency: Duration, model: &'static str, result: Result<(), &MapError>);
}

/// Install or clear the global pipeline metrics recorder.
pub fn set_pipeline_metrics(recorder: Option<Arc<dyn PipelineMetrics>>) {
    let mut guard = metrics_lock()
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = recorder;
}

fn metrics_lock() -> &'static RwLock<Option<Arc<dyn PipelineMetrics>>> {
    static METRICS: OnceLock<RwLock<Option<Arc<dyn PipelineMetrics>>>> = OnceLock::new();
    METRICS.get_or_init(|| RwLock::new(None))
}

fn metrics_recorder() -> Option<Arc<dyn PipelineMetrics>> {
    let guard = metrics_lock()
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    guard.clone()
}

struct MetricsSpan {
    recorder: Arc<dyn PipelineMetrics>,
    start: Instant,
}

impl MetricsSpan {
    fn start() -> Option<Self> {
        metrics_recorder().map(|recorder| Self {
            recorder,
            start: Instant::now(),
        })
    }

    fn record_parse(self, result: Result<(), &serde_json::Error>) {
        self.recorder.record_parse(self.start.elapsed(), result);
    }

    fn record_map(self, model: &'static str, result: Result<(), &MapError>) {
        self.recorder
            .record_map(self.start.elapsed(), model, result);
    }
}

/// Parse JSON text and map it into `model`.
pub fn map_json_str(
    mapper: &mut Mapper,
    json: &str,
    model: ModelRef,
) -> Result<Mapped, PipelineError> {
    map_json_str_with_params(mapper, json, model, &[])
}

/// [`map_json_str`] with extra positional parameters for the factory.
pub fn map_json_str_with_params(
    mapper: &mut Mapper,
    json: &str,
    model: ModelRef,
    params: &[Value],
) -> Result<Mapped, PipelineError> {
    let start = Instant::now();

    let parse_metrics = MetricsSpan::start();
    let data: Value = match serde_json::from_str(json) {
        Ok(data) => {
            if let Some(span) = parse_metrics {
                span.record_parse(Ok(()));
            }
            data
        }
        Err(err) => {
            if let Some(span) = parse_metrics {
                span.record_parse(Err(&err));
            }
            return Err(PipelineError::Parse(err));
        }
    };

    let map_metrics = MetricsSpan::start();
    let mapped = match mapper.map_with_params(&data, model, params) {
        Ok(mapped) => {
            if let Some(span) = map_metrics {
                span.record_map(model.name(), Ok(()));
            }
            mapped
        }
        Err(err) => {
            if let Some(span) = map_metrics {
                span.record_map(model.name(), Err(&err));
            }
            return Err(PipelineError::Map(err));
        }
    };

    info!(
        model = model.name(),
        input_bytes = json.len(),
        result = mapped.kind(),
        elapsed_micros = start.elapsed().as_micros() as u64,
        "pipeline.map"
    );
    Ok(mapped)
}

/// Parse JSON text and map it into one `T`.
pub fn map_json_str_into<T: Model>(
    mapper: &mut Mapper,
    json: &str,
    model: ModelRef,
) -> Result<T, PipelineError> {
    map_json_str(mapper, json, model)?
        .into_model()
        .map_err(|source| {
            PipelineError::Map(MapError::Shape {
                model: model.name(),
                source,
            })
        })
}
