use ort::session::builder::{GraphOptimizationLevel, SessionBuilder};
use ort::session::Session;
use std::sync::OnceLock;

use crate::classifier::ModelLoadError;

static INIT: OnceLock<Result<(), String>> = OnceLock::new();

/// Settings for the ONNX Runtime session that executes the model.
#[derive(Debug)]
pub struct RuntimeConfig {
    pub inter_threads: usize,
    pub intra_threads: usize,
    pub optimization_level: GraphOptimizationLevel,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            inter_threads: 0, // Let ONNX Runtime decide
            intra_threads: 0, // Let ONNX Runtime decide
            optimization_level: GraphOptimizationLevel::Level3,
        }
    }
}

impl Clone for RuntimeConfig {
    fn clone(&self) -> Self {
        Self {
            inter_threads: self.inter_threads,
            intra_threads: self.intra_threads,
            optimization_level: copy_level(&self.optimization_level),
        }
    }
}

fn copy_level(level: &GraphOptimizationLevel) -> GraphOptimizationLevel {
    match level {
        GraphOptimizationLevel::Level1 => GraphOptimizationLevel::Level1,
        GraphOptimizationLevel::Level2 => GraphOptimizationLevel::Level2,
        GraphOptimizationLevel::Level3 => GraphOptimizationLevel::Level3,
        GraphOptimizationLevel::Disable => GraphOptimizationLevel::Disable,
    }
}

/// Parses the CLI spelling of an optimization level (`0`-`3`).
pub fn parse_optimization_level(value: u8) -> Option<GraphOptimizationLevel> {
    match value {
        0 => Some(GraphOptimizationLevel::Disable),
        1 => Some(GraphOptimizationLevel::Level1),
        2 => Some(GraphOptimizationLevel::Level2),
        3 => Some(GraphOptimizationLevel::Level3),
        _ => None,
    }
}

/// Commits the process-wide ONNX Runtime environment exactly once.
///
/// A failed commit is remembered and reported to every later caller.
pub fn ensure_initialized() -> Result<(), ModelLoadError> {
    INIT.get_or_init(|| {
        ort::init()
            .with_name("phishguard")
            .commit()
            .map(|_| ())
            .map_err(|e| {
                log::error!("Failed to initialize ONNX Runtime environment: {}", e);
                e.to_string()
            })
    })
    .clone()
    .map_err(ModelLoadError::Runtime)
}

pub fn create_session_builder(config: &RuntimeConfig) -> Result<SessionBuilder, ModelLoadError> {
    ensure_initialized()?;
    let mut builder = Session::builder()?;

    if config.inter_threads > 0 {
        builder = builder.with_inter_threads(config.inter_threads)?;
    }
    if config.intra_threads > 0 {
        builder = builder.with_intra_threads(config.intra_threads)?;
    }
    builder = builder.with_optimization_level(copy_level(&config.optimization_level))?;

    Ok(builder)
}
