use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use log::{debug, error, info};
use ndarray::Array2;
use ort::session::Session;
use ort::value::Tensor;

use super::config::ClassifierConfig;
use super::encoder::EncodedInput;
use super::error::{InferenceError, ModelLoadError};
use super::outcome::Logits;
use crate::assets::sha256_hex;
use crate::runtime::{create_session_builder, RuntimeConfig};

/// A loaded, previously trained two-class scoring function.
///
/// Implementations must tolerate concurrent `run` calls from several threads,
/// either because the backend is reentrant or by serializing internally. A
/// failed `run` must leave the engine usable.
pub trait InferenceEngine: Send + Sync + fmt::Debug {
    /// Scores a single example (batch size 1).
    fn run(&self, encoded: &EncodedInput) -> Result<Logits, InferenceError>;
}

/// Produces an engine from a model artifact. Loading may be slow.
pub trait EngineLoader: Send + Sync {
    fn load(&self, model_path: &Path) -> Result<Box<dyn InferenceEngine>, ModelLoadError>;
}

/// Rejects NaN and infinite scores before they reach postprocessing.
pub fn check_logits(logits: Logits) -> Result<Logits, InferenceError> {
    if logits.benign.is_finite() && logits.phishing.is_finite() {
        Ok(logits)
    } else {
        Err(InferenceError::NonFiniteLogits(logits.benign.to_string(), logits.phishing.to_string()))
    }
}

/// ONNX Runtime backed engine.
///
/// # Model Input Format
/// - input_ids: Token IDs [batch_size=1, sequence_length], `i64`
/// - attention_mask: 1 for real tokens, 0 for padding [batch_size=1, sequence_length], `i64`
///
/// # Model Output Format
/// - First output holds exactly two `f32` scores: benign, phishing
///
/// ONNX Runtime sessions accept concurrent `run` calls, so no lock is held
/// around inference.
#[derive(Debug)]
pub struct OnnxEngine {
    session: Session,
    input_ids_name: String,
    attention_mask_name: String,
}

impl OnnxEngine {
    fn validate_model(session: &Session, required: &[&str]) -> Result<(), ModelLoadError> {
        for name in required {
            if !session.inputs.iter().any(|input| input.name == *name) {
                return Err(ModelLoadError::MissingInput(name.to_string()));
            }
        }
        if session.outputs.is_empty() {
            return Err(ModelLoadError::Runtime("Model must have at least 1 output for logits".to_string()));
        }
        Ok(())
    }

    fn to_tensor(values: &[i64]) -> Result<Tensor<i64>, InferenceError> {
        let array = Array2::from_shape_vec((1, values.len()), values.to_vec())
            .map_err(|e| InferenceError::Tensor(format!("Failed to create input array: {}", e)))?;
        let array_dyn = array.into_dyn();
        let standard = array_dyn.as_standard_layout();
        Tensor::from_array(&standard).map_err(|e| InferenceError::Tensor(e.to_string()))
    }
}

impl InferenceEngine for OnnxEngine {
    fn run(&self, encoded: &EncodedInput) -> Result<Logits, InferenceError> {
        if encoded.input_ids.len() != encoded.attention_mask.len() {
            return Err(InferenceError::Tensor(format!(
                "input_ids has {} elements but attention_mask has {}",
                encoded.input_ids.len(),
                encoded.attention_mask.len()
            )));
        }

        let mut input_tensors = HashMap::new();
        input_tensors.insert(self.input_ids_name.as_str(), Self::to_tensor(&encoded.input_ids)?);
        input_tensors.insert(self.attention_mask_name.as_str(), Self::to_tensor(&encoded.attention_mask)?);

        let outputs = self
            .session
            .run(input_tensors)
            .map_err(|e| InferenceError::Execution(e.to_string()))?;
        let output_tensor = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(|e| InferenceError::UnexpectedOutput(format!("Failed to extract output tensor: {}", e)))?;

        let scores: Vec<f32> = output_tensor.iter().copied().collect();
        match scores.as_slice() {
            [benign, phishing] => check_logits(Logits::new(*benign, *phishing)),
            other => Err(InferenceError::UnexpectedOutput(format!(
                "expected 2 scores, got {} (shape {:?})",
                other.len(),
                output_tensor.shape()
            ))),
        }
    }
}

/// Loads `OnnxEngine`s, optionally checking the artifact's SHA-256 first.
#[derive(Debug, Clone)]
pub struct OnnxLoader {
    pub runtime: RuntimeConfig,
    pub expected_sha256: Option<String>,
    pub input_ids_name: String,
    pub attention_mask_name: String,
}

impl OnnxLoader {
    pub fn from_config(config: &ClassifierConfig) -> Self {
        Self {
            runtime: config.runtime.clone(),
            expected_sha256: config.model_sha256.clone(),
            input_ids_name: config.input_ids_name.clone(),
            attention_mask_name: config.attention_mask_name.clone(),
        }
    }
}

impl EngineLoader for OnnxLoader {
    fn load(&self, model_path: &Path) -> Result<Box<dyn InferenceEngine>, ModelLoadError> {
        info!("Loading model from {:?}", model_path);
        let bytes = fs::read(model_path).map_err(|e| {
            error!("Failed to read model {:?}: {}", model_path, e);
            ModelLoadError::Unreadable(format!("{}: {}", model_path.display(), e))
        })?;
        debug!("Read {} bytes", bytes.len());

        if let Some(expected) = &self.expected_sha256 {
            let actual = sha256_hex(&bytes);
            if !actual.eq_ignore_ascii_case(expected) {
                error!("model hash mismatch: expected {}, got {}", expected, actual);
                return Err(ModelLoadError::ChecksumMismatch {
                    expected: expected.clone(),
                    actual,
                });
            }
            info!("Model hash verified");
        }

        let session = create_session_builder(&self.runtime)?.commit_from_memory(&bytes)?;
        OnnxEngine::validate_model(&session, &[self.input_ids_name.as_str(), self.attention_mask_name.as_str()])?;
        info!("Model structure validated successfully");

        Ok(Box::new(OnnxEngine {
            session,
            input_ids_name: self.input_ids_name.clone(),
            attention_mask_name: self.attention_mask_name.clone(),
        }))
    }
}
