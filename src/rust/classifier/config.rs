use std::path::{Path, PathBuf};

use super::encoder::DEFAULT_MAX_SEQ_LENGTH;
use super::error::ConfigurationError;
use crate::assets::{default_assets_dir, MODEL_FILE, VOCAB_FILE};
use crate::runtime::RuntimeConfig;

/// Where the classifier finds its artifacts and how it shapes model input.
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    pub vocab_path: PathBuf,
    pub model_path: PathBuf,
    /// Fixed length of `input_ids` and `attention_mask`
    pub max_seq_length: usize,
    /// Expected hex SHA-256 of the model file; unchecked when `None`
    pub model_sha256: Option<String>,
    pub input_ids_name: String,
    pub attention_mask_name: String,
    pub runtime: RuntimeConfig,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self::from_assets_dir(default_assets_dir())
    }
}

impl ClassifierConfig {
    /// Points at `vocab.txt` and `model.onnx` inside `dir`.
    pub fn from_assets_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        Self {
            vocab_path: dir.join(VOCAB_FILE),
            model_path: dir.join(MODEL_FILE),
            max_seq_length: DEFAULT_MAX_SEQ_LENGTH,
            model_sha256: None,
            input_ids_name: "input_ids".to_string(),
            attention_mask_name: "attention_mask".to_string(),
            runtime: RuntimeConfig::default(),
        }
    }

    pub fn with_vocab_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.vocab_path = path.into();
        self
    }

    pub fn with_model_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.model_path = path.into();
        self
    }

    pub fn with_max_seq_length(mut self, max_seq_length: usize) -> Self {
        self.max_seq_length = max_seq_length;
        self
    }

    pub fn with_model_sha256(mut self, hash: impl Into<String>) -> Self {
        self.model_sha256 = Some(hash.into());
        self
    }

    pub fn with_input_names(mut self, input_ids: impl Into<String>, attention_mask: impl Into<String>) -> Self {
        self.input_ids_name = input_ids.into();
        self.attention_mask_name = attention_mask.into();
        self
    }

    pub fn with_runtime_config(mut self, runtime: RuntimeConfig) -> Self {
        self.runtime = runtime;
        self
    }

    /// Rejects settings that would produce malformed tensors.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.max_seq_length <= 1 {
            return Err(ConfigurationError::SequenceTooShort(self.max_seq_length));
        }
        Ok(())
    }
}
