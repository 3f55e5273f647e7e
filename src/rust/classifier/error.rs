use ort::Error as OrtError;
use thiserror::Error;

/// Errors raised while loading the token vocabulary.
///
/// All of these are fatal at initialization: a classifier whose vocabulary
/// failed to load never reaches the ready state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VocabularyError {
    /// One of `[UNK]`, `[PAD]`, `[SEP]` or `[CLS]` is absent
    #[error("Vocabulary does not contain the {0} token")]
    MissingSpecialToken(String),
    /// The source produced no entries at all
    #[error("Vocabulary is empty")]
    EmptyVocabulary,
    /// The source could not be opened or decoded
    #[error("Vocabulary source unreadable: {0}")]
    SourceUnreadable(String),
}

/// Errors raised while loading the model artifact.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelLoadError {
    #[error("Model artifact unreadable: {0}")]
    Unreadable(String),
    #[error("Hash mismatch: expected {expected}, got {actual} for model file")]
    ChecksumMismatch { expected: String, actual: String },
    #[error("Inference runtime error: {0}")]
    Runtime(String),
    #[error("Model does not expose required input '{0}'")]
    MissingInput(String),
}

impl From<OrtError> for ModelLoadError {
    fn from(err: OrtError) -> Self {
        ModelLoadError::Runtime(err.to_string())
    }
}

/// Per-call inference failures. These never disable the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InferenceError {
    /// The encoded input could not be shaped into model tensors
    #[error("Failed to create input tensor: {0}")]
    Tensor(String),
    /// The runtime failed while executing the forward pass
    #[error("Failed to run model: {0}")]
    Execution(String),
    /// The model produced something other than two scores
    #[error("Unexpected model output: {0}")]
    UnexpectedOutput(String),
    /// The model produced NaN or infinite scores
    #[error("Model produced non-finite logits ({0}, {1})")]
    NonFiniteLogits(String, String),
}

/// Invalid pipeline parameters, caught before anything reaches the engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("Maximum sequence length must leave room for [CLS] and [SEP], got {0}")]
    SequenceTooShort(usize),
}

/// Why `Classifier::initialize` did not reach the ready state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InitError {
    #[error(transparent)]
    Vocabulary(#[from] VocabularyError),
    #[error(transparent)]
    ModelLoad(#[from] ModelLoadError),
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}
