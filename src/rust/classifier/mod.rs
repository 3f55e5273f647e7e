mod classifier;
mod config;
mod encoder;
mod engine;
mod error;
mod outcome;
mod tokenizer;
mod vocab;

pub use classifier::{Classifier, ClassifierState, Pipeline};
pub use config::ClassifierConfig;
pub use encoder::{EncodedInput, Encoder, DEFAULT_MAX_SEQ_LENGTH};
pub use engine::{check_logits, EngineLoader, InferenceEngine, OnnxEngine, OnnxLoader};
pub use error::{ConfigurationError, InferenceError, InitError, ModelLoadError, VocabularyError};
pub use outcome::{interpret, softmax, ClassificationOutcome, Label, Logits};
pub use tokenizer::{Tokenizer, CONTINUATION_PREFIX};
pub use vocab::{SpecialTokens, Vocabulary, CLS_TOKEN, PAD_TOKEN, SEP_TOKEN, UNK_TOKEN};

/// Snapshot of a classifier's configuration and lifecycle state
#[derive(Debug, Clone)]
pub struct ClassifierInfo {
    pub vocab_path: String,
    pub model_path: String,
    pub max_seq_length: usize,
    /// Number of distinct vocabulary tokens, once loaded
    pub vocab_size: Option<usize>,
    pub state: ClassifierState,
}
