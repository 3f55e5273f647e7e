use std::sync::Arc;

use super::error::ConfigurationError;
use super::tokenizer::Tokenizer;
use super::vocab::{Vocabulary, CLS_TOKEN, SEP_TOKEN};

/// Default fixed sequence length fed to the model.
pub const DEFAULT_MAX_SEQ_LENGTH: usize = 256;

/// Fixed-length model input for a single example.
///
/// Both vectors always have exactly `max_length` elements. Every position with
/// `attention_mask[i] == 0` holds the `[PAD]` id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedInput {
    pub input_ids: Vec<i64>,
    pub attention_mask: Vec<i64>,
}

impl EncodedInput {
    pub fn len(&self) -> usize {
        self.input_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.input_ids.is_empty()
    }

    /// Number of real (unmasked) positions, `[CLS]` and `[SEP]` included.
    pub fn real_tokens(&self) -> usize {
        self.attention_mask.iter().filter(|&&m| m == 1).count()
    }
}

/// Wraps tokenized text in `[CLS] ... [SEP]`, truncates and pads it.
#[derive(Debug, Clone)]
pub struct Encoder {
    tokenizer: Tokenizer,
    max_length: usize,
}

impl Encoder {
    /// Creates an encoder producing sequences of exactly `max_length` ids.
    ///
    /// # Errors
    /// - `SequenceTooShort` if `max_length` cannot hold both `[CLS]` and `[SEP]`
    pub fn new(vocab: Arc<Vocabulary>, max_length: usize) -> Result<Self, ConfigurationError> {
        if max_length <= 1 {
            return Err(ConfigurationError::SequenceTooShort(max_length));
        }
        Ok(Self {
            tokenizer: Tokenizer::new(vocab),
            max_length,
        })
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    /// Returns the token strings that `encode` maps to ids, before padding.
    pub fn tokens(&self, text: &str) -> Vec<String> {
        let mut tokens = Vec::with_capacity(self.max_length);
        tokens.push(CLS_TOKEN.to_string());
        tokens.extend(self.tokenizer.tokenize(text));
        // Keeps [CLS] at position 0; only the tail is dropped.
        tokens.truncate(self.max_length - 1);
        tokens.push(SEP_TOKEN.to_string());
        tokens
    }

    pub fn encode(&self, text: &str) -> EncodedInput {
        let vocab = self.tokenizer.vocab();
        let pad = i64::from(vocab.special().pad);

        let mut input_ids: Vec<i64> = self
            .tokens(text)
            .iter()
            .map(|token| i64::from(vocab.id_or_unk(token)))
            .collect();
        let mut attention_mask = vec![1i64; input_ids.len()];

        input_ids.resize(self.max_length, pad);
        attention_mask.resize(self.max_length, 0);

        EncodedInput { input_ids, attention_mask }
    }
}
