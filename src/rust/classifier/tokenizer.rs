use std::sync::Arc;

use super::vocab::{Vocabulary, UNK_TOKEN};

/// Marks a fragment that does not start at the beginning of the text.
pub const CONTINUATION_PREFIX: &str = "##";

/// Greedy longest-match subword tokenizer over a fixed vocabulary.
///
/// The only normalization is lower-casing. There is no whitespace or
/// punctuation pre-splitting, so every fragment after the first is looked up
/// with the `##` continuation prefix. Characters that no vocabulary entry
/// covers become one `[UNK]` each.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    vocab: Arc<Vocabulary>,
}

impl Tokenizer {
    pub fn new(vocab: Arc<Vocabulary>) -> Self {
        Self { vocab }
    }

    pub fn vocab(&self) -> &Vocabulary {
        &self.vocab
    }

    /// Splits `text` into vocabulary tokens.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.to_lowercase().chars().collect();
        let len = chars.len();
        let max_piece = self.vocab.max_token_chars();

        let mut tokens = Vec::new();
        let mut candidate = String::new();
        let mut start = 0;

        while start < len {
            // Pieces longer than the longest vocabulary entry can never match.
            let mut end = len.min(start + max_piece);
            let mut found = false;

            while end > start {
                candidate.clear();
                if start > 0 {
                    candidate.push_str(CONTINUATION_PREFIX);
                }
                candidate.extend(&chars[start..end]);
                if self.vocab.contains(&candidate) {
                    found = true;
                    break;
                }
                end -= 1;
            }

            if found {
                tokens.push(candidate.clone());
                start = end;
            } else {
                tokens.push(UNK_TOKEN.to_string());
                start += 1;
            }
        }

        tokens
    }
}
