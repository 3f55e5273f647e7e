use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::{debug, error, info, warn};

use super::error::VocabularyError;

pub const UNK_TOKEN: &str = "[UNK]";
pub const PAD_TOKEN: &str = "[PAD]";
pub const SEP_TOKEN: &str = "[SEP]";
pub const CLS_TOKEN: &str = "[CLS]";

/// Ids of the four reserved tokens, resolved once at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecialTokens {
    pub unk: u32,
    pub pad: u32,
    pub sep: u32,
    pub cls: u32,
}

/// Immutable token → id mapping loaded from a one-token-per-line list.
///
/// Ids follow the order of non-blank lines in the source. A token that appears
/// more than once keeps the id of its first occurrence; the later line still
/// consumes an id, so ids are never reassigned.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    tokens: HashMap<String, u32>,
    special: SpecialTokens,
    max_token_chars: usize,
}

impl Vocabulary {
    /// Loads a vocabulary file from disk.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, VocabularyError> {
        let path = path.as_ref();
        info!("Loading vocabulary from {:?}", path);
        let file = File::open(path).map_err(|e| {
            error!("Error loading vocabulary from {:?}: {}", path, e);
            VocabularyError::SourceUnreadable(format!("{}: {}", path.display(), e))
        })?;
        Self::from_reader(BufReader::new(file))
    }

    /// Loads a vocabulary from any buffered UTF-8 source.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, VocabularyError> {
        let mut tokens = HashMap::new();
        let mut next_id: u32 = 0;
        let mut max_token_chars = 0;

        for (line_no, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| {
                error!("Error reading vocabulary line {}: {}", line_no + 1, e);
                VocabularyError::SourceUnreadable(format!("line {}: {}", line_no + 1, e))
            })?;
            let mut token = line.trim();
            if line_no == 0 {
                token = token.trim_start_matches('\u{feff}');
            }
            if token.is_empty() {
                continue;
            }

            if tokens.contains_key(token) {
                warn!("Duplicate vocabulary token {:?} at id {} ignored", token, next_id);
            } else {
                max_token_chars = max_token_chars.max(token.chars().count());
                tokens.insert(token.to_string(), next_id);
            }
            next_id += 1;
        }

        if tokens.is_empty() {
            error!("Vocabulary is empty! Check that the vocabulary source exists and is not empty.");
            return Err(VocabularyError::EmptyVocabulary);
        }

        let special = SpecialTokens {
            unk: Self::require(&tokens, UNK_TOKEN)?,
            pad: Self::require(&tokens, PAD_TOKEN)?,
            sep: Self::require(&tokens, SEP_TOKEN)?,
            cls: Self::require(&tokens, CLS_TOKEN)?,
        };
        debug!("Vocabulary loaded: {} tokens, special ids {:?}", tokens.len(), special);

        Ok(Self { tokens, special, max_token_chars })
    }

    fn require(tokens: &HashMap<String, u32>, name: &str) -> Result<u32, VocabularyError> {
        tokens.get(name).copied().ok_or_else(|| {
            error!("Vocabulary does not contain the {} token", name);
            VocabularyError::MissingSpecialToken(name.to_string())
        })
    }

    pub fn get(&self, token: &str) -> Option<u32> {
        self.tokens.get(token).copied()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.tokens.contains_key(token)
    }

    /// Maps a token to its id, falling back to `[UNK]`.
    pub fn id_or_unk(&self, token: &str) -> u32 {
        self.get(token).unwrap_or(self.special.unk)
    }

    pub fn special(&self) -> SpecialTokens {
        self.special
    }

    /// Length in characters of the longest entry.
    pub fn max_token_chars(&self) -> usize {
        self.max_token_chars
    }

    /// Number of distinct tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
