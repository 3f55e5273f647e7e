#![allow(dead_code)]

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use phishguard::{EncodedInput, EngineLoader, InferenceEngine, InferenceError, Logits, ModelLoadError, Vocabulary};

pub const VOCAB: &str = "[CLS]\n[SEP]\n[PAD]\n[UNK]\nhello\n##world\n계좌\n##번호\n##를\n##알려\n##주세요\n";

pub fn vocab() -> Arc<Vocabulary> {
    Arc::new(Vocabulary::from_reader(Cursor::new(VOCAB)).unwrap())
}

/// Writes the test vocabulary to a per-test temp file.
pub fn vocab_file(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("phishguard-it-{}-{}.txt", name, std::process::id()));
    fs::write(&path, VOCAB).unwrap();
    path
}

/// Scores inputs by how many "계좌" (id 6) tokens they contain.
/// Fails on any input containing `[UNK]` (id 3).
#[derive(Debug, Default)]
pub struct KeywordEngine {
    pub calls: AtomicUsize,
}

impl InferenceEngine for KeywordEngine {
    fn run(&self, encoded: &EncodedInput) -> Result<Logits, InferenceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if encoded.input_ids.contains(&3) {
            return Err(InferenceError::Execution("unknown token in input".into()));
        }
        let hits = encoded.input_ids.iter().filter(|&&id| id == 6).count() as f32;
        Ok(Logits::new(1.0, 2.0 * hits))
    }
}

/// Counts loads and optionally sleeps so concurrent callers overlap.
pub struct SlowLoader {
    pub loads: Arc<AtomicUsize>,
    pub delay: Duration,
    pub fail: bool,
}

impl SlowLoader {
    pub fn new(delay: Duration, fail: bool) -> (Self, Arc<AtomicUsize>) {
        let loads = Arc::new(AtomicUsize::new(0));
        (Self { loads: Arc::clone(&loads), delay, fail }, loads)
    }
}

impl EngineLoader for SlowLoader {
    fn load(&self, model_path: &Path) -> Result<Box<dyn InferenceEngine>, ModelLoadError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        thread::sleep(self.delay);
        if self.fail {
            return Err(ModelLoadError::Unreadable(model_path.display().to_string()));
        }
        Ok(Box::new(KeywordEngine::default()))
    }
}
