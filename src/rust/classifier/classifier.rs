use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use log::{debug, error, info, warn};

use super::config::ClassifierConfig;
use super::encoder::{EncodedInput, Encoder};
use super::engine::{EngineLoader, InferenceEngine, OnnxLoader};
use super::error::{InferenceError, InitError};
use super::outcome::{interpret, ClassificationOutcome};
use super::vocab::Vocabulary;
use super::ClassifierInfo;

/// The ready-to-use tokenizer → encoder → engine → interpreter chain.
///
/// A `Pipeline` only exists once its vocabulary and model are loaded, so it can
/// never be used uninitialized. It is immutable and shared through `Arc`.
#[derive(Debug)]
pub struct Pipeline {
    encoder: Encoder,
    engine: Box<dyn InferenceEngine>,
}

impl Pipeline {
    pub fn new(encoder: Encoder, engine: Box<dyn InferenceEngine>) -> Self {
        Self { encoder, engine }
    }

    pub fn encoder(&self) -> &Encoder {
        &self.encoder
    }

    pub fn encode(&self, text: &str) -> EncodedInput {
        self.encoder.encode(text)
    }

    /// Classifies `text`. An engine failure affects only this call.
    pub fn classify(&self, text: &str) -> Result<ClassificationOutcome, InferenceError> {
        let encoded = self.encoder.encode(text);
        let logits = self.engine.run(&encoded).map_err(|e| {
            error!("Inference failed: {}", e);
            e
        })?;
        let outcome = interpret(logits);
        debug!(
            "Logits: {}, {}, Probabilities: {}, {}",
            logits.benign, logits.phishing, outcome.probability_benign, outcome.probability_phishing
        );
        Ok(outcome)
    }
}

/// Externally visible lifecycle state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifierState {
    Uninitialized,
    Initializing,
    Ready,
    Failed(InitError),
}

enum Lifecycle {
    Uninitialized,
    Initializing,
    Ready(Arc<Pipeline>),
    Failed(InitError),
}

/// Phishing classifier facade owning the one-time initialization.
///
/// Construct one instance at startup and share it (`&Classifier` or
/// `Arc<Classifier>`). Initialization is single-flight: concurrent callers of
/// `initialize` wait for the one load in progress and observe its outcome.
///
/// ```rust,no_run
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use phishguard::{Classifier, ClassifierConfig};
///
/// let classifier = Classifier::new(ClassifierConfig::from_assets_dir("assets/bert"));
/// classifier.initialize()?;
/// let outcome = classifier.classify("Your account is frozen, tell me your card number")?;
/// println!("{}", outcome.summary());
/// classifier.release();
/// # Ok(())
/// # }
/// ```
pub struct Classifier {
    config: ClassifierConfig,
    loader: Box<dyn EngineLoader>,
    state: Mutex<Lifecycle>,
    changed: Condvar,
}

// Compile-time verification of thread-safety
const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    fn verify_thread_safety() {
        assert_send_sync::<Classifier>();
        assert_send_sync::<Pipeline>();
    }
};

/// Puts the state back to `Uninitialized` if a load unwinds, so waiters
/// are not left blocked on `Initializing`.
struct LoadGuard<'a> {
    classifier: &'a Classifier,
    armed: bool,
}

impl Drop for LoadGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            let mut state = self.classifier.lock_state();
            *state = Lifecycle::Uninitialized;
            self.classifier.changed.notify_all();
        }
    }
}

impl Classifier {
    /// Creates an uninitialized classifier backed by ONNX Runtime.
    pub fn new(config: ClassifierConfig) -> Self {
        let loader = OnnxLoader::from_config(&config);
        Self::with_loader(config, loader)
    }

    /// Creates an uninitialized classifier with a custom engine loader.
    pub fn with_loader(config: ClassifierConfig, loader: impl EngineLoader + 'static) -> Self {
        Self {
            config,
            loader: Box::new(loader),
            state: Mutex::new(Lifecycle::Uninitialized),
            changed: Condvar::new(),
        }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    fn lock_state(&self) -> MutexGuard<'_, Lifecycle> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn wait<'a>(&self, guard: MutexGuard<'a, Lifecycle>) -> MutexGuard<'a, Lifecycle> {
        self.changed.wait(guard).unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> ClassifierState {
        match &*self.lock_state() {
            Lifecycle::Uninitialized => ClassifierState::Uninitialized,
            Lifecycle::Initializing => ClassifierState::Initializing,
            Lifecycle::Ready(_) => ClassifierState::Ready,
            Lifecycle::Failed(e) => ClassifierState::Failed(e.clone()),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(&*self.lock_state(), Lifecycle::Ready(_))
    }

    /// Loads the vocabulary, then the model.
    ///
    /// Returns immediately when already ready. If another caller is loading,
    /// blocks until that load finishes and returns its outcome. A previous
    /// failure is retried.
    pub fn initialize(&self) -> Result<(), InitError> {
        let mut state = self.lock_state();
        let mut waited = false;
        loop {
            match &*state {
                Lifecycle::Ready(_) => return Ok(()),
                Lifecycle::Failed(e) if waited => {
                    warn!("Initialization this caller waited on failed: {}", e);
                    return Err(e.clone());
                }
                Lifecycle::Uninitialized | Lifecycle::Failed(_) => break,
                Lifecycle::Initializing => {}
            }
            state = self.wait(state);
            waited = true;
        }
        *state = Lifecycle::Initializing;
        drop(state);

        let mut guard = LoadGuard { classifier: self, armed: true };
        let result = self.load();
        guard.armed = false;

        let mut state = self.lock_state();
        let outcome = match result {
            Ok(pipeline) => {
                *state = Lifecycle::Ready(Arc::new(pipeline));
                Ok(())
            }
            Err(e) => {
                *state = Lifecycle::Failed(e.clone());
                Err(e)
            }
        };
        self.changed.notify_all();
        outcome
    }

    fn load(&self) -> Result<Pipeline, InitError> {
        let start = Instant::now();
        info!("Initializing classifier...");

        let result = self.build_pipeline();
        match &result {
            Ok(_) => info!("Classifier initialized successfully (took {:.2?})", start.elapsed()),
            Err(e) => error!("Error initializing classifier: {}", e),
        }
        result
    }

    fn build_pipeline(&self) -> Result<Pipeline, InitError> {
        self.config.validate()?;
        let vocab = Arc::new(Vocabulary::from_file(&self.config.vocab_path)?);
        info!("Vocabulary loaded successfully ({} tokens)", vocab.len());
        let encoder = Encoder::new(vocab, self.config.max_seq_length)?;
        let engine = self.loader.load(&self.config.model_path)?;
        Ok(Pipeline::new(encoder, engine))
    }

    /// Returns the ready pipeline, if initialization has completed.
    pub fn pipeline(&self) -> Option<Arc<Pipeline>> {
        match &*self.lock_state() {
            Lifecycle::Ready(pipeline) => Some(Arc::clone(pipeline)),
            _ => None,
        }
    }

    /// Classifies `text` with the loaded model.
    ///
    /// # Panics
    /// If the classifier is not ready. Calling `classify` before a successful
    /// `initialize` (or after `release`) is a programming error.
    pub fn classify(&self, text: &str) -> Result<ClassificationOutcome, InferenceError> {
        match self.pipeline() {
            Some(pipeline) => pipeline.classify(text),
            None => panic!("Classifier::classify called before initialize() completed"),
        }
    }

    /// Drops the loaded model and vocabulary. `initialize` must run again
    /// before the next `classify`.
    ///
    /// Calls already holding the pipeline finish normally; the engine is freed
    /// once the last of them returns.
    pub fn release(&self) {
        let mut state = self.lock_state();
        while matches!(&*state, Lifecycle::Initializing) {
            state = self.wait(state);
        }
        if matches!(&*state, Lifecycle::Ready(_)) {
            info!("Classifier released");
        }
        *state = Lifecycle::Uninitialized;
        self.changed.notify_all();
    }

    /// Returns information about the classifier's current state
    pub fn info(&self) -> ClassifierInfo {
        let pipeline = self.pipeline();
        ClassifierInfo {
            vocab_path: self.config.vocab_path.to_string_lossy().to_string(),
            model_path: self.config.model_path.to_string_lossy().to_string(),
            max_seq_length: self.config.max_seq_length,
            vocab_size: pipeline.as_ref().map(|p| p.encoder().tokenizer().vocab().len()),
            state: self.state(),
        }
    }
}

impl std::fmt::Debug for Classifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Classifier")
            .field("config", &self.config)
            .field("state", &self.state())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{Label, Logits, ModelLoadError};
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug)]
    struct FixedEngine(Logits);

    impl InferenceEngine for FixedEngine {
        fn run(&self, _encoded: &EncodedInput) -> Result<Logits, InferenceError> {
            Ok(self.0)
        }
    }

    struct FixedLoader {
        loads: Arc<AtomicUsize>,
        fail: bool,
    }

    impl EngineLoader for FixedLoader {
        fn load(&self, _model_path: &Path) -> Result<Box<dyn InferenceEngine>, ModelLoadError> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ModelLoadError::Unreadable("model.onnx".into()));
            }
            Ok(Box::new(FixedEngine(Logits::new(0.0, 1.0))))
        }
    }

    fn vocab_file(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("phishguard-{}-{}.txt", name, std::process::id()));
        fs::write(&path, "[CLS]\n[SEP]\n[PAD]\n[UNK]\nhello\n").unwrap();
        path
    }

    fn classifier(name: &str, fail: bool) -> (Classifier, Arc<AtomicUsize>) {
        let loads = Arc::new(AtomicUsize::new(0));
        let config = ClassifierConfig::from_assets_dir("/unused").with_vocab_path(vocab_file(name));
        let loader = FixedLoader { loads: Arc::clone(&loads), fail };
        (Classifier::with_loader(config, loader), loads)
    }

    #[test]
    fn test_lifecycle() {
        let (classifier, loads) = classifier("lifecycle", false);
        assert_eq!(classifier.state(), ClassifierState::Uninitialized);
        assert!(classifier.pipeline().is_none());

        classifier.initialize().unwrap();
        classifier.initialize().unwrap();
        assert_eq!(classifier.state(), ClassifierState::Ready);
        assert_eq!(loads.load(Ordering::SeqCst), 1);

        let outcome = classifier.classify("hello").unwrap();
        assert_eq!(outcome.label, Label::Phishing);
        assert_eq!(classifier.info().vocab_size, Some(5));

        classifier.release();
        assert_eq!(classifier.state(), ClassifierState::Uninitialized);
        classifier.initialize().unwrap();
        assert_eq!(loads.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_failed_load_then_retry() {
        let (classifier, loads) = classifier("failed", true);
        let err = classifier.initialize().unwrap_err();
        assert!(matches!(err, InitError::ModelLoad(ModelLoadError::Unreadable(_))));
        assert_eq!(classifier.state(), ClassifierState::Failed(err));

        assert!(classifier.initialize().is_err());
        assert_eq!(loads.load(Ordering::SeqCst), 2);
    }

    #[test]
    #[should_panic(expected = "before initialize")]
    fn test_classify_before_initialize_panics() {
        let (classifier, _) = classifier("uninit", false);
        let _ = classifier.classify("hello");
    }

    #[test]
    fn test_bad_sequence_length_fails_before_loading() {
        let (classifier, loads) = classifier("short", false);
        let classifier = Classifier::with_loader(
            classifier.config().clone().with_max_seq_length(1),
            FixedLoader { loads: Arc::clone(&loads), fail: false },
        );
        assert!(matches!(classifier.initialize(), Err(InitError::Configuration(_))));
        assert_eq!(loads.load(Ordering::SeqCst), 0);
    }
}
