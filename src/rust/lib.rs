//! A deterministic phishing-risk classifier for short transcribed speech.
//!
//! Text is lower-cased and split by greedy longest-match against a fixed
//! subword vocabulary, wrapped in `[CLS] ... [SEP]`, padded to a fixed length
//! and scored by a pre-trained two-class ONNX model. The two logits are turned
//! into probabilities with a numerically stable softmax.
//!
//! # Basic Usage
//!
//! ```rust,no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use phishguard::{Classifier, ClassifierConfig, Label};
//!
//! let classifier = Classifier::new(ClassifierConfig::from_assets_dir("assets/bert"));
//! classifier.initialize()?;
//!
//! let outcome = classifier.classify("This is the prosecutor's office, your account was used in a crime")?;
//! if outcome.label == Label::Phishing {
//!     println!("warning: {}", outcome.summary());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Thread Safety
//!
//! `Classifier` is `Send + Sync`. Share it with `Arc`; concurrent calls to
//! `initialize` perform a single load and concurrent `classify` calls run in
//! parallel on the shared model:
//!
//! ```rust,no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use phishguard::{Classifier, ClassifierConfig};
//! use std::sync::Arc;
//! use std::thread;
//!
//! let classifier = Arc::new(Classifier::new(ClassifierConfig::default()));
//!
//! let mut handles = vec![];
//! for _ in 0..3 {
//!     let classifier = Arc::clone(&classifier);
//!     handles.push(thread::spawn(move || {
//!         classifier.initialize().unwrap();
//!         classifier.classify("test text").unwrap();
//!     }));
//! }
//!
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//! # Ok(())
//! # }
//! ```

pub mod assets;
pub mod classifier;
mod runtime;

pub use classifier::{
    interpret, softmax, ClassificationOutcome, Classifier, ClassifierConfig, ClassifierInfo, ClassifierState,
    ConfigurationError, EncodedInput, Encoder, EngineLoader, InferenceEngine, InferenceError,
    InitError, Label, Logits, ModelLoadError, Pipeline, Tokenizer, Vocabulary, VocabularyError,
};
pub use runtime::{create_session_builder, parse_optimization_level, RuntimeConfig};

pub fn init_logger() {
    env_logger::init();
}
