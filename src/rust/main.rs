use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use log::{error, info};
use phishguard::{assets, parse_optimization_level, Classifier, ClassifierConfig, RuntimeConfig};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding vocab.txt and model.onnx (defaults to $PHISHGUARD_ASSETS)
    #[arg(short, long)]
    assets: Option<PathBuf>,

    /// Vocabulary file, overriding the one in the assets directory
    #[arg(long)]
    vocab: Option<PathBuf>,

    /// ONNX model file, overriding the one in the assets directory
    #[arg(long)]
    model: Option<PathBuf>,

    /// Fixed sequence length fed to the model
    #[arg(long, default_value_t = 256)]
    max_len: usize,

    /// Expected SHA-256 of the model file
    #[arg(long)]
    sha256: Option<String>,

    /// Graph optimization level, 0 (disabled) to 3
    #[arg(long, default_value_t = 3)]
    opt_level: u8,

    /// Intra-op threads for ONNX Runtime (0 lets the runtime decide)
    #[arg(long, default_value_t = 0)]
    threads: usize,

    /// Transcripts to classify; read one per line from stdin when omitted
    texts: Vec<String>,
}

fn build_config(args: &Args) -> Result<ClassifierConfig> {
    let dir = args.assets.clone().unwrap_or_else(assets::default_assets_dir);
    let optimization_level = parse_optimization_level(args.opt_level)
        .ok_or_else(|| anyhow!("invalid optimization level {}", args.opt_level))?;

    let mut config = ClassifierConfig::from_assets_dir(dir)
        .with_max_seq_length(args.max_len)
        .with_runtime_config(RuntimeConfig {
            intra_threads: args.threads,
            optimization_level,
            ..RuntimeConfig::default()
        });
    if let Some(vocab) = &args.vocab {
        config = config.with_vocab_path(vocab);
    }
    if let Some(model) = &args.model {
        config = config.with_model_path(model);
    }
    if let Some(hash) = &args.sha256 {
        config = config.with_model_sha256(hash);
    }
    config.validate()?;
    Ok(config)
}

fn read_texts(args: &Args) -> Result<Vec<String>> {
    if !args.texts.is_empty() {
        return Ok(args.texts.clone());
    }
    let mut texts = Vec::new();
    for line in io::stdin().lock().lines() {
        let line = line.context("failed to read stdin")?;
        if !line.trim().is_empty() {
            texts.push(line);
        }
    }
    Ok(texts)
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = build_config(&args)?;
    info!("Vocabulary: {:?}", config.vocab_path);
    info!("Model: {:?}", config.model_path);

    let classifier = Arc::new(Classifier::new(config));

    let start_time = Instant::now();
    let init = Arc::clone(&classifier);
    tokio::task::spawn_blocking(move || init.initialize())
        .await
        .context("initialization task panicked")?
        .context("classifier initialization failed")?;
    info!("=== Classifier ready (took {:.2?}) ===", start_time.elapsed());

    let texts = read_texts(&args)?;
    let classify_start = Instant::now();
    let mut failures = 0;

    for (i, text) in texts.iter().enumerate() {
        let worker = Arc::clone(&classifier);
        let input = text.clone();
        let result = tokio::task::spawn_blocking(move || worker.classify(&input))
            .await
            .context("classification task panicked")?;

        match result {
            Ok(outcome) => {
                println!("[{}] {}", i + 1, outcome.summary());
                info!(
                    "Input: {} => benign {:.4}, phishing {:.4}",
                    text, outcome.probability_benign, outcome.probability_phishing
                );
            }
            Err(e) => {
                failures += 1;
                error!("Classification failed for input {}: {}", i + 1, e);
                println!("[{}] result: classification failed ({})", i + 1, e);
            }
        }
    }

    if !texts.is_empty() {
        let elapsed = classify_start.elapsed();
        info!("Classified {} inputs in {:.2?} ({} failed)", texts.len(), elapsed, failures);
        info!("Average time per classification: {:.2?}", elapsed / texts.len() as u32);
    }

    classifier.release();
    Ok(())
}
