use criterion::{black_box, criterion_group, criterion_main, Criterion};
use phishguard::{Encoder, Tokenizer, Vocabulary};
use std::io::Cursor;
use std::sync::Arc;

fn bench_vocab() -> Arc<Vocabulary> {
    let mut src = String::from("[PAD]\n[UNK]\n[CLS]\n[SEP]\n");
    for word in ["this", "is", "the", "bank", "your", "account", "was", "used", "in", "a", "crime"] {
        src.push_str(word);
        src.push('\n');
        src.push_str("##");
        src.push_str(word);
        src.push('\n');
    }
    for c in 'a'..='z' {
        src.push_str(&format!("{c}\n##{c}\n"));
    }
    Arc::new(Vocabulary::from_reader(Cursor::new(src)).unwrap())
}

const SHORT: &str = "this is the bank";
const LONG: &str = "this is the bank calling, your account was used in a crime and \
    we need to verify your identity immediately or the account will be frozen. \
    please transfer the remaining balance to the safe account we give you.";

fn bench_tokenization(c: &mut Criterion) {
    let tokenizer = Tokenizer::new(bench_vocab());
    let mut group = c.benchmark_group("Tokenization");

    // Configure sampling
    group.sample_size(50);
    group.warm_up_time(std::time::Duration::from_secs(1));

    group.bench_function("short_text", |b| b.iter(|| tokenizer.tokenize(black_box(SHORT))));
    group.bench_function("long_text", |b| b.iter(|| tokenizer.tokenize(black_box(LONG))));
    group.bench_function("unknown_text", |b| {
        b.iter(|| tokenizer.tokenize(black_box("☎☎☎ 0101234567 ☎☎☎")))
    });

    group.finish();
}

fn bench_encoding(c: &mut Criterion) {
    let mut group = c.benchmark_group("Encoding");
    group.sample_size(50);
    group.warm_up_time(std::time::Duration::from_secs(1));

    for max_length in [64, 256, 512] {
        let encoder = Encoder::new(bench_vocab(), max_length).unwrap();
        let text = LONG.repeat(4);
        group.bench_function(format!("encode_{}", max_length), |b| {
            b.iter(|| encoder.encode(black_box(&text)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_tokenization, bench_encoding);
criterion_main!(benches);
