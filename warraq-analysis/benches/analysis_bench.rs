use criterion::{black_box, criterion_group, criterion_main, Criterion};

use warraq_analysis::{classify, detect_duplicates, divide_chapters, DivisionConfig};

fn sample_manuscript() -> String {
    let paragraph = "كان الصياد العجوز يخرج كل صباح الي البحر حاملا شباكه القديمه ثم يعود مساء الي القريه الصغيره بما قسمه الله له من رزق";
    let mut text = String::new();
    for i in 0..200 {
        text.push_str(paragraph);
        text.push_str(&format!(" رقم {i}"));
        text.push_str("\n\n");
    }
    text
}

fn bench_detect_duplicates(c: &mut Criterion) {
    let text = sample_manuscript();
    c.bench_function("detect_duplicates_5gram", |b| {
        b.iter(|| detect_duplicates(black_box(&text), 5))
    });
}

fn bench_classify(c: &mut Criterion) {
    let text = sample_manuscript();
    c.bench_function("classify_manuscript", |b| b.iter(|| classify(black_box(&text))));
}

fn bench_divide_chapters(c: &mut Criterion) {
    let text = sample_manuscript();
    let config = DivisionConfig {
        target_words_per_chapter: 500,
        ..DivisionConfig::default()
    };
    c.bench_function("divide_chapters_smart", |b| {
        b.iter(|| divide_chapters(black_box(&text), &config))
    });
}

criterion_group!(
    benches,
    bench_detect_duplicates,
    bench_classify,
    bench_divide_chapters
);
criterion_main!(benches);
