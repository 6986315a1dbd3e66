use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sessionid::{ExtensionBlock, SessionIdentifier, PRIMARY_ID, SITE_ID, STORAGE_KEY};

const SAMPLE_CORE: &str = "AQIC5wM2LY4SfczNzM2ODk4NTY4NDQ5OTg5NDk5";

fn sample_extensions() -> ExtensionBlock {
    ExtensionBlock::new()
        .with(PRIMARY_ID, "01")
        .with(SITE_ID, "02")
        .with(STORAGE_KEY, "4857392034857392")
}

fn bench_create(c: &mut Criterion) {
    let extensions = sample_extensions();
    c.bench_function("sessionid/create", |b| {
        b.iter(|| {
            let encoded = SessionIdentifier::create(
                black_box(SAMPLE_CORE),
                black_box(&extensions),
                black_box("cookie"),
            )
            .expect("create should succeed");
            black_box(encoded);
        });
    });
}

fn bench_parse(c: &mut Criterion) {
    let encoded = SessionIdentifier::create(SAMPLE_CORE, &sample_extensions(), "cookie")
        .expect("sample identifier must encode");
    c.bench_function("sessionid/parse", |b| {
        b.iter(|| {
            let parsed = SessionIdentifier::parse(black_box(&encoded)).expect("parse should succeed");
            black_box(parsed);
        });
    });
}

criterion_group!(benches, bench_create, bench_parse);
criterion_main!(benches);
