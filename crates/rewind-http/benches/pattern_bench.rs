use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rewind_http::pattern;

const WILDCARD_PATTERN: &str = "{\"id\":%d%,\"token\":\"%h%\",\"name\":\"%a%\",\"score\":%f%}";
const WILDCARD_ACTUAL: &str = "{\"id\":42,\"token\":\"deadbeef\",\"name\":\"alice\",\"score\":3.14}";

fn literal_pattern(len: usize) -> String {
    "x.y+z".repeat(len / 5)
}

fn bench_compile(c: &mut Criterion) {
    c.bench_function("compile_wildcard", |b| {
        b.iter(|| pattern::compile(black_box(WILDCARD_PATTERN), false).unwrap())
    });

    let literal = literal_pattern(1000);
    c.bench_function("compile_literal_1k", |b| {
        b.iter(|| pattern::compile(black_box(&literal), false).unwrap())
    });

    c.bench_function("compile_raw_regex", |b| {
        b.iter(|| pattern::compile(black_box(r"~^\d+-[a-f0-9]{8}$~i"), false).unwrap())
    });
}

fn bench_match(c: &mut Criterion) {
    c.bench_function("is_matching_wildcard", |b| {
        b.iter(|| {
            pattern::is_matching(black_box(WILDCARD_PATTERN), black_box(WILDCARD_ACTUAL), false)
                .unwrap()
        })
    });

    let compiled = pattern::compile(WILDCARD_PATTERN, false).unwrap();
    c.bench_function("match_precompiled_wildcard", |b| {
        b.iter(|| compiled.is_match(black_box(WILDCARD_ACTUAL)))
    });
}

criterion_group!(benches, bench_compile, bench_match);
criterion_main!(benches);
