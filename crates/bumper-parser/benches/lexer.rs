use bumper_parser::{tokenize, SourceBuffer};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

fn buffer(source: &str) -> SourceBuffer {
    SourceBuffer::new("bench.bs", source)
}

fn bench_keywords(c: &mut Criterion) {
    let source = "function let mutable const if else loop while for return import export\n";

    c.bench_function("lex_keywords", |b| {
        let buffer = buffer(source);
        b.iter(|| tokenize(black_box(&buffer)).unwrap());
    });
}

fn bench_numbers(c: &mut Criterion) {
    let source = "42 123 0 999 1_000_000 0xFF 0x1234 0xDEAD_BEEF 0o777 0b1010_1010\n";

    c.bench_function("lex_numbers", |b| {
        let buffer = buffer(source);
        b.iter(|| tokenize(black_box(&buffer)).unwrap());
    });
}

fn bench_comments(c: &mut Criterion) {
    let source = "// line comment\n/* block /* nested */ comment */ function\n";

    c.bench_function("lex_comments", |b| {
        let buffer = buffer(source);
        b.iter(|| tokenize(black_box(&buffer)).unwrap());
    });
}

fn bench_program(c: &mut Criterion) {
    let mut source = String::from("import std::io;\nimport std::collections;\n\n");
    for index in 0..100 {
        source.push_str(&format!(
            "export function handler_{index}{{T}}(request: std::Request, state: T) ~> std::Response {{ }}\n"
        ));
    }

    let mut group = c.benchmark_group("program");
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("lex_program", |b| {
        let buffer = buffer(&source);
        b.iter(|| tokenize(black_box(&buffer)).unwrap());
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_keywords,
    bench_numbers,
    bench_comments,
    bench_program
);
criterion_main!(benches);
