//! Header modeling and synthesis throughput.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use headergen::CodeSynthesizer;
use headergen::parsing::HeaderParser;
use std::hint::black_box;

/// A class with `methods` methods and as many data members
fn generate_header(methods: usize) -> String {
    let mut code = String::from("#pragma once\n#include <vector>\n#include \"Base.h\"\n\n");
    code.push_str("class Generated : public Base {\npublic:\n    bool init() override;\n");
    for index in 0..methods {
        if index % 3 == 0 {
            code.push_str("protected:\n");
        }
        code.push_str(&format!(
            "    virtual long compute{index}(const Input{index}& input, flags mode) const;\n"
        ));
        code.push_str(&format!("    std::vector<int> values{index} = {{ {index} }};\n"));
    }
    code.push_str("};\n");
    code
}

fn bench_parse_and_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("header_model");

    for methods in [10, 100, 500] {
        let code = generate_header(methods);
        group.throughput(Throughput::Bytes(code.len() as u64));
        group.bench_with_input(BenchmarkId::new("parse", methods), &code, |b, code| {
            let mut parser = HeaderParser::new().expect("Failed to create header parser");
            b.iter(|| {
                let model = parser
                    .parse(black_box(code), "Generated.h")
                    .expect("generated header should parse");
                black_box(model)
            });
        });
    }

    group.finish();
}

fn bench_synthesis(c: &mut Criterion) {
    let mut group = c.benchmark_group("header_synthesis");

    for methods in [10, 100, 500] {
        let code = generate_header(methods);
        let mut parser = HeaderParser::new().expect("Failed to create header parser");
        let model = parser
            .parse(&code, "Generated.h")
            .expect("generated header should parse");
        group.throughput(Throughput::Elements(methods as u64));
        group.bench_with_input(BenchmarkId::new("fields", methods), &model, |b, model| {
            b.iter(|| {
                let synthesizer = CodeSynthesizer::new(black_box(model))
                    .expect("generated header defines a class");
                black_box(synthesizer.fields())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_parse_and_build, bench_synthesis);
criterion_main!(benches);
