use criterion::{criterion_group, criterion_main, Criterion};
use errors::Diagnostics;
use interpreter::Interpreter;

pub fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("arithmetic", |b| {
        let source = (0..200).map(|i| format!("({i} * 2 - 1) / 3")).collect::<Vec<_>>().join(" + ");
        b.iter(|| {
            let mut diagnostics = Diagnostics::new();
            Interpreter::new().run_source(&source, &mut std::io::sink(), &mut diagnostics).unwrap();
            assert!(diagnostics.is_empty());
        })
    });

    c.bench_function("nested groupings", |b| {
        let source = format!("{}1{} == 1", "(".repeat(100), ")".repeat(100));
        b.iter(|| {
            let mut diagnostics = Diagnostics::new();
            Interpreter::new().run_source(&source, &mut std::io::sink(), &mut diagnostics).unwrap();
        })
    });

    c.bench_function("string concatenation", |b| {
        let source = vec!["\"lox\""; 100].join(" + ");
        b.iter(|| {
            let mut diagnostics = Diagnostics::new();
            Interpreter::new().run_source(&source, &mut std::io::sink(), &mut diagnostics).unwrap();
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
