// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

use criterion::{Criterion, criterion_group, criterion_main};
use reword_script::escape::escape_message;
use reword_script::{RewritePlan, synthesize};

fn script_benchmark(c: &mut Criterion) {
    let message = "fix(parser): handle O'Brien's \\n edge case\n\nLonger body text. ".repeat(8);
    c.bench_function("escape_message", |b| {
        b.iter(|| escape_message(std::hint::black_box(&message)).len())
    });

    let plan = RewritePlan::from_pairs((0..50).map(|i| {
        (
            format!("{i:040x}"),
            format!("feat(module{i}): change {i}\n\nBody for change {i}."),
        )
    }))
    .expect("plan");
    c.bench_function("synthesize_50", |b| {
        b.iter(|| synthesize(std::hint::black_box(&plan), "0000000").bash_script.len())
    });
}

criterion_group!(benches, script_benchmark);
criterion_main!(benches);
