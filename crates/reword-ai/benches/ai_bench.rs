// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

use criterion::{Criterion, criterion_group, criterion_main};
use reword_ai::summarize::{DEFAULT_CHUNK_BUDGET, chunk_diff, changed_files};

fn sample_diff() -> String {
    let mut diff = String::new();
    for file in 0..50 {
        diff.push_str(&format!(
            "diff --git a/src/f{file}.rs b/src/f{file}.rs\n--- a/src/f{file}.rs\n+++ b/src/f{file}.rs\n"
        ));
        for line in 0..200 {
            diff.push_str(&format!("+let value_{line} = compute({line});\n"));
        }
    }
    diff
}

fn ai_benchmark(c: &mut Criterion) {
    let diff = sample_diff();
    c.bench_function("chunk_diff", |b| {
        b.iter(|| chunk_diff(std::hint::black_box(&diff), DEFAULT_CHUNK_BUDGET).len())
    });
    c.bench_function("changed_files", |b| {
        b.iter(|| changed_files(std::hint::black_box(&diff)).len())
    });
}

criterion_group!(benches, ai_benchmark);
criterion_main!(benches);
