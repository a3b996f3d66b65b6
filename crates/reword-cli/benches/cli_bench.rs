use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use reword_cli::checkpoint::{Checkpoint, CheckpointStore};
use reword_cli::history::HistoryWindow;
use tempfile::TempDir;

/// Checkpoint with `n` cached messages
fn sample_checkpoint(n: usize) -> Checkpoint {
    let mut checkpoint = Checkpoint::default();
    for i in 0..n {
        checkpoint.record(
            format!("{i:040x}"),
            format!("feat(core): change number {i}\n\nBody line for commit {i}"),
        );
    }
    checkpoint
}

fn checkpoint_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("checkpoint");

    for size in [10, 100, 1_000].iter() {
        group.bench_with_input(BenchmarkId::new("save_load", size), size, |b, &n| {
            let dir = TempDir::new().expect("Failed to create tempdir");
            let store = CheckpointStore::new(dir.path().join("checkpoint.json"));
            let checkpoint = sample_checkpoint(n);
            b.iter(|| {
                store.save(&checkpoint).expect("save failed");
                store.load()
            })
        });
    }

    group.finish();
}

fn history_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("history");
    let checkpoint = sample_checkpoint(1_000);

    group.bench_function("from_checkpoint_1000", |b| {
        b.iter(|| HistoryWindow::from_checkpoint(&checkpoint).render())
    });

    group.bench_function("push_render_100", |b| {
        b.iter(|| {
            let mut window = HistoryWindow::new();
            for (sha, message) in checkpoint.tail(100) {
                window.push(sha, message);
            }
            window.render()
        })
    });

    group.finish();
}

criterion_group!(benches, checkpoint_benchmarks, history_benchmarks);
criterion_main!(benches);
