#![no_main]

//! Fuzz target for checkpoint parsing
//!
//! Arbitrary bytes must never panic the checkpoint loader, and whatever
//! parses must survive a save and reload unchanged.

use libfuzzer_sys::fuzz_target;

use reword_cli::checkpoint::{Checkpoint, CheckpointStore};
use reword_cli::history::HistoryWindow;

fuzz_target!(|data: &[u8]| {
    let Ok(checkpoint) = serde_json::from_slice::<Checkpoint>(data) else {
        return;
    };

    // Seeding the window only looks at the tail
    let window = HistoryWindow::from_checkpoint(&checkpoint);
    assert!(window.len() <= checkpoint.len());

    let dir = std::env::temp_dir().join(format!("reword-fuzz-{}", std::process::id()));
    let store = CheckpointStore::new(dir.join("checkpoint.json"));
    if store.save(&checkpoint).is_ok() {
        assert_eq!(store.load(), checkpoint);
    }
});
