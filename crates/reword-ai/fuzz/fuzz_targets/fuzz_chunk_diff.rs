// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Fuzz target for diff chunking
//!
//! The first byte picks the chunk budget; the rest is the diff. Chunks must
//! reassemble to the input and stay under twice the budget.

#![no_main]

use libfuzzer_sys::fuzz_target;

use reword_ai::summarize::{chunk_diff, truncate_at_boundary};

fuzz_target!(|data: &[u8]| {
    let Some((&first, rest)) = data.split_first() else {
        return;
    };
    let budget = usize::from(first) + 4;
    if let Ok(diff) = std::str::from_utf8(rest) {
        let chunks = chunk_diff(diff, budget);
        assert_eq!(chunks.concat(), diff);
        assert!(chunks.iter().all(|c| c.len() < 2 * budget));
        assert!(truncate_at_boundary(diff, budget).len() <= budget);
    }
});
