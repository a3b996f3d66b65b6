// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Fuzz target for message escaping and script synthesis
//!
//! Any message must escape to a single line and synthesize without panicking.

#![no_main]

use libfuzzer_sys::fuzz_target;

use reword_script::escape::escape_message;
use reword_script::{RewritePlan, synthesize};

fuzz_target!(|data: &[u8]| {
    if let Ok(message) = std::str::from_utf8(data) {
        let escaped = escape_message(message);
        assert!(!escaped.contains('\n'));

        if let Ok(plan) = RewritePlan::from_pairs([("0123456789abcdef", message)]) {
            let scripts = synthesize(&plan, "fedcba9876543210");
            assert_eq!(scripts.exec_script.lines().filter(|l| l.starts_with("exec ")).count(), 1);
        }
    }
});
