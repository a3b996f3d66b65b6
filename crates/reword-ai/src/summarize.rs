// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Diff summarization
//!
//! Reduces an arbitrarily large diff to text that fits a model's input
//! budget. Small diffs pass through untouched; large ones are truncated to a
//! total budget, split into line-based chunks, summarized chunk by chunk and,
//! when the joined summaries are still too long, summarized once more.
//!
//! All lengths are byte lengths. Truncation always lands on a UTF-8
//! character boundary.

use tracing::{debug, warn};

use crate::generator::TextGenerator;

/// Default per-chunk budget
pub const DEFAULT_CHUNK_BUDGET: usize = 4_000;

/// Default total budget
pub const DEFAULT_TOTAL_BUDGET: usize = 40_000;

/// Line appended after a diff cut at the total budget
pub const TRUNCATION_MARKER: &str = "... (diff truncated)";

/// Stands in for the chunk that contains the truncation marker
pub const TRUNCATED_PLACEHOLDER: &str = "[remaining diff truncated]";

/// Output budget for one chunk summary
pub const CHUNK_SUMMARY_TOKENS: u32 = 200;

/// Output budget for the summary of summaries
pub const META_SUMMARY_TOKENS: u32 = 300;

/// How many file names the local fallback lists
const FALLBACK_FILE_LIMIT: usize = 3;

/// Prefix of the "new file" header line in a unified diff
const ADDED_FILE_MARKER: &str = "+++ ";

/// Cut `text` to at most `max` bytes without splitting a character
#[must_use]
pub fn truncate_at_boundary(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// Split `diff` into contiguous line-based chunks
///
/// Lines are accumulated until the chunk reaches `budget` bytes, then the
/// chunk is flushed. A single line longer than `budget` is split first, so
/// every chunk is shorter than `2 * budget`.
#[must_use]
pub fn chunk_diff(diff: &str, budget: usize) -> Vec<String> {
    let budget = budget.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();

    for line in diff.split_inclusive('\n') {
        let mut rest = line;
        while !rest.is_empty() {
            let mut piece = truncate_at_boundary(rest, budget);
            if piece.is_empty() {
                // budget is smaller than one character
                let width = rest.chars().next().map_or(rest.len(), char::len_utf8);
                piece = &rest[..width];
            }
            rest = &rest[piece.len()..];

            current.push_str(piece);
            if current.len() >= budget {
                chunks.push(std::mem::take(&mut current));
            }
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// Names of files added or changed in a chunk, from its `+++` header lines
#[must_use]
pub fn changed_files(chunk: &str) -> Vec<String> {
    chunk
        .lines()
        .filter_map(|line| line.strip_prefix(ADDED_FILE_MARKER))
        .map(|path| path.strip_prefix("b/").unwrap_or(path).trim())
        .filter(|path| !path.is_empty() && *path != "/dev/null")
        .take(FALLBACK_FILE_LIMIT)
        .map(str::to_string)
        .collect()
}

/// Summary built without the model when a chunk summary request fails
fn local_summary(chunk: &str) -> String {
    let files = changed_files(chunk);
    if files.is_empty() {
        "- Changes in this part could not be summarized".to_string()
    } else {
        format!("- Changed files: {}", files.join(", "))
    }
}

fn chunk_prompt(chunk: &str, index: usize, total: usize) -> String {
    format!(
        "You are reviewing part {index} of {total} of a large git diff.\n\
         Summarize this part in 3-4 bullet points. For each point say what \
         changed and why it matters. Mention file names where useful. \
         Reply with the bullet points only.\n\n\
         Diff part {index}:\n{chunk}"
    )
}

fn meta_prompt(summaries: &str) -> String {
    format!(
        "The following are summaries of consecutive parts of one git commit's diff.\n\
         Combine them into a single summary of 3-4 bullet points describing what \
         changed and why it matters. Reply with the bullet points only.\n\n{summaries}"
    )
}

/// Summarizes oversized diffs with the help of a [`TextGenerator`]
pub struct DiffSummarizer<'a> {
    generator: &'a dyn TextGenerator,
}

impl<'a> DiffSummarizer<'a> {
    /// Create a summarizer that asks `generator` for chunk summaries
    #[must_use]
    pub fn new(generator: &'a dyn TextGenerator) -> Self {
        Self { generator }
    }

    /// Reduce `diff` to text no larger than a small multiple of `chunk_budget`
    ///
    /// Never fails: chunks the model cannot summarize fall back to a list of
    /// their changed files.
    #[must_use]
    pub fn summarize(&self, diff: &str, chunk_budget: usize, total_budget: usize) -> String {
        if diff.len() <= chunk_budget {
            return diff.to_string();
        }

        let bounded = if diff.len() > total_budget {
            debug!(
                len = diff.len(),
                total_budget, "Truncating diff before summarization"
            );
            format!(
                "{}\n{TRUNCATION_MARKER}\n",
                truncate_at_boundary(diff, total_budget)
            )
        } else {
            diff.to_string()
        };

        let chunks: Vec<String> = chunk_diff(&bounded, chunk_budget)
            .into_iter()
            .map(|chunk| {
                if chunk.contains(TRUNCATION_MARKER) {
                    TRUNCATED_PLACEHOLDER.to_string()
                } else {
                    chunk
                }
            })
            .collect();

        if let [single] = chunks.as_slice() {
            return single.clone();
        }

        let total = chunks.len();
        debug!(chunks = total, chunk_budget, "Summarizing diff in chunks");

        let mut fallbacks = 0usize;
        let parts: Vec<String> = chunks
            .iter()
            .enumerate()
            .map(|(idx, chunk)| {
                let summary = if chunk == TRUNCATED_PLACEHOLDER {
                    chunk.clone()
                } else {
                    match self.generator.generate(
                        &chunk_prompt(chunk, idx + 1, total),
                        CHUNK_SUMMARY_TOKENS,
                    ) {
                        Ok(text) => text,
                        Err(e) => {
                            warn!(part = idx + 1, error = %e, "Chunk summary failed, using file list");
                            fallbacks += 1;
                            local_summary(chunk)
                        }
                    }
                };
                format!("Part {}:\n{summary}", idx + 1)
            })
            .collect();

        let combined = parts.join("\n\n");
        debug!(
            parts = total,
            fallbacks,
            len = combined.len(),
            "Chunk summaries collected"
        );

        if combined.len() <= chunk_budget {
            return combined;
        }

        let meta_input = truncate_at_boundary(&combined, chunk_budget.saturating_mul(2));
        match self
            .generator
            .generate(&meta_prompt(meta_input), META_SUMMARY_TOKENS)
        {
            Ok(text) => truncate_at_boundary(&text, chunk_budget.saturating_mul(2)).to_string(),
            Err(e) => {
                warn!(error = %e, "Meta summary failed, truncating chunk summaries");
                truncate_at_boundary(&combined, chunk_budget).to_string()
            }
        }
    }
}
