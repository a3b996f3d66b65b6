// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Commit message generation
//!
//! Builds a conventional-commit prompt from a diff and the rolling history
//! of recently rewritten commits, and asks the model for a message.

use tracing::{debug, warn};

use crate::generator::TextGenerator;
use crate::summarize::DiffSummarizer;

/// Message used whenever the model gives no usable answer
pub const FALLBACK_MESSAGE: &str = "chore: update code";

/// Output budget for a commit message
pub const MESSAGE_MAX_TOKENS: u32 = 250;

/// Diffs longer than this are summarized before prompting
pub const LARGE_DIFF_THRESHOLD: usize = 8_000;

/// Chunk budget on the large-diff path
pub const LARGE_CHUNK_BUDGET: usize = 8_000;

/// Total budget on the large-diff path
pub const LARGE_TOTAL_BUDGET: usize = 80_000;

const FORMAT_RULES: &str = "Respond only with a conventional commit message like:\n\
     feat(api): add user authentication endpoint\n\n\
     Adds a token-based login route and its tests.\n\n\
     Use the form `type(scope): subject`. Max 72 characters in the title. \
     Max 500 characters in the body.";

fn history_block(history: &str) -> &str {
    if history.trim().is_empty() {
        "(none)"
    } else {
        history
    }
}

/// Prompt embedding the raw diff
#[must_use]
pub fn small_diff_prompt(diff: &str, history: &str) -> String {
    format!(
        "You are producing a concise commit message for a code change.\n\
         Previous commits (most recent last):\n{}\n\n\
         Current diff:\n{diff}\n\n{FORMAT_RULES}",
        history_block(history)
    )
}

/// Prompt embedding a summary of an oversized diff
#[must_use]
pub fn large_diff_prompt(summary: &str, history: &str) -> String {
    format!(
        "You are producing a concise commit message for a large code change. \
         The diff was too large to include, so here is a summary of it.\n\
         Previous commits (most recent last):\n{}\n\n\
         Summary of the change:\n{summary}\n\n{FORMAT_RULES}",
        history_block(history)
    )
}

/// Normalize a model reply into a commit message
///
/// Trims whitespace and unwraps a surrounding Markdown code fence. Returns
/// `None` when nothing is left.
#[must_use]
pub fn clean_response(text: &str) -> Option<String> {
    let trimmed = text.trim();
    let unfenced = match trimmed.strip_prefix("```") {
        Some(rest) => {
            // drop the info string line, e.g. ```text
            let body = rest.split_once('\n').map_or("", |(_, body)| body);
            body.strip_suffix("```").unwrap_or(body)
        }
        None => trimmed,
    };
    let message = unfenced.trim();
    (!message.is_empty()).then(|| message.to_string())
}

/// Generates commit messages, falling back to [`FALLBACK_MESSAGE`]
pub struct MessageGenerator<'a> {
    generator: &'a dyn TextGenerator,
}

impl<'a> MessageGenerator<'a> {
    /// Create a message generator on top of `generator`
    #[must_use]
    pub fn new(generator: &'a dyn TextGenerator) -> Self {
        Self { generator }
    }

    /// Build the prompt for `diff`, summarizing it first when it is large
    #[must_use]
    pub fn prompt(&self, diff: &str, history: &str) -> String {
        if diff.len() > LARGE_DIFF_THRESHOLD {
            debug!(len = diff.len(), "Large diff, summarizing before prompting");
            let summary = DiffSummarizer::new(self.generator).summarize(
                diff,
                LARGE_CHUNK_BUDGET,
                LARGE_TOTAL_BUDGET,
            );
            large_diff_prompt(&summary, history)
        } else {
            small_diff_prompt(diff, history)
        }
    }

    /// Generate a message for `diff` given the rolling `history`
    ///
    /// Never fails; any generation failure yields [`FALLBACK_MESSAGE`].
    #[must_use]
    pub fn generate(&self, diff: &str, history: &str) -> String {
        let prompt = self.prompt(diff, history);
        match self.generator.generate(&prompt, MESSAGE_MAX_TOKENS) {
            Ok(text) => clean_response(&text).unwrap_or_else(|| {
                warn!("Model returned an empty message, using fallback");
                FALLBACK_MESSAGE.to_string()
            }),
            Err(e) => {
                warn!(error = %e, "Message generation failed, using fallback");
                FALLBACK_MESSAGE.to_string()
            }
        }
    }
}
