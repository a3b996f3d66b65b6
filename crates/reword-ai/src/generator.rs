// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! The text-generation seam

use crate::error::AiError;

/// Anything that can turn a prompt into text
///
/// Implementations return the model's reply with surrounding whitespace
/// trimmed, or an error for any transport, authentication or rate-limit
/// failure.
pub trait TextGenerator {
    /// Generate text for `prompt`, bounded by `max_output_tokens`
    ///
    /// # Errors
    ///
    /// Returns `AiError` when no usable response was obtained.
    fn generate(&self, prompt: &str, max_output_tokens: u32) -> Result<String, AiError>;
}

impl<T: TextGenerator + ?Sized> TextGenerator for &T {
    fn generate(&self, prompt: &str, max_output_tokens: u32) -> Result<String, AiError> {
        (**self).generate(prompt, max_output_tokens)
    }
}

impl<T: TextGenerator + ?Sized> TextGenerator for Box<T> {
    fn generate(&self, prompt: &str, max_output_tokens: u32) -> Result<String, AiError> {
        (**self).generate(prompt, max_output_tokens)
    }
}
