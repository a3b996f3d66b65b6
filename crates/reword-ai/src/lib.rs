// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! reword-ai: commit message generation for reword
//!
//! This library crate turns a commit's diff into a conventional-commit
//! message using a language model.

#![warn(missing_docs)]

//! ## Pipeline
//!
//! - [`DiffSummarizer`] shrinks oversized diffs by summarizing them in chunks.
//! - [`MessageGenerator`] builds the prompt from the diff and the rolling
//!   history of recently rewritten commits, and never fails: when the model
//!   does not answer it returns [`FALLBACK_MESSAGE`].
//! - [`TextGenerator`] is the seam to the model; [`OpenRouterClient`] is the
//!   HTTP implementation.
//!
//! ```rust,no_run
//! use reword_ai::{ClientConfig, MessageGenerator, OpenRouterClient};
//!
//! let client = OpenRouterClient::new(ClientConfig::with_api_key("sk-..."))
//!     .expect("api key present");
//! let message = MessageGenerator::new(&client).generate("diff --git ...", "");
//! println!("{message}");
//! ```

pub mod client;
pub mod error;
pub mod generator;
pub mod message;
pub mod summarize;

pub use client::{ClientConfig, OpenRouterClient};
pub use error::AiError;
pub use generator::TextGenerator;
pub use message::{FALLBACK_MESSAGE, MessageGenerator};
pub use summarize::DiffSummarizer;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::client::{ClientConfig, OpenRouterClient};
    pub use crate::error::AiError;
    pub use crate::generator::TextGenerator;
    pub use crate::message::{FALLBACK_MESSAGE, MessageGenerator};
    pub use crate::summarize::DiffSummarizer;
}
