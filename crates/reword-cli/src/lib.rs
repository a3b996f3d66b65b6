//! reword library
//!
//! This module exports the rewrite pipeline behind the `reword` binary for
//! use in integration tests and as a library.

pub mod apply;
pub mod checkpoint;
pub mod config;
pub mod editor;
pub mod history;
pub mod pipeline;
