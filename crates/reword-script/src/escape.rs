// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Shell escaping for commit messages and paths
//!
//! Messages are embedded as a single-quoted `printf '%b'` argument:
//! backslashes are doubled, newlines and carriage returns become `\n` and
//! `\r`, and single quotes become `'\''`. The result is one line of shell
//! that reproduces the message byte-for-byte, so it also fits in a rebase
//! todo `exec` line.

/// Escape `message` for use inside a single-quoted `printf '%b'` argument
#[must_use]
pub fn escape_message(message: &str) -> String {
    let mut escaped = String::with_capacity(message.len() + 8);
    for c in message.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\'' => escaped.push_str("'\\''"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// A shell expression that expands to exactly `message`
///
/// Trailing newlines are lost to command substitution; git strips them anyway.
#[must_use]
pub fn message_expr(message: &str) -> String {
    format!("\"$(printf '%b' '{}')\"", escape_message(message))
}

/// The amend command that replaces the message of the checked-out commit
///
/// `--cleanup=whitespace` keeps lines starting with `#`.
#[must_use]
pub fn amend_command(message: &str) -> String {
    format!(
        "git commit --amend --allow-empty --no-verify --cleanup=whitespace -m {}",
        message_expr(message)
    )
}

/// Quote an arbitrary string (a path, a command) as one POSIX shell word
#[must_use]
pub fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "'\\''"))
}
