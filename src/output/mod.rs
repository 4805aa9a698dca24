// src/output/mod.rs

//! Format-specific output accumulators.
//!
//! Each submodule defines:
//! - a `Compiler` capability trait nodes implement to render into it,
//! - an `Output` accumulator (implements [`crate::dag::OutputFormat`]),
//! - a `render` function serializing the finished accumulator to text.

pub mod ci;
pub mod dockerfile;
pub mod makefile;
pub mod template;

/// Notice placed at the top of every generated file that has a preamble.
pub const GENERATED_NOTICE: &str = "Code generated by pipegen. DO NOT EDIT.";

/// Prefix every line of `text` with a comment marker.
///
/// Blank lines get the marker with trailing whitespace trimmed.
pub(crate) fn commented(prefix: &str, text: &str) -> Vec<String> {
    text.lines()
        .map(|line| format!("{prefix}{line}").trim_end().to_string())
        .collect()
}
