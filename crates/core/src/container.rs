//! `:::` container marker lines.
//!
//! An opener is a run of three or more colons, optional spaces, a name made
//! of ASCII alphanumerics, `-` or `_`, and an optional info remainder:
//!
//! ```text
//! :::magic
//! ::: tip Heads up
//! ::::details[Click me]
//! ```
//!
//! A closer is a line holding nothing but colons.

use crate::code_fence::leading_whitespace_info;

/// Parsed `:::name info` line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContainerOpening {
    /// Lowercased container name.
    pub name: String,
    /// Everything after the name, trimmed.
    pub info: String,
    /// Number of colons in the marker run.
    pub colons: usize,
}

impl ContainerOpening {
    /// The marker run (e.g. ":::").
    pub fn markup(&self) -> String {
        ":".repeat(self.colons)
    }
}

/// Parse a container opening line.
///
/// Returns `None` for closers, indented code, and colon runs without a name.
///
/// # Examples
///
/// ```
/// use magicmd_core::container::parse_container_open;
///
/// let opening = parse_container_open("::: Magic").unwrap();
/// assert_eq!(opening.name, "magic");
/// assert_eq!(opening.info, "");
///
/// assert!(parse_container_open(":::").is_none());
/// ```
pub fn parse_container_open(line: &str) -> Option<ContainerOpening> {
    let after_indent = unindented(line)?;
    let colons = colon_run(after_indent)?;

    let rest = after_indent[colons..].trim_start_matches([' ', '\t']);
    let name_len = rest
        .bytes()
        .take_while(|b| b.is_ascii_alphanumeric() || *b == b'-' || *b == b'_')
        .count();
    if name_len == 0 {
        return None;
    }

    Some(ContainerOpening {
        name: rest[..name_len].to_ascii_lowercase(),
        info: rest[name_len..].trim().to_string(),
        colons,
    })
}

/// Returns the colon count when the line is a bare `:::` closer.
pub fn container_closer_len(line: &str) -> Option<usize> {
    let after_indent = unindented(line)?;
    let colons = colon_run(after_indent)?;
    after_indent[colons..].trim().is_empty().then_some(colons)
}

fn unindented(line: &str) -> Option<&str> {
    let (indent, offset) = leading_whitespace_info(line);
    (indent <= 3).then(|| &line[offset..])
}

fn colon_run(text: &str) -> Option<usize> {
    let run = text.bytes().take_while(|b| *b == b':').count();
    (run >= 3).then_some(run)
}
