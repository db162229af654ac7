//! Fenced code block recognition for the line-based block tokenizer.
//!
//! Follows the CommonMark fence rules the tokenizer needs: openers and
//! closers may be indented by up to three columns, closers must reuse the
//! opener's marker with at least the same run length, and backtick info
//! strings may not contain backticks.

/// An opening fence line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenceOpener {
    /// Fence marker character (backtick or tilde).
    pub marker: char,
    /// Length of the marker run.
    pub length: usize,
    /// Visual indentation of the opener, stripped from content lines.
    pub indent: usize,
    /// Info string, trimmed.
    pub info: String,
}

impl FenceOpener {
    /// The delimiter text (e.g. "```").
    pub fn markup(&self) -> String {
        self.marker.to_string().repeat(self.length)
    }
}

/// Detect a fence opener on a single line.
pub fn detect_fence_opener(line: &str) -> Option<FenceOpener> {
    let (indent, offset) = leading_whitespace_info(line);
    // CommonMark: 4+ columns is an indented code block
    if indent > 3 {
        return None;
    }
    let after_indent = &line[offset..];
    let (marker, length) = marker_run(after_indent)?;
    let info = after_indent[length..].trim();
    if marker == '`' && info.contains('`') {
        return None;
    }
    Some(FenceOpener {
        marker,
        length,
        indent,
        info: info.to_string(),
    })
}

/// True when `line` closes the fence opened by `opener`.
pub fn is_fence_closer(line: &str, opener: &FenceOpener) -> bool {
    let (indent, offset) = leading_whitespace_info(line);
    if indent > 3 {
        return false;
    }
    let after_indent = &line[offset..];
    match marker_run(after_indent) {
        Some((marker, length)) => {
            marker == opener.marker
                && length >= opener.length
                && after_indent[length..].trim().is_empty()
        }
        None => false,
    }
}

/// Remove up to `indent` columns of leading whitespace from a content line.
pub fn strip_fence_indent(line: &str, indent: usize) -> &str {
    if indent == 0 {
        return line;
    }
    let mut col = 0;
    for (idx, b) in line.bytes().enumerate() {
        if col >= indent {
            return &line[idx..];
        }
        match b {
            b' ' => col += 1,
            b'\t' => col += 4 - (col % 4),
            _ => return &line[idx..],
        }
    }
    ""
}

/// Returns (visual_columns, byte_offset) for leading whitespace.
/// Tabs expand to the next 4-column boundary.
pub(crate) fn leading_whitespace_info(line: &str) -> (usize, usize) {
    let mut col = 0;
    let mut bytes = 0;
    for b in line.bytes() {
        match b {
            b' ' => col += 1,
            b'\t' => col += 4 - (col % 4),
            _ => break,
        }
        bytes += 1;
    }
    (col, bytes)
}

fn marker_run(text: &str) -> Option<(char, usize)> {
    let first = text.chars().next()?;
    if first != '`' && first != '~' {
        return None;
    }
    let run_len = text.chars().take_while(|c| *c == first).count();
    (run_len >= 3).then_some((first, run_len))
}
