//! Code block descriptors handed to the rendering component.

use serde::{Deserialize, Serialize};

use crate::info::FenceInfo;
use crate::options::MagicOptions;

/// One fenced code block captured inside a magic container.
///
/// Field names serialize in the consuming component's `CodeFileData` shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeBlockDescriptor {
    /// Display label.
    pub name: String,
    /// Lowercased language, `""` when the fence had none.
    #[serde(rename = "lang")]
    pub language: String,
    /// Fence body after trimming.
    pub code: String,
    /// Whether line gutters are shown.
    pub line_numbers: bool,
    /// First displayed line number (>= 1).
    pub line_start: u32,
    /// Highlighted lines.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight_lines: Option<Vec<u32>>,
    /// Focused lines.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focused_lines: Option<Vec<u32>>,
    /// Lines added in a diff.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff_add_lines: Option<Vec<u32>>,
    /// Lines removed in a diff.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff_reduce_lines: Option<Vec<u32>>,
    /// Lines flagged as warnings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning_lines: Option<Vec<u32>>,
    /// Lines flagged as errors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_lines: Option<Vec<u32>>,
}

impl CodeBlockDescriptor {
    /// Plain descriptor with gutters off and no line sets.
    pub fn new(
        name: impl Into<String>,
        language: impl Into<String>,
        code: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            language: language.into(),
            code: code.into(),
            line_numbers: false,
            line_start: 1,
            highlight_lines: None,
            focused_lines: None,
            diff_add_lines: None,
            diff_reduce_lines: None,
            warning_lines: None,
            error_lines: None,
        }
    }

    /// Build a descriptor from a fence's info string and raw body.
    pub fn from_fence(info: &str, content: &str, options: &MagicOptions) -> Self {
        let info = FenceInfo::parse(info);
        let code = options.code_trim.apply(content);

        let mut descriptor = Self::new(info.display_name(), info.language.clone(), code);
        descriptor.line_numbers = info.resolve_line_numbers(options.line_numbers);
        descriptor.line_start = info.line_start.unwrap_or(1);
        let line_count = u32::try_from(descriptor.code.split('\n').count()).unwrap_or(u32::MAX);
        descriptor.highlight_lines = info
            .highlight_lines
            .map(|lines| lines.into_iter().filter(|&line| line <= line_count).collect());

        if options.extract_notations {
            let notations = extract_notations(&descriptor.code);
            if notations.found_any() {
                descriptor.code = notations.code;
                descriptor.highlight_lines =
                    merge_lines(descriptor.highlight_lines.take(), notations.highlight);
                descriptor.focused_lines = non_empty(notations.focus);
                descriptor.diff_add_lines = non_empty(notations.diff_add);
                descriptor.diff_reduce_lines = non_empty(notations.diff_reduce);
                descriptor.warning_lines = non_empty(notations.warning);
                descriptor.error_lines = non_empty(notations.error);
            }
        }

        descriptor
    }
}

/// Code with `[!code ...]` markers removed plus the lines they classified.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Notations {
    /// Code with the notation comments removed.
    pub code: String,
    /// `[!code highlight]` / `[!code hl]` lines.
    pub highlight: Vec<u32>,
    /// `[!code focus]` lines.
    pub focus: Vec<u32>,
    /// `[!code ++]` lines.
    pub diff_add: Vec<u32>,
    /// `[!code --]` lines.
    pub diff_reduce: Vec<u32>,
    /// `[!code warning]` lines.
    pub warning: Vec<u32>,
    /// `[!code error]` lines.
    pub error: Vec<u32>,
}

impl Notations {
    fn found_any(&self) -> bool {
        !(self.highlight.is_empty()
            && self.focus.is_empty()
            && self.diff_add.is_empty()
            && self.diff_reduce.is_empty()
            && self.warning.is_empty()
            && self.error.is_empty())
    }
}

// Longest prefixes first so `<!--` wins over nothing and `//` over `/`.
const COMMENT_OPENERS: &[(&str, &str)] = &[("<!--", "-->"), ("/*", "*/"), ("//", ""), ("#", "")];

/// Strip trailing notation comments, recording 1-based line numbers.
pub fn extract_notations(code: &str) -> Notations {
    let mut out = Notations::default();
    let mut lines = Vec::new();

    for (idx, line) in code.split('\n').enumerate() {
        let Ok(line_no) = u32::try_from(idx + 1) else {
            lines.push(line);
            continue;
        };
        match split_notation(line) {
            Some((kept, kind)) => {
                let bucket = match kind {
                    "highlight" | "hl" => &mut out.highlight,
                    "focus" => &mut out.focus,
                    "++" => &mut out.diff_add,
                    "--" => &mut out.diff_reduce,
                    "warning" => &mut out.warning,
                    "error" => &mut out.error,
                    _ => {
                        lines.push(line);
                        continue;
                    }
                };
                bucket.push(line_no);
                lines.push(kept);
            }
            None => lines.push(line),
        }
    }

    out.code = lines.join("\n");
    out
}

/// Returns the line without its notation comment, and the notation kind.
fn split_notation(line: &str) -> Option<(&str, &str)> {
    let trimmed = line.trim_end();
    for (open, close) in COMMENT_OPENERS {
        let Some(body) = trimmed.strip_suffix(close) else {
            continue;
        };
        let Some(start) = body.rfind(open) else {
            continue;
        };
        let inner = body[start + open.len()..].trim();
        let Some(kind) = inner
            .strip_prefix("[!code ")
            .and_then(|rest| rest.strip_suffix(']'))
        else {
            continue;
        };
        return Some((line[..start].trim_end(), kind.trim()));
    }
    None
}

fn non_empty(lines: Vec<u32>) -> Option<Vec<u32>> {
    (!lines.is_empty()).then_some(lines)
}

fn merge_lines(existing: Option<Vec<u32>>, extra: Vec<u32>) -> Option<Vec<u32>> {
    match (existing, extra.is_empty()) {
        (existing, true) => existing,
        (None, false) => Some(extra),
        (Some(mut lines), false) => {
            lines.extend(extra);
            lines.sort_unstable();
            lines.dedup();
            Some(lines)
        }
    }
}
