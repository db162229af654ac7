//! YAML frontmatter at the top of a post.

use serde_json::{Map, Value as JsonValue};
use thiserror::Error;

/// Parsed frontmatter and where the markdown body begins.
#[derive(Debug, Clone, PartialEq)]
pub struct Frontmatter {
    /// Frontmatter mapping as JSON; empty when the document has none.
    pub data: Map<String, JsonValue>,
    /// Byte offset of the markdown body in the original input.
    pub body_start: usize,
}

impl Frontmatter {
    /// Post title.
    pub fn title(&self) -> Option<&str> {
        self.data.get("title").and_then(JsonValue::as_str)
    }

    /// Post date as written in the frontmatter.
    pub fn date(&self) -> Option<&str> {
        self.data.get("date").and_then(JsonValue::as_str)
    }

    /// The markdown body of `input`.
    pub fn body<'a>(&self, input: &'a str) -> &'a str {
        &input[self.body_start..]
    }
}

/// Errors emitted while extracting frontmatter.
#[derive(Debug, Error)]
pub enum FrontmatterError {
    /// Opening `---` without a closing one.
    #[error("Unterminated YAML frontmatter block: expected closing '---'")]
    Unterminated,
    /// YAML failed to parse.
    #[error("Frontmatter parse error: {0}")]
    Parse(String),
    /// Top-level YAML node was not a mapping.
    #[error("Frontmatter must be a YAML mapping at the top level")]
    InvalidRootType,
}

/// Extract a `---` delimited YAML block from the start of `input`.
///
/// A leading BOM and blank lines may precede the block. Documents without a
/// block yield empty data and a body starting at 0.
pub fn extract_frontmatter(input: &str) -> Result<Frontmatter, FrontmatterError> {
    let bom_len = if input.starts_with('\u{feff}') {
        '\u{feff}'.len_utf8()
    } else {
        0
    };

    let mut lines = LineOffsets::new(input, bom_len);
    let opened = lines
        .by_ref()
        .find(|(_, line)| !line.trim().is_empty())
        .is_some_and(|(_, line)| is_delimiter(line));
    if !opened {
        return Ok(Frontmatter {
            data: Map::new(),
            body_start: 0,
        });
    }

    let yaml_start = lines.offset;
    let (yaml_end, body_start) = lines
        .find(|(_, line)| is_delimiter(line))
        .map(|(start, _)| (start, lines.offset))
        .ok_or(FrontmatterError::Unterminated)?;

    Ok(Frontmatter {
        data: parse_yaml(&input[yaml_start..yaml_end])?,
        body_start,
    })
}

fn parse_yaml(block: &str) -> Result<Map<String, JsonValue>, FrontmatterError> {
    if block.trim().is_empty() {
        return Ok(Map::new());
    }
    let yaml: serde_yaml::Value =
        serde_yaml::from_str(block).map_err(|err| FrontmatterError::Parse(err.to_string()))?;
    match serde_json::to_value(yaml).map_err(|err| FrontmatterError::Parse(err.to_string()))? {
        JsonValue::Null => Ok(Map::new()),
        JsonValue::Object(map) => Ok(map),
        _ => Err(FrontmatterError::InvalidRootType),
    }
}

fn is_delimiter(line: &str) -> bool {
    line.trim_end_matches(['\r', '\n']) == "---"
}

/// Iterates `(start_offset, line)` pairs, tracking the offset after the last
/// yielded line.
struct LineOffsets<'a> {
    input: &'a str,
    offset: usize,
}

impl<'a> LineOffsets<'a> {
    fn new(input: &'a str, offset: usize) -> Self {
        Self { input, offset }
    }
}

impl<'a> Iterator for LineOffsets<'a> {
    type Item = (usize, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        if self.offset >= self.input.len() {
            return None;
        }
        let start = self.offset;
        let rest = &self.input[start..];
        let len = rest.find('\n').map_or(rest.len(), |pos| pos + 1);
        self.offset += len;
        Some((start, &rest[..len]))
    }
}
