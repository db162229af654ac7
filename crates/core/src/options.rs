//! Transform options read from the host configuration.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ConfigError;

/// Default container name (`:::magic`).
pub const DEFAULT_CONTAINER_NAME: &str = "magic";
/// Default placeholder component tag.
pub const DEFAULT_COMPONENT: &str = "MagicCodeGroup";
/// Default attribute carrying the payload.
pub const DEFAULT_PAYLOAD_ATTRIBUTE: &str = "data-code-files";

/// How fence bodies are trimmed before they land in a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CodeTrim {
    /// Keep the body exactly as written, trailing newline included.
    Preserve,
    /// Strip trailing line endings only.
    #[default]
    TrailingNewline,
    /// Strip leading and trailing whitespace.
    Whitespace,
}

impl CodeTrim {
    /// Apply the trimming policy to a fence body.
    pub fn apply<'a>(&self, code: &'a str) -> &'a str {
        match self {
            CodeTrim::Preserve => code,
            CodeTrim::TrailingNewline => code.trim_end_matches(['\r', '\n']),
            CodeTrim::Whitespace => code.trim(),
        }
    }
}

/// Options for the magic container transform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MagicOptions {
    /// Container name that triggers the transform.
    pub container_name: String,
    /// Tag of the placeholder component.
    pub component: String,
    /// Attribute carrying the encoded payload.
    pub payload_attribute: String,
    /// Global default for line-number gutters.
    #[serde(deserialize_with = "deserialize_boolish")]
    pub line_numbers: bool,
    /// Trimming applied to fence bodies.
    pub code_trim: CodeTrim,
    /// Strip `[!code ...]` notation comments into line sets.
    pub extract_notations: bool,
}

impl Default for MagicOptions {
    fn default() -> Self {
        Self {
            container_name: DEFAULT_CONTAINER_NAME.to_string(),
            component: DEFAULT_COMPONENT.to_string(),
            payload_attribute: DEFAULT_PAYLOAD_ATTRIBUTE.to_string(),
            line_numbers: false,
            code_trim: CodeTrim::default(),
            extract_notations: false,
        }
    }
}

impl MagicOptions {
    /// Load options from a JSON object; missing keys take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Same options with a different line-number default.
    pub fn with_line_numbers(mut self, enabled: bool) -> Self {
        self.line_numbers = enabled;
        self
    }

    /// Opening placeholder tag carrying an already-encoded payload.
    pub fn opening_tag(&self, payload: &str) -> String {
        format!(
            "<{} {}=\"{}\">",
            self.component, self.payload_attribute, payload
        )
    }

    /// Closing placeholder tag.
    pub fn closing_tag(&self) -> String {
        format!("</{}>", self.component)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Boolish {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

/// Accepts booleans, numbers, `null` (false) and the usual truthy/falsy
/// strings.
fn deserialize_boolish<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match Boolish::deserialize(deserializer)? {
        Boolish::Null => Ok(false),
        Boolish::Bool(value) => Ok(value),
        Boolish::Int(value) => Ok(value != 0),
        Boolish::Float(value) => Ok(value != 0.0),
        Boolish::Text(text) => match text.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Ok(true),
            "false" | "no" | "off" | "0" | "" => Ok(false),
            other => Err(serde::de::Error::custom(format!(
                "expected a boolean-like value, found '{other}'"
            ))),
        },
    }
}
