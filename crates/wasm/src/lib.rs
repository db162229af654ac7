//! WebAssembly bindings: render posts and encode or decode code-group
//! payloads from JavaScript.

use magicmd_core::CodeBlockDescriptor;
use magicmd_site::{RenderOptions, render_document};
use serde::Serialize;
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::*;

/// Lenient config parsing: anything that does not deserialize means defaults.
fn parse_config(config: JsValue) -> RenderOptions {
    if config.is_undefined() || config.is_null() {
        return RenderOptions::default();
    }
    serde_wasm_bindgen::from_value(config).unwrap_or_default()
}

/// Result of rendering a post.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderResult {
    /// Body HTML with magic placeholders.
    pub html: String,
    /// Frontmatter serialized as a JSON string.
    pub frontmatter_json: String,
    /// Descriptors per magic container, in document order.
    pub code_groups: Vec<Vec<CodeBlockDescriptor>>,
    /// Warnings and contained errors as display strings.
    pub warnings: Vec<String>,
}

/// Renders a markdown post to HTML.
///
/// # Arguments
///
/// * `input` - Markdown source, frontmatter included
/// * `config` - Optional options object:
///   - `magic`: `{ containerName, component, payloadAttribute, lineNumbers, codeTrim, extractNotations }`
///   - `markdown`: `{ gfm, rawHtml, math }`
///
/// # Errors
///
/// Only malformed frontmatter is an error; every other problem is reported
/// in `warnings`.
#[wasm_bindgen]
pub fn render_markdown(input: &str, config: JsValue) -> Result<JsValue, JsError> {
    let options = parse_config(config);
    let document = render_document(input, &options)
        .map_err(|e| JsError::new(&format!("Render error: {}", e)))?;

    let frontmatter_json =
        serde_json::to_string(&document.frontmatter.data).unwrap_or_else(|_| "{}".to_string());
    let result = RenderResult {
        html: document.html,
        frontmatter_json,
        code_groups: document.code_groups,
        warnings: document.diagnostics.messages(),
    };

    serde_wasm_bindgen::to_value(&result)
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

/// Decodes a `data-code-files` payload into descriptor objects.
#[wasm_bindgen]
pub fn decode_payload(payload: &str) -> Result<JsValue, JsError> {
    let descriptors = magicmd_core::decode_payload(payload)
        .map_err(|e| JsError::new(&format!("Payload error: {}", e)))?;
    serde_wasm_bindgen::to_value(&descriptors)
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

/// Encodes descriptor objects into an attribute-safe payload.
#[wasm_bindgen]
pub fn encode_payload(files: JsValue) -> Result<String, JsError> {
    let descriptors: Vec<CodeBlockDescriptor> = serde_wasm_bindgen::from_value(files)
        .map_err(|e| JsError::new(&format!("Invalid code files: {}", e)))?;
    magicmd_core::encode_payload(&descriptors)
        .map_err(|e| JsError::new(&format!("Payload error: {}", e)))
}
