//! Token stream renderer.
//!
//! Walks the stream in document order. Magic container markers go through
//! the core transform, which suppresses the fences it captures before the
//! walk reaches them; everything else is rendered here.

use html_escape::{encode_double_quoted_attribute, encode_text};
use magicmd_core::{
    CodeBlockDescriptor, ConfigError, FenceInfo, MagicError, MagicOptions, ParseDiagnostics,
    RecoverableError, Token, transform_with_report,
};
use serde::{Deserialize, Serialize};

use crate::prose::{MarkdownOptions, render_markdown};

/// Options for rendering a whole document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderOptions {
    /// Magic container transform options.
    pub magic: MagicOptions,
    /// Prose rendering options.
    pub markdown: MarkdownOptions,
}

impl RenderOptions {
    /// Load options from JSON; missing keys take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// What rendering collected besides the HTML.
#[derive(Debug, Clone, Default)]
pub struct RenderReport {
    /// Descriptors of every magic container, in document order.
    pub code_groups: Vec<Vec<CodeBlockDescriptor>>,
    /// Warnings and contained errors.
    pub diagnostics: ParseDiagnostics,
}

/// Render a token stream to HTML.
///
/// Fragments are joined with newlines. Containers still open when the
/// stream ends are closed so the output stays balanced.
pub fn render_tokens(
    tokens: &mut [Token],
    options: &RenderOptions,
    report: &mut RenderReport,
) -> String {
    let mut fragments = Vec::new();
    let mut closers: Vec<String> = Vec::new();

    for index in 0..tokens.len() {
        let fragment = if tokens[index].is_container(&options.magic.container_name) {
            render_magic_marker(tokens, index, options, report, &mut closers)
        } else {
            render_token(&tokens[index], options, report, &mut closers)
        };
        if !fragment.is_empty() {
            fragments.push(fragment);
        }
    }

    while let Some(closer) = closers.pop() {
        fragments.push(closer);
    }
    fragments.join("\n")
}

fn render_magic_marker(
    tokens: &mut [Token],
    index: usize,
    options: &RenderOptions,
    report: &mut RenderReport,
    closers: &mut Vec<String>,
) -> String {
    let output = transform_with_report(tokens, index, &options.magic);
    if tokens[index].nesting() > 0 {
        if let Some(err) = output.error {
            report
                .diagnostics
                .add_error(RecoverableError::error(err.to_string()));
        }
        report.code_groups.push(output.descriptors);
        closers.push(options.magic.closing_tag());
    } else {
        closers.pop();
    }
    output.markup
}

fn render_token(
    token: &Token,
    options: &RenderOptions,
    report: &mut RenderReport,
    closers: &mut Vec<String>,
) -> String {
    match token {
        Token::ContainerOpen { name, info, .. } => {
            closers.push("</div>".to_string());
            custom_block_open(name, info)
        }
        Token::ContainerClose { .. } => {
            closers.pop();
            "</div>".to_string()
        }
        Token::Fence { info, content, .. } => render_fence(info, content),
        Token::Markdown { source } => render_prose(source, options.markdown, report),
        Token::Html { content } => content.clone(),
    }
}

fn custom_block_open(name: &str, info: &str) -> String {
    let mut html = format!(
        "<div class=\"{} custom-block\">",
        encode_double_quoted_attribute(name)
    );
    if !info.is_empty() {
        html.push_str("<p class=\"custom-block-title\">");
        html.push_str(&encode_text(info));
        html.push_str("</p>");
    }
    html
}

/// Plain `<pre><code>` for fences outside magic containers.
fn render_fence(info: &str, content: &str) -> String {
    let info = FenceInfo::parse(info);
    let class = if info.language.is_empty() {
        String::new()
    } else {
        format!(
            " class=\"language-{}\"",
            encode_double_quoted_attribute(&info.language)
        )
    };
    format!("<pre><code{}>{}</code></pre>", class, encode_text(content))
}

fn render_prose(source: &str, options: MarkdownOptions, report: &mut RenderReport) -> String {
    match render_markdown(source, options) {
        Ok(html) => html,
        Err(err) => {
            log::warn!("falling back to escaped text: {err}");
            let mut recovered = RecoverableError::error(err.to_string());
            if let MagicError::Markdown { location, .. } = err {
                recovered = recovered.at(location);
            }
            report.diagnostics.add_error(recovered);
            format!("<p>{}</p>", encode_text(source.trim()))
        }
    }
}
