//! Whole-document rendering: frontmatter, tokenize, render.

use magicmd_core::{
    CodeBlockDescriptor, Frontmatter, MagicError, ParseDiagnostics, extract_frontmatter,
};

use crate::render::{RenderOptions, RenderReport, render_tokens};
use crate::tokenizer::tokenize_from;

/// A rendered post.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    /// Body HTML with magic placeholders in place.
    pub html: String,
    /// Frontmatter data and body offset.
    pub frontmatter: Frontmatter,
    /// Descriptors per magic container, in document order.
    pub code_groups: Vec<Vec<CodeBlockDescriptor>>,
    /// Tokenizer warnings plus contained render errors.
    pub diagnostics: ParseDiagnostics,
}

/// Render a markdown post to HTML.
///
/// Only frontmatter failures abort; everything else is recorded in
/// [`RenderedDocument::diagnostics`].
pub fn render_document(input: &str, options: &RenderOptions) -> Result<RenderedDocument, MagicError> {
    let frontmatter = extract_frontmatter(input)?;
    let body = frontmatter.body(input);
    let first_line = 1 + input[..frontmatter.body_start].matches('\n').count();

    let mut report = RenderReport::default();
    let mut tokens = tokenize_from(body, first_line, &mut report.diagnostics);
    log::debug!("tokenized body into {} token(s)", tokens.len());

    let html = render_tokens(&mut tokens, options, &mut report);
    report.diagnostics.sort_warnings();
    Ok(RenderedDocument {
        html,
        frontmatter,
        code_groups: report.code_groups,
        diagnostics: report.diagnostics,
    })
}

/// Render a post with options given as a JSON object, as stored in a site
/// config file. Rejected options fail with [`MagicError::Config`].
pub fn render_document_from_json(
    input: &str,
    options_json: &str,
) -> Result<RenderedDocument, MagicError> {
    let options = RenderOptions::from_json(options_json)?;
    render_document(input, &options)
}
