#![deny(missing_docs)]
//! magicmd site pipeline.
//!
//! Turns a markdown post into HTML for the blog: frontmatter is split off,
//! the body is tokenized into fences, `:::` containers and prose chunks, and
//! the token stream is rendered with the `:::magic` transform from
//! [`magicmd_core`] applied to every magic container.

/// Batch rendering across threads.
pub mod batch;
/// Whole-document rendering.
pub mod document;
/// Blog post index.
pub mod posts;
/// Prose chunks through markdown-rs.
pub mod prose;
/// Token stream rendering.
pub mod render;
/// Line-based block tokenizer.
pub mod tokenizer;

pub use batch::{BatchOptions, BatchOutput, BatchResult, BatchStats, DocumentInput, render_batch};
pub use document::{RenderedDocument, render_document, render_document_from_json};
pub use posts::{Post, build_post_index, parse_post_date, post_url};
pub use prose::{MarkdownOptions, render_markdown};
pub use render::{RenderOptions, RenderReport, render_tokens};
pub use tokenizer::{tokenize, tokenize_from};
