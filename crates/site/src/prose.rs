//! Prose rendering through markdown-rs.

use magicmd_core::{MagicError, SourceLocation};
use markdown::message::{Message, Place};
use serde::{Deserialize, Serialize};

/// Constructs enabled when rendering prose chunks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MarkdownOptions {
    /// Enable GitHub Flavored Markdown constructs.
    pub gfm: bool,
    /// Pass raw HTML through instead of escaping it.
    pub raw_html: bool,
    /// Enable math constructs ($inline$ and $$block$$).
    pub math: bool,
}

impl MarkdownOptions {
    /// Blog defaults: GFM and raw HTML on, math off.
    pub const fn blog() -> Self {
        Self {
            gfm: true,
            raw_html: true,
            math: false,
        }
    }

    /// Convert to markdown-rs `Options`.
    pub fn to_markdown(self) -> markdown::Options {
        let mut constructs = markdown::Constructs {
            html_flow: self.raw_html,
            html_text: self.raw_html,
            ..Default::default()
        };

        if self.gfm {
            constructs.gfm_autolink_literal = true;
            constructs.gfm_footnote_definition = true;
            constructs.gfm_label_start_footnote = true;
            constructs.gfm_strikethrough = true;
            constructs.gfm_table = true;
            constructs.gfm_task_list_item = true;
        }

        if self.math {
            constructs.math_flow = true;
            constructs.math_text = true;
        }

        markdown::Options {
            parse: markdown::ParseOptions {
                constructs,
                math_text_single_dollar: self.math,
                ..markdown::ParseOptions::default()
            },
            compile: markdown::CompileOptions {
                allow_dangerous_html: self.raw_html,
                gfm_tagfilter: self.gfm,
                ..markdown::CompileOptions::default()
            },
        }
    }
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self::blog()
    }
}

/// Render one prose chunk to HTML, without trailing line endings.
pub fn render_markdown(source: &str, options: MarkdownOptions) -> Result<String, MagicError> {
    markdown::to_html_with_options(source, &options.to_markdown())
        .map(|html| html.trim_end().to_string())
        .map_err(|err| {
            let location = message_location(&err);
            MagicError::markdown(err.to_string(), location.line, location.column)
        })
}

fn message_location(message: &Message) -> SourceLocation {
    match &message.place {
        Some(place) => match place.as_ref() {
            Place::Point(point) => SourceLocation::new(point.line, point.column),
            Place::Position(position) => {
                SourceLocation::new(position.start.line, position.start.column)
            }
        },
        None => SourceLocation::new(1, 1),
    }
}
