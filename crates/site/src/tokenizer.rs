//! Line-based block tokenizer.
//!
//! Splits a markdown body into the flat token stream the container transform
//! works on. Only fences and `:::` containers are structural; every other
//! line is collected into [`Token::Markdown`] chunks for markdown-rs.

use magicmd_core::{
    FenceOpener, ParseDiagnostics, ParseWarning, SourceLocation, Token, container_closer_len,
    detect_fence_opener, is_fence_closer, parse_container_open, strip_fence_indent,
};

struct OpenFence {
    opener: FenceOpener,
    content: String,
    line: usize,
}

struct OpenContainer {
    name: String,
    colons: usize,
    line: usize,
}

struct Tokenizer<'d> {
    tokens: Vec<Token>,
    prose: String,
    fence: Option<OpenFence>,
    containers: Vec<OpenContainer>,
    diagnostics: &'d mut ParseDiagnostics,
}

/// Tokenize a markdown body whose first line is line 1.
pub fn tokenize(input: &str, diagnostics: &mut ParseDiagnostics) -> Vec<Token> {
    tokenize_from(input, 1, diagnostics)
}

/// Tokenize a markdown body whose first line is `first_line` in the source
/// file, so diagnostics point past any frontmatter.
pub fn tokenize_from(
    input: &str,
    first_line: usize,
    diagnostics: &mut ParseDiagnostics,
) -> Vec<Token> {
    let mut tokenizer = Tokenizer {
        tokens: Vec::new(),
        prose: String::new(),
        fence: None,
        containers: Vec::new(),
        diagnostics,
    };
    for (idx, line) in input.lines().enumerate() {
        tokenizer.line(line, first_line + idx);
    }
    tokenizer.finish()
}

impl Tokenizer<'_> {
    fn line(&mut self, line: &str, line_no: usize) {
        if let Some(fence) = self.fence.as_mut() {
            if is_fence_closer(line, &fence.opener) {
                self.close_fence();
            } else {
                fence
                    .content
                    .push_str(strip_fence_indent(line, fence.opener.indent));
                fence.content.push('\n');
            }
            return;
        }

        if let Some(opener) = detect_fence_opener(line) {
            self.flush_prose();
            self.fence = Some(OpenFence {
                opener,
                content: String::new(),
                line: line_no,
            });
            return;
        }

        if let Some(opening) = parse_container_open(line) {
            self.flush_prose();
            self.tokens.push(Token::ContainerOpen {
                name: opening.name.clone(),
                info: opening.info.clone(),
                markup: opening.markup(),
            });
            self.containers.push(OpenContainer {
                name: opening.name,
                colons: opening.colons,
                line: line_no,
            });
            return;
        }

        if let Some(colons) = container_closer_len(line) {
            match self.containers.last() {
                Some(open) if colons >= open.colons => {
                    self.flush_prose();
                    if let Some(open) = self.containers.pop() {
                        self.tokens.push(Token::ContainerClose {
                            name: open.name,
                            markup: ":".repeat(colons),
                        });
                    }
                    return;
                }
                _ => self
                    .diagnostics
                    .add_warning_at("container closer without a matching opener", line_no),
            }
        }

        self.prose.push_str(line);
        self.prose.push('\n');
    }

    fn close_fence(&mut self) {
        if let Some(fence) = self.fence.take() {
            self.tokens.push(Token::Fence {
                info: fence.opener.info.clone(),
                content: fence.content,
                markup: fence.opener.markup(),
            });
        }
    }

    fn flush_prose(&mut self) {
        if !self.prose.trim().is_empty() {
            self.tokens.push(Token::Markdown {
                source: std::mem::take(&mut self.prose),
            });
        }
        self.prose.clear();
    }

    fn finish(mut self) -> Vec<Token> {
        if let Some(fence) = &self.fence {
            // CommonMark: an unclosed fence runs to the end of the document
            self.diagnostics.add_warning(ParseWarning::UnclosedCodeFence {
                location: SourceLocation::line_start(fence.line),
                marker: fence.opener.marker,
            });
            self.close_fence();
        }
        self.flush_prose();

        for open in self.containers.drain(..) {
            log::debug!("container '{}' at line {} left open", open.name, open.line);
            self.diagnostics.add_warning(ParseWarning::UnclosedContainer {
                location: SourceLocation::line_start(open.line),
                name: open.name,
            });
        }
        self.tokens
    }
}
