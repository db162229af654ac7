//! Block token stream shared by the tokenizer, the container transform, and
//! the renderer.

/// Discriminator for [`Token`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Opening marker of a `:::` container.
    ContainerOpen,
    /// Closing marker of a `:::` container.
    ContainerClose,
    /// Fenced code block.
    Fence,
    /// Ordinary markdown source rendered by the prose renderer.
    Markdown,
    /// Pre-rendered fragment emitted verbatim.
    Html,
}

/// A single block-level token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// `:::name info` line.
    ContainerOpen {
        /// Lowercased container name.
        name: String,
        /// Text after the name, trimmed.
        info: String,
        /// The colon run that opened the container.
        markup: String,
    },
    /// `:::` line closing the innermost open container.
    ContainerClose {
        /// Name of the container being closed.
        name: String,
        /// The colon run that closed the container.
        markup: String,
    },
    /// Fenced code block.
    Fence {
        /// Text after the opening delimiter on the same line.
        info: String,
        /// Raw body, every line terminated by `\n`.
        content: String,
        /// The opening delimiter (e.g. "```" or "~~~~").
        markup: String,
    },
    /// Markdown source between structural tokens.
    Markdown {
        /// Source text, lines joined with `\n`.
        source: String,
    },
    /// Inert fragment; empty content renders nothing.
    Html {
        /// Markup emitted as-is.
        content: String,
    },
}

impl Token {
    /// Build a container opening marker.
    pub fn container_open(name: impl Into<String>, info: impl Into<String>) -> Self {
        Token::ContainerOpen {
            name: name.into(),
            info: info.into(),
            markup: ":::".to_string(),
        }
    }

    /// Build a container closing marker.
    pub fn container_close(name: impl Into<String>) -> Self {
        Token::ContainerClose {
            name: name.into(),
            markup: ":::".to_string(),
        }
    }

    /// Build a backtick fence.
    pub fn fence(info: impl Into<String>, content: impl Into<String>) -> Self {
        Token::Fence {
            info: info.into(),
            content: content.into(),
            markup: "```".to_string(),
        }
    }

    /// Build a markdown prose chunk.
    pub fn markdown(source: impl Into<String>) -> Self {
        Token::Markdown {
            source: source.into(),
        }
    }

    /// Type discriminator.
    pub fn kind(&self) -> TokenKind {
        match self {
            Token::ContainerOpen { .. } => TokenKind::ContainerOpen,
            Token::ContainerClose { .. } => TokenKind::ContainerClose,
            Token::Fence { .. } => TokenKind::Fence,
            Token::Markdown { .. } => TokenKind::Markdown,
            Token::Html { .. } => TokenKind::Html,
        }
    }

    /// Nesting delta: `1` for openers, `-1` for closers, `0` otherwise.
    pub fn nesting(&self) -> i8 {
        match self {
            Token::ContainerOpen { .. } => 1,
            Token::ContainerClose { .. } => -1,
            _ => 0,
        }
    }

    /// Container name for marker tokens.
    pub fn container_name(&self) -> Option<&str> {
        match self {
            Token::ContainerOpen { name, .. } | Token::ContainerClose { name, .. } => Some(name),
            _ => None,
        }
    }

    /// True when this token opens or closes the named container.
    /// Names compare ASCII case-insensitively, since openers are lowercased.
    pub fn is_container(&self, name: &str) -> bool {
        self.container_name()
            .is_some_and(|own| own.eq_ignore_ascii_case(name))
    }

    /// Retype this token into an empty inert fragment so the renderer emits
    /// nothing for it.
    pub fn suppress(&mut self) {
        *self = Token::Html {
            content: String::new(),
        };
    }

    /// True for inert fragments with no content.
    pub fn is_suppressed(&self) -> bool {
        matches!(self, Token::Html { content } if content.is_empty())
    }
}
