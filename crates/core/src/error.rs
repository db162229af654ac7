use thiserror::Error;

use crate::frontmatter::FrontmatterError;

/// Source location information for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed)
    pub column: usize,
}

impl SourceLocation {
    /// Create a new source location
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Location of the first column of a 1-indexed line.
    pub fn line_start(line: usize) -> Self {
        Self::new(line, 1)
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Failures contained to a single container instance.
///
/// None of these abort a document: the transform logs them and emits a
/// placeholder carrying an empty payload instead.
#[derive(Debug, Error)]
pub enum TransformError {
    /// The opening marker has no matching closing marker.
    #[error("container opened at token {open_index} is never closed")]
    MalformedContainer {
        /// Index of the opening marker in the token stream.
        open_index: usize,
    },
    /// The descriptor list could not be serialized.
    #[error("payload encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Errors raised while decoding a payload attribute.
#[derive(Debug, Error)]
pub enum PayloadError {
    /// Percent-decoding produced invalid UTF-8.
    #[error("payload is not valid percent-encoded UTF-8: {0}")]
    Percent(#[from] std::string::FromUtf8Error),
    /// The decoded text is not a descriptor list.
    #[error("payload is not a valid descriptor list: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised while loading options.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Options JSON failed to parse.
    #[error("invalid options: {0}")]
    Json(#[from] serde_json::Error),
}

/// Document-level errors. Only these stop a page from rendering.
#[derive(Debug, Error)]
pub enum MagicError {
    /// Frontmatter block could not be extracted.
    #[error("Frontmatter error: {0}")]
    Frontmatter(#[from] FrontmatterError),
    /// Rendering options were rejected.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    /// markdown-rs rejected a prose chunk.
    #[error("Markdown error at {location}: {message}")]
    Markdown {
        /// Error message
        message: String,
        /// Source location
        location: SourceLocation,
    },
}

impl MagicError {
    /// Create a markdown error with location
    pub fn markdown(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self::Markdown {
            message: message.into(),
            location: SourceLocation::new(line, column),
        }
    }
}

/// Non-fatal warnings that don't prevent rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseWarning {
    /// Code fence opened but never closed
    UnclosedCodeFence {
        /// Source location where the fence started
        location: SourceLocation,
        /// Fence marker character (backtick or tilde)
        marker: char,
    },
    /// Container opened but never closed
    UnclosedContainer {
        /// Source location of the opening marker
        location: SourceLocation,
        /// Container name
        name: String,
    },
    /// Markup that looks structural but was treated as prose
    SuspiciousMarkup {
        /// Source location where the suspicious markup was found
        location: SourceLocation,
        /// Warning message
        message: String,
    },
}

impl ParseWarning {
    /// Get the location of this warning
    pub fn location(&self) -> &SourceLocation {
        match self {
            ParseWarning::UnclosedCodeFence { location, .. }
            | ParseWarning::UnclosedContainer { location, .. }
            | ParseWarning::SuspiciousMarkup { location, .. } => location,
        }
    }
}

impl std::fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseWarning::UnclosedCodeFence { location, marker } => {
                write!(f, "Unclosed code fence ({}) at {}", marker, location)
            }
            ParseWarning::UnclosedContainer { location, name } => {
                write!(f, "Unclosed container '{}' at {}", name, location)
            }
            ParseWarning::SuspiciousMarkup { location, message } => {
                write!(f, "{}: {}", location, message)
            }
        }
    }
}

/// Recoverable error information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoverableError {
    /// Error message
    pub message: String,
    /// Source location, when the failure maps back to the input
    pub location: Option<SourceLocation>,
}

impl RecoverableError {
    /// Create a new recoverable error without a location
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            location: None,
        }
    }

    /// Attach a source location
    pub fn at(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }
}

impl std::fmt::Display for RecoverableError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.location {
            Some(location) => write!(f, "error at {}: {}", location, self.message),
            None => write!(f, "error: {}", self.message),
        }
    }
}

/// Collection of parse diagnostics (warnings and recoverable errors)
#[derive(Debug, Clone, Default)]
pub struct ParseDiagnostics {
    /// List of non-fatal warnings
    pub warnings: Vec<ParseWarning>,
    /// List of recoverable errors
    pub errors: Vec<RecoverableError>,
}

impl ParseDiagnostics {
    /// Create a new empty diagnostics collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a warning to the diagnostics collection
    pub fn add_warning(&mut self, warning: ParseWarning) {
        self.warnings.push(warning);
    }

    /// Add a recoverable error to the diagnostics collection
    pub fn add_error(&mut self, error: RecoverableError) {
        self.errors.push(error);
    }

    /// Add a suspicious-markup warning at a line
    pub fn add_warning_at(&mut self, message: impl Into<String>, line: usize) {
        self.warnings.push(ParseWarning::SuspiciousMarkup {
            location: SourceLocation::line_start(line),
            message: message.into(),
        });
    }

    /// Order warnings by source position. Warnings raised at end of input
    /// (unclosed fences and containers) otherwise trail the rest.
    pub fn sort_warnings(&mut self) {
        self.warnings
            .sort_by_key(|warning| (warning.location().line, warning.location().column));
    }

    /// Check if there are any warnings
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Check if there are any errors
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Get total count of all diagnostics
    pub fn count(&self) -> usize {
        self.warnings.len() + self.errors.len()
    }

    /// Flatten every diagnostic into display strings.
    pub fn messages(&self) -> Vec<String> {
        self.warnings
            .iter()
            .map(ToString::to_string)
            .chain(self.errors.iter().map(ToString::to_string))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostics_count_both_kinds() {
        let mut diagnostics = ParseDiagnostics::new();
        diagnostics.add_warning_at("stray container closer", 4);
        diagnostics.add_error(RecoverableError::error("boom").at(SourceLocation::new(2, 3)));

        assert!(diagnostics.has_warnings());
        assert!(diagnostics.has_errors());
        assert_eq!(diagnostics.count(), 2);
        assert_eq!(
            diagnostics.messages(),
            vec![
                "4:1: stray container closer".to_string(),
                "error at 2:3: boom".to_string()
            ]
        );
    }

    #[test]
    fn warnings_sort_by_location() {
        let mut diagnostics = ParseDiagnostics::new();
        diagnostics.add_warning_at("later", 9);
        diagnostics.add_warning(ParseWarning::UnclosedContainer {
            location: SourceLocation::line_start(2),
            name: "magic".to_string(),
        });
        diagnostics.add_warning_at("first", 1);
        diagnostics.sort_warnings();

        let lines: Vec<_> = diagnostics.warnings.iter().map(|w| w.location().line).collect();
        assert_eq!(lines, [1, 2, 9]);
    }

    #[test]
    fn malformed_container_message_names_the_index() {
        let err = TransformError::MalformedContainer { open_index: 7 };
        assert_eq!(err.to_string(), "container opened at token 7 is never closed");
    }
}
