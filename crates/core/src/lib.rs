#![deny(missing_docs)]
//! magicmd core: the `:::magic` container transform and the pieces it is
//! built from.

/// Fenced code block recognition.
pub mod code_fence;
/// `:::` container marker lines.
pub mod container;
/// Code block descriptors.
pub mod descriptor;
/// Core error and diagnostic types.
pub mod error;
/// YAML frontmatter extraction.
pub mod frontmatter;
/// Fence info-string grammar.
pub mod info;
/// Transform options.
pub mod options;
/// Descriptor payload codec.
pub mod payload;
/// Block token stream.
pub mod token;
/// The container transform.
pub mod transform;

pub use code_fence::{FenceOpener, detect_fence_opener, is_fence_closer, strip_fence_indent};
pub use container::{ContainerOpening, container_closer_len, parse_container_open};
pub use descriptor::{CodeBlockDescriptor, Notations, extract_notations};
pub use error::{
    ConfigError, MagicError, ParseDiagnostics, ParseWarning, PayloadError,
    RecoverableError, SourceLocation, TransformError,
};
pub use frontmatter::{Frontmatter, FrontmatterError, extract_frontmatter};
pub use info::{FenceInfo, MAX_RANGE_LINE, parse_line_ranges};
pub use options::{CodeTrim, MagicOptions};
pub use payload::{EMPTY_PAYLOAD, decode_payload, encode_payload};
pub use token::{Token, TokenKind};
pub use transform::{TransformOutput, find_closing_marker, transform, transform_with_report};
