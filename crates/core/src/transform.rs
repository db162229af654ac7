//! The `:::magic` container transform.
//!
//! Called by the host renderer when it reaches a container marker. On the
//! opening marker it collects every fence up to the matching closer into
//! [`CodeBlockDescriptor`]s, suppresses those fences in place, and returns
//! the opening placeholder tag carrying the encoded list:
//!
//! ````text
//! :::magic                       <MagicCodeGroup data-code-files="%5B%7B...">
//! ```ts                    =>
//! let a = 1                      (fence suppressed)
//! ```
//! :::                            </MagicCodeGroup>
//! ````
//!
//! Prose between the markers is untouched and renders inside the
//! placeholder. The transform keeps no state between calls.

use crate::descriptor::CodeBlockDescriptor;
use crate::error::TransformError;
use crate::options::MagicOptions;
use crate::payload::{EMPTY_PAYLOAD, encode_payload};
use crate::token::Token;

/// Markup plus what went into it.
#[derive(Debug)]
pub struct TransformOutput {
    /// Fragment to emit in place of the marker.
    pub markup: String,
    /// Descriptors captured by an opening marker, in fence order.
    pub descriptors: Vec<CodeBlockDescriptor>,
    /// Failure that forced an empty payload.
    pub error: Option<TransformError>,
}

impl TransformOutput {
    fn markup(markup: String) -> Self {
        Self {
            markup,
            descriptors: Vec::new(),
            error: None,
        }
    }
}

/// Transform the container marker at `index`, returning its markup.
///
/// Failures are contained: a container without a closing marker, or one whose
/// payload cannot be encoded, yields a placeholder with an empty payload.
pub fn transform(tokens: &mut [Token], index: usize, options: &MagicOptions) -> String {
    transform_with_report(tokens, index, options).markup
}

/// Same as [`transform`], also returning the descriptors and any contained error.
pub fn transform_with_report(
    tokens: &mut [Token],
    index: usize,
    options: &MagicOptions,
) -> TransformOutput {
    let name = options.container_name.as_str();
    match tokens.get(index) {
        Some(token @ Token::ContainerOpen { .. }) if token.is_container(name) => {}
        Some(token @ Token::ContainerClose { .. }) if token.is_container(name) => {
            return TransformOutput::markup(options.closing_tag());
        }
        other => {
            log::debug!("token {index} is not a '{name}' container marker: {other:?}");
            return TransformOutput::markup(String::new());
        }
    }

    match collect_descriptors(tokens, index, options) {
        Ok(descriptors) => {
            log::debug!(
                "container at token {index} captured {} code block(s)",
                descriptors.len()
            );
            match encode_payload(&descriptors) {
                Ok(payload) => TransformOutput {
                    markup: options.opening_tag(&payload),
                    descriptors,
                    error: None,
                },
                Err(err) => empty_placeholder(options, err),
            }
        }
        Err(err) => empty_placeholder(options, err),
    }
}

fn empty_placeholder(options: &MagicOptions, err: TransformError) -> TransformOutput {
    log::warn!("{err}; rendering an empty code group");
    TransformOutput {
        markup: options.opening_tag(EMPTY_PAYLOAD),
        descriptors: Vec::new(),
        error: Some(err),
    }
}

/// Build descriptors for every fence inside the container and suppress them.
fn collect_descriptors(
    tokens: &mut [Token],
    open_index: usize,
    options: &MagicOptions,
) -> Result<Vec<CodeBlockDescriptor>, TransformError> {
    let close_index = find_closing_marker(tokens, open_index, &options.container_name)
        .ok_or(TransformError::MalformedContainer { open_index })?;

    let mut descriptors = Vec::new();
    for token in &mut tokens[open_index + 1..close_index] {
        if let Token::Fence { info, content, .. } = token {
            descriptors.push(CodeBlockDescriptor::from_fence(info, content, options));
            token.suppress();
        }
    }
    Ok(descriptors)
}

/// Index of the closer matching the opener at `open_index`.
///
/// Same-name containers nested inside are skipped over.
pub fn find_closing_marker(tokens: &[Token], open_index: usize, name: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (idx, token) in tokens.iter().enumerate().skip(open_index + 1) {
        if !token.is_container(name) {
            continue;
        }
        match token {
            Token::ContainerOpen { .. } => depth += 1,
            Token::ContainerClose { .. } if depth == 0 => return Some(idx),
            Token::ContainerClose { .. } => depth -= 1,
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::decode_payload;
    use crate::token::TokenKind;

    fn payload_of(markup: &str) -> Vec<CodeBlockDescriptor> {
        let start = markup.find("=\"").expect("attribute") + 2;
        let end = markup[start..].find('"').expect("closing quote") + start;
        decode_payload(&markup[start..end]).expect("payload decodes")
    }

    fn three_fences() -> Vec<Token> {
        vec![
            Token::markdown("Before"),
            Token::container_open("magic", ""),
            Token::fence("ts", "const a = 1\n"),
            Token::markdown("Between the blocks"),
            Token::fence("go [main.go]", "package main\n"),
            Token::fence("python:line-numbers=5", "print(1)\n"),
            Token::container_close("magic"),
            Token::fence("rust", "fn main() {}\n"),
        ]
    }

    #[test]
    fn collects_fences_in_order() {
        let mut tokens = three_fences();
        let markup = transform(&mut tokens, 1, &MagicOptions::default());

        let descriptors = payload_of(&markup);
        let languages: Vec<_> = descriptors.iter().map(|d| d.language.as_str()).collect();
        let names: Vec<_> = descriptors.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(languages, ["ts", "go", "python"]);
        assert_eq!(names, ["ts", "main.go", "code"]);
        assert!(descriptors[2].line_numbers);
        assert_eq!(descriptors[2].line_start, 5);
        assert!(!descriptors[0].line_numbers);
    }

    #[test]
    fn suppresses_consumed_fences_only() {
        let mut tokens = three_fences();
        transform(&mut tokens, 1, &MagicOptions::default());

        assert!(tokens[2].is_suppressed());
        assert!(tokens[4].is_suppressed());
        assert!(tokens[5].is_suppressed());
        assert_eq!(tokens[3], Token::markdown("Between the blocks"));
        assert_eq!(tokens[7].kind(), TokenKind::Fence);
    }

    #[test]
    fn closing_marker_returns_closing_tag() {
        let mut tokens = three_fences();
        assert_eq!(
            transform(&mut tokens, 6, &MagicOptions::default()),
            "</MagicCodeGroup>"
        );
    }

    #[test]
    fn unclosed_container_yields_empty_payload() {
        let mut tokens = vec![
            Token::container_open("magic", ""),
            Token::fence("ts", "let a = 1\n"),
        ];
        let output = transform_with_report(&mut tokens, 0, &MagicOptions::default());

        assert_eq!(
            output.markup,
            r#"<MagicCodeGroup data-code-files="%5B%5D">"#
        );
        assert!(matches!(
            output.error,
            Some(TransformError::MalformedContainer { open_index: 0 })
        ));
        assert_eq!(tokens[1].kind(), TokenKind::Fence);
    }

    #[test]
    fn prose_only_container_has_empty_list() {
        let mut tokens = vec![
            Token::container_open("magic", ""),
            Token::markdown("Nothing to see"),
            Token::container_close("magic"),
        ];
        let markup = transform(&mut tokens, 0, &MagicOptions::default());
        assert!(payload_of(&markup).is_empty());
        assert_eq!(tokens[1], Token::markdown("Nothing to see"));
    }

    #[test]
    fn other_containers_are_ignored() {
        let mut tokens = vec![
            Token::container_open("tip", ""),
            Token::fence("ts", "x\n"),
            Token::container_close("tip"),
        ];
        assert_eq!(transform(&mut tokens, 0, &MagicOptions::default()), "");
        assert_eq!(tokens[1].kind(), TokenKind::Fence);
    }

    #[test]
    fn fences_inside_nested_containers_are_captured() {
        let mut tokens = vec![
            Token::container_open("magic", ""),
            Token::container_open("details", ""),
            Token::fence("ts", "a\n"),
            Token::container_close("details"),
            Token::container_open("magic", ""),
            Token::fence("js", "b\n"),
            Token::container_close("magic"),
            Token::container_close("magic"),
            Token::fence("css", "c\n"),
        ];
        assert_eq!(find_closing_marker(&tokens, 0, "magic"), Some(7));

        let output = transform_with_report(&mut tokens, 0, &MagicOptions::default());
        let languages: Vec<_> = output.descriptors.iter().map(|d| d.language.as_str()).collect();
        assert_eq!(languages, ["ts", "js"]);
        assert_eq!(tokens[8].kind(), TokenKind::Fence);

        let inner = transform(&mut tokens, 4, &MagicOptions::default());
        assert!(payload_of(&inner).is_empty());
    }

    #[test]
    fn honours_custom_container_name() {
        let options = MagicOptions {
            container_name: "code-group".to_string(),
            ..Default::default()
        };
        let mut tokens = vec![
            Token::container_open("code-group", ""),
            Token::fence("ts [a.ts]", "a\n"),
            Token::container_close("code-group"),
        ];
        let output = transform_with_report(&mut tokens, 0, &options);
        assert_eq!(output.descriptors.len(), 1);
        assert_eq!(output.descriptors[0].name, "a.ts");
    }

    #[test]
    fn container_name_matches_case_insensitively() {
        let options = MagicOptions {
            container_name: "CodeGroup".to_string(),
            ..Default::default()
        };
        let mut tokens = vec![
            Token::container_open("codegroup", ""),
            Token::fence("ts", "x\n"),
            Token::container_close("codegroup"),
        ];
        let output = transform_with_report(&mut tokens, 0, &options);
        assert_eq!(output.descriptors.len(), 1);
        assert!(tokens[1].is_suppressed());
        assert_eq!(transform(&mut tokens, 2, &options), "</MagicCodeGroup>");
    }

    #[test]
    fn out_of_range_index_is_harmless() {
        let mut tokens = vec![Token::markdown("hi")];
        assert_eq!(transform(&mut tokens, 5, &MagicOptions::default()), "");
    }
}
