//! Payload codec: descriptor list ⇄ attribute-safe string.
//!
//! The payload is the JSON text of the descriptor list, percent-encoded so
//! that only ASCII alphanumerics, `-_.~` and `%XX` escapes remain. Browsers
//! decode it with `JSON.parse(decodeURIComponent(payload))`.

use crate::descriptor::CodeBlockDescriptor;
use crate::error::{PayloadError, TransformError};

/// Encoding of an empty descriptor list.
pub const EMPTY_PAYLOAD: &str = "%5B%5D";

/// Encode a descriptor list for embedding in an attribute.
pub fn encode_payload(descriptors: &[CodeBlockDescriptor]) -> Result<String, TransformError> {
    let json = serde_json::to_string(descriptors)?;
    Ok(urlencoding::encode(&json).into_owned())
}

/// Decode a payload attribute back into the descriptor list.
pub fn decode_payload(payload: &str) -> Result<Vec<CodeBlockDescriptor>, PayloadError> {
    let json = urlencoding::decode(payload)?;
    Ok(serde_json::from_str(&json)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<CodeBlockDescriptor> {
        let mut first = CodeBlockDescriptor::new("index.ts", "ts", "const a = \"<b>\" & 'c';\n");
        first.line_numbers = true;
        first.line_start = 10;
        first.highlight_lines = Some(vec![1, 3]);
        first.diff_add_lines = Some(Vec::new());

        let mut second = CodeBlockDescriptor::new("code", "", "多言語 → ✓\ttab");
        second.error_lines = Some(vec![2]);
        vec![first, second]
    }

    #[test]
    fn round_trips_descriptor_lists() {
        let descriptors = sample();
        let payload = encode_payload(&descriptors).unwrap();
        assert_eq!(decode_payload(&payload).unwrap(), descriptors);
    }

    fn with_code(code: &str) -> CodeBlockDescriptor {
        CodeBlockDescriptor::new("a.txt", "txt", code)
    }

    fn every_line_set() -> CodeBlockDescriptor {
        let mut descriptor = CodeBlockDescriptor::new("all.ts", "ts", "a\nb\nc");
        descriptor.line_numbers = true;
        descriptor.line_start = 3;
        descriptor.highlight_lines = Some(vec![1]);
        descriptor.focused_lines = Some(vec![2]);
        descriptor.diff_add_lines = Some(vec![3]);
        descriptor.diff_reduce_lines = Some(vec![1, 2]);
        descriptor.warning_lines = Some(vec![2, 3]);
        descriptor.error_lines = Some(Vec::new());
        descriptor
    }

    #[test]
    fn round_trips_awkward_content() {
        let cases: Vec<(&str, Vec<CodeBlockDescriptor>)> = vec![
            ("percent sign", vec![with_code("100% done")]),
            ("plus sign", vec![with_code("a + b")]),
            ("literal escape", vec![with_code("%5B%5D and %25")]),
            ("lone carriage return", vec![with_code("one\rtwo\r")]),
            ("crlf", vec![with_code("one\r\ntwo")]),
            ("quotes and backslashes", vec![with_code(r#"say "\n" \\ '"#)]),
            ("empty code", vec![with_code("")]),
            ("every line set", vec![every_line_set()]),
            ("several", vec![with_code("+%"), every_line_set(), with_code("z")]),
        ];

        for (label, descriptors) in cases {
            let payload = encode_payload(&descriptors).unwrap();
            assert!(!payload.contains(['+', '"', ' ']), "{label}: {payload}");
            assert_eq!(decode_payload(&payload).unwrap(), descriptors, "{label}");
        }
    }

    #[test]
    fn empty_list_uses_the_empty_payload() {
        assert_eq!(encode_payload(&[]).unwrap(), EMPTY_PAYLOAD);
        assert!(decode_payload(EMPTY_PAYLOAD).unwrap().is_empty());
    }

    #[test]
    fn payload_is_attribute_safe() {
        let payload = encode_payload(&sample()).unwrap();
        assert!(
            payload
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b'~' | b'%'))
        );
    }

    #[test]
    fn keeps_present_but_empty_sets() {
        let payload = encode_payload(&sample()).unwrap();
        let decoded = decode_payload(&payload).unwrap();
        assert_eq!(decoded[0].diff_add_lines, Some(Vec::new()));
        assert_eq!(decoded[0].focused_lines, None);
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            decode_payload("not-json"),
            Err(PayloadError::Json(_))
        ));
        assert!(matches!(decode_payload("%FF%FE"), Err(PayloadError::Percent(_))));
    }
}
