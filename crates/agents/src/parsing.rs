//! Decoding of structured model replies.
//!
//! Models wrap JSON in prose or markdown fences, and the prose itself may
//! contain brackets. Every balanced `{...}` or `[...]` span is a candidate;
//! the first one that deserialises as the target type wins.

use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("No JSON found in reply: {preview}")]
    NoJson { preview: String },

    #[error("Reply JSON does not match the expected shape: {0}")]
    Shape(#[from] serde_json::Error),
}

/// Decode the first JSON span in `reply` that fits `T`.
///
/// When valid JSON is present but none of it fits, the error for the first
/// such span is returned.
pub fn decode_structured<T: DeserializeOwned>(reply: &str) -> Result<T, ParseError> {
    let mut first_error = None;
    for candidate in json_candidates(reply) {
        match serde_json::from_str::<T>(candidate) {
            Ok(value) => return Ok(value),
            Err(e) if e.is_syntax() || e.is_eof() => {}
            Err(e) => {
                first_error.get_or_insert(e);
            }
        }
    }

    Err(match first_error {
        Some(e) => ParseError::Shape(e),
        None => ParseError::NoJson {
            preview: reply.chars().take(200).collect(),
        },
    })
}

/// First balanced span in `s` that is valid JSON.
pub fn extract_json(s: &str) -> Option<&str> {
    json_candidates(s).find(|c| serde_json::from_str::<serde_json::Value>(c).is_ok())
}

/// Balanced bracket spans, in order of their opening position.
fn json_candidates(s: &str) -> impl Iterator<Item = &str> {
    s.char_indices()
        .filter(|&(_, c)| c == '{' || c == '[')
        .filter_map(move |(start, _)| balanced_span(s, start))
}

/// The span opened at `start` and closed by its matching bracket.
///
/// Brackets inside string literals are ignored.
fn balanced_span(s: &str, start: usize) -> Option<&str> {
    let mut stack: Vec<char> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in s[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '{' => stack.push('}'),
            '[' => stack.push(']'),
            '}' | ']' => {
                if stack.pop() != Some(c) {
                    return None;
                }
                if stack.is_empty() {
                    return Some(&s[start..start + i + 1]);
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Reply {
        content: String,
    }

    #[test]
    fn extract_plain_object() {
        let input = r#"{"content":"hi"}"#;
        assert_eq!(extract_json(input), Some(input));
    }

    #[test]
    fn extract_from_prose_and_fences() {
        let input = "Sure! Here you go:\n```json\n{\"content\": \"hi\"}\n```\nEnjoy.";
        assert_eq!(extract_json(input), Some("{\"content\": \"hi\"}"));
    }

    #[test]
    fn extract_top_level_array() {
        let input = r#"Ideas: [{"a":1},{"a":2}] done"#;
        assert_eq!(extract_json(input), Some(r#"[{"a":1},{"a":2}]"#));
    }

    #[test]
    fn braces_inside_strings_are_ignored() {
        let input = r#"{"content":"use } and { freely \" ok"} trailing }"#;
        assert_eq!(
            extract_json(input),
            Some(r#"{"content":"use } and { freely \" ok"}"#)
        );
    }

    #[test]
    fn unbalanced_input_has_no_json() {
        assert_eq!(extract_json(r#"{"content": "cut off"#), None);
        assert_eq!(extract_json("{ ]"), None);
        assert_eq!(extract_json("no json here"), None);
    }

    #[test]
    fn bracketed_prose_before_payload_is_skipped() {
        let reply = r#"Use {curly} style. {"content":"real"}"#;
        assert_eq!(extract_json(reply), Some(r#"{"content":"real"}"#));
        let decoded: Reply = decode_structured(reply).unwrap();
        assert_eq!(decoded.content, "real");
    }

    #[test]
    fn valid_json_of_the_wrong_shape_is_skipped() {
        let reply = r#"Here are [3] ideas: [{"content":"a"},{"content":"b"}]"#;
        assert_eq!(extract_json(reply), Some("[3]"));

        let decoded: Vec<Reply> = decode_structured(reply).unwrap();
        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded[1].content, "b");
    }

    #[test]
    fn decode_reports_shape_errors() {
        let ok: Reply = decode_structured(r#"text {"content":"x"}"#).unwrap();
        assert_eq!(ok.content, "x");

        assert!(matches!(
            decode_structured::<Reply>(r#"{"other": 1}"#),
            Err(ParseError::Shape(_))
        ));
        assert!(matches!(
            decode_structured::<Reply>("plain words"),
            Err(ParseError::NoJson { .. })
        ));
    }
}
