//! Markdown code fence stripping for model replies

use once_cell::sync::Lazy;
use regex::Regex;

/// Opening fence with an optional language tag, up to the end of its line
static OPEN_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^```[A-Za-z0-9_+.\-]*[ \t]*(?:\r?\n)?").unwrap());

/// Closing fence, optionally preceded by a newline
static CLOSE_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:\r?\n)?[ \t]*```$").unwrap());

/// Remove a surrounding ``` fence (with or without a language tag).
///
/// Text without fences is returned trimmed and otherwise unchanged.
pub fn strip_code_fence(text: &str) -> &str {
    let mut body = text.trim();

    if let Some(m) = OPEN_FENCE.find(body) {
        body = &body[m.end()..];
    }
    if let Some(m) = CLOSE_FENCE.find(body) {
        body = &body[..m.start()];
    }

    body.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_tag() {
        assert_eq!(strip_code_fence("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
    }

    #[test]
    fn test_no_tag() {
        assert_eq!(strip_code_fence("```\n[1, 2]\n```"), "[1, 2]");
    }

    #[test]
    fn test_other_tag_and_whitespace() {
        assert_eq!(
            strip_code_fence("\n  ```JSON5  \r\n{\"a\": 1}\r\n```\n\n"),
            "{\"a\": 1}"
        );
    }

    #[test]
    fn test_single_line_fence() {
        assert_eq!(strip_code_fence("```json {\"a\": 1}```"), "{\"a\": 1}");
    }

    #[test]
    fn test_unfenced_passthrough() {
        assert_eq!(strip_code_fence("  {\"a\": 1} "), "{\"a\": 1}");
        assert_eq!(strip_code_fence(""), "");
    }

    #[test]
    fn test_only_trailing_fence() {
        assert_eq!(strip_code_fence("{\"a\": 1}\n```"), "{\"a\": 1}");
    }

    #[test]
    fn test_stripped_body_parses() {
        let inner = serde_json::json!({ "dominantEmotion": "sad", "colors": ["#000000"] });
        for wrapper in ["```json\n{}\n```", "```\n{}\n```", "```json{}```", "{}"] {
            let reply = wrapper.replace("{}", &inner.to_string());
            let parsed: serde_json::Value = serde_json::from_str(strip_code_fence(&reply)).unwrap();
            assert_eq!(parsed, inner);
        }
    }
}
