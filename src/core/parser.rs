//! Parsing of LLM responses

use regex::Regex;
use serde_json::Value;
use tracing::debug;

/// Extract the first markdown code block from the text, without the language
/// specifier. Models often fence a commit message even when asked not to;
/// when no block is found the text is returned as-is.
pub fn extract_markdown_block(text: &str) -> String {
    let pattern = Regex::new(r"(?s)```(?:\w+)?\s*\n(.*?)\n```").unwrap();
    match pattern.captures(text) {
        Some(caps) => {
            debug!("Extracted fenced block from model response");
            caps.get(1).map(|m| m.as_str()).unwrap_or(text).to_string()
        }
        None => text.to_string(),
    }
}

/// Strip issue-closing boilerplate the model tends to append to commit
/// messages despite having no issue number to close.
pub fn scrub_issue_references(message: &str) -> String {
    message
        .replace("Closes #IssueNumber", "")
        .replace("No specific issue to close", "")
        .replace("No specific issue mentioned.", "")
        .trim()
        .to_string()
}

/// Pull the test-case descriptions out of a JSON-mode proposal response:
/// `{"test_cases": [{"description": "..."}]}`. Entries without a description
/// are skipped.
pub fn parse_test_case_descriptions(response: &Value) -> Vec<String> {
    response
        .get("test_cases")
        .and_then(Value::as_array)
        .map(|cases| {
            cases
                .iter()
                .filter_map(|case| case.get("description"))
                .filter_map(Value::as_str)
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

/// Pull a list of strings out of a JSON-mode response under the given key,
/// e.g. `{"files": [...]}` or `{"key_symbols": [...]}`.
pub fn parse_string_list(response: &Value, key: &str) -> Vec<String> {
    response
        .get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_markdown_block_with_language() {
        let text = "Here is your message:\n```text\nfix: handle empty diff\n```\nDone.";
        assert_eq!(extract_markdown_block(text), "fix: handle empty diff");
    }

    #[test]
    fn test_extract_markdown_block_without_language() {
        let text = "```\nfeat: add parser\n\nBody line.\n```";
        assert_eq!(extract_markdown_block(text), "feat: add parser\n\nBody line.");
    }

    #[test]
    fn test_extract_markdown_block_no_fence_returns_input() {
        let text = "fix: plain message, no fences";
        assert_eq!(extract_markdown_block(text), text);
    }

    #[test]
    fn test_extract_markdown_block_takes_first() {
        let text = "```\nfirst\n```\n```\nsecond\n```";
        assert_eq!(extract_markdown_block(text), "first");
    }

    #[test]
    fn test_scrub_issue_references() {
        let message = "fix: resolve crash\n\nCloses #IssueNumber";
        assert_eq!(scrub_issue_references(message), "fix: resolve crash");

        let untouched = "fix: resolve crash\n\nCloses #42";
        assert_eq!(scrub_issue_references(untouched), untouched);
    }

    #[test]
    fn test_parse_test_case_descriptions() {
        let response = json!({
            "test_cases": [
                {"description": "returns zero for empty input"},
                {"note": "missing description is skipped"},
                {"description": "propagates IO errors"},
            ]
        });
        assert_eq!(
            parse_test_case_descriptions(&response),
            vec!["returns zero for empty input", "propagates IO errors"]
        );
    }

    #[test]
    fn test_parse_test_case_descriptions_missing_key() {
        assert!(parse_test_case_descriptions(&json!({})).is_empty());
        assert!(parse_test_case_descriptions(&json!({"test_cases": "oops"})).is_empty());
    }

    #[test]
    fn test_parse_string_list() {
        let response = json!({"files": ["tests/a.rs", 42, "tests/b.rs"]});
        assert_eq!(
            parse_string_list(&response, "files"),
            vec!["tests/a.rs", "tests/b.rs"]
        );
        assert!(parse_string_list(&response, "key_symbols").is_empty());
    }
}
