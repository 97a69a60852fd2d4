//! Comment stripping and line normalization.

use once_cell::sync::Lazy;
use regex::Regex;

// Greedy on purpose: two comments on one line collapse into one span.
static SAME_LINE_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"/\*.*\*/").unwrap());

/// Strip C block comments and drop blank lines.
///
/// Returned lines are trimmed and never empty. Block comments that span
/// several lines are tracked with a persistent flag; a line that lies
/// entirely inside such a comment disappears.
pub fn clean_lines<S: AsRef<str>>(raw: &[S]) -> Vec<String> {
    let mut cleaned = Vec::with_capacity(raw.len());
    let mut in_comment = false;

    for line in raw {
        let mut text = line.as_ref();

        if in_comment {
            match text.find("*/") {
                Some(end) => {
                    in_comment = false;
                    text = &text[end + 2..];
                }
                None => continue,
            }
        }

        let stripped = SAME_LINE_COMMENT.replace(text, "");
        let mut text: &str = &stripped;

        if let Some(start) = text.find("/*") {
            in_comment = true;
            text = &text[..start];
        }

        let text = text.trim();
        if !text.is_empty() {
            cleaned.push(text.to_string());
        }
    }

    cleaned
}
