use std::collections::{HashMap, HashSet};

use ammonia::Builder;
use chartguard_core::{Error, Result};
use serde_json::Value;

/// Longest file name returned by `sanitize_file_name`, in characters.
pub const MAX_FILE_NAME_LEN: usize = 255;

const LABEL_TAGS: [&str; 6] = ["b", "i", "em", "strong", "span", "br"];
const LABEL_ATTRIBUTES: [&str; 2] = ["class", "style"];
/// Elements removed together with their content.
const CONTENT_TAGS: [&str; 2] = ["script", "style"];

/// Strip markup from a chart label, keeping basic inline formatting.
pub fn sanitize_chart_label(text: &str) -> String {
    clean_markup(text, &LABEL_TAGS, &LABEL_ATTRIBUTES)
}

/// Strip all markup from tooltip text.
///
/// Sanitizing already sanitized text returns it unchanged.
pub fn sanitize_tooltip_content(text: &str) -> String {
    clean_markup(text, &[], &[])
}

/// `sanitize_chart_label` for untyped input; non-strings are rejected.
pub fn sanitize_chart_label_value(value: &Value) -> Result<String> {
    expect_text(value).map(sanitize_chart_label)
}

/// `sanitize_tooltip_content` for untyped input; non-strings are rejected.
pub fn sanitize_tooltip_content_value(value: &Value) -> Result<String> {
    expect_text(value).map(sanitize_tooltip_content)
}

/// Reduce an untrusted file name to a safe single path component.
///
/// Keeps ASCII letters and digits, Cyrillic letters, `.`, `-`, `_` and
/// whitespace; removes `..` sequences, leading dots and whitespace, and
/// trailing whitespace.
pub fn sanitize_file_name(name: &str) -> Result<String> {
    let mut cleaned: String = name.chars().filter(|c| is_file_name_char(*c)).collect();
    while cleaned.contains("..") {
        cleaned = cleaned.replace("..", "");
    }
    let truncated: String = cleaned
        .trim_start_matches(|c: char| c == '.' || c.is_whitespace())
        .chars()
        .take(MAX_FILE_NAME_LEN)
        .collect();
    let cleaned = truncated.trim_end().to_string();

    if cleaned.is_empty() || cleaned == "." {
        tracing::debug!(event = "file_name_rejected", input_len = name.len());
        return Err(Error::InvalidFileName(format!(
            "'{name}' contains no usable characters"
        )));
    }
    Ok(cleaned)
}

fn clean_markup(text: &str, tags: &[&'static str], attributes: &[&'static str]) -> String {
    let tags: HashSet<&str> = tags.iter().copied().collect();
    let attributes: HashSet<&str> = attributes.iter().copied().collect();
    let content_tags: HashSet<&str> = CONTENT_TAGS.into_iter().collect();

    Builder::default()
        .tags(tags)
        .generic_attributes(attributes)
        .tag_attributes(HashMap::new())
        .clean_content_tags(content_tags)
        .clean(text)
        .to_string()
        .trim()
        .to_string()
}

fn expect_text(value: &Value) -> Result<&str> {
    value.as_str().ok_or_else(|| {
        Error::InvalidInput(format!(
            "expected text, received {}",
            match value {
                Value::Null => "null",
                Value::Bool(_) => "boolean",
                Value::Number(_) => "number",
                Value::String(_) => "string",
                Value::Array(_) => "array",
                Value::Object(_) => "object",
            }
        ))
    })
}

fn is_file_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(c, '.' | '-' | '_')
        || c.is_whitespace()
        || (('\u{0400}'..='\u{04FF}').contains(&c) && c.is_alphabetic())
}
