//! Strict JSON extraction from analyzer responses
//!
//! Model output may wrap the JSON payload in markdown fences or surrounding
//! narrative text. Extraction tries progressively looser strategies, but the
//! returned value always comes from a full serde parse of a complete JSON
//! value, never from a partial structural match.

use crate::analysis::error::{AnalysisError, AnalysisResult};
use serde::de::DeserializeOwned;

/// Parse a typed value out of a free-form model response.
///
/// Strategy order:
/// 1) the full trimmed content as JSON
/// 2) a ```json fenced code block
/// 3) any fenced code block
/// 4) the first complete JSON object/array found in the text
pub fn extract_json<T: DeserializeOwned>(content: &str) -> AnalysisResult<T> {
    let trimmed = content.trim();

    if let Ok(parsed) = serde_json::from_str::<T>(trimmed) {
        return Ok(parsed);
    }

    if let Some(block) = fenced_block(trimmed, Some("json")) {
        if let Ok(parsed) = serde_json::from_str::<T>(block) {
            return Ok(parsed);
        }
    }

    if let Some(block) = fenced_block(trimmed, None) {
        if let Ok(parsed) = serde_json::from_str::<T>(block) {
            return Ok(parsed);
        }
    }

    if let Some(candidate) = first_json_value(trimmed) {
        return serde_json::from_str::<T>(candidate).map_err(|e| {
            AnalysisError::MalformedResponse {
                message: format!("embedded JSON does not match the expected shape: {}", e),
            }
        });
    }

    Err(AnalysisError::MalformedResponse {
        message: "no JSON value found in response".to_string(),
    })
}

/// Extract the first complete JSON value (object or array) from text.
///
/// Uses `serde_json::Deserializer` to find a valid JSON prefix instead of
/// bracket matching, so brackets inside strings cannot confuse it.
fn first_json_value(content: &str) -> Option<&str> {
    for (idx, ch) in content.char_indices() {
        if ch == '{' || ch == '[' {
            let candidate = &content[idx..];
            let mut de =
                serde_json::Deserializer::from_str(candidate).into_iter::<serde_json::Value>();
            if let Some(Ok(_value)) = de.next() {
                let end = de.byte_offset();
                if end > 0 && end <= candidate.len() {
                    return Some(&candidate[..end]);
                }
            }
        }
    }
    None
}

/// Extract a fenced code block, optionally requiring a language tag
fn fenced_block<'a>(content: &'a str, language: Option<&str>) -> Option<&'a str> {
    let fence = "```";
    let mut search = content;

    loop {
        let start = search.find(fence)?;
        let after_start = &search[start + fence.len()..];

        let (lang_tag, rest) = match after_start.find('\n') {
            Some(line_end) => (after_start[..line_end].trim(), &after_start[line_end + 1..]),
            None => return None,
        };

        if let Some(expected) = language {
            if !lang_tag.eq_ignore_ascii_case(expected) {
                search = after_start;
                continue;
            }
        }

        let end = rest.find(fence)?;
        return Some(rest[..end].trim());
    }
}
