//! Recovery of structured JSON from LLM output.
//!
//! Generation stages receive free-form model text that usually, but not
//! always, contains the requested JSON: wrapped in markdown fences, mixed
//! with commentary, or occasionally a bare object where a list was asked
//! for. These utilities pull the JSON out without ever panicking on the
//! surrounding noise.

use crate::Block;
use vignette_error::{ScriptError, ScriptErrorKind, VignetteResult};

/// Extract JSON from a response that may contain markdown or extra text.
///
/// Tries, in order: ```json fences, then the first balanced `[...]` or
/// `{...}` structure (whichever opens first).
///
/// # Errors
///
/// Returns an error if no JSON candidate is found in the response.
///
/// # Examples
///
/// ```
/// use vignette_core::extract_json;
///
/// let response = "Here is the script:\n```json\n[{\"id\": \"1\"}]\n```\nEnjoy!";
/// let json = extract_json(response).unwrap();
/// assert!(json.starts_with('['));
/// ```
pub fn extract_json(response: &str) -> VignetteResult<String> {
    if let Some(json) = extract_from_code_block(response, "json") {
        return Ok(json);
    }

    let bracket_pos = response.find('[');
    let brace_pos = response.find('{');

    let candidates: [(char, char); 2] = match (bracket_pos, brace_pos) {
        (Some(b), Some(c)) if b < c => [('[', ']'), ('{', '}')],
        (Some(_), None) => [('[', ']'), ('[', ']')],
        _ => [('{', '}'), ('[', ']')],
    };

    for (open, close) in candidates {
        if let Some(json) = extract_balanced(response, open, close) {
            return Ok(json);
        }
    }

    tracing::error!(
        response_length = response.len(),
        "No JSON found in LLM response"
    );

    Err(ScriptError::new(ScriptErrorKind::NoJsonFound(response.len())).into())
}

/// Extract content from a markdown code block, with or without a language
/// specifier. An unterminated fence (truncated response) yields everything
/// after the opening fence.
fn extract_from_code_block(response: &str, language: &str) -> Option<String> {
    let pattern = format!("```{}", language);

    if let Some(start) = response.find(&pattern) {
        let content_start = start + pattern.len();
        if let Some(end) = response[content_start..].find("```") {
            return Some(response[content_start..content_start + end].trim().to_string());
        }
        return Some(response[content_start..].trim().to_string());
    }

    if let Some(start) = response.find("```") {
        let content_start = start + 3;
        // Skip a possible language specifier on the fence line.
        let skip_to = response[content_start..]
            .find('\n')
            .map(|n| content_start + n + 1)
            .unwrap_or(content_start);

        if let Some(end) = response[skip_to..].find("```") {
            return Some(response[skip_to..skip_to + end].trim().to_string());
        }
        return Some(response[skip_to..].trim().to_string());
    }

    None
}

/// Extract content between balanced delimiters, tracking string literals
/// and escapes so braces inside dialogue text do not confuse the depth count.
fn extract_balanced(response: &str, open: char, close: char) -> Option<String> {
    let start = response.find(open)?;
    let mut depth = 0;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, ch) in response[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match ch {
            '\\' => escape_next = true,
            '"' => in_string = !in_string,
            c if c == open && !in_string => depth += 1,
            c if c == close && !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(response[start..start + i + 1].to_string());
                }
            }
            _ => {}
        }
    }

    None
}

/// Parse and validate JSON, returning a specific type.
///
/// # Errors
///
/// Returns an error if the JSON string cannot be parsed into type `T`.
///
/// # Examples
///
/// ```
/// use vignette_core::{parse_json, ScenePlan};
///
/// let json = r#"{"setting": "A pier", "tone": "tense"}"#;
/// let plan: ScenePlan = parse_json(json).unwrap();
/// assert_eq!(plan.setting, "A pier");
/// ```
pub fn parse_json<T>(json_str: &str) -> VignetteResult<T>
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_str(json_str).map_err(|e| {
        let preview: String = json_str.chars().take(100).collect();

        tracing::error!(
            error = %e,
            json_preview = %preview,
            "JSON parsing failed"
        );

        ScriptError::new(ScriptErrorKind::JsonParse(format!("{} (JSON: {}...)", e, preview)))
            .into()
    })
}

/// Parse a block list from raw LLM output.
///
/// A stage that was asked for a sequence sometimes returns a single object
/// instead; that object is coerced to a one-element list rather than
/// rejected.
///
/// # Errors
///
/// Returns an error if no JSON is found or the JSON is not an object or
/// array of blocks.
///
/// # Examples
///
/// ```
/// use vignette_core::parse_block_list;
///
/// let blocks = parse_block_list(r#"{"type": "action", "description": "Rain falls."}"#).unwrap();
/// assert_eq!(blocks.len(), 1);
/// ```
pub fn parse_block_list(response: &str) -> VignetteResult<Vec<Block>> {
    let json = extract_json(response)?;
    let value: serde_json::Value = parse_json(&json)?;

    let items = if let Some(array) = value.as_array() {
        array.clone()
    } else {
        vec![value]
    };

    let mut blocks = Vec::with_capacity(items.len());
    for item in items {
        let block: Block = serde_json::from_value(item)
            .map_err(|e| ScriptError::new(ScriptErrorKind::JsonParse(e.to_string())))?;
        blocks.push(block);
    }
    Ok(blocks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_json_from_code_block() {
        let response = r#"
Here's the script you requested:

```json
[{"type": "dialogue", "id": "1", "character": "Mira", "text": "Hi"}]
```

Hope this helps!
"#;
        let json = extract_json(response).unwrap();
        assert!(json.starts_with('['));
        assert!(json.contains("Mira"));
    }

    #[test]
    fn extracts_balanced_braces() {
        let response = r#"Sure! Here it is: {"id": "456", "nested": {"value": "test"}}"#;
        let json = extract_json(response).unwrap();
        assert!(json.starts_with('{'));
        assert!(json.ends_with('}'));
    }

    #[test]
    fn prefers_array_when_it_opens_first() {
        let response = r#"[{"id": "1"}, {"id": "2"}] trailing {"noise": true}"#;
        let json = extract_json(response).unwrap();
        assert!(json.starts_with('['));
        assert!(json.ends_with(']'));
    }

    #[test]
    fn string_escapes_do_not_break_depth() {
        let response = r#"{"text": "She said \"run { now }\""}"#;
        let json = extract_json(response).unwrap();
        assert!(json.contains("She said"));
    }

    #[test]
    fn plain_text_is_an_error() {
        assert!(extract_json("No structure here at all").is_err());
    }

    #[test]
    fn truncated_fence_returns_remainder() {
        let response = "```json\n[{\"id\": \"1\"}]";
        let json = extract_json(response).unwrap();
        assert!(json.contains("\"id\""));
    }

    #[test]
    fn single_object_coerces_to_list() {
        let blocks =
            parse_block_list(r#"{"type": "dialogue", "character": "A", "text": "Hi"}"#).unwrap();
        assert_eq!(blocks.len(), 1);
        assert!(blocks[0].is_dialogue());
    }

    #[test]
    fn unknown_types_survive_list_parsing() {
        let blocks = parse_block_list(
            r#"[{"type": "dialogue", "text": "Hi"}, {"type": "weather", "id": "w1"}]"#,
        )
        .unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[1].id(), "w1");
    }
}
