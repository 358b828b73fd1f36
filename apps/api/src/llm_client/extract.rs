//! Best-effort recovery of a JSON object from free-text model output.
//!
//! Models wrap JSON in markdown fences or surround it with prose even when told
//! not to. `extract` tries, in order: the fence-stripped text, then the span from
//! the first `{` to the last `}`. Anything else is a `ParseFailure` carrying the
//! untouched input. There is no re-prompt: one failure is final for that call.

use serde_json::{json, Map, Value};

pub const PARSE_FAILURE_MESSAGE: &str = "Failed to parse AI response";

#[derive(Debug, Clone, PartialEq)]
pub enum Extracted {
    Document(Map<String, Value>),
    ParseFailure { raw_response: String },
}

impl Extracted {
    pub fn is_document(&self) -> bool {
        matches!(self, Extracted::Document(_))
    }

    /// Renders the result as the response payload: the document itself, or
    /// `{error, raw_response}`.
    pub fn into_value(self) -> Value {
        match self {
            Extracted::Document(map) => Value::Object(map),
            Extracted::ParseFailure { raw_response } => json!({
                "error": PARSE_FAILURE_MESSAGE,
                "raw_response": raw_response,
            }),
        }
    }
}

/// Extracts a single JSON object from `raw_text`. Total over all inputs.
pub fn extract(raw_text: &str) -> Extracted {
    let unfenced = strip_json_fences(raw_text);

    if let Some(map) = parse_object(unfenced) {
        return Extracted::Document(map);
    }

    if let Some(map) = brace_span(raw_text).and_then(parse_object) {
        return Extracted::Document(map);
    }

    Extracted::ParseFailure {
        raw_response: raw_text.to_string(),
    }
}

/// Trims, then strips a leading ```` ```json ```` and a trailing ```` ``` ```` independently.
fn strip_json_fences(text: &str) -> &str {
    let mut text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        text = stripped;
    }
    if let Some(stripped) = text.strip_suffix("```") {
        text = stripped;
    }
    text
}

fn brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

fn parse_object(text: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}
