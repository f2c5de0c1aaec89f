//! Cleaning and parsing of raw model output.

use crate::model::Verdict;
use serde_json::Value;

/// Result of parsing one model response.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    Parsed(Verdict),
    ParseFailed {
        raw: String,
        cleaned: String,
        reason: String,
    },
}

/// Strip escape characters, control whitespace and markdown code fences.
///
/// Every `json` substring is removed, not only a fence language tag.
pub fn clean_response(raw: &str) -> String {
    raw.replace('\\', "")
        .replace(['\n', '\t', '\r'], "")
        .replace("```", "")
        .replace("json", "")
}

pub fn parse_response(raw: &str) -> ParseOutcome {
    let cleaned = clean_response(raw);
    match verdict_from_json(&cleaned) {
        Ok(verdict) => ParseOutcome::Parsed(verdict),
        Err(reason) => ParseOutcome::ParseFailed {
            raw: raw.to_string(),
            cleaned,
            reason,
        },
    }
}

/// The answer must be a JSON object carrying both keys. Duplicate keys keep
/// the last value.
fn verdict_from_json(cleaned: &str) -> Result<Verdict, String> {
    let value: Value = serde_json::from_str(cleaned).map_err(|e| e.to_string())?;
    let mut fields = match value {
        Value::Object(fields) => fields,
        other => return Err(format!("expected a JSON object, got {}", kind(&other))),
    };

    let reasoning = fields
        .remove("reasoning")
        .ok_or("missing field `reasoning`")?;
    let correctness = fields
        .remove("correctness")
        .ok_or("missing field `correctness`")?;

    Ok(Verdict {
        reasoning: match reasoning {
            Value::String(s) => s,
            other => other.to_string(),
        },
        correctness,
    })
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
