//! Extraction of structured results from free-text model replies
//!
//! Models are asked for a bare JSON array but often wrap it in prose or code
//! fences. The first `[` that opens an array of objects is taken as the start
//! of the payload and exactly one JSON value is decoded from there; anything
//! after it is ignored.

use crate::classifier::StructuredResult;
use serde_json::Value;
use thiserror::Error;

/// Phrases marking a reply item as "no opportunity" (lower-case substrings)
pub const NEGATIVE_SIGNALS: &[&str] = &[
    "no rpa",
    "none",
    "n/a",
    "not identified",
    "informational",
];

/// Reasons a reply yields no results
#[derive(Debug, Error)]
pub enum ReplyError {
    #[error("No JSON array found in reply")]
    NoArray,

    #[error("Malformed JSON array: {0}")]
    Malformed(String),
}

/// Items decoded from one reply, split by whether they passed the filter
#[derive(Debug, Default)]
pub struct ParsedReply {
    /// Items describing a real opportunity, in reply order
    pub results: Vec<StructuredResult>,

    /// Items dropped as non-opportunities or non-objects
    pub rejected: usize,
}

/// Locates and decodes the first JSON array of objects in `reply`
pub fn extract_json_array(reply: &str) -> Result<Vec<Value>, ReplyError> {
    let start = find_array_start(reply).ok_or(ReplyError::NoArray)?;

    let mut values = serde_json::Deserializer::from_str(&reply[start..]).into_iter::<Vec<Value>>();
    match values.next() {
        Some(Ok(items)) => Ok(items),
        Some(Err(e)) => Err(ReplyError::Malformed(e.to_string())),
        None => Err(ReplyError::NoArray),
    }
}

/// Byte offset of the first `[` followed (after whitespace) by `{`
fn find_array_start(reply: &str) -> Option<usize> {
    reply
        .match_indices('[')
        .map(|(idx, _)| idx)
        .find(|&idx| reply[idx + 1..].trim_start().starts_with('{'))
}

/// Returns true if an `rpa_opportunity` value describes a real opportunity
///
/// The value must be non-blank and, lower-cased, contain none of the
/// [`NEGATIVE_SIGNALS`] as a substring.
pub fn is_opportunity(rpa_opportunity: &str) -> bool {
    let lowered = rpa_opportunity.trim().to_lowercase();
    !lowered.is_empty() && !NEGATIVE_SIGNALS.iter().any(|signal| lowered.contains(signal))
}

/// Extracts the opportunity records from a model reply
///
/// Missing or non-string fields read as empty strings, so an item without an
/// opportunity is simply filtered out.
pub fn parse_reply(reply: &str) -> Result<ParsedReply, ReplyError> {
    let items = extract_json_array(reply)?;
    let mut parsed = ParsedReply::default();

    for item in items {
        if !item.is_object() {
            parsed.rejected += 1;
            continue;
        }

        let result = StructuredResult {
            url: string_field(&item, "url"),
            summary: string_field(&item, "summary"),
            rpa_opportunity: string_field(&item, "rpa_opportunity"),
        };

        if is_opportunity(&result.rpa_opportunity) {
            parsed.results.push(result);
        } else {
            parsed.rejected += 1;
        }
    }

    Ok(parsed)
}

fn string_field(item: &Value, key: &str) -> String {
    item.get(key)
        .and_then(Value::as_str)
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}
