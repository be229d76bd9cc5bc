//! Tolerant parsing of model output.
//!
//! Models wrap JSON in Markdown fences or surround it with prose often
//! enough that strict parsing would discard most answers. Anything that
//! still fails to parse yields an empty result rather than an error.

use gapfinder_core::{CompetitionAnalysis, Suggestion};
use serde_json::{Map, Value};

const ANALYSIS_FIELDS: [&str; 4] = [
    "saturation_level",
    "unexplored_angles",
    "differentiators",
    "recommendations",
];

/// Locate the JSON object inside a model answer.
///
/// A ```` ```json ```` fence wins, then a bare ```` ``` ```` fence; the
/// result is narrowed to the span between the first `{` and the last `}`.
#[must_use]
pub fn extract_json(text: &str) -> Option<&str> {
    let fenced = if let Some((_, rest)) = text.split_once("```json") {
        rest.split("```").next().unwrap_or(rest)
    } else if let Some((_, rest)) = text.split_once("```") {
        rest.split("```").next().unwrap_or(rest)
    } else {
        text
    };

    let start = fenced.find('{')?;
    let end = fenced.rfind('}')?;
    (start < end).then(|| &fenced[start..=end])
}

fn parse_object(text: &str) -> Option<Map<String, Value>> {
    let json = extract_json(text)?;
    match serde_json::from_str::<Value>(json) {
        Ok(Value::Object(map)) => Some(map),
        Ok(_) => None,
        Err(e) => {
            tracing::warn!(error = %e, "model answer is not valid JSON");
            None
        }
    }
}

/// Strings stay as they are; other scalars use their JSON text.
fn text_of(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn list_of(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items.iter().map(|v| text_of(Some(v))).collect(),
        Some(Value::String(s)) if !s.is_empty() => vec![s.clone()],
        _ => Vec::new(),
    }
}

/// Read `{"suggestions": [...]}` out of a model answer.
///
/// Entries that are not objects are skipped; missing fields become empty.
#[must_use]
pub fn parse_suggestions(text: &str) -> Vec<Suggestion> {
    let Some(mut root) = parse_object(text) else {
        return Vec::new();
    };
    let Some(Value::Array(entries)) = root.remove("suggestions") else {
        tracing::warn!("model answer has no suggestions array");
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(Value::as_object)
        .map(|entry| Suggestion {
            title: text_of(entry.get("title")),
            topic: text_of(entry.get("topic")),
            description: text_of(entry.get("description")),
            estimated_potential: text_of(entry.get("estimated_potential")),
            key_points: list_of(entry.get("key_points")),
        })
        .collect()
}

/// Read a market analysis, with or without its `market_analysis` wrapper.
///
/// Returns `None` when the answer carries none of the expected fields.
#[must_use]
pub fn parse_competition_analysis(text: &str) -> Option<CompetitionAnalysis> {
    let mut root = parse_object(text)?;
    let fields = match root.remove("market_analysis") {
        Some(Value::Object(inner)) => inner,
        _ => root,
    };

    if !ANALYSIS_FIELDS.iter().any(|key| fields.contains_key(*key)) {
        return None;
    }

    Some(CompetitionAnalysis {
        saturation_level: text_of(fields.get("saturation_level")),
        unexplored_angles: list_of(fields.get("unexplored_angles")),
        differentiators: list_of(fields.get("differentiators")),
        recommendations: list_of(fields.get("recommendations")),
    })
}
