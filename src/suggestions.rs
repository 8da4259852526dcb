//! Cultivation suggestions for a recommended crop.
//!
//! `/suggest` answers either with a structured object, with free text, or
//! with nothing useful. The reply is parsed once into [`SuggestionPayload`]
//! and rendered into display-agnostic [`SuggestionBlock`]s.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::api::endpoints::{Suggest, SuggestRequest};
use crate::api::{ApiClient, ApiError, PredictionInput};

/// Fallback message when `/suggest` fails without a usable message.
pub const SUGGEST_FAILED_MESSAGE: &str = "Suggest failed";
/// Shown when the reply carried no suggestions.
pub const NO_SUGGESTIONS_MESSAGE: &str = "No suggestions available.";

/// Keys that mark a bare object as a structured suggestion.
const STRUCTURED_KEYS: [&str; 5] = [
    "crop",
    "reason",
    "cultivation_steps",
    "duration_weeks",
    "cost_estimate",
];

/// Sub-sections rendered as key/value tables, in display order.
const SECTIONS: [(&str, &str); 5] = [
    ("soil_preparation", "Soil preparation"),
    ("spacing", "Spacing"),
    ("irrigation", "Irrigation"),
    ("fertilizer", "Fertilizer"),
    ("pest_management", "Pest management"),
];

#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct SuggestError {
    pub message: String,
    #[source]
    pub source: ApiError,
}

impl From<ApiError> for SuggestError {
    fn from(source: ApiError) -> Self {
        Self {
            message: source.user_message(SUGGEST_FAILED_MESSAGE),
            source,
        }
    }
}

/// Ask the backend for suggestions about `crop` grown under `input`.
pub fn fetch_suggestions(
    api: &ApiClient,
    input: PredictionInput,
    crop: &str,
) -> Result<Suggestions, SuggestError> {
    let request = SuggestRequest {
        input,
        prediction: crop.to_string(),
    };
    let raw = api.call::<Suggest>(&request)?;
    let suggestions = Suggestions::from_value(raw);
    if let (SuggestionPayload::Empty, Some(error)) =
        (&suggestions.payload, suggestions.backend_error())
    {
        return Err(ApiError::Backend(error).into());
    }
    Ok(suggestions)
}

/// Structured cultivation advice. Every field is optional.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredSuggestion {
    fields: Map<String, Value>,
}

impl StructuredSuggestion {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Scalar field as text; empty strings and nulls count as missing.
    pub fn text(&self, key: &str) -> Option<String> {
        match self.fields.get(key)? {
            Value::Null => None,
            Value::String(text) if text.trim().is_empty() => None,
            other => Some(display_value(other)),
        }
    }

    pub fn crop(&self) -> Option<String> {
        self.text("crop")
    }

    /// Cultivation steps in order. A single string counts as one step.
    pub fn cultivation_steps(&self) -> Vec<String> {
        match self.fields.get("cultivation_steps") {
            Some(Value::Array(items)) => items
                .iter()
                .filter(|item| !item.is_null())
                .map(display_value)
                .collect(),
            Some(Value::String(step)) if !step.trim().is_empty() => vec![step.clone()],
            _ => Vec::new(),
        }
    }

    /// Rows of a sub-section, or `None` when the section is absent.
    pub fn section(&self, key: &str) -> Option<Vec<(String, String)>> {
        match self.fields.get(key)? {
            Value::Null => None,
            Value::Object(map) => Some(
                map.iter()
                    .map(|(name, value)| (humanize(name), display_value(value)))
                    .collect(),
            ),
            other => Some(vec![("Details".to_string(), display_value(other))]),
        }
    }
}

/// Parsed `/suggest` reply.
#[derive(Debug, Clone, PartialEq)]
pub enum SuggestionPayload {
    Structured(StructuredSuggestion),
    FreeText(String),
    Empty,
}

impl SuggestionPayload {
    pub fn from_value(value: &Value) -> Self {
        if let Some(Value::Object(map)) = value.get("structured") {
            if !map.is_empty() {
                return Self::Structured(StructuredSuggestion::new(map.clone()));
            }
        }
        match value.get("suggestions") {
            Some(Value::String(text)) if !text.trim().is_empty() => {
                return Self::FreeText(text.clone());
            }
            Some(Value::Array(lines)) if !lines.is_empty() => {
                let text = lines.iter().map(display_value).collect::<Vec<_>>().join("\n");
                return Self::FreeText(text);
            }
            Some(Value::Object(map)) if !map.is_empty() => {
                return Self::Structured(StructuredSuggestion::new(map.clone()));
            }
            _ => {}
        }
        match value {
            Value::String(text) if !text.trim().is_empty() => Self::FreeText(text.clone()),
            Value::Object(map) if STRUCTURED_KEYS.iter().any(|key| map.contains_key(*key)) => {
                Self::Structured(StructuredSuggestion::new(map.clone()))
            }
            _ => Self::Empty,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Blocks to display, top to bottom.
    pub fn render(&self) -> Vec<SuggestionBlock> {
        match self {
            Self::Structured(structured) => render_structured(structured),
            Self::FreeText(text) => text
                .split("\n\n")
                .map(str::trim)
                .filter(|paragraph| !paragraph.is_empty())
                .map(|paragraph| SuggestionBlock::Paragraph(paragraph.to_string()))
                .collect(),
            Self::Empty => vec![SuggestionBlock::Fallback(NO_SUGGESTIONS_MESSAGE.to_string())],
        }
    }
}

/// A `/suggest` reply kept whole for export, plus its parsed payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestions {
    raw: Value,
    payload: SuggestionPayload,
}

impl Suggestions {
    pub fn from_value(raw: Value) -> Self {
        let payload = SuggestionPayload::from_value(&raw);
        Self { raw, payload }
    }

    pub fn payload(&self) -> &SuggestionPayload {
        &self.payload
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// The structured part as it arrived, for export.
    pub fn structured(&self) -> Option<Value> {
        match self.raw.get("structured") {
            Some(value) if !value.is_null() => Some(value.clone()),
            _ => match &self.payload {
                SuggestionPayload::Structured(structured) => {
                    Some(Value::Object(structured.fields.clone()))
                }
                _ => None,
            },
        }
    }

    /// The free-text part as it arrived, for export.
    pub fn free_text(&self) -> Option<Value> {
        match self.raw.get("suggestions") {
            Some(value) if !value.is_null() => Some(value.clone()),
            _ => match &self.raw {
                Value::String(text) => Some(Value::String(text.clone())),
                _ => None,
            },
        }
    }

    fn backend_error(&self) -> Option<String> {
        match self.raw.get("error")? {
            Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
            _ => None,
        }
    }
}

/// Display-agnostic piece of rendered suggestions.
#[derive(Debug, Clone, PartialEq)]
pub enum SuggestionBlock {
    Heading(String),
    Paragraph(String),
    OrderedList { title: String, items: Vec<String> },
    KeyValues { title: String, rows: Vec<(String, String)> },
    Fallback(String),
}

fn render_structured(structured: &StructuredSuggestion) -> Vec<SuggestionBlock> {
    let mut blocks = Vec::new();
    if let Some(crop) = structured.crop() {
        blocks.push(SuggestionBlock::Heading(crop));
    }
    if let Some(reason) = structured.text("reason") {
        blocks.push(SuggestionBlock::Paragraph(reason));
    }
    let or_dash = |key: &str| structured.text(key).unwrap_or_else(|| "-".to_string());
    blocks.push(SuggestionBlock::KeyValues {
        title: "Overview".to_string(),
        rows: vec![
            (
                "Duration".to_string(),
                structured
                    .text("duration_weeks")
                    .map(|weeks| format!("{weeks} weeks"))
                    .unwrap_or_else(|| "N/A".to_string()),
            ),
            ("Estimated cost".to_string(), or_dash("cost_estimate")),
            ("Expected yield".to_string(), or_dash("expected_yield")),
            ("Market notes".to_string(), or_dash("market_notes")),
        ],
    });
    let steps = structured.cultivation_steps();
    if !steps.is_empty() {
        blocks.push(SuggestionBlock::OrderedList {
            title: "Cultivation steps".to_string(),
            items: steps,
        });
    }
    for (key, title) in SECTIONS {
        if let Some(rows) = structured.section(key) {
            blocks.push(SuggestionBlock::KeyValues {
                title: title.to_string(),
                rows,
            });
        }
    }
    blocks
}

/// Compact text for any JSON value; missing values become `-`.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::Bool(true) => "Yes".to_string(),
        Value::Bool(false) => "No".to_string(),
        Value::Number(number) => number.to_string(),
        Value::String(text) if text.trim().is_empty() => "-".to_string(),
        Value::String(text) => text.clone(),
        Value::Array(items) if items.is_empty() => "-".to_string(),
        Value::Array(items) => items
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(map) if map.is_empty() => "-".to_string(),
        Value::Object(map) => map
            .iter()
            .map(|(key, value)| format!("{}: {}", humanize(key), display_value(value)))
            .collect::<Vec<_>>()
            .join("; "),
    }
}

/// `pest_management` -> `Pest management`.
pub fn humanize(key: &str) -> String {
    let spaced = key.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
