//! Recommendation payloads as returned by the backend.
//!
//! The backend tags each payload with a `source` field. Known tags map to
//! their own variant; everything else, including known tags whose fields have
//! an unexpected shape, is kept verbatim as [`RecommendationResult::Unrecognized`].
use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq)]
pub enum RecommendationResult {
    /// AI provider output: either a list of entries or an opaque provider payload.
    Gemini {
        entries: Vec<RecommendationEntry>,
        raw: Option<Value>,
    },
    /// Heuristic suggestions produced when no AI provider is configured.
    LocalFallback {
        entries: Vec<String>,
        note: Option<String>,
    },
    /// In-band failure reported with a success status.
    Error { message: Option<String> },
    Unrecognized(Value),
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecommendationEntry {
    Structured { aspect: String, suggestion: String },
    Plain(String),
    Other(Value),
}

#[derive(Debug, Deserialize)]
#[serde(tag = "source")]
enum TaggedPayload {
    #[serde(rename = "gemini")]
    Gemini {
        recommendations: Option<Vec<Value>>,
        raw: Option<Value>,
    },
    #[serde(rename = "local-fallback")]
    LocalFallback {
        recommendations: Option<Vec<Value>>,
        note: Option<Value>,
    },
    #[serde(rename = "error")]
    Error { error: Option<Value> },
}

impl RecommendationResult {
    /// Interprets a response body. Never fails: unknown shapes are kept whole.
    pub fn from_value(value: Value) -> Self {
        let tagged = match TaggedPayload::deserialize(&value) {
            Ok(tagged) => tagged,
            Err(_) => return RecommendationResult::Unrecognized(value),
        };

        match tagged {
            TaggedPayload::Gemini {
                recommendations,
                raw,
            } => RecommendationResult::Gemini {
                entries: recommendations
                    .unwrap_or_default()
                    .into_iter()
                    .map(RecommendationEntry::from_value)
                    .collect(),
                raw,
            },
            TaggedPayload::LocalFallback {
                recommendations,
                note,
            } => RecommendationResult::LocalFallback {
                entries: recommendations
                    .unwrap_or_default()
                    .into_iter()
                    .map(value_text)
                    .collect(),
                note: note.map(value_text),
            },
            TaggedPayload::Error { error } => RecommendationResult::Error {
                message: error.map(value_text).filter(|message| !message.is_empty()),
            },
        }
    }

    pub fn source(&self) -> &str {
        match self {
            RecommendationResult::Gemini { .. } => "gemini",
            RecommendationResult::LocalFallback { .. } => "local-fallback",
            RecommendationResult::Error { .. } => "error",
            RecommendationResult::Unrecognized(_) => "unrecognized",
        }
    }
}

impl RecommendationEntry {
    fn from_value(value: Value) -> Self {
        match value {
            Value::String(text) => RecommendationEntry::Plain(text),
            Value::Object(fields) => {
                let pair = match (
                    non_empty_str(&fields, "aspect"),
                    non_empty_str(&fields, "suggestion"),
                ) {
                    (Some(aspect), Some(suggestion)) => {
                        Some((aspect.to_string(), suggestion.to_string()))
                    }
                    _ => None,
                };
                match pair {
                    Some((aspect, suggestion)) => {
                        RecommendationEntry::Structured { aspect, suggestion }
                    }
                    None => RecommendationEntry::Other(Value::Object(fields)),
                }
            }
            other => RecommendationEntry::Other(other),
        }
    }
}

fn non_empty_str<'a>(fields: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    fields
        .get(key)
        .and_then(Value::as_str)
        .filter(|text| !text.is_empty())
}

/// Strings are used verbatim; any other JSON value is shown compactly.
pub(crate) fn value_text(value: Value) -> String {
    match value {
        Value::String(text) => text,
        other => other.to_string(),
    }
}

/// Engagement counters shown next to the recommendations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EngagementMetrics {
    pub likes: Option<i64>,
    pub comments: Option<i64>,
    pub updated_likes: Option<i64>,
    pub updated_comments: Option<i64>,
}

impl EngagementMetrics {
    /// Reads the top-level counters of a recommendation response.
    /// Returns `None` when the response carries none of them.
    pub fn from_payload(payload: &Value) -> Option<Self> {
        let field = |key: &str| payload.get(key).and_then(Value::as_i64);
        let metrics = Self {
            likes: field("likes"),
            comments: field("comments"),
            updated_likes: field("updated_likes"),
            updated_comments: field("updated_comments"),
        };
        (metrics != Self::default()).then_some(metrics)
    }
}
