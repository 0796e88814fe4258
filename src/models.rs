// src/models.rs
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::errors::{PipelineError, Result};

pub const MIN_GRADE: u8 = 1;
pub const MAX_GRADE: u8 = 12;

/// Body of `POST /generate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineRequest {
    pub grade: u8,
    pub topic: String,
}

impl PipelineRequest {
    /// Builds a request from raw form input. The topic is checked first, then the grade.
    pub fn from_input(grade: &str, topic: &str) -> Result<Self> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(PipelineError::TopicRequired);
        }

        let grade = grade
            .trim()
            .parse::<i64>()
            .ok()
            .filter(|g| (i64::from(MIN_GRADE)..=i64::from(MAX_GRADE)).contains(g))
            .ok_or(PipelineError::InvalidGrade)?;

        Ok(Self {
            grade: grade as u8,
            topic: topic.to_string(),
        })
    }
}

/// Response of `POST /generate`.
///
/// The three stage results stay untyped here; they are classified into
/// [`GeneratorResult`] and [`ReviewerResult`] when rendered.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineResponse {
    #[serde(default)]
    pub success: bool,

    #[serde(default)]
    pub error: Option<String>,

    #[serde(default)]
    pub product_name: Option<String>,

    #[serde(default)]
    pub generator: Value,

    #[serde(default)]
    pub reviewer: Value,

    #[serde(default)]
    pub refined: Value,
}

impl PipelineResponse {
    pub fn has_refined(&self) -> bool {
        is_truthy(&self.refined)
    }
}

/// Health payload of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceHealth {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub product: Option<String>,
}

/// One multiple-choice question as produced by the generator.
///
/// Every field tolerates missing values and non-string scalars.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct McqItem {
    #[serde(default, deserialize_with = "lenient_string")]
    pub question: String,

    #[serde(default, deserialize_with = "lenient_strings")]
    pub options: Vec<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub answer: String,
}

/// The shapes a generator (or refined) payload is known to take.
#[derive(Debug, Clone, PartialEq)]
pub enum GeneratorResult {
    /// Object with a non-empty `explanation`.
    Structured {
        explanation: String,
        mcqs: Vec<McqItem>,
    },
    /// Object flagged with `parse_error` that carries the model's raw text.
    FallbackText { raw_response: String },
    /// The payload is a bare string.
    RawString(String),
    Empty,
}

impl GeneratorResult {
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(map) => {
                if let Some(explanation) = non_empty_str(map.get("explanation")) {
                    return GeneratorResult::Structured {
                        explanation: explanation.to_string(),
                        mcqs: parse_mcqs(map.get("mcqs")),
                    };
                }

                let flagged = map.get("parse_error").is_some_and(is_truthy);
                match (flagged, non_empty_str(map.get("raw_response"))) {
                    (true, Some(raw)) => GeneratorResult::FallbackText {
                        raw_response: raw.to_string(),
                    },
                    _ => GeneratorResult::Empty,
                }
            }
            Value::String(text) => GeneratorResult::RawString(text.clone()),
            _ => GeneratorResult::Empty,
        }
    }
}

/// The shapes a reviewer payload is known to take.
#[derive(Debug, Clone, PartialEq)]
pub enum ReviewerResult {
    /// Free-form feedback text.
    Raw(String),
    /// `status` is lowercased and defaults to `pass`.
    Structured { status: String, feedback: Vec<String> },
    Absent,
}

impl ReviewerResult {
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::String(text) => ReviewerResult::Raw(text.clone()),
            Value::Object(map) => {
                let status = non_empty_str(map.get("status"))
                    .map(str::to_lowercase)
                    .unwrap_or_else(|| "pass".to_string());
                let feedback = match map.get("feedback") {
                    Some(Value::Array(items)) => items.iter().filter_map(value_text).collect(),
                    Some(other) => value_text(other).into_iter().collect(),
                    None => Vec::new(),
                };
                ReviewerResult::Structured { status, feedback }
            }
            _ => ReviewerResult::Absent,
        }
    }
}

/// Parses an `mcqs` array, skipping entries that are not objects.
pub(crate) fn parse_mcqs(value: Option<&Value>) -> Vec<McqItem> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter(|item| item.is_object())
            .filter_map(|item| serde_json::from_value::<McqItem>(item.clone()).ok())
            .collect(),
        _ => Vec::new(),
    }
}

pub(crate) fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// Loose truthiness for flag fields. Null, false, zero and the empty string are false.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Text of a scalar or structured value; `None` for null.
fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_text(&value).unwrap_or_default())
}

fn lenient_strings<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items.iter().filter_map(value_text).collect(),
        _ => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_validation() {
        let req = PipelineRequest::from_input(" 4 ", "  Photosynthesis ").unwrap();
        assert_eq!(req.grade, 4);
        assert_eq!(req.topic, "Photosynthesis");

        for bad in ["0", "13", "-1", "abc", "", "4.5", "99999999999999999999"] {
            assert!(
                matches!(PipelineRequest::from_input(bad, "Topic"), Err(PipelineError::InvalidGrade)),
                "grade {:?} should be rejected",
                bad
            );
        }

        assert!(matches!(PipelineRequest::from_input("4", "   "), Err(PipelineError::TopicRequired)));
        // Topic is checked before grade.
        assert!(matches!(PipelineRequest::from_input("42", ""), Err(PipelineError::TopicRequired)));
        assert!(PipelineRequest::from_input("1", "x").is_ok());
        assert!(PipelineRequest::from_input("12", "x").is_ok());
    }

    #[test]
    fn test_response_defaults() {
        let resp: PipelineResponse = serde_json::from_value(json!({"error": "Topic is required"})).unwrap();
        assert!(!resp.success);
        assert_eq!(resp.error.as_deref(), Some("Topic is required"));
        assert!(resp.generator.is_null());
        assert!(!resp.has_refined());

        let resp: PipelineResponse =
            serde_json::from_value(json!({"success": true, "refined": {"explanation": "r"}})).unwrap();
        assert!(resp.has_refined());
    }

    #[test]
    fn test_generator_classification() {
        let structured = GeneratorResult::from_value(&json!({
            "explanation": "E",
            "mcqs": [{"question": "Q", "options": ["1", "2"], "answer": "A"}, "junk"]
        }));
        assert_eq!(
            structured,
            GeneratorResult::Structured {
                explanation: "E".to_string(),
                mcqs: vec![McqItem {
                    question: "Q".to_string(),
                    options: vec!["1".to_string(), "2".to_string()],
                    answer: "A".to_string(),
                }],
            }
        );

        let fallback = GeneratorResult::from_value(&json!({"parse_error": true, "raw_response": "raw"}));
        assert_eq!(fallback, GeneratorResult::FallbackText { raw_response: "raw".to_string() });

        // An explanation wins over the parse-error marker.
        let both = GeneratorResult::from_value(&json!({"explanation": "E", "parse_error": true, "raw_response": "r"}));
        assert!(matches!(both, GeneratorResult::Structured { .. }));

        assert_eq!(GeneratorResult::from_value(&json!("text")), GeneratorResult::RawString("text".to_string()));
        assert_eq!(GeneratorResult::from_value(&json!({"explanation": ""})), GeneratorResult::Empty);
        assert_eq!(GeneratorResult::from_value(&json!({"parse_error": false, "raw_response": "r"})), GeneratorResult::Empty);
        assert_eq!(GeneratorResult::from_value(&Value::Null), GeneratorResult::Empty);
        assert_eq!(GeneratorResult::from_value(&json!(42)), GeneratorResult::Empty);
    }

    #[test]
    fn test_mcq_item_is_lenient() {
        let mcqs = parse_mcqs(Some(&json!([
            {"options": [1, null, "three"], "answer": 2},
            {}
        ])));
        assert_eq!(mcqs.len(), 2);
        assert_eq!(mcqs[0].question, "");
        assert_eq!(mcqs[0].options, vec!["1".to_string(), "three".to_string()]);
        assert_eq!(mcqs[0].answer, "2");
        assert_eq!(mcqs[1], McqItem::default());

        assert!(parse_mcqs(Some(&json!("not a list"))).is_empty());
        assert!(parse_mcqs(None).is_empty());
    }

    #[test]
    fn test_reviewer_classification() {
        assert_eq!(ReviewerResult::from_value(&json!("looks fine")), ReviewerResult::Raw("looks fine".to_string()));
        assert_eq!(
            ReviewerResult::from_value(&json!({"status": "FAIL", "feedback": ["a", "b"]})),
            ReviewerResult::Structured {
                status: "fail".to_string(),
                feedback: vec!["a".to_string(), "b".to_string()],
            }
        );
        assert_eq!(
            ReviewerResult::from_value(&json!({})),
            ReviewerResult::Structured { status: "pass".to_string(), feedback: vec![] }
        );
        assert_eq!(ReviewerResult::from_value(&Value::Null), ReviewerResult::Absent);
    }

    #[test]
    fn test_truthiness() {
        assert!(is_truthy(&json!(true)));
        assert!(is_truthy(&json!(1)));
        assert!(is_truthy(&json!("x")));
        assert!(is_truthy(&json!({})));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&Value::Null));
    }
}
