// src/render.rs
//! Turns the loosely-shaped stage results into view content.

use serde::Serialize;
use serde_json::Value;

use crate::models::{GeneratorResult, McqItem, ReviewerResult};

pub const NO_EXPLANATION: &str = "No explanation generated.";
pub const NO_MCQS: &str = "No MCQs generated due to format complexity.";
pub const NO_QUESTION: &str = "No question";
pub const REVIEW_PASSED: &str = "Content passed all quality checks! Ready for use.";
pub const REVIEW_COMPLETED: &str = "Review completed.";
pub const ISSUES_HEADING: &str = "Issues Found";

/// Which card a generator-shaped result is rendered into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentRole {
    Primary,
    Refined,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentView {
    pub explanation: String,
    pub mcqs: McqList,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum McqList {
    Items(Vec<McqView>),
    Placeholder(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct McqView {
    pub number: usize,
    pub question: String,
    pub options: Vec<OptionView>,
}

impl McqView {
    pub fn heading(&self) -> String {
        format!("Q{}. {}", self.number, self.question)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionView {
    pub text: String,
    pub correct: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewView {
    pub badge: StatusBadge,
    pub body: ReviewBody,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusBadge {
    pub label: String,
    /// Style class; the lowercased status.
    pub style: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ReviewBody {
    /// Free-form reviewer text.
    Text(String),
    Passed,
    Issues(Vec<String>),
    Completed,
}

/// Resolves a generator-shaped payload into explanation and questions.
///
/// For a `FallbackText` the raw text is decoded once more as JSON; a decode
/// that yields an explanation recovers the structured content. When decoding
/// fails the primary card strips curly braces from the raw text.
pub fn resolve_content(result: GeneratorResult, role: ContentRole) -> (String, Vec<McqItem>) {
    match result {
        GeneratorResult::Structured { explanation, mcqs } => (explanation, mcqs),
        GeneratorResult::FallbackText { raw_response } => {
            match serde_json::from_str::<Value>(&raw_response) {
                Ok(decoded) => match GeneratorResult::from_value(&decoded) {
                    GeneratorResult::Structured { explanation, mcqs } => (explanation, mcqs),
                    _ => (raw_response, Vec::new()),
                },
                Err(e) => {
                    log::debug!("raw_response is not JSON ({}), showing it as text", e);
                    let text = match role {
                        ContentRole::Primary => raw_response.replace(['{', '}'], ""),
                        ContentRole::Refined => raw_response,
                    };
                    (text, Vec::new())
                }
            }
        }
        GeneratorResult::RawString(text) => (text, Vec::new()),
        GeneratorResult::Empty => (String::new(), Vec::new()),
    }
}

pub fn render_content(value: &Value, role: ContentRole) -> ContentView {
    let (explanation, mcqs) = resolve_content(GeneratorResult::from_value(value), role);

    let explanation = if explanation.is_empty() {
        NO_EXPLANATION.to_string()
    } else {
        explanation
    };

    let mcqs = if mcqs.is_empty() {
        McqList::Placeholder(NO_MCQS.to_string())
    } else {
        McqList::Items(
            mcqs.iter()
                .enumerate()
                .map(|(i, mcq)| render_mcq(mcq, i + 1))
                .collect(),
        )
    };

    ContentView { explanation, mcqs }
}

pub fn render_mcq(mcq: &McqItem, number: usize) -> McqView {
    let question = if mcq.question.is_empty() {
        NO_QUESTION.to_string()
    } else {
        mcq.question.clone()
    };

    let options = mcq
        .options
        .iter()
        .enumerate()
        .map(|(i, opt)| {
            let letter = option_letter(i);
            OptionView {
                text: label_option(opt, letter),
                correct: is_correct_option(&mcq.answer, opt, letter),
            }
        })
        .collect();

    McqView { number, question, options }
}

/// A, B, C, ... by position.
pub fn option_letter(index: usize) -> char {
    u32::try_from(index)
        .ok()
        .and_then(|i| u32::from(b'A').checked_add(i))
        .and_then(char::from_u32)
        .unwrap_or('?')
}

/// Prefixes `"X) "` unless the option already starts with `X)` or `X.`.
pub fn label_option(option: &str, letter: char) -> String {
    let already_labelled = option
        .strip_prefix(letter)
        .is_some_and(|rest| rest.starts_with(')') || rest.starts_with('.'));

    if already_labelled {
        option.to_string()
    } else {
        format!("{}) {}", letter, option)
    }
}

/// An option is correct when the answer is its letter, its full text, or
/// merely contains its letter anywhere. The last rule over-matches (an answer
/// text "Paris" marks option P, an answer "CAB" marks A, B and C) and is kept
/// as is.
pub fn is_correct_option(answer: &str, option: &str, letter: char) -> bool {
    answer.strip_prefix(letter) == Some("") || answer == option || answer.contains(letter)
}

pub fn render_review(value: &Value) -> ReviewView {
    match ReviewerResult::from_value(value) {
        ReviewerResult::Raw(text) => ReviewView {
            badge: StatusBadge {
                label: "REVIEWED".to_string(),
                style: "pass".to_string(),
            },
            body: ReviewBody::Text(text),
        },
        ReviewerResult::Structured { status, feedback } => {
            let body = if status == "pass" && feedback.is_empty() {
                ReviewBody::Passed
            } else if !feedback.is_empty() {
                ReviewBody::Issues(feedback)
            } else {
                ReviewBody::Completed
            };
            ReviewView {
                badge: StatusBadge {
                    label: status.to_uppercase(),
                    style: status,
                },
                body,
            }
        }
        ReviewerResult::Absent => ReviewView {
            badge: StatusBadge {
                label: "REVIEWED".to_string(),
                style: "pass".to_string(),
            },
            body: ReviewBody::Completed,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn items(view: &ContentView) -> &[McqView] {
        match &view.mcqs {
            McqList::Items(items) => items,
            McqList::Placeholder(_) => panic!("expected MCQ items"),
        }
    }

    #[test]
    fn test_structured_generator() {
        let view = render_content(
            &json!({"explanation": "E", "mcqs": [{"question": "Q", "options": ["1", "2"], "answer": "A"}]}),
            ContentRole::Primary,
        );
        assert_eq!(view.explanation, "E");
        let mcqs = items(&view);
        assert_eq!(mcqs.len(), 1);
        assert_eq!(mcqs[0].heading(), "Q1. Q");
        assert_eq!(
            mcqs[0].options,
            vec![
                OptionView { text: "A) 1".to_string(), correct: true },
                OptionView { text: "B) 2".to_string(), correct: false },
            ]
        );
    }

    #[test]
    fn test_parse_error_recovered_by_second_decode() {
        let view = render_content(
            &json!({"parse_error": true, "raw_response": "{\"explanation\":\"X\"}"}),
            ContentRole::Primary,
        );
        assert_eq!(view.explanation, "X");
        assert_eq!(view.mcqs, McqList::Placeholder(NO_MCQS.to_string()));

        let view = render_content(
            &json!({
                "parse_error": true,
                "raw_response": "{\"explanation\":\"X\",\"mcqs\":[{\"question\":\"Q\",\"options\":[\"a\"],\"answer\":\"a\"}]}"
            }),
            ContentRole::Refined,
        );
        assert_eq!(items(&view)[0].options[0], OptionView { text: "A) a".to_string(), correct: true });
    }

    #[test]
    fn test_parse_error_garbled_text_strips_braces() {
        let view = render_content(
            &json!({"parse_error": true, "raw_response": "plain {garbled} text"}),
            ContentRole::Primary,
        );
        assert_eq!(view.explanation, "plain garbled text");
        assert_eq!(view.mcqs, McqList::Placeholder(NO_MCQS.to_string()));

        let refined = render_content(
            &json!({"parse_error": true, "raw_response": "plain {garbled} text"}),
            ContentRole::Refined,
        );
        assert_eq!(refined.explanation, "plain {garbled} text");
    }

    #[test]
    fn test_parse_error_json_without_explanation_keeps_raw() {
        let view = render_content(
            &json!({"parse_error": true, "raw_response": "{\"summary\":\"S\"}"}),
            ContentRole::Primary,
        );
        assert_eq!(view.explanation, "{\"summary\":\"S\"}");
    }

    #[test]
    fn test_string_and_empty_payloads() {
        assert_eq!(render_content(&json!("just text"), ContentRole::Primary).explanation, "just text");
        let empty = render_content(&Value::Null, ContentRole::Primary);
        assert_eq!(empty.explanation, NO_EXPLANATION);
        assert_eq!(empty.mcqs, McqList::Placeholder(NO_MCQS.to_string()));
    }

    #[test]
    fn test_option_labels() {
        assert_eq!(label_option("Paris", 'A'), "A) Paris");
        assert_eq!(label_option("A) Paris", 'A'), "A) Paris");
        assert_eq!(label_option("B. Rome", 'B'), "B. Rome");
        assert_eq!(label_option("B. Rome", 'C'), "C) B. Rome");
        assert_eq!(option_letter(0), 'A');
        assert_eq!(option_letter(3), 'D');
    }

    #[test]
    fn test_answer_matching_is_loose() {
        assert!(is_correct_option("B", "Rome", 'B'));
        assert!(is_correct_option("Rome", "Rome", 'B'));
        assert!(is_correct_option("B) Rome", "Rome", 'B'));
        // Known over-match: any answer containing the letter.
        assert!(is_correct_option("CAB", "x", 'A'));
        assert!(!is_correct_option("b", "Rome", 'B'));
        assert!(!is_correct_option("", "Rome", 'A'));
    }

    #[test]
    fn test_missing_question_text() {
        let mcq = render_mcq(&McqItem::default(), 3);
        assert_eq!(mcq.heading(), "Q3. No question");
        assert!(mcq.options.is_empty());
    }

    #[test]
    fn test_review_rendering() {
        let raw = render_review(&json!("Needs more examples"));
        assert_eq!(raw.badge, StatusBadge { label: "REVIEWED".to_string(), style: "pass".to_string() });
        assert_eq!(raw.body, ReviewBody::Text("Needs more examples".to_string()));

        let passed = render_review(&json!({"status": "PASS", "feedback": []}));
        assert_eq!(passed.badge.label, "PASS");
        assert_eq!(passed.body, ReviewBody::Passed);

        let failed = render_review(&json!({"status": "fail", "feedback": ["issue A", "<script>"]}));
        assert_eq!(failed.badge, StatusBadge { label: "FAIL".to_string(), style: "fail".to_string() });
        assert_eq!(
            failed.body,
            ReviewBody::Issues(vec!["issue A".to_string(), "<script>".to_string()])
        );

        let completed = render_review(&json!({"status": "unknown"}));
        assert_eq!(completed.badge.label, "UNKNOWN");
        assert_eq!(completed.body, ReviewBody::Completed);

        assert_eq!(render_review(&json!({})).body, ReviewBody::Passed);
        assert_eq!(render_review(&Value::Null).body, ReviewBody::Completed);
    }
}
