//! Maps raw model text onto `QuestionSet` / `LearningPath`.
//!
//! Nothing here substitutes defaults for required data. A malformed response
//! is a `ResponseFormatError`, surfaced to the caller, so that model drift
//! shows up instead of being papered over.

use chrono::Utc;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::llm_client::strip_json_fences;
use crate::models::interview::{DifficultyTier, QuestionSet, ResultSource, MAX_QUESTIONS};
use crate::models::learning::{LearningPath, LearningStep, StepDifficulty};

/// Used when a step carries no estimated time at all.
pub const DEFAULT_ESTIMATED_TIME: &str = "2-3주";

#[derive(Debug, Error)]
pub enum ResponseFormatError {
    #[error("response is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("response is missing required field '{0}'")]
    MissingField(String),

    #[error("field '{field}' should be {expected}")]
    WrongType {
        field: String,
        expected: &'static str,
    },

    #[error("field '{field}' has unknown difficulty '{value}'")]
    UnknownDifficulty { field: String, value: String },

    #[error("field '{0}' is empty")]
    EmptyField(String),
}

/// Parses `{"questions": [...], "analysis": "...", "difficulty": "MIDDLE"}`.
///
/// Questions may be plain strings or objects carrying a `question` key.
/// More than `MAX_QUESTIONS` are truncated with a warning.
pub fn parse_question_set(
    raw: &str,
    source: ResultSource,
) -> Result<QuestionSet, ResponseFormatError> {
    let root = parse_object(raw)?;

    let items = require_array(&root, "questions", "questions")?;
    let mut questions = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let field = format!("questions[{i}]");
        let text = match item {
            Value::String(s) => s.as_str(),
            Value::Object(obj) => require_str(obj, "question", &field)?,
            _ => {
                return Err(ResponseFormatError::WrongType {
                    field,
                    expected: "a string or an object with 'question'",
                })
            }
        };
        let text = text.trim();
        if !text.is_empty() {
            questions.push(text.to_string());
        }
    }

    if questions.is_empty() {
        return Err(ResponseFormatError::EmptyField("questions".to_string()));
    }
    if questions.len() > MAX_QUESTIONS {
        warn!(
            "Model returned {} questions, keeping the first {MAX_QUESTIONS}",
            questions.len()
        );
        questions.truncate(MAX_QUESTIONS);
    }

    let raw_difficulty = require_str(&root, "difficulty", "difficulty")?;
    let difficulty = DifficultyTier::parse_code(raw_difficulty).ok_or_else(|| {
        ResponseFormatError::UnknownDifficulty {
            field: "difficulty".to_string(),
            value: raw_difficulty.to_string(),
        }
    })?;

    let analysis = optional_str(&root, &["analysis"], "analysis")?.unwrap_or_default();

    debug!("Parsed {} questions at {:?}", questions.len(), difficulty);

    Ok(QuestionSet {
        questions,
        analysis,
        difficulty,
        source,
        generated_at: Utc::now(),
    })
}

/// Parses a learning path in either the camelCase schema used by the
/// single-model prompt or the snake_case schema used by the drafting model.
///
/// `learningSteps` and each step's `title` and `difficulty` are required.
/// The path must hold at least one step.
pub fn parse_learning_path(
    raw: &str,
    source: ResultSource,
) -> Result<LearningPath, ResponseFormatError> {
    let root = parse_object(raw)?;

    let items = match root.get("learningSteps").or_else(|| root.get("learning_steps")) {
        Some(Value::Array(items)) => items,
        Some(_) => {
            return Err(ResponseFormatError::WrongType {
                field: "learningSteps".to_string(),
                expected: "an array",
            })
        }
        None => return Err(ResponseFormatError::MissingField("learningSteps".to_string())),
    };

    let steps = items
        .iter()
        .enumerate()
        .map(|(i, item)| parse_step(i, item))
        .collect::<Result<Vec<_>, _>>()?;

    if steps.is_empty() {
        return Err(ResponseFormatError::EmptyField("learningSteps".to_string()));
    }

    Ok(LearningPath {
        job_role: optional_str(&root, &["jobRole", "job_role"], "jobRole")?.unwrap_or_default(),
        experience_level: optional_str(
            &root,
            &["experienceLevel", "experience_level"],
            "experienceLevel",
        )?
        .unwrap_or_default(),
        steps,
        overall_strategy: optional_str(
            &root,
            &["overallStrategy", "overall_strategy"],
            "overallStrategy",
        )?
        .unwrap_or_default(),
        total_duration: optional_str(
            &root,
            &["estimatedDuration", "estimated_duration"],
            "estimatedDuration",
        )?
        .unwrap_or_default(),
        source,
        generated_at: Utc::now(),
    })
}

fn parse_step(index: usize, item: &Value) -> Result<LearningStep, ResponseFormatError> {
    let prefix = format!("learningSteps[{index}]");
    let Value::Object(obj) = item else {
        return Err(ResponseFormatError::WrongType {
            field: prefix,
            expected: "an object",
        });
    };

    let title = require_str(obj, "title", &format!("{prefix}.title"))?
        .trim()
        .to_string();
    if title.is_empty() {
        return Err(ResponseFormatError::EmptyField(format!("{prefix}.title")));
    }

    let difficulty_field = format!("{prefix}.difficulty");
    let raw_difficulty = require_str(obj, "difficulty", &difficulty_field)?;
    let difficulty = StepDifficulty::parse_code(raw_difficulty).ok_or_else(|| {
        ResponseFormatError::UnknownDifficulty {
            field: difficulty_field,
            value: raw_difficulty.to_string(),
        }
    })?;

    let resources = match obj.get("resources") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(list)) => list
            .iter()
            .enumerate()
            .map(|(j, entry)| {
                entry
                    .as_str()
                    .map(str::to_string)
                    .ok_or_else(|| ResponseFormatError::WrongType {
                        field: format!("{prefix}.resources[{j}]"),
                        expected: "a string",
                    })
            })
            .collect::<Result<Vec<_>, _>>()?,
        Some(_) => {
            return Err(ResponseFormatError::WrongType {
                field: format!("{prefix}.resources"),
                expected: "an array of strings",
            })
        }
    };

    Ok(LearningStep {
        title,
        description: optional_str(obj, &["description"], &format!("{prefix}.description"))?,
        difficulty,
        estimated_time: optional_str(
            obj,
            &["estimatedTime", "estimated_time"],
            &format!("{prefix}.estimatedTime"),
        )?
        .unwrap_or_else(|| DEFAULT_ESTIMATED_TIME.to_string()),
        resources,
        objective: optional_str(
            obj,
            &["learningObjective", "learning_objective"],
            &format!("{prefix}.learningObjective"),
        )?
        .unwrap_or_default(),
    })
}

// ────────────────────────────────────────────────────────────────────────────
// JSON helpers
// ────────────────────────────────────────────────────────────────────────────

fn parse_object(raw: &str) -> Result<Map<String, Value>, ResponseFormatError> {
    let cleaned = strip_json_fences(raw);
    match serde_json::from_str::<Value>(cleaned)? {
        Value::Object(map) => Ok(map),
        _ => Err(ResponseFormatError::WrongType {
            field: "$".to_string(),
            expected: "a JSON object",
        }),
    }
}

fn require_array<'a>(
    obj: &'a Map<String, Value>,
    key: &str,
    field: &str,
) -> Result<&'a Vec<Value>, ResponseFormatError> {
    match obj.get(key) {
        Some(Value::Array(items)) => Ok(items),
        Some(_) => Err(ResponseFormatError::WrongType {
            field: field.to_string(),
            expected: "an array",
        }),
        None => Err(ResponseFormatError::MissingField(field.to_string())),
    }
}

fn require_str<'a>(
    obj: &'a Map<String, Value>,
    key: &str,
    field: &str,
) -> Result<&'a str, ResponseFormatError> {
    match obj.get(key) {
        Some(Value::String(s)) => Ok(s),
        Some(Value::Null) | None => Err(ResponseFormatError::MissingField(field.to_string())),
        Some(_) => Err(ResponseFormatError::WrongType {
            field: field.to_string(),
            expected: "a string",
        }),
    }
}

/// First present key among `keys`. Null counts as absent.
fn optional_str(
    obj: &Map<String, Value>,
    keys: &[&str],
    field: &str,
) -> Result<Option<String>, ResponseFormatError> {
    match keys.iter().find_map(|k| obj.get(*k)) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(ResponseFormatError::WrongType {
            field: field.to_string(),
            expected: "a string",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_question_set_round_trip() {
        let original = QuestionSet {
            questions: vec![
                "Rust의 소유권 모델을 설명해주세요.".to_string(),
                "async 런타임은 어떻게 동작하나요?".to_string(),
            ],
            analysis: "시스템 프로그래밍 이해도가 높습니다.".to_string(),
            difficulty: DifficultyTier::Senior,
            source: ResultSource::Model,
            generated_at: Utc::now(),
        };
        let wire = json!({
            "questions": original.questions,
            "analysis": original.analysis,
            "difficulty": original.difficulty.code(),
        })
        .to_string();

        let parsed = parse_question_set(&wire, ResultSource::Model).unwrap();
        assert_eq!(parsed.questions, original.questions);
        assert_eq!(parsed.analysis, original.analysis);
        assert_eq!(parsed.difficulty, original.difficulty);
        assert_eq!(parsed.source, original.source);
    }

    #[test]
    fn test_fenced_response_is_accepted() {
        let raw = "```json\n{\"questions\": [\"q1\"], \"difficulty\": \"JUNIOR\"}\n```";
        let set = parse_question_set(raw, ResultSource::Model).unwrap();
        assert_eq!(set.questions, vec!["q1"]);
        assert_eq!(set.analysis, "");
    }

    #[test]
    fn test_question_objects_are_accepted() {
        let raw = r#"{"questions": [{"question": "q1", "category": "BACKEND"}], "difficulty": "MIDDLE"}"#;
        let set = parse_question_set(raw, ResultSource::Model).unwrap();
        assert_eq!(set.questions, vec!["q1"]);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        let err = parse_question_set("{\"questions\": [", ResultSource::Model).unwrap_err();
        assert!(matches!(err, ResponseFormatError::InvalidJson(_)));
    }

    #[test]
    fn test_missing_questions_is_an_error() {
        let err = parse_question_set(r#"{"difficulty": "MIDDLE"}"#, ResultSource::Model).unwrap_err();
        assert!(matches!(err, ResponseFormatError::MissingField(f) if f == "questions"));
    }

    #[test]
    fn test_unknown_tier_is_an_error() {
        let raw = r#"{"questions": ["q"], "difficulty": "EXPERT"}"#;
        let err = parse_question_set(raw, ResultSource::Model).unwrap_err();
        assert!(matches!(err, ResponseFormatError::UnknownDifficulty { value, .. } if value == "EXPERT"));
    }

    #[test]
    fn test_missing_tier_is_an_error() {
        let err = parse_question_set(r#"{"questions": ["q"]}"#, ResultSource::Model).unwrap_err();
        assert!(matches!(err, ResponseFormatError::MissingField(f) if f == "difficulty"));
    }

    #[test]
    fn test_empty_question_list_is_an_error() {
        let raw = r#"{"questions": ["  "], "difficulty": "MIDDLE"}"#;
        let err = parse_question_set(raw, ResultSource::Model).unwrap_err();
        assert!(matches!(err, ResponseFormatError::EmptyField(_)));
    }

    #[test]
    fn test_excess_questions_are_truncated() {
        let questions: Vec<String> = (0..14).map(|i| format!("q{i}")).collect();
        let raw = json!({"questions": questions, "difficulty": "MIDDLE"}).to_string();
        let set = parse_question_set(&raw, ResultSource::Model).unwrap();
        assert_eq!(set.question_count(), MAX_QUESTIONS);
        assert_eq!(set.questions[9], "q9");
    }

    #[test]
    fn test_camel_case_learning_path() {
        let raw = r#"{
            "jobRole": "백엔드 개발자",
            "experienceLevel": "미들",
            "learningSteps": [{
                "title": "Spring Boot 심화 학습",
                "description": "고급 기능",
                "difficulty": "INTERMEDIATE",
                "estimatedTime": "4주",
                "resources": ["공식 문서"],
                "learningObjective": "마스터"
            }],
            "overallStrategy": "실무 중심",
            "estimatedDuration": "3개월"
        }"#;
        let path = parse_learning_path(raw, ResultSource::Model).unwrap();
        assert_eq!(path.total_steps(), 1);
        assert_eq!(path.steps[0].difficulty, StepDifficulty::Intermediate);
        assert_eq!(path.steps[0].objective, "마스터");
        assert_eq!(path.steps[0].description.as_deref(), Some("고급 기능"));
        assert_eq!(path.steps[0].resources, vec!["공식 문서"]);
        assert_eq!(path.total_duration, "3개월");
    }

    #[test]
    fn test_snake_case_learning_path_defaults_missing_time() {
        let raw = r#"{
            "learning_steps": [{"title": "기본 개념", "difficulty": "BEGINNER", "learning_objective": "기초"}],
            "overall_strategy": "단계별",
            "estimated_duration": "3개월"
        }"#;
        let path = parse_learning_path(raw, ResultSource::Model).unwrap();
        assert_eq!(path.steps[0].estimated_time, DEFAULT_ESTIMATED_TIME);
        assert_eq!(path.steps[0].objective, "기초");
        assert_eq!(path.overall_strategy, "단계별");
        assert!(path.steps[0].resources.is_empty());
        assert_eq!(path.steps[0].description, None);
    }

    #[test]
    fn test_non_string_resource_is_an_error() {
        let raw = r#"{"learningSteps": [
            {"title": "t", "difficulty": "BEGINNER", "resources": ["공식 문서", 3]}
        ]}"#;
        let err = parse_learning_path(raw, ResultSource::Model).unwrap_err();
        assert!(matches!(
            err,
            ResponseFormatError::WrongType { field, .. } if field == "learningSteps[0].resources[1]"
        ));
    }

    #[test]
    fn test_step_with_unknown_difficulty_is_an_error() {
        let raw = r#"{"learningSteps": [{"title": "t", "difficulty": "SENIOR"}]}"#;
        let err = parse_learning_path(raw, ResultSource::Model).unwrap_err();
        assert!(matches!(
            err,
            ResponseFormatError::UnknownDifficulty { field, .. } if field == "learningSteps[0].difficulty"
        ));
    }

    #[test]
    fn test_empty_learning_path_is_an_error() {
        let err = parse_learning_path(r#"{"learningSteps": []}"#, ResultSource::Model).unwrap_err();
        assert!(matches!(err, ResponseFormatError::EmptyField(_)));
    }

    #[test]
    fn test_non_object_root_is_an_error() {
        let err = parse_learning_path("[1, 2]", ResultSource::Model).unwrap_err();
        assert!(matches!(err, ResponseFormatError::WrongType { .. }));
    }
}
