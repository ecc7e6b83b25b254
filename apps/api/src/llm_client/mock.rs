//! Deterministic stand-in for every model role. Selected with
//! `MODEL_PROVIDER=mock`, and used for the secondary roles whenever their API
//! keys are not configured.

use async_trait::async_trait;

use crate::llm_client::{ModelClient, ModelError, PathDrafter, SkillAnalyzer};
use crate::models::profile::Profile;
use crate::prompting::templates::{
    INTERVIEW_GUIDE_HEADER, LEARNING_PATH_GUIDE_HEADER, PATH_DRAFT_HEADER,
};

const MOCK_QUESTIONS: &str = r#"{
    "questions": [
        "의존성 주입(Dependency Injection)의 장점에 대해 설명해주세요.",
        "ORM과 SQL 매퍼의 차이점을 설명하고, 각각 언제 사용하는 것이 좋은지 알려주세요.",
        "RESTful API 설계 원칙에 대해 설명하고, 실제 프로젝트에서 어떻게 적용했는지 예시를 들어주세요.",
        "데이터베이스 인덱스의 개념과 장단점에 대해 설명해주세요.",
        "트랜잭션의 ACID 속성에 대해 설명해주세요."
    ],
    "analysis": "기본적인 개발 지식을 보유하고 있으며, 실무 사례 중심의 검증이 필요합니다.",
    "difficulty": "MIDDLE"
}"#;

const MOCK_LEARNING_PATH: &str = r#"{
    "jobRole": "개발자",
    "experienceLevel": "미들",
    "learningSteps": [
        {
            "title": "프레임워크 기초 학습",
            "description": "핵심 개념과 기본 구조를 이해합니다.",
            "difficulty": "BEGINNER",
            "estimatedTime": "2주",
            "resources": ["공식 문서", "온라인 강의"],
            "learningObjective": "프레임워크 기본 구조 이해"
        },
        {
            "title": "데이터베이스 연동",
            "description": "ORM을 사용한 데이터베이스 연동 방법을 학습합니다.",
            "difficulty": "INTERMEDIATE",
            "estimatedTime": "3주",
            "resources": ["ORM 가이드", "실습 프로젝트"],
            "learningObjective": "영속성 계층 구현 능력 확보"
        },
        {
            "title": "RESTful API 구현",
            "description": "API 설계 원칙을 학습하고 실제 API를 구현합니다.",
            "difficulty": "INTERMEDIATE",
            "estimatedTime": "2주",
            "resources": ["REST API 설계 가이드", "API 테스트 도구"],
            "learningObjective": "실무 수준의 API 구현"
        }
    ],
    "overallStrategy": "기초부터 실무 적용까지 단계별 학습",
    "estimatedDuration": "2개월"
}"#;

const MOCK_DRAFT: &str = r#"{
    "learning_steps": [
        {
            "title": "기본 개념 학습",
            "description": "핵심 개념을 이해합니다",
            "difficulty": "BEGINNER",
            "estimated_time": "2주",
            "resources": ["온라인 강의", "책"],
            "learning_objective": "기본 개념 습득"
        },
        {
            "title": "실무 프로젝트 적용",
            "description": "학습한 내용을 작은 프로젝트에 적용합니다",
            "difficulty": "INTERMEDIATE",
            "estimated_time": "3주",
            "resources": ["사이드 프로젝트", "코드 리뷰"],
            "learning_objective": "실무 적용 경험 확보"
        },
        {
            "title": "마이크로서비스 아키텍처",
            "description": "서비스 분리와 통신 패턴을 학습합니다",
            "difficulty": "ADVANCED",
            "estimated_time": "4주",
            "resources": ["마이크로서비스 패턴", "Docker & Kubernetes"],
            "learning_objective": "분산 시스템 설계 역량 강화"
        }
    ],
    "overall_strategy": "단계별 학습 전략",
    "estimated_duration": "3개월"
}"#;

/// Canned model. Answers by the prompt kind its template header names.
#[derive(Debug, Clone)]
pub struct MockModel {
    name: String,
}

impl MockModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[async_trait]
impl ModelClient for MockModel {
    async fn invoke(&self, prompt: &str) -> Result<String, ModelError> {
        // Template headers, not free words: profile text may mention anything.
        let reply = if prompt.contains(LEARNING_PATH_GUIDE_HEADER) {
            MOCK_LEARNING_PATH.to_string()
        } else if prompt.contains(INTERVIEW_GUIDE_HEADER) {
            MOCK_QUESTIONS.to_string()
        } else if prompt.contains(PATH_DRAFT_HEADER) {
            MOCK_DRAFT.to_string()
        } else {
            let head: String = prompt.chars().take(50).collect();
            format!("Mock {} response: {head}...", self.name)
        };
        Ok(reply)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[async_trait]
impl SkillAnalyzer for MockModel {
    async fn analyze_tech_skills(&self, profile: &Profile) -> Result<String, ModelError> {
        Ok(format!(
            "Mock tech analysis for {} with {} years experience",
            profile.role.display_name(),
            profile.experience_years
        ))
    }
}

#[async_trait]
impl PathDrafter for MockModel {
    async fn draft_learning_path(&self, _analysis: &str) -> Result<String, ModelError> {
        Ok(MOCK_DRAFT.to_string())
    }

    async fn summarize_document(&self, document: &str) -> Result<String, ModelError> {
        let head: String = document.chars().take(100).collect();
        Ok(format!("Mock document analysis: {head}..."))
    }
}

/// Client that fails every call. Drives the fallback path in tests.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct FailingModel;

#[cfg(test)]
#[async_trait]
impl ModelClient for FailingModel {
    async fn invoke(&self, _prompt: &str) -> Result<String, ModelError> {
        Err(ModelError::Api {
            status: 503,
            message: "service unavailable".to_string(),
        })
    }

    fn name(&self) -> &str {
        "Failing"
    }
}

#[cfg(test)]
impl SkillAnalyzer for FailingModel {}

#[cfg(test)]
impl PathDrafter for FailingModel {}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(summary: &str) -> Profile {
        Profile {
            id: uuid::Uuid::new_v4(),
            role: crate::models::profile::JobRole::BackendDeveloper,
            experience_years: 3,
            summary: summary.to_string(),
            project_text: None,
            skills: vec!["Rust".to_string()],
        }
    }

    #[tokio::test]
    async fn test_mock_answers_interview_prompts_with_questions() {
        let model = MockModel::new("Mock");
        let prompt = crate::prompting::interview_prompt(&profile("학습 플랫폼 개발")).unwrap();
        let reply = model.invoke(&prompt).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&reply).unwrap();
        assert_eq!(value["questions"].as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_mock_routes_learning_path_prompt_mentioning_interviews() {
        let model = MockModel::new("Mock");
        let prompt = crate::prompting::learning_path_prompt(&profile("면접 일정 관리 서비스 개발")).unwrap();
        let reply = model.invoke(&prompt).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&reply).unwrap();
        assert_eq!(value["learningSteps"].as_array().unwrap().len(), 3);
        assert!(value.get("questions").is_none());
    }

    #[tokio::test]
    async fn test_mock_answers_other_prompts_with_echo() {
        let model = MockModel::new("Mock");
        let reply = model.invoke("hello").await.unwrap();
        assert_eq!(reply, "Mock Mock response: hello...");
    }

    #[tokio::test]
    async fn test_mock_health_check_succeeds() {
        assert!(MockModel::new("Mock").health_check().await.is_ok());
    }

    #[tokio::test]
    async fn test_failing_model_health_check_fails() {
        assert!(FailingModel.health_check().await.is_err());
    }

    #[tokio::test]
    async fn test_mock_draft_is_snake_case() {
        let draft = MockModel::new("Mock").draft_learning_path("x").await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&draft).unwrap();
        assert_eq!(value["learning_steps"].as_array().unwrap().len(), 3);
    }
}
