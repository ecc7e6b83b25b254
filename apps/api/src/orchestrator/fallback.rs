//! Canned responses substituted when a model call fails.
//!
//! Selection keys off the role name embedded in the prompt. Every canned
//! body parses cleanly with the regular response parser, so a degraded
//! result satisfies the same invariants as a live one.

const BACKEND_KEYWORD: &str = "백엔드";
const FRONTEND_KEYWORD: &str = "프론트엔드";

const BACKEND_QUESTIONS: &str = r#"{
    "questions": [
        "Spring Boot의 자동 설정(Auto Configuration)이 어떻게 동작하는지 설명해 주세요.",
        "JPA에서 N+1 문제를 어떻게 해결하시나요?",
        "REST API 설계 시 고려해야 할 점들은 무엇인가요?",
        "데이터베이스 인덱스의 종류와 각각의 특징을 설명해 주세요.",
        "트랜잭션의 ACID 속성에 대해 설명하고, 실제 프로젝트에서 어떻게 보장했는지 예시를 들어 주세요."
    ],
    "analysis": "백엔드 개발자로서 기본적인 Spring 생태계 이해도와 데이터베이스 지식을 검증하는 질문입니다. 실무 경험을 바탕으로 한 구체적인 사례 제시가 필요합니다.",
    "difficulty": "MIDDLE"
}"#;

const FRONTEND_QUESTIONS: &str = r#"{
    "questions": [
        "React의 Virtual DOM이 무엇이고, 실제 DOM과의 차이점은 무엇인가요?",
        "상태 관리 라이브러리(Redux, Zustand 등)를 언제 사용하시나요?",
        "웹 성능 최적화를 위해 어떤 기법들을 사용하시나요?",
        "TypeScript를 사용하는 이유와 JavaScript 대비 장점은 무엇인가요?",
        "반응형 웹 디자인을 구현할 때 고려해야 할 점들은 무엇인가요?"
    ],
    "analysis": "프론트엔드 기술 스택에 대한 기본 이해도를 검증하는 질문입니다. 최신 트렌드와 성능 최적화에 대한 깊은 이해가 필요합니다.",
    "difficulty": "MIDDLE"
}"#;

const GENERAL_QUESTIONS: &str = r#"{
    "questions": [
        "가장 최근에 진행한 프로젝트에서 어떤 역할을 담당하셨나요?",
        "팀 프로젝트에서 겪었던 어려움과 해결 방법을 설명해 주세요.",
        "새로운 기술을 학습할 때 어떤 방법을 사용하시나요?",
        "코드 리뷰 시 중점적으로 확인하는 부분은 무엇인가요?",
        "개발 과정에서 발생한 버그를 어떻게 디버깅하시나요?"
    ],
    "analysis": "일반적인 개발 역량과 문제 해결 능력을 검증할 수 있는 질문들입니다.",
    "difficulty": "JUNIOR"
}"#;

const BACKEND_PATH: &str = r#"{
    "jobRole": "백엔드 개발자",
    "experienceLevel": "미들",
    "learningSteps": [
        {
            "title": "Spring Boot 심화 학습",
            "description": "Spring Boot의 고급 기능들을 학습합니다.",
            "difficulty": "INTERMEDIATE",
            "estimatedTime": "4주",
            "resources": ["Spring Boot 공식 문서", "온라인 강의", "실습 프로젝트"],
            "learningObjective": "Spring Boot 고급 기능 마스터"
        },
        {
            "title": "마이크로서비스 아키텍처",
            "description": "마이크로서비스 설계와 구현을 학습합니다.",
            "difficulty": "ADVANCED",
            "estimatedTime": "6주",
            "resources": ["마이크로서비스 패턴", "Docker & Kubernetes", "실무 프로젝트"],
            "learningObjective": "마이크로서비스 아키텍처 설계 능력 향상"
        },
        {
            "title": "데이터베이스 최적화",
            "description": "성능 튜닝과 최적화 기법을 학습합니다.",
            "difficulty": "INTERMEDIATE",
            "estimatedTime": "3주",
            "resources": ["SQL 튜닝 가이드", "인덱스 설계", "실제 성능 측정"],
            "learningObjective": "데이터베이스 성능 최적화 능력 향상"
        }
    ],
    "overallStrategy": "단계별 실무 중심 학습을 통한 백엔드 개발자 역량 강화",
    "estimatedDuration": "3개월"
}"#;

const FRONTEND_PATH: &str = r#"{
    "jobRole": "프론트엔드 개발자",
    "experienceLevel": "미들",
    "learningSteps": [
        {
            "title": "React 고급 패턴",
            "description": "React의 고급 패턴과 최적화 기법을 학습합니다.",
            "difficulty": "INTERMEDIATE",
            "estimatedTime": "4주",
            "resources": ["React 공식 문서", "고급 패턴 가이드", "성능 최적화"],
            "learningObjective": "React 고급 패턴 마스터"
        },
        {
            "title": "상태 관리 심화",
            "description": "복잡한 상태 관리 패턴을 학습합니다.",
            "difficulty": "ADVANCED",
            "estimatedTime": "3주",
            "resources": ["Redux Toolkit", "Zustand", "실무 사례"],
            "learningObjective": "효율적인 상태 관리 설계 능력 향상"
        }
    ],
    "overallStrategy": "현대적인 프론트엔드 개발 역량 강화",
    "estimatedDuration": "2개월"
}"#;

const GENERAL_PATH: &str = r#"{
    "jobRole": "개발자",
    "experienceLevel": "주니어",
    "learningSteps": [
        {
            "title": "기본 개발 역량 강화",
            "description": "프로그래밍 기본기를 다집니다.",
            "difficulty": "BEGINNER",
            "estimatedTime": "6주",
            "resources": ["프로그래밍 기초", "알고리즘 문제 풀이", "코딩 테스트"],
            "learningObjective": "기본 프로그래밍 역량 향상"
        }
    ],
    "overallStrategy": "기본기를 바탕으로 한 단계적 성장",
    "estimatedDuration": "2개월"
}"#;

/// Snake_case draft used when the drafting model is unreachable. Opens with
/// a beginner step so junior filtering always leaves something behind.
pub const CANNED_DRAFT: &str = r#"{
    "learning_steps": [
        {
            "title": "핵심 기본기 다지기",
            "description": "직무에 필요한 핵심 개념과 도구를 정리합니다",
            "difficulty": "BEGINNER",
            "estimated_time": "2주",
            "resources": ["공식 문서", "온라인 강의"],
            "learning_objective": "핵심 개념의 정확한 이해"
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
            "title": "분산 시스템 설계",
            "description": "확장 가능한 서비스 구조와 장애 대응을 학습합니다",
            "difficulty": "ADVANCED",
            "estimated_time": "4주",
            "resources": ["Designing Data-Intensive Applications", "사례 연구"],
            "learning_objective": "대규모 시스템 설계 역량 강화"
        }
    ],
    "overall_strategy": "기본기에서 출발해 실무 적용과 설계 역량으로 확장하는 단계별 학습",
    "estimated_duration": "3개월"
}"#;

pub fn canned_questions(prompt: &str) -> &'static str {
    if prompt.contains(BACKEND_KEYWORD) {
        BACKEND_QUESTIONS
    } else if prompt.contains(FRONTEND_KEYWORD) {
        FRONTEND_QUESTIONS
    } else {
        GENERAL_QUESTIONS
    }
}

pub fn canned_learning_path(prompt: &str) -> &'static str {
    if prompt.contains(BACKEND_KEYWORD) {
        BACKEND_PATH
    } else if prompt.contains(FRONTEND_KEYWORD) {
        FRONTEND_PATH
    } else {
        GENERAL_PATH
    }
}

/// Stand-in for the analysis model's output. Only feeds the drafting prompt.
pub fn canned_analysis(role: &str, years: u32, skills: &str) -> String {
    format!(
        "{role} 지원자 (경력 {years}년). 보유 기술: {skills}. \
         자동 분석을 사용할 수 없어 기본 역량 진단을 기준으로 학습 경로를 구성합니다."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::interview::ResultSource;
    use crate::parsing::{parse_learning_path, parse_question_set};

    #[test]
    fn test_selection_by_role_keyword() {
        assert_eq!(canned_questions("당신은 백엔드 개발자 분야의"), BACKEND_QUESTIONS);
        assert_eq!(canned_questions("당신은 프론트엔드 개발자 분야의"), FRONTEND_QUESTIONS);
        assert_eq!(canned_questions("당신은 QA 엔지니어 분야의"), GENERAL_QUESTIONS);
        assert_eq!(canned_learning_path("백엔드"), BACKEND_PATH);
        assert_eq!(canned_learning_path("기타"), GENERAL_PATH);
    }

    #[test]
    fn test_every_canned_body_parses() {
        for body in [BACKEND_QUESTIONS, FRONTEND_QUESTIONS, GENERAL_QUESTIONS] {
            let set = parse_question_set(body, ResultSource::Fallback).unwrap();
            assert_eq!(set.questions.len(), 5);
        }
        for body in [BACKEND_PATH, FRONTEND_PATH, GENERAL_PATH, CANNED_DRAFT] {
            assert!(!parse_learning_path(body, ResultSource::Fallback)
                .unwrap()
                .steps
                .is_empty());
        }
    }
}
