//! Prompt construction. Pure and deterministic: identical profiles produce
//! identical prompts, which keeps cache keys stable.
//!
//! Interview prompts are layered: base → reference material → reasoning
//! scaffold → exemplars. Each layer appends; none rewrites earlier text.

pub mod builder;
pub mod context;
pub mod knowledge;
pub mod templates;

pub use builder::{PromptBuilder, PromptError};
pub use context::PromptContext;

use crate::models::profile::Profile;
use templates::{
    DOCUMENT_SUMMARY_TEMPLATE, FEW_SHOT_EXEMPLARS, INTERVIEW_SCHEMA, INTERVIEW_TEMPLATE,
    LEARNING_PATH_SCHEMA, LEARNING_PATH_TEMPLATE, PATH_DRAFT_TEMPLATE, REASONING_SCAFFOLD,
    SKILL_ANALYSIS_TEMPLATE,
};

/// Base interview-question prompt.
pub fn interview_prompt(profile: &Profile) -> Result<String, PromptError> {
    let ctx = PromptContext::from_profile(profile);
    let schema = PromptBuilder::new("interview_schema", INTERVIEW_SCHEMA)
        .set("tier", ctx.tier.code())
        .build()?;
    candidate_fields(PromptBuilder::new("interview", INTERVIEW_TEMPLATE), &ctx)
        .set("schema", schema)
        .build()
}

/// Appends the step-by-step reasoning guidance.
pub fn with_reasoning_scaffold(mut prompt: String) -> String {
    prompt.push_str(REASONING_SCAFFOLD);
    prompt
}

/// Appends the fixed example questions.
pub fn with_exemplars(mut prompt: String) -> String {
    prompt.push_str(FEW_SHOT_EXEMPLARS);
    prompt
}

/// Single-model learning-path prompt (camelCase schema).
pub fn learning_path_prompt(profile: &Profile) -> Result<String, PromptError> {
    let ctx = PromptContext::from_profile(profile);
    let schema = PromptBuilder::new("learning_path_schema", LEARNING_PATH_SCHEMA)
        .set("role", ctx.role)
        .set("level", ctx.level())
        .build()?;
    candidate_fields(PromptBuilder::new("learning_path", LEARNING_PATH_TEMPLATE), &ctx)
        .set("schema", schema)
        .build()
}

pub fn skill_analysis_prompt(profile: &Profile) -> Result<String, PromptError> {
    let ctx = PromptContext::from_profile(profile);
    candidate_fields(PromptBuilder::new("skill_analysis", SKILL_ANALYSIS_TEMPLATE), &ctx).build()
}

/// Drafting prompt for the chained pipeline (snake_case schema).
pub fn path_draft_prompt(analysis: &str) -> Result<String, PromptError> {
    PromptBuilder::new("path_draft", PATH_DRAFT_TEMPLATE)
        .set("analysis", analysis)
        .build()
}

pub fn document_summary_prompt(document: &str) -> Result<String, PromptError> {
    PromptBuilder::new("document_summary", DOCUMENT_SUMMARY_TEMPLATE)
        .set("document", document)
        .build()
}

fn candidate_fields(builder: PromptBuilder, ctx: &PromptContext) -> PromptBuilder {
    builder
        .set("role", ctx.role)
        .set("years", ctx.years.to_string())
        .set("level", ctx.level())
        .set("summary", ctx.summary.clone())
        .set("projects", ctx.projects.clone())
        .set("skills", ctx.skills.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::JobRole;
    use uuid::Uuid;

    fn profile(years: u32) -> Profile {
        Profile {
            id: Uuid::new_v4(),
            role: JobRole::BackendDeveloper,
            experience_years: years,
            summary: "결제 시스템 백엔드 개발".to_string(),
            project_text: None,
            skills: vec!["Java".to_string(), "Spring".to_string(), "Redis".to_string()],
        }
    }

    #[test]
    fn test_interview_prompt_embeds_profile_and_schema() {
        let prompt = interview_prompt(&profile(6)).unwrap();
        assert!(prompt.contains("백엔드 개발자 분야의 전문 면접관"));
        assert!(prompt.contains("경력: 6년 (시니어)"));
        assert!(prompt.contains("프로젝트 경험: 없음"));
        assert!(prompt.contains("기술 스택: Java, Spring, Redis"));
        assert!(prompt.contains("\"difficulty\": \"SENIOR\""));
        assert!(!prompt.contains("{schema}"));
    }

    #[test]
    fn test_prompts_are_deterministic() {
        let p = profile(3);
        assert_eq!(interview_prompt(&p).unwrap(), interview_prompt(&p).unwrap());
        assert_eq!(
            learning_path_prompt(&p).unwrap(),
            learning_path_prompt(&p).unwrap()
        );
    }

    #[test]
    fn test_enrichment_stages_append_only() {
        let base = interview_prompt(&profile(1)).unwrap();
        let scaffolded = with_reasoning_scaffold(base.clone());
        let full = with_exemplars(scaffolded.clone());
        assert!(scaffolded.starts_with(&base));
        assert!(full.starts_with(&scaffolded));
        assert!(full.contains("[사고 과정]"));
        assert!(full.contains("Circuit Breaker"));
    }

    #[test]
    fn test_learning_path_prompt_schema_filled() {
        let prompt = learning_path_prompt(&profile(1)).unwrap();
        assert!(prompt.contains("\"jobRole\": \"백엔드 개발자\""));
        assert!(prompt.contains("\"experienceLevel\": \"주니어\""));
    }

    #[test]
    fn test_each_prompt_carries_only_its_own_header() {
        use templates::{INTERVIEW_GUIDE_HEADER, LEARNING_PATH_GUIDE_HEADER, PATH_DRAFT_HEADER};
        let p = profile(2);
        let headers = [INTERVIEW_GUIDE_HEADER, LEARNING_PATH_GUIDE_HEADER, PATH_DRAFT_HEADER];
        let prompts = [
            interview_prompt(&p).unwrap(),
            learning_path_prompt(&p).unwrap(),
            path_draft_prompt("분석").unwrap(),
        ];
        for (i, prompt) in prompts.iter().enumerate() {
            for (j, header) in headers.iter().enumerate() {
                assert_eq!(prompt.contains(header), i == j, "prompt {i}, header {j}");
            }
        }
    }

    #[test]
    fn test_draft_prompt_embeds_analysis_verbatim() {
        let prompt = path_draft_prompt("강점: {role} 없음").unwrap();
        assert!(prompt.contains("강점: {role} 없음"));
        assert!(prompt.contains("\"learning_steps\""));
    }
}
