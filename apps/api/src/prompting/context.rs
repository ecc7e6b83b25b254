use crate::models::interview::DifficultyTier;
use crate::models::profile::Profile;

/// Shown in place of absent free-text or list fields.
pub const ABSENT: &str = "없음";

/// Everything a generation prompt embeds about one candidate.
/// Built per request from the profile and never cached on its own.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptContext {
    pub role: &'static str,
    pub years: u32,
    pub tier: DifficultyTier,
    pub summary: String,
    pub projects: String,
    pub skills: String,
}

impl PromptContext {
    pub fn from_profile(profile: &Profile) -> Self {
        let summary = non_blank(&profile.summary).unwrap_or(ABSENT).to_string();
        let projects = profile
            .project_text
            .as_deref()
            .and_then(non_blank)
            .unwrap_or(ABSENT)
            .to_string();

        let skills: Vec<&str> = profile
            .skills
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect();
        let skills = if skills.is_empty() {
            ABSENT.to_string()
        } else {
            skills.join(", ")
        };

        Self {
            role: profile.role.display_name(),
            years: profile.experience_years,
            tier: profile.experience_tier(),
            summary,
            projects,
            skills,
        }
    }

    pub fn level(&self) -> &'static str {
        self.tier.display_name()
    }
}

fn non_blank(s: &str) -> Option<&str> {
    let s = s.trim();
    (!s.is_empty()).then_some(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::JobRole;
    use uuid::Uuid;

    fn profile() -> Profile {
        Profile {
            id: Uuid::new_v4(),
            role: JobRole::DataEngineer,
            experience_years: 3,
            summary: "  ETL 파이프라인 운영 ".to_string(),
            project_text: Some("   ".to_string()),
            skills: vec!["Spark".to_string(), " ".to_string(), "Airflow".to_string()],
        }
    }

    #[test]
    fn test_blank_fields_become_placeholder() {
        let ctx = PromptContext::from_profile(&profile());
        assert_eq!(ctx.projects, ABSENT);
        assert_eq!(ctx.summary, "ETL 파이프라인 운영");
    }

    #[test]
    fn test_skills_are_comma_joined() {
        let ctx = PromptContext::from_profile(&profile());
        assert_eq!(ctx.skills, "Spark, Airflow");
        assert_eq!(ctx.level(), "미들");
    }

    #[test]
    fn test_empty_skills_use_placeholder() {
        let mut p = profile();
        p.skills.clear();
        assert_eq!(PromptContext::from_profile(&p).skills, ABSENT);
    }
}
