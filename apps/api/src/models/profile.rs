use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::interview::DifficultyTier;

/// Job role a candidate is applying for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobRole {
    BackendDeveloper,
    FrontendDeveloper,
    FullstackDeveloper,
    DevopsEngineer,
    DataEngineer,
    DataScientist,
    MlEngineer,
    AiEngineer,
    SystemArchitect,
    ProductManager,
    QaEngineer,
    SecurityEngineer,
}

impl JobRole {
    pub const ALL: [JobRole; 12] = [
        JobRole::BackendDeveloper,
        JobRole::FrontendDeveloper,
        JobRole::FullstackDeveloper,
        JobRole::DevopsEngineer,
        JobRole::DataEngineer,
        JobRole::DataScientist,
        JobRole::MlEngineer,
        JobRole::AiEngineer,
        JobRole::SystemArchitect,
        JobRole::ProductManager,
        JobRole::QaEngineer,
        JobRole::SecurityEngineer,
    ];

    /// Korean display name embedded in prompts. Fallback selection keys off these.
    pub fn display_name(&self) -> &'static str {
        match self {
            JobRole::BackendDeveloper => "백엔드 개발자",
            JobRole::FrontendDeveloper => "프론트엔드 개발자",
            JobRole::FullstackDeveloper => "풀스택 개발자",
            JobRole::DevopsEngineer => "DevOps 엔지니어",
            JobRole::DataEngineer => "데이터 엔지니어",
            JobRole::DataScientist => "데이터 사이언티스트",
            JobRole::MlEngineer => "머신러닝 엔지니어",
            JobRole::AiEngineer => "AI 엔지니어",
            JobRole::SystemArchitect => "시스템 아키텍트",
            JobRole::ProductManager => "프로덕트 매니저",
            JobRole::QaEngineer => "QA 엔지니어",
            JobRole::SecurityEngineer => "보안 엔지니어",
        }
    }

    /// Storage code, identical to the serde representation.
    pub fn code(&self) -> &'static str {
        match self {
            JobRole::BackendDeveloper => "BACKEND_DEVELOPER",
            JobRole::FrontendDeveloper => "FRONTEND_DEVELOPER",
            JobRole::FullstackDeveloper => "FULLSTACK_DEVELOPER",
            JobRole::DevopsEngineer => "DEVOPS_ENGINEER",
            JobRole::DataEngineer => "DATA_ENGINEER",
            JobRole::DataScientist => "DATA_SCIENTIST",
            JobRole::MlEngineer => "ML_ENGINEER",
            JobRole::AiEngineer => "AI_ENGINEER",
            JobRole::SystemArchitect => "SYSTEM_ARCHITECT",
            JobRole::ProductManager => "PRODUCT_MANAGER",
            JobRole::QaEngineer => "QA_ENGINEER",
            JobRole::SecurityEngineer => "SECURITY_ENGINEER",
        }
    }

    pub fn from_code(code: &str) -> Option<JobRole> {
        JobRole::ALL.into_iter().find(|r| r.code() == code)
    }
}

/// Candidate profile. Read-only to the generation pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub role: JobRole,
    pub experience_years: u32,
    pub summary: String,
    pub project_text: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
}

impl Profile {
    /// `years >= 5` senior, `years >= 2` middle, otherwise junior.
    pub fn experience_tier(&self) -> DifficultyTier {
        DifficultyTier::from_years(self.experience_years)
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct ProfileRow {
    pub id: Uuid,
    pub role: String,
    pub experience_years: i32,
    pub summary: String,
    pub project_text: Option<String>,
    pub skills: Vec<String>,
    #[allow(dead_code)]
    pub created_at: DateTime<Utc>,
    #[allow(dead_code)]
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ProfileRow> for Profile {
    type Error = anyhow::Error;

    fn try_from(row: ProfileRow) -> Result<Self, Self::Error> {
        let role = JobRole::from_code(&row.role)
            .ok_or_else(|| anyhow::anyhow!("profile {} has unknown role '{}'", row.id, row.role))?;
        let experience_years = u32::try_from(row.experience_years).map_err(|_| {
            anyhow::anyhow!(
                "profile {} has negative experience_years {}",
                row.id,
                row.experience_years
            )
        })?;

        Ok(Profile {
            id: row.id,
            role,
            experience_years,
            summary: row.summary,
            project_text: row.project_text,
            skills: row.skills,
        })
    }
}
