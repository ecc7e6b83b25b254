use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::interview::ResultSource;

/// Difficulty of a learning step. Distinct from the assessment tier scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StepDifficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl StepDifficulty {
    pub fn code(&self) -> &'static str {
        match self {
            StepDifficulty::Beginner => "BEGINNER",
            StepDifficulty::Intermediate => "INTERMEDIATE",
            StepDifficulty::Advanced => "ADVANCED",
        }
    }

    pub fn parse_code(raw: &str) -> Option<Self> {
        [
            StepDifficulty::Beginner,
            StepDifficulty::Intermediate,
            StepDifficulty::Advanced,
        ]
        .into_iter()
        .find(|d| d.code().eq_ignore_ascii_case(raw.trim()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningStep {
    pub title: String,
    /// `None` when the model left it out; an empty string is kept as given.
    pub description: Option<String>,
    pub difficulty: StepDifficulty,
    pub estimated_time: String,
    pub resources: Vec<String>,
    pub objective: String,
}

/// A learning path. Always holds at least one step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningPath {
    pub job_role: String,
    pub experience_level: String,
    pub steps: Vec<LearningStep>,
    pub overall_strategy: String,
    pub total_duration: String,
    pub source: ResultSource,
    pub generated_at: DateTime<Utc>,
}

impl LearningPath {
    pub fn total_steps(&self) -> usize {
        self.steps.len()
    }
}
