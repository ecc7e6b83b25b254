use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Assessment difficulty. Ordered junior < middle < senior; transitions move one step at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DifficultyTier {
    Junior,
    Middle,
    Senior,
}

impl DifficultyTier {
    pub fn from_years(years: u32) -> Self {
        if years >= 5 {
            DifficultyTier::Senior
        } else if years >= 2 {
            DifficultyTier::Middle
        } else {
            DifficultyTier::Junior
        }
    }

    /// One step up, saturating at senior.
    pub fn step_up(self) -> Self {
        match self {
            DifficultyTier::Junior => DifficultyTier::Middle,
            DifficultyTier::Middle | DifficultyTier::Senior => DifficultyTier::Senior,
        }
    }

    /// One step down, saturating at junior.
    pub fn step_down(self) -> Self {
        match self {
            DifficultyTier::Senior => DifficultyTier::Middle,
            DifficultyTier::Middle | DifficultyTier::Junior => DifficultyTier::Junior,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            DifficultyTier::Junior => "JUNIOR",
            DifficultyTier::Middle => "MIDDLE",
            DifficultyTier::Senior => "SENIOR",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            DifficultyTier::Junior => "주니어",
            DifficultyTier::Middle => "미들",
            DifficultyTier::Senior => "시니어",
        }
    }

    /// Case-insensitive match against the tier codes. Anything else is `None`.
    pub fn parse_code(raw: &str) -> Option<Self> {
        [
            DifficultyTier::Junior,
            DifficultyTier::Middle,
            DifficultyTier::Senior,
        ]
        .into_iter()
        .find(|t| t.code().eq_ignore_ascii_case(raw.trim()))
    }
}

/// Where a structured result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultSource {
    /// Parsed from a live model response.
    Model,
    /// Canned content substituted after a model call failed.
    Fallback,
    /// Produced by the adaptive-difficulty engine without a model call.
    Adaptive,
}

/// Generated interview questions. Holds 1–10 questions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionSet {
    pub questions: Vec<String>,
    pub analysis: String,
    pub difficulty: DifficultyTier,
    pub source: ResultSource,
    pub generated_at: DateTime<Utc>,
}

pub const MAX_QUESTIONS: usize = 10;

impl QuestionSet {
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }
}

/// One answered question in a candidate's history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub question: String,
    pub answer: String,
    pub response_time_secs: u32,
    /// Self-reported or inferred, in [0, 1].
    pub confidence: f64,
    pub correct: bool,
    #[serde(default)]
    pub feedback: String,
}
