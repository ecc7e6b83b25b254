//! Deterministic post-pass over a drafted learning path: annotate each step
//! for the candidate's experience tier, then drop steps too advanced for
//! junior candidates.

use tracing::debug;

use crate::errors::AppError;
use crate::models::interview::DifficultyTier;
use crate::models::learning::{LearningPath, LearningStep, StepDifficulty};
use crate::models::profile::Profile;

/// Title keywords that mark a step as beyond junior level. Matched against
/// the lowercased title.
const ADVANCED_TOPIC_KEYWORDS: &[&str] = &[
    "아키텍처",
    "설계",
    "시스템",
    "분산",
    "마이크로서비스",
    "성능 튜닝",
    "최적화",
    "고급",
    "심화",
    "전문가",
    "architecture",
    "design",
    "system",
    "distributed",
    "microservice",
    "performance tuning",
    "optimization",
    "advanced",
    "expert",
];

fn description_clause(tier: DifficultyTier) -> &'static str {
    match tier {
        DifficultyTier::Junior => " (기초 개념부터 차근차근 학습하세요)",
        DifficultyTier::Middle => " (실무 프로젝트에 적용해보세요)",
        DifficultyTier::Senior => " (시스템 설계 관점에서 고려해보세요)",
    }
}

/// The original estimate is kept and extended, never recomputed.
fn time_clause(tier: DifficultyTier) -> &'static str {
    match tier {
        DifficultyTier::Junior => " (추가 1-2주 권장)",
        DifficultyTier::Middle => "",
        DifficultyTier::Senior => " (집중 학습 시 단축 가능)",
    }
}

fn personalize_step(mut step: LearningStep, tier: DifficultyTier) -> LearningStep {
    if let Some(description) = step.description.as_mut() {
        description.push_str(description_clause(tier));
    }
    step.estimated_time.push_str(time_clause(tier));
    step
}

/// Juniors (under two years) skip advanced steps and advanced-topic titles.
/// Everyone else keeps every step.
pub fn is_step_appropriate(step: &LearningStep, profile: &Profile) -> bool {
    if profile.experience_tier() != DifficultyTier::Junior {
        return true;
    }
    if step.difficulty == StepDifficulty::Advanced {
        return false;
    }
    let title = step.title.to_lowercase();
    !ADVANCED_TOPIC_KEYWORDS.iter().any(|k| title.contains(k))
}

/// Personalizes and filters `draft` for `profile`.
///
/// Fails with `StructuralInvariant` when filtering leaves no steps.
pub fn personalize(mut draft: LearningPath, profile: &Profile) -> Result<LearningPath, AppError> {
    let tier = profile.experience_tier();
    let drafted = draft.steps.len();

    draft.steps = std::mem::take(&mut draft.steps)
        .into_iter()
        .map(|step| personalize_step(step, tier))
        .filter(|step| is_step_appropriate(step, profile))
        .collect();

    debug!(
        "Personalized learning path for profile {}: kept {} of {drafted} steps",
        profile.id,
        draft.steps.len()
    );

    if draft.steps.is_empty() {
        return Err(AppError::StructuralInvariant(format!(
            "every drafted learning step ({drafted}) was filtered out for a {} candidate",
            tier.display_name()
        )));
    }

    draft.job_role = profile.role.display_name().to_string();
    draft.experience_level = tier.display_name().to_string();
    Ok(draft)
}
