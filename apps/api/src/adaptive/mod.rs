//! Adaptive difficulty. Stateless: every call recomputes from the full
//! answer history it is given, so calls for different candidates can run
//! concurrently. Ordering and deduplication of a history are the caller's job.

use std::fmt::Write as _;

use chrono::Utc;
use serde::Serialize;
use tracing::info;

use crate::models::interview::{AnswerRecord, DifficultyTier, QuestionSet, ResultSource};
use crate::models::profile::Profile;

pub const FIRST_QUESTION_RATIONALE: &str = "첫 번째 질문입니다.";

const RAISE_QUALITY: f64 = 0.8;
const RAISE_ACCURACY: f64 = 0.8;
const LOWER_QUALITY: f64 = 0.4;
const LOWER_ACCURACY: f64 = 0.4;
/// Quality is a sum of tenths, so boundary histories land a few ulps off.
const THRESHOLD_EPSILON: f64 = 1e-9;

/// Follow-up questions served with an adjusted tier.
pub const FOLLOW_UP_QUESTIONS: [&str; 5] = [
    "이전 답변을 바탕으로 더 구체적인 사례를 들어 설명해 주세요.",
    "실제 프로젝트에서 어떻게 이 기술을 적용하셨나요?",
    "이 기술의 한계점과 대안에 대해 어떻게 생각하시나요?",
    "팀 프로젝트에서 이 기술을 도입할 때 겪었던 어려움은 무엇이었나요?",
    "최신 트렌드와 비교했을 때 이 기술의 장단점은 무엇인가요?",
];

// ────────────────────────────────────────────────────────────────────────────
// Answer analytics
// ────────────────────────────────────────────────────────────────────────────

/// Aggregates over a non-empty answer history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnswerAnalysis {
    pub answered: usize,
    /// correct / total, in [0, 1].
    pub accuracy: f64,
    pub avg_response_secs: f64,
    pub avg_confidence: f64,
    /// Mean per-answer quality, in [0, 1].
    pub quality: f64,
}

/// Rewards answers in the 30–120s band; rushed and drawn-out answers score
/// lower.
pub fn time_weight(response_time_secs: u32) -> f64 {
    match response_time_secs {
        0..=9 => 0.0,
        10..=30 => 0.1,
        31..=120 => 0.2,
        121..=300 => 0.1,
        _ => 0.0,
    }
}

/// `0.6·correct + time_weight + 0.2·confidence` for one answer.
pub fn answer_quality(answer: &AnswerRecord) -> f64 {
    let correctness = if answer.correct { 0.6 } else { 0.0 };
    correctness + time_weight(answer.response_time_secs) + 0.2 * answer.confidence
}

/// `None` for an empty history.
pub fn analyze_answers(history: &[AnswerRecord]) -> Option<AnswerAnalysis> {
    if history.is_empty() {
        return None;
    }
    let n = history.len() as f64;
    let correct = history.iter().filter(|a| a.correct).count() as f64;

    Some(AnswerAnalysis {
        answered: history.len(),
        accuracy: correct / n,
        avg_response_secs: history
            .iter()
            .map(|a| f64::from(a.response_time_secs))
            .sum::<f64>()
            / n,
        avg_confidence: history.iter().map(|a| a.confidence).sum::<f64>() / n,
        quality: history.iter().map(answer_quality).sum::<f64>() / n,
    })
}

/// Rejects histories the engine cannot reason about.
pub fn validate_history(history: &[AnswerRecord]) -> Result<(), String> {
    for (i, answer) in history.iter().enumerate() {
        if !(0.0..=1.0).contains(&answer.confidence) {
            return Err(format!(
                "history[{i}].confidence must be within [0, 1], got {}",
                answer.confidence
            ));
        }
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Tier transitions
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    Up,
    Down,
    Hold,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DifficultyAdjustment {
    pub previous: DifficultyTier,
    pub tier: DifficultyTier,
    pub transition: Transition,
    pub rationale: String,
    /// Absent when the history was empty.
    pub analysis: Option<AnswerAnalysis>,
}

fn transition_for(analysis: &AnswerAnalysis) -> Transition {
    let at_least = |value: f64, bound: f64| value >= bound - THRESHOLD_EPSILON;
    let at_most = |value: f64, bound: f64| value <= bound + THRESHOLD_EPSILON;

    if at_least(analysis.quality, RAISE_QUALITY) && at_least(analysis.accuracy, RAISE_ACCURACY) {
        Transition::Up
    } else if at_most(analysis.quality, LOWER_QUALITY) || at_most(analysis.accuracy, LOWER_ACCURACY)
    {
        Transition::Down
    } else {
        Transition::Hold
    }
}

/// Moves at most one step from `current`. Pure: identical inputs give
/// identical output.
pub fn adjust_tier(current: DifficultyTier, history: &[AnswerRecord]) -> DifficultyAdjustment {
    let Some(analysis) = analyze_answers(history) else {
        return DifficultyAdjustment {
            previous: current,
            tier: current,
            transition: Transition::Hold,
            rationale: FIRST_QUESTION_RATIONALE.to_string(),
            analysis: None,
        };
    };

    let transition = transition_for(&analysis);
    let tier = match transition {
        Transition::Up => current.step_up(),
        Transition::Down => current.step_down(),
        Transition::Hold => current,
    };

    DifficultyAdjustment {
        previous: current,
        tier,
        transition,
        rationale: rationale(&analysis, transition, current == tier),
        analysis: Some(analysis),
    }
}

/// Adjusts from the tier implied by the profile's experience.
pub fn adjust_difficulty(profile: &Profile, history: &[AnswerRecord]) -> DifficultyAdjustment {
    let adjustment = adjust_tier(profile.experience_tier(), history);
    info!(
        "Difficulty for profile {}: {:?} -> {:?} ({} answers)",
        profile.id,
        adjustment.previous,
        adjustment.tier,
        history.len()
    );
    adjustment
}

fn rationale(analysis: &AnswerAnalysis, transition: Transition, saturated: bool) -> String {
    let mut out = String::new();

    match transition {
        Transition::Up if saturated => {
            out.push_str("정답률과 답변 품질이 높지만 이미 최고 난이도입니다. ")
        }
        Transition::Up => out.push_str("정답률과 답변 품질이 높아 난이도를 상향 조정했습니다. "),
        Transition::Down if saturated => {
            out.push_str("정답률 또는 답변 품질이 낮지만 이미 최저 난이도입니다. ")
        }
        Transition::Down => {
            out.push_str("정답률 또는 답변 품질이 낮아 난이도를 하향 조정했습니다. ")
        }
        Transition::Hold => out.push_str("적절한 성과로 현재 난이도를 유지합니다. "),
    }

    if analysis.avg_response_secs < 30.0 {
        out.push_str("답변 시간이 빠르므로 더 깊이 있는 질문을 준비했습니다. ");
    } else if analysis.avg_response_secs > 120.0 {
        out.push_str("답변 시간이 길어 더 명확하고 간결한 질문을 준비했습니다. ");
    }

    if analysis.avg_confidence >= 0.8 {
        out.push_str("자신감이 높아 도전적인 질문을 추가했습니다. ");
    } else if analysis.avg_confidence <= 0.4 {
        out.push_str("자신감이 낮아 격려와 함께 기본적인 질문을 준비했습니다. ");
    }

    out.trim_end().to_string()
}

// ────────────────────────────────────────────────────────────────────────────
// Adaptive question set
// ────────────────────────────────────────────────────────────────────────────

/// Follow-up questions at the adjusted tier, with an analytics summary.
/// No model call is made.
pub fn adaptive_questions(profile: &Profile, history: &[AnswerRecord]) -> QuestionSet {
    let adjustment = adjust_difficulty(profile, history);

    QuestionSet {
        questions: FOLLOW_UP_QUESTIONS.iter().map(|q| q.to_string()).collect(),
        analysis: analysis_summary(&adjustment),
        difficulty: adjustment.tier,
        source: ResultSource::Adaptive,
        generated_at: Utc::now(),
    }
}

fn analysis_summary(adjustment: &DifficultyAdjustment) -> String {
    let a = adjustment.analysis.clone().unwrap_or(AnswerAnalysis {
        answered: 0,
        accuracy: 0.0,
        avg_response_secs: 0.0,
        avg_confidence: 0.0,
        quality: 0.0,
    });

    let mut out = String::new();
    let _ = writeln!(out, "[적응형 면접 분석 결과]");
    let _ = writeln!(out, "- 정답률: {:.1}%", a.accuracy * 100.0);
    let _ = writeln!(out, "- 평균 답변 시간: {:.1}초", a.avg_response_secs);
    let _ = writeln!(out, "- 평균 자신감 점수: {:.2}", a.avg_confidence);
    let _ = writeln!(out, "- 종합 품질 점수: {:.2}", a.quality);
    let _ = writeln!(out, "- 조정된 난이도: {}", adjustment.tier.display_name());
    let _ = writeln!(out);
    let _ = writeln!(out, "[조정 사유]");
    let _ = write!(out, "{}", adjustment.rationale);
    out
}

// ────────────────────────────────────────────────────────────────────────────
// Completed-interview assessment
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImprovementFocus {
    Fundamentals,
    PracticalApplication,
    AdvancedArchitecture,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InterviewAssessment {
    pub average_score: f64,
    pub recommendation: Transition,
    pub focus: ImprovementFocus,
}

/// Scores are on a 0–10 scale.
pub fn assess_completed_interview(average_score: f64) -> InterviewAssessment {
    let recommendation = if average_score >= 8.0 {
        Transition::Up
    } else if average_score <= 4.0 {
        Transition::Down
    } else {
        Transition::Hold
    };

    let focus = if average_score < 6.0 {
        ImprovementFocus::Fundamentals
    } else if average_score < 8.0 {
        ImprovementFocus::PracticalApplication
    } else {
        ImprovementFocus::AdvancedArchitecture
    };

    InterviewAssessment {
        average_score,
        recommendation,
        focus,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answers(n: usize, correct: bool, confidence: f64, secs: u32) -> Vec<AnswerRecord> {
        (0..n)
            .map(|i| AnswerRecord {
                question: format!("q{i}"),
                answer: "a".to_string(),
                response_time_secs: secs,
                confidence,
                correct,
                feedback: String::new(),
            })
            .collect()
    }

    #[test]
    fn test_time_weight_steps() {
        assert_eq!(time_weight(0), 0.0);
        assert_eq!(time_weight(9), 0.0);
        assert_eq!(time_weight(10), 0.1);
        assert_eq!(time_weight(30), 0.1);
        assert_eq!(time_weight(31), 0.2);
        assert_eq!(time_weight(120), 0.2);
        assert_eq!(time_weight(121), 0.1);
        assert_eq!(time_weight(300), 0.1);
        assert_eq!(time_weight(301), 0.0);
    }

    #[test]
    fn test_empty_history_keeps_tier() {
        for tier in [DifficultyTier::Junior, DifficultyTier::Middle, DifficultyTier::Senior] {
            let adj = adjust_tier(tier, &[]);
            assert_eq!(adj.tier, tier);
            assert_eq!(adj.rationale, FIRST_QUESTION_RATIONALE);
            assert!(adj.analysis.is_none());
        }
    }

    #[test]
    fn test_strong_history_raises_junior_to_middle() {
        let history = answers(5, true, 1.0, 60);
        let adj = adjust_tier(DifficultyTier::Junior, &history);
        assert_eq!(adj.tier, DifficultyTier::Middle);
        assert_eq!(adj.transition, Transition::Up);
        assert!(adj.rationale.contains("자신감이 높아"));
    }

    #[test]
    fn test_weak_history_lowers_senior_to_middle() {
        let history = answers(5, false, 0.0, 600);
        let adj = adjust_tier(DifficultyTier::Senior, &history);
        assert_eq!(adj.tier, DifficultyTier::Middle);
        assert!(adj.rationale.contains("답변 시간이 길어"));
    }

    #[test]
    fn test_transitions_never_skip_a_level() {
        let strong = answers(10, true, 1.0, 60);
        let weak = answers(10, false, 0.0, 1);
        assert_eq!(adjust_tier(DifficultyTier::Junior, &strong).tier, DifficultyTier::Middle);
        assert_eq!(adjust_tier(DifficultyTier::Senior, &weak).tier, DifficultyTier::Middle);
        assert_eq!(adjust_tier(DifficultyTier::Senior, &strong).tier, DifficultyTier::Senior);
        assert_eq!(adjust_tier(DifficultyTier::Junior, &weak).tier, DifficultyTier::Junior);
    }

    #[test]
    fn test_adjustment_is_deterministic() {
        let mut history = answers(3, true, 0.7, 45);
        history.extend(answers(2, false, 0.3, 200));
        let a = adjust_tier(DifficultyTier::Middle, &history);
        let b = adjust_tier(DifficultyTier::Middle, &history);
        assert_eq!(a, b);
    }

    #[test]
    fn test_middling_history_holds() {
        // 3/5 correct, 45s, confidence 0.5: quality = 0.6·0.6 + 0.2 + 0.1 = 0.66
        let mut history = answers(3, true, 0.5, 45);
        history.extend(answers(2, false, 0.5, 45));
        let adj = adjust_tier(DifficultyTier::Middle, &history);
        assert_eq!(adj.transition, Transition::Hold);
        assert_eq!(adj.tier, DifficultyTier::Middle);
        let analysis = adj.analysis.unwrap();
        assert!((analysis.quality - 0.66).abs() < 1e-9);
        assert!((analysis.accuracy - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_low_accuracy_alone_lowers() {
        // 2/5 correct is exactly the 0.4 boundary.
        let mut history = answers(2, true, 1.0, 60);
        history.extend(answers(3, false, 1.0, 60));
        assert_eq!(
            adjust_tier(DifficultyTier::Middle, &history).transition,
            Transition::Down
        );
    }

    #[test]
    fn test_quality_exactly_at_raise_boundary_raises() {
        // 0.6 + 0.1 + 0.2·0.5 sums to 0.7999999999999999 in f64.
        let history = answers(5, true, 0.5, 20);
        let adj = adjust_tier(DifficultyTier::Junior, &history);
        assert!((adj.analysis.as_ref().unwrap().quality - 0.8).abs() < 1e-9);
        assert_eq!(adj.transition, Transition::Up);
        assert_eq!(adj.tier, DifficultyTier::Middle);
    }

    #[test]
    fn test_quality_exactly_at_lower_boundary_lowers() {
        // Accuracy 0.6 stays above its bound, so quality alone decides.
        // 3 × 0.6 (correct, rushed, conf 0) + 2 × 0.1 (wrong, rushed, conf 0.5) = 2.0 / 5
        let mut history = answers(3, true, 0.0, 5);
        history.extend(answers(2, false, 0.5, 5));
        let adj = adjust_tier(DifficultyTier::Middle, &history);
        assert!((adj.analysis.as_ref().unwrap().quality - 0.4).abs() < 1e-9);
        assert_eq!(adj.transition, Transition::Down);
    }

    #[test]
    fn test_adaptive_questions_summary() {
        let profile = Profile {
            id: uuid::Uuid::new_v4(),
            role: crate::models::profile::JobRole::BackendDeveloper,
            experience_years: 1,
            summary: String::new(),
            project_text: None,
            skills: vec![],
        };
        let set = adaptive_questions(&profile, &answers(5, true, 1.0, 60));
        assert_eq!(set.question_count(), 5);
        assert_eq!(set.difficulty, DifficultyTier::Middle);
        assert_eq!(set.source, ResultSource::Adaptive);
        assert!(set.analysis.contains("정답률: 100.0%"));
        assert!(set.analysis.contains("평균 답변 시간: 60.0초"));
        assert!(set.analysis.contains("조정된 난이도: 미들"));
    }

    #[test]
    fn test_validate_history_rejects_out_of_range_confidence() {
        assert!(validate_history(&answers(1, true, 1.0, 5)).is_ok());
        assert!(validate_history(&answers(1, true, 1.5, 5)).is_err());
        assert!(validate_history(&answers(1, true, -0.1, 5)).is_err());
    }

    #[test]
    fn test_completed_interview_bands() {
        let high = assess_completed_interview(8.0);
        assert_eq!(high.recommendation, Transition::Up);
        assert_eq!(high.focus, ImprovementFocus::AdvancedArchitecture);

        let mid = assess_completed_interview(6.5);
        assert_eq!(mid.recommendation, Transition::Hold);
        assert_eq!(mid.focus, ImprovementFocus::PracticalApplication);

        let low = assess_completed_interview(4.0);
        assert_eq!(low.recommendation, Transition::Down);
        assert_eq!(low.focus, ImprovementFocus::Fundamentals);
    }
}
