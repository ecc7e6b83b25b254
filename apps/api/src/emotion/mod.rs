//! Lexical emotion scoring over free-text interview answers.
//!
//! Each emotion has groups of cue phrases (Korean and English). A group
//! contributes its weight once when any of its phrases occurs; an emotion's
//! score is the sum of matched group weights, capped at 1.0.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Emotion {
    Confidence,
    Anxiety,
    Passion,
    Tension,
    Calm,
}

impl Emotion {
    /// Enumeration order. Ties for the primary emotion go to the earliest.
    pub const ALL: [Emotion; 5] = [
        Emotion::Confidence,
        Emotion::Anxiety,
        Emotion::Passion,
        Emotion::Tension,
        Emotion::Calm,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Emotion::Confidence => "자신감",
            Emotion::Anxiety => "불안감",
            Emotion::Passion => "열정",
            Emotion::Tension => "긴장",
            Emotion::Calm => "평온함",
        }
    }

    fn cue_groups(&self) -> &'static [(&'static [&'static str], f64)] {
        match self {
            Emotion::Confidence => &[
                (&["확실히", "분명히", "당연히", "definitely", "certainly"], 0.3),
                (
                    &["경험이 있습니다", "구현했습니다", "성공했습니다", "i have experience", "i implemented"],
                    0.4,
                ),
                (&["자신있습니다", "잘 알고 있습니다", "i am confident", "i know it well"], 0.3),
            ],
            Emotion::Anxiety => &[
                (&["잘 모르겠습니다", "불확실합니다", "i'm not sure", "i am not sure"], 0.4),
                (&["어려울 것 같습니다", "힘들 것 같습니다", "might be difficult"], 0.3),
                (&["시도해보겠습니다", "노력하겠습니다", "i will try"], 0.2),
            ],
            Emotion::Passion => &[
                (&["관심이 많습니다", "흥미롭습니다", "very interested", "fascinating"], 0.4),
                (&["학습하고 있습니다", "연구하고 있습니다", "i am learning", "i am studying"], 0.3),
                (&["도전하고 싶습니다", "새로운 기술", "new technology"], 0.3),
            ],
            Emotion::Tension => &[
                (&["어려운", "복잡한", "도전적인", "difficult", "complex"], 0.3),
                (&["시간이 걸렸습니다", "고민했습니다", "took a long time"], 0.2),
            ],
            Emotion::Calm => &[
                (&["차근차근", "단계별로", "체계적으로", "step by step", "systematically"], 0.4),
                (&["잘 해결했습니다", "성공적으로", "successfully"], 0.3),
            ],
        }
    }
}

/// Result of scoring one answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmotionProfile {
    pub scores: BTreeMap<Emotion, f64>,
    /// Highest-scoring emotion. An answer with no cues is an all-way tie
    /// and resolves to the first emotion, `Confidence`.
    pub primary: Emotion,
    pub confidence_level: f64,
    pub stress_level: f64,
    pub suggestion: String,
}

impl EmotionProfile {
    pub fn score(&self, emotion: Emotion) -> f64 {
        self.scores.get(&emotion).copied().unwrap_or(0.0)
    }
}

fn score_emotion(text: &str, emotion: Emotion) -> f64 {
    let raw: f64 = emotion
        .cue_groups()
        .iter()
        .filter(|(cues, _)| cues.iter().any(|cue| text.contains(cue)))
        .map(|(_, weight)| weight)
        .sum();
    raw.min(1.0)
}

/// Scores one answer. Pure and deterministic.
pub fn analyze_emotion(answer: &str) -> EmotionProfile {
    let text = answer.to_lowercase();
    let scores: BTreeMap<Emotion, f64> = Emotion::ALL
        .into_iter()
        .map(|e| (e, score_emotion(&text, e)))
        .collect();
    let get = |e: Emotion| scores.get(&e).copied().unwrap_or(0.0);

    // Strictly-greater comparison keeps the first-defined emotion on ties.
    let primary = Emotion::ALL
        .into_iter()
        .fold(Emotion::ALL[0], |best, e| if get(e) > get(best) { e } else { best });

    let pressure = get(Emotion::Anxiety) + get(Emotion::Tension);
    let confidence_level = (get(Emotion::Confidence) - 0.5 * pressure).clamp(0.0, 1.0);
    let stress_level = (0.7 * pressure - 0.3 * get(Emotion::Calm)).clamp(0.0, 1.0);
    let suggestion = suggestion(primary, confidence_level, stress_level);

    info!(
        "Emotion analysis: chars={}, primary={:?}, confidence={confidence_level:.2}, stress={stress_level:.2}",
        answer.chars().count(),
        primary
    );

    EmotionProfile {
        scores,
        primary,
        confidence_level,
        stress_level,
        suggestion,
    }
}

/// One sentence per band, in order: confidence, stress, primary emotion.
fn suggestion(primary: Emotion, confidence: f64, stress: f64) -> String {
    let confidence_part = if confidence < 0.3 {
        "자신감을 높이기 위해 구체적인 성공 사례를 준비해보세요."
    } else if confidence < 0.6 {
        "적당한 자신감을 유지하면서도 겸손한 태도를 보여주세요."
    } else {
        "높은 자신감이 좋습니다. 이를 바탕으로 더 도전적인 질문에 답변해보세요."
    };

    let stress_part = if stress > 0.7 {
        "긴장을 줄이기 위해 심호흡을 하고 천천히 답변해보세요."
    } else if stress > 0.4 {
        "적당한 긴장감은 좋습니다. 이를 동기부여로 활용해보세요."
    } else {
        "편안한 상태를 잘 유지하고 있습니다."
    };

    let primary_part = match primary {
        Emotion::Anxiety => {
            "불안감을 줄이기 위해 충분한 준비를 하고 긍정적인 마인드를 유지하세요."
        }
        Emotion::Passion => {
            "열정이 좋습니다. 이를 바탕으로 구체적인 계획과 목표를 제시해보세요."
        }
        Emotion::Tension => "긴장을 완화하기 위해 체계적으로 답변을 구성해보세요.",
        Emotion::Calm => "차분한 태도가 좋습니다. 이를 바탕으로 깊이 있는 답변을 해보세요.",
        Emotion::Confidence => "균형잡힌 감정 상태를 유지하고 있습니다.",
    };

    format!("{confidence_part} {stress_part} {primary_part}")
}

/// Human-readable report for one analysed answer.
pub fn comprehensive_feedback(profile: &EmotionProfile) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "[감정 분석 피드백]");
    let _ = writeln!(out);
    let _ = writeln!(out, "주요 감정: {}", profile.primary.display_name());
    let _ = writeln!(out, "자신감 수준: {:.1}%", profile.confidence_level * 100.0);
    let _ = writeln!(out, "스트레스 수준: {:.1}%", profile.stress_level * 100.0);
    let _ = writeln!(out);
    let _ = writeln!(out, "[감정 점수]");
    for emotion in Emotion::ALL {
        let _ = writeln!(
            out,
            "• {}: {:.1}%",
            emotion.display_name(),
            profile.score(emotion) * 100.0
        );
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[개선 제안]");
    let _ = writeln!(out, "{}", profile.suggestion);
    let _ = writeln!(out);
    let _ = writeln!(out, "[면접 팁]");
    let _ = writeln!(out, "• 명확하고 구체적인 답변을 준비하세요");
    let _ = writeln!(out, "• 자신의 경험을 바탕으로 한 사례를 제시하세요");
    let _ = writeln!(out, "• 적절한 속도로 천천히 답변하세요");
    let _ = writeln!(out, "• 긍정적인 마인드를 유지하세요");
    out
}

// ── Trends ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Improving,
    Declining,
    Stable,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmotionTrend {
    pub count: usize,
    pub avg_confidence: f64,
    pub avg_stress: f64,
    /// Needs at least two analyses.
    pub direction: Option<TrendDirection>,
}

/// `None` for an empty list. Direction compares first and last confidence.
pub fn analyze_trend(analyses: &[EmotionProfile]) -> Option<EmotionTrend> {
    let (first, last) = (analyses.first()?, analyses.last()?);
    let n = analyses.len() as f64;

    let direction = (analyses.len() >= 2).then(|| {
        if last.confidence_level > first.confidence_level {
            TrendDirection::Improving
        } else if last.confidence_level < first.confidence_level {
            TrendDirection::Declining
        } else {
            TrendDirection::Stable
        }
    });

    Some(EmotionTrend {
        count: analyses.len(),
        avg_confidence: analyses.iter().map(|a| a.confidence_level).sum::<f64>() / n,
        avg_stress: analyses.iter().map(|a| a.stress_level).sum::<f64>() / n,
        direction,
    })
}

pub fn trend_report(analyses: &[EmotionProfile]) -> String {
    let Some(trend) = analyze_trend(analyses) else {
        return "분석할 답변이 없습니다.".to_string();
    };

    let sentence = match trend.direction {
        Some(TrendDirection::Improving) => "자신감이 점진적으로 향상되고 있습니다.",
        Some(TrendDirection::Declining) => {
            "자신감이 다소 감소하고 있습니다. 긍정적인 마인드를 유지하세요."
        }
        Some(TrendDirection::Stable) => "자신감이 안정적으로 유지되고 있습니다.",
        None => "추세를 판단하려면 두 개 이상의 답변이 필요합니다.",
    };

    let mut out = String::new();
    let _ = writeln!(out, "[감정 트렌드 분석]");
    let _ = writeln!(out);
    let _ = writeln!(out, "총 답변 수: {}개", trend.count);
    let _ = writeln!(out, "평균 자신감: {:.1}%", trend.avg_confidence * 100.0);
    let _ = writeln!(out, "평균 스트레스: {:.1}%", trend.avg_stress * 100.0);
    let _ = writeln!(out);
    let _ = writeln!(out, "[트렌드]");
    let _ = writeln!(out, "{sentence}");
    let _ = writeln!(out);
    let _ = writeln!(out, "[권장사항]");
    let _ = writeln!(out, "• 일관된 자신감을 유지하세요");
    let _ = writeln!(out, "• 긴장감을 적절히 관리하세요");
    let _ = writeln!(out, "• 긍정적인 피드백을 받아들이세요");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confident_answer() {
        let p = analyze_emotion("확실히 구현했습니다. 경험이 있습니다.");
        assert_eq!(p.primary, Emotion::Confidence);
        assert!((p.score(Emotion::Confidence) - 0.7).abs() < 1e-9);
        assert!(p.confidence_level > 0.5);
        assert_eq!(p.stress_level, 0.0);
    }

    #[test]
    fn test_group_counts_once() {
        // Two phrases from the same group still add 0.4 once.
        let p = analyze_emotion("경험이 있습니다. 구현했습니다. 성공했습니다.");
        assert!((p.score(Emotion::Confidence) - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_scores_cap_at_one() {
        let text = "확실히 경험이 있습니다 자신있습니다 그리고 certainly i implemented";
        let p = analyze_emotion(text);
        assert_eq!(p.score(Emotion::Confidence), 1.0);
    }

    #[test]
    fn test_anxious_answer_lowers_confidence_and_raises_stress() {
        let p = analyze_emotion("잘 모르겠습니다. 어려울 것 같습니다. 복잡한 문제입니다.");
        assert_eq!(p.primary, Emotion::Anxiety);
        // anxiety 0.7, tension 0.3 → stress 0.7, confidence 0
        assert_eq!(p.confidence_level, 0.0);
        assert!((p.stress_level - 0.7).abs() < 1e-9);
        assert!(p.suggestion.starts_with("자신감을 높이기 위해"));
        assert!(p.suggestion.ends_with("긍정적인 마인드를 유지하세요."));
    }

    #[test]
    fn test_ties_go_to_first_defined_emotion() {
        // passion 0.3 ("새로운 기술"), tension 0.3 ("어려운")
        let p = analyze_emotion("새로운 기술은 어려운 부분이 있습니다");
        assert_eq!(p.primary, Emotion::Passion);
    }

    #[test]
    fn test_no_cues_ties_to_first_emotion() {
        let p = analyze_emotion("네.");
        assert!(Emotion::ALL.iter().all(|e| p.score(*e) == 0.0));
        assert_eq!(p.primary, Emotion::Confidence);
        assert_eq!(p.confidence_level, 0.0);
        assert!(p.suggestion.contains("균형잡힌 감정 상태"));
        assert!(comprehensive_feedback(&p).contains("주요 감정: 자신감"));
    }

    #[test]
    fn test_english_cues_are_case_insensitive() {
        let p = analyze_emotion("I solved it Step By Step, Successfully.");
        assert_eq!(p.primary, Emotion::Calm);
        assert!((p.score(Emotion::Calm) - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_comprehensive_feedback_lists_all_emotions() {
        let report = comprehensive_feedback(&analyze_emotion("확실히 구현했습니다."));
        assert!(report.contains("주요 감정: 자신감"));
        for e in Emotion::ALL {
            assert!(report.contains(e.display_name()));
        }
        assert!(report.contains("[면접 팁]"));
    }

    #[test]
    fn test_trend_direction() {
        let weak = analyze_emotion("잘 모르겠습니다");
        let strong = analyze_emotion("확실히 구현했습니다");
        let trend = analyze_trend(&[weak.clone(), strong.clone()]).unwrap();
        assert_eq!(trend.direction, Some(TrendDirection::Improving));
        assert_eq!(trend.count, 2);

        let trend = analyze_trend(&[strong.clone(), weak]).unwrap();
        assert_eq!(trend.direction, Some(TrendDirection::Declining));

        let trend = analyze_trend(&[strong]).unwrap();
        assert_eq!(trend.direction, None);
    }

    #[test]
    fn test_empty_trend_report() {
        assert_eq!(trend_report(&[]), "분석할 답변이 없습니다.");
        assert!(analyze_trend(&[]).is_none());
    }

    #[test]
    fn test_trend_report_averages() {
        let a = analyze_emotion("확실히 구현했습니다"); // confidence 0.7
        let b = analyze_emotion("네"); // confidence 0.0
        let report = trend_report(&[a, b]);
        assert!(report.contains("총 답변 수: 2개"));
        assert!(report.contains("평균 자신감: 35.0%"));
        assert!(report.contains("자신감이 다소 감소하고 있습니다."));
    }
}
