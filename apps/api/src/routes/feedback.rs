use axum::Json;
use serde::{Deserialize, Serialize};

use crate::emotion::{
    analyze_emotion, analyze_trend, comprehensive_feedback, trend_report, EmotionProfile,
    EmotionTrend,
};
use crate::errors::AppError;

#[derive(Debug, Deserialize)]
pub struct EmotionRequest {
    pub answer: String,
}

#[derive(Debug, Serialize)]
pub struct EmotionResponse {
    pub analysis: EmotionProfile,
    pub feedback: String,
}

#[derive(Debug, Deserialize)]
pub struct EmotionTrendRequest {
    /// Oldest first.
    #[serde(default)]
    pub answers: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct EmotionTrendResponse {
    pub trend: Option<EmotionTrend>,
    pub report: String,
}

/// POST /api/v1/feedback/emotion
pub async fn handle_emotion(
    Json(req): Json<EmotionRequest>,
) -> Result<Json<EmotionResponse>, AppError> {
    if req.answer.trim().is_empty() {
        return Err(AppError::Validation("answer must not be empty".to_string()));
    }
    let analysis = analyze_emotion(&req.answer);
    let feedback = comprehensive_feedback(&analysis);
    Ok(Json(EmotionResponse { analysis, feedback }))
}

/// POST /api/v1/feedback/emotion/trend
pub async fn handle_emotion_trend(Json(req): Json<EmotionTrendRequest>) -> Json<EmotionTrendResponse> {
    let analyses: Vec<EmotionProfile> = req.answers.iter().map(|a| analyze_emotion(a)).collect();
    Json(EmotionTrendResponse {
        trend: analyze_trend(&analyses),
        report: trend_report(&analyses),
    })
}
