use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::adaptive::{
    adaptive_questions, adjust_difficulty, assess_completed_interview, validate_history,
    DifficultyAdjustment, InterviewAssessment,
};
use crate::errors::AppError;
use crate::models::interview::{AnswerRecord, QuestionSet};
use crate::models::learning::LearningPath;
use crate::routes::profiles::load_profile;
use crate::state::AppState;
use crate::tasks::GeneralJob;

#[derive(Debug, Deserialize)]
pub struct AnswerHistoryRequest {
    #[serde(default)]
    pub history: Vec<AnswerRecord>,
}

#[derive(Debug, Serialize)]
pub struct AdaptiveQuestionsResponse {
    pub questions: QuestionSet,
    pub adjustment: DifficultyAdjustment,
}

#[derive(Debug, Deserialize)]
pub struct InterviewCompletedRequest {
    /// 0–10 scale.
    pub average_score: f64,
}

#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub profile_id: Uuid,
    pub analysis: String,
}

/// POST /api/v1/profiles/:id/interview-questions
pub async fn handle_interview_questions(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<QuestionSet>, AppError> {
    let profile = load_profile(&state, id).await?;
    Ok(Json(state.orchestrator.generate_questions(&profile).await?))
}

/// POST /api/v1/profiles/:id/learning-path
pub async fn handle_learning_path(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<LearningPath>, AppError> {
    let profile = load_profile(&state, id).await?;
    Ok(Json(state.orchestrator.generate_learning_path(&profile).await?))
}

/// POST /api/v1/profiles/:id/learning-path/orchestrated
pub async fn handle_orchestrated_learning_path(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<LearningPath>, AppError> {
    let profile = load_profile(&state, id).await?;
    Ok(Json(
        state
            .orchestrator
            .generate_learning_path_chained(&profile)
            .await?,
    ))
}

/// POST /api/v1/profiles/:id/analysis
pub async fn handle_combined_analysis(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AnalysisResponse>, AppError> {
    let profile = load_profile(&state, id).await?;
    let analysis = state.orchestrator.combine_analysis(&profile).await?;
    Ok(Json(AnalysisResponse {
        profile_id: id,
        analysis,
    }))
}

/// POST /api/v1/profiles/:id/difficulty
pub async fn handle_adjust_difficulty(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<AnswerHistoryRequest>,
) -> Result<Json<DifficultyAdjustment>, AppError> {
    validate_history(&req.history).map_err(AppError::Validation)?;
    let profile = load_profile(&state, id).await?;
    Ok(Json(adjust_difficulty(&profile, &req.history)))
}

/// POST /api/v1/profiles/:id/adaptive-questions
pub async fn handle_adaptive_questions(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<AnswerHistoryRequest>,
) -> Result<Json<AdaptiveQuestionsResponse>, AppError> {
    validate_history(&req.history).map_err(AppError::Validation)?;
    let profile = load_profile(&state, id).await?;
    Ok(Json(AdaptiveQuestionsResponse {
        questions: adaptive_questions(&profile, &req.history),
        adjustment: adjust_difficulty(&profile, &req.history),
    }))
}

/// POST /api/v1/profiles/:id/interview-completed
/// Returns the assessment immediately; follow-up work runs on the general queue.
pub async fn handle_interview_completed(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<InterviewCompletedRequest>,
) -> Result<(StatusCode, Json<InterviewAssessment>), AppError> {
    if !(0.0..=10.0).contains(&req.average_score) {
        return Err(AppError::Validation(
            "average_score must be between 0 and 10".to_string(),
        ));
    }
    load_profile(&state, id).await?;

    state.queues.submit_general(GeneralJob::InterviewCompleted {
        profile_id: id,
        average_score: req.average_score,
    })?;
    Ok((
        StatusCode::ACCEPTED,
        Json(assess_completed_interview(req.average_score)),
    ))
}
