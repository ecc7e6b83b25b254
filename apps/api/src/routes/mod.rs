pub mod feedback;
pub mod generation;
pub mod health;
pub mod monitoring;
pub mod profiles;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Profiles
        .route(
            "/api/v1/profiles",
            get(profiles::handle_list_profiles).post(profiles::handle_create_profile),
        )
        .route(
            "/api/v1/profiles/:id",
            get(profiles::handle_get_profile).put(profiles::handle_update_profile),
        )
        // Generation
        .route(
            "/api/v1/profiles/:id/interview-questions",
            post(generation::handle_interview_questions),
        )
        .route(
            "/api/v1/profiles/:id/learning-path",
            post(generation::handle_learning_path),
        )
        .route(
            "/api/v1/profiles/:id/learning-path/orchestrated",
            post(generation::handle_orchestrated_learning_path),
        )
        .route(
            "/api/v1/profiles/:id/analysis",
            post(generation::handle_combined_analysis),
        )
        // Adaptive assessment
        .route(
            "/api/v1/profiles/:id/difficulty",
            post(generation::handle_adjust_difficulty),
        )
        .route(
            "/api/v1/profiles/:id/adaptive-questions",
            post(generation::handle_adaptive_questions),
        )
        .route(
            "/api/v1/profiles/:id/interview-completed",
            post(generation::handle_interview_completed),
        )
        // Emotional feedback
        .route("/api/v1/feedback/emotion", post(feedback::handle_emotion))
        .route(
            "/api/v1/feedback/emotion/trend",
            post(feedback::handle_emotion_trend),
        )
        // Monitoring
        .route(
            "/api/v1/monitoring/performance",
            get(monitoring::handle_performance),
        )
        .route("/api/v1/monitoring/cost", get(monitoring::handle_cost))
        .route("/api/v1/models/health", get(health::models_health_handler))
        .with_state(state)
}
