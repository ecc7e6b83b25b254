use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::profile::Profile;
use crate::profiles::ProfileInput;
use crate::state::AppState;
use crate::tasks::GeneralJob;

/// Loads a profile or fails with 404.
pub(crate) async fn load_profile(state: &AppState, id: Uuid) -> Result<Profile, AppError> {
    state
        .profiles
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("profile {id}")))
}

/// GET /api/v1/profiles
pub async fn handle_list_profiles(
    State(state): State<AppState>,
) -> Result<Json<Vec<Profile>>, AppError> {
    Ok(Json(state.profiles.list().await?))
}

/// POST /api/v1/profiles
pub async fn handle_create_profile(
    State(state): State<AppState>,
    Json(input): Json<ProfileInput>,
) -> Result<(StatusCode, Json<Profile>), AppError> {
    let profile = input
        .into_profile(Uuid::new_v4())
        .map_err(AppError::Validation)?;
    let stored = state.profiles.upsert(profile).await?;
    tracing::info!("Created profile {} ({})", stored.id, stored.role.code());
    Ok((StatusCode::CREATED, Json(stored)))
}

/// GET /api/v1/profiles/:id
pub async fn handle_get_profile(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Profile>, AppError> {
    Ok(Json(load_profile(&state, id).await?))
}

/// PUT /api/v1/profiles/:id
/// Replaces the profile, then queues cache invalidation and learning-path
/// regeneration. A full queue is logged; the update itself still succeeds.
pub async fn handle_update_profile(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<ProfileInput>,
) -> Result<Json<Profile>, AppError> {
    load_profile(&state, id).await?;
    let profile = input.into_profile(id).map_err(AppError::Validation)?;
    let stored = state.profiles.upsert(profile).await?;

    if let Err(e) = state
        .queues
        .submit_general(GeneralJob::ProfileUpdated { profile_id: id })
    {
        tracing::warn!("Profile {id} updated but regeneration was not queued: {e}");
    }
    Ok(Json(stored))
}
