//! What the worker pools do with each job.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::adaptive::assess_completed_interview;
use crate::monitoring::CallMonitor;
use crate::orchestrator::Orchestrator;
use crate::profiles::ProfileStore;
use crate::tasks::{AiJob, GeneralJob};

/// Collaborators shared by every general-queue job.
#[derive(Clone)]
pub struct JobContext {
    pub store: Arc<dyn ProfileStore>,
    pub orchestrator: Arc<Orchestrator>,
}

pub async fn handle_general(ctx: JobContext, job: GeneralJob) {
    match job {
        GeneralJob::ProfileUpdated { profile_id } => {
            let dropped = ctx.orchestrator.invalidate(profile_id).await;
            info!("Profile {profile_id} updated: dropped {dropped} cached results, regenerating learning path");

            let profile = match ctx.store.get(profile_id).await {
                Ok(Some(profile)) => profile,
                Ok(None) => {
                    warn!("Profile {profile_id} disappeared before regeneration");
                    return;
                }
                Err(e) => {
                    error!("Could not load profile {profile_id} for regeneration: {e:#}");
                    return;
                }
            };

            match ctx.orchestrator.generate_learning_path_chained(&profile).await {
                Ok(path) => info!(
                    "Regenerated learning path for profile {profile_id}: {} steps",
                    path.total_steps()
                ),
                Err(e) => error!("Learning path regeneration failed for profile {profile_id}: {e}"),
            }
        }
        GeneralJob::InterviewCompleted {
            profile_id,
            average_score,
        } => {
            let assessment = assess_completed_interview(average_score);
            info!(
                "Interview completed for profile {profile_id}: average {average_score:.1}, \
                 recommendation {:?}, focus {:?}",
                assessment.recommendation, assessment.focus
            );
        }
    }
}

pub async fn handle_ai(monitor: Arc<CallMonitor>, job: AiJob) {
    match job {
        AiJob::CallCompleted(record) => {
            monitor.record_call(
                &record.service,
                record.duration_ms,
                record.success,
                record.error.as_deref(),
            );
        }
    }
}
