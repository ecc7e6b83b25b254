use std::sync::Arc;

use crate::orchestrator::Orchestrator;
use crate::profiles::ProfileStore;
use crate::tasks::TaskQueues;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Postgres-backed when `DATABASE_URL` is set, in-memory otherwise.
    pub profiles: Arc<dyn ProfileStore>,
    pub orchestrator: Arc<Orchestrator>,
    pub queues: TaskQueues,
}
