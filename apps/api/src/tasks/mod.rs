//! Background work: two bounded queues, each drained by its own worker pool.
//!
//! The general queue carries profile and interview events. The AI queue
//! carries per-call monitoring records. Sizing is independent so a backlog on
//! one never starves the other. Overflow is rejected and logged at the
//! submitting side; jobs are never dropped silently.

pub mod handlers;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::{mpsc, watch, Semaphore};
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::config::QueueConfig;

pub const GENERAL_QUEUE: &str = "general";
pub const AI_QUEUE: &str = "ai";

/// Outcome of one model invocation, as seen by the monitor.
#[derive(Debug, Clone, PartialEq)]
pub struct CallRecord {
    pub service: String,
    pub duration_ms: u64,
    pub success: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GeneralJob {
    /// Drop cached results and regenerate the chained learning path.
    ProfileUpdated { profile_id: Uuid },
    /// Average score on a 0–10 scale.
    InterviewCompleted { profile_id: Uuid, average_score: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum AiJob {
    CallCompleted(CallRecord),
}

#[derive(Debug, Error, PartialEq)]
pub enum QueueError {
    #[error("{queue} queue is full")]
    Full { queue: &'static str },

    #[error("{queue} queue is closed")]
    Closed { queue: &'static str },
}

/// Sending halves of both queues. Cheap to clone.
#[derive(Debug, Clone)]
pub struct TaskQueues {
    general: mpsc::Sender<GeneralJob>,
    ai: mpsc::Sender<AiJob>,
}

/// Receiving halves, handed to `spawn_worker_pool` once at startup.
pub struct TaskReceivers {
    pub general: mpsc::Receiver<GeneralJob>,
    pub ai: mpsc::Receiver<AiJob>,
}

impl TaskQueues {
    pub fn new(config: &QueueConfig) -> (Self, TaskReceivers) {
        let (general_tx, general_rx) = mpsc::channel(config.general_capacity);
        let (ai_tx, ai_rx) = mpsc::channel(config.ai_capacity);
        (
            Self {
                general: general_tx,
                ai: ai_tx,
            },
            TaskReceivers {
                general: general_rx,
                ai: ai_rx,
            },
        )
    }

    pub fn submit_general(&self, job: GeneralJob) -> Result<(), QueueError> {
        submit(&self.general, GENERAL_QUEUE, job)
    }

    pub fn submit_ai(&self, job: AiJob) -> Result<(), QueueError> {
        submit(&self.ai, AI_QUEUE, job)
    }
}

fn submit<J: std::fmt::Debug>(
    tx: &mpsc::Sender<J>,
    queue: &'static str,
    job: J,
) -> Result<(), QueueError> {
    match tx.try_send(job) {
        Ok(()) => Ok(()),
        Err(mpsc::error::TrySendError::Full(job)) => {
            warn!("Rejected job on full {queue} queue: {job:?}");
            Err(QueueError::Full { queue })
        }
        Err(mpsc::error::TrySendError::Closed(job)) => {
            warn!("Rejected job on closed {queue} queue: {job:?}");
            Err(QueueError::Closed { queue })
        }
    }
}

/// Runs `handler` for every job on `rx`, at most `workers` at a time.
///
/// When `shutdown` flips to `true` the pool stops accepting, runs what is
/// already buffered, and waits up to `drain` for in-flight jobs before
/// aborting the rest.
pub fn spawn_worker_pool<J, F, Fut>(
    name: &'static str,
    mut rx: mpsc::Receiver<J>,
    workers: usize,
    drain: Duration,
    mut shutdown: watch::Receiver<bool>,
    handler: F,
) -> JoinHandle<()>
where
    J: Send + 'static,
    F: Fn(J) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let handler = Arc::new(handler);
    let permits = Arc::new(Semaphore::new(workers));

    tokio::spawn(async move {
        info!("{name} worker pool started ({workers} workers)");
        let mut running = JoinSet::new();

        loop {
            let job = tokio::select! {
                job = rx.recv() => job,
                _ = shutdown.changed() => None,
            };
            let Some(job) = job else { break };

            let Ok(permit) = permits.clone().acquire_owned().await else {
                break;
            };
            let handler = handler.clone();
            running.spawn(async move {
                handler(job).await;
                drop(permit);
            });
            // Reap finished jobs so the set does not grow unbounded.
            while running.try_join_next().is_some() {}
        }

        rx.close();
        while let Ok(job) = rx.try_recv() {
            let handler = handler.clone();
            running.spawn(async move { handler(job).await });
        }

        let pending = running.len();
        debug!("{name} worker pool draining {pending} jobs");
        let drained = tokio::time::timeout(drain, async {
            while let Some(result) = running.join_next().await {
                if let Err(e) = result {
                    error!("{name} job panicked: {e}");
                }
            }
        })
        .await;

        if drained.is_err() {
            warn!(
                "{name} worker pool did not drain within {}s, aborting {} jobs",
                drain.as_secs(),
                running.len()
            );
            running.abort_all();
        }
        info!("{name} worker pool stopped");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn tiny_config() -> QueueConfig {
        QueueConfig {
            general_capacity: 1,
            general_workers: 1,
            general_drain: Duration::from_secs(1),
            ai_capacity: 2,
            ai_workers: 1,
            ai_drain: Duration::from_secs(1),
        }
    }

    fn record() -> CallRecord {
        CallRecord {
            service: "Gemini".to_string(),
            duration_ms: 10,
            success: true,
            error: None,
        }
    }

    #[tokio::test]
    async fn test_full_queue_rejects() {
        let (queues, _rx) = TaskQueues::new(&tiny_config());
        let job = GeneralJob::ProfileUpdated {
            profile_id: Uuid::new_v4(),
        };
        assert_eq!(queues.submit_general(job.clone()), Ok(()));
        assert_eq!(
            queues.submit_general(job),
            Err(QueueError::Full {
                queue: GENERAL_QUEUE
            })
        );
    }

    #[tokio::test]
    async fn test_queues_are_sized_independently() {
        let (queues, _rx) = TaskQueues::new(&tiny_config());
        queues
            .submit_general(GeneralJob::ProfileUpdated {
                profile_id: Uuid::new_v4(),
            })
            .unwrap();
        // General is full; AI still has room.
        assert_eq!(queues.submit_ai(AiJob::CallCompleted(record())), Ok(()));
        assert_eq!(queues.submit_ai(AiJob::CallCompleted(record())), Ok(()));
    }

    #[tokio::test]
    async fn test_closed_queue_rejects() {
        let (queues, rx) = TaskQueues::new(&tiny_config());
        drop(rx);
        assert_eq!(
            queues.submit_ai(AiJob::CallCompleted(record())),
            Err(QueueError::Closed { queue: AI_QUEUE })
        );
    }

    #[tokio::test]
    async fn test_pool_runs_jobs_and_drains_on_shutdown() {
        let (queues, rx) = TaskQueues::new(&QueueConfig::default());
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let seen = Arc::new(AtomicUsize::new(0));

        let counter = seen.clone();
        let pool = spawn_worker_pool(
            AI_QUEUE,
            rx.ai,
            2,
            Duration::from_secs(5),
            shutdown_rx,
            move |AiJob::CallCompleted(_)| {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                }
            },
        );

        for _ in 0..5 {
            queues.submit_ai(AiJob::CallCompleted(record())).unwrap();
        }
        shutdown_tx.send(true).unwrap();
        pool.await.unwrap();

        assert_eq!(seen.load(Ordering::SeqCst), 5);
    }
}
