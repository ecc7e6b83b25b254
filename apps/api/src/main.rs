mod adaptive;
mod cache;
mod config;
mod db;
mod emotion;
mod errors;
mod llm_client;
mod models;
mod monitoring;
mod orchestrator;
mod parsing;
mod profiles;
mod prompting;
mod routes;
mod state;
mod tasks;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::watch;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cache::ResultCache;
use crate::config::{Config, ModelProvider};
use crate::db::create_pool;
use crate::llm_client::anthropic::ClaudeClient;
use crate::llm_client::gemini::GeminiClient;
use crate::llm_client::mock::MockModel;
use crate::llm_client::openai::OpenAiClient;
use crate::llm_client::{ModelClient, PathDrafter, SkillAnalyzer};
use crate::monitoring::CallMonitor;
use crate::orchestrator::Orchestrator;
use crate::profiles::{InMemoryProfileStore, PgProfileStore, ProfileStore};
use crate::prompting::knowledge::ReferenceLibrary;
use crate::routes::build_router;
use crate::state::AppState;
use crate::tasks::handlers::{handle_ai, handle_general, JobContext};
use crate::tasks::{spawn_worker_pool, TaskQueues, AI_QUEUE, GENERAL_QUEUE};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Coach API v{}", env!("CARGO_PKG_VERSION"));

    // Profile store
    let profiles: Arc<dyn ProfileStore> = match &config.database_url {
        Some(url) => Arc::new(PgProfileStore::new(create_pool(url).await?)),
        None => {
            warn!("DATABASE_URL not set, profiles are kept in memory and lost on restart");
            Arc::new(InMemoryProfileStore::new())
        }
    };

    // Model clients
    let primary: Arc<dyn ModelClient> = match config.model_provider {
        ModelProvider::Gemini => {
            let key = config
                .gemini_api_key
                .clone()
                .ok_or_else(|| anyhow::anyhow!("GEMINI_API_KEY is required for the Gemini provider"))?;
            Arc::new(GeminiClient::new(
                key,
                config.gemini_api_url.clone(),
                config.model_timeout,
            )?)
        }
        ModelProvider::Mock => Arc::new(MockModel::new("Gemini")),
    };
    let analyzer: Arc<dyn SkillAnalyzer> = match &config.openai_api_key {
        Some(key) => Arc::new(OpenAiClient::new(key.clone(), config.model_timeout)?),
        None => {
            warn!("OPENAI_API_KEY not set, skill analysis uses the mock model");
            Arc::new(MockModel::new("OpenAI"))
        }
    };
    let drafter: Arc<dyn PathDrafter> = match &config.anthropic_api_key {
        Some(key) => Arc::new(ClaudeClient::new(key.clone(), config.model_timeout)?),
        None => {
            warn!("ANTHROPIC_API_KEY not set, path drafting uses the mock model");
            Arc::new(MockModel::new("Claude"))
        }
    };
    info!(
        "Model clients initialized (primary: {}, analysis: {}, drafting: {})",
        primary.name(),
        analyzer.name(),
        drafter.name()
    );

    // Background queues
    let (queues, receivers) = TaskQueues::new(&config.queues);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let monitor = Arc::new(CallMonitor::new());
    let mut orchestrator = Orchestrator::new(
        primary,
        analyzer,
        drafter,
        Arc::new(ResultCache::default()),
        monitor.clone(),
        config.model_timeout,
    )
    .with_queues(queues.clone());
    if config.reference_library {
        info!("Reference library enabled for prompt enrichment");
        orchestrator = orchestrator.with_knowledge(Arc::new(ReferenceLibrary::default()));
    }
    let orchestrator = Arc::new(orchestrator);

    let job_context = JobContext {
        store: profiles.clone(),
        orchestrator: orchestrator.clone(),
    };
    let general_pool = spawn_worker_pool(
        GENERAL_QUEUE,
        receivers.general,
        config.queues.general_workers,
        config.queues.general_drain,
        shutdown_rx.clone(),
        move |job| handle_general(job_context.clone(), job),
    );
    let ai_pool = spawn_worker_pool(
        AI_QUEUE,
        receivers.ai,
        config.queues.ai_workers,
        config.queues.ai_drain,
        shutdown_rx,
        move |job| handle_ai(monitor.clone(), job),
    );

    // Build app state
    let state = AppState {
        profiles,
        orchestrator,
        queues,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Could not listen for shutdown signal: {e}");
            }
            info!("Shutdown signal received");
        })
        .await?;

    // Stop accepting background work and let both pools drain.
    let _ = shutdown_tx.send(true);
    let _ = tokio::join!(general_pool, ai_pool);
    info!("Coach API stopped");

    Ok(())
}
