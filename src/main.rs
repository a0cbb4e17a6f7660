use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::net::TcpListener;

use scribegate::application::ports::UserRepository;
use scribegate::application::services::{QuotaLedger, TranscriptionService};
use scribegate::infrastructure::audio::{FfmpegTranscoder, OpenAiWhisperEngine, check_ffmpeg_binary};
use scribegate::infrastructure::observability::{TracingConfig, init_tracing};
use scribegate::infrastructure::persistence::{
    InMemoryUserRepository, PgUserRepository, create_pool, run_migrations, seed_users,
};
use scribegate::presentation::auth::SessionStore;
use scribegate::presentation::{AppState, Environment, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env().map_err(anyhow::Error::msg)?;
    let settings = Settings::load(environment)?;

    let defaults = TracingConfig::default();
    init_tracing(&TracingConfig {
        environment: environment.to_string(),
        level: settings.logging.level.clone(),
        json_format: settings.logging.json || defaults.json_format,
    });

    let user_repository: Arc<dyn UserRepository> = match &settings.database.url {
        Some(url) => {
            let pool = create_pool(url, settings.database.max_connections).await?;
            run_migrations(&pool).await?;
            Arc::new(PgUserRepository::new(pool))
        }
        None => {
            tracing::warn!("No database url configured, accounts are kept in memory");
            Arc::new(InMemoryUserRepository::new())
        }
    };

    let seeded = seed_users(user_repository.as_ref(), &settings.users.seed_accounts()).await?;
    tracing::info!(seeded, "Default users checked");

    let ffmpeg_path = PathBuf::from(&settings.transcoder.ffmpeg_path);
    if !check_ffmpeg_binary(&ffmpeg_path) {
        tracing::warn!(
            ffmpeg = %ffmpeg_path.display(),
            "ffmpeg not found, non-mp3/m4a uploads will be rejected"
        );
    }
    let transcoder = Arc::new(FfmpegTranscoder::new(
        ffmpeg_path,
        settings.transcoder.timeout(),
    ));

    let api_key = settings.transcription.resolved_api_key();
    if api_key.is_none() {
        tracing::warn!("No transcription API key configured");
    }
    let engine = Arc::new(OpenAiWhisperEngine::new(
        api_key,
        Some(settings.transcription.base_url.clone()),
        Some(settings.transcription.model.clone()),
        settings.transcription.timeout(),
    )?);

    let ledger = Arc::new(QuotaLedger::new(
        Arc::clone(&user_repository),
        settings.quota.bytes_per_minute,
    ));

    let transcription_service = Arc::new(TranscriptionService::new(
        transcoder,
        engine,
        Arc::clone(&ledger),
    ));

    let state = AppState {
        transcription_service,
        ledger,
        user_repository,
        sessions: Arc::new(SessionStore::new()),
        max_upload_bytes: settings.server.max_upload_bytes(),
        secure_cookies: settings.server.secure_cookies,
    };

    let router = create_router(state);

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received");
}
