use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use podcast_backend::controllers::podcast::PodcastController;
use podcast_backend::domain::audio::ConcatAssembler;
use podcast_backend::domain::podcast::{PodcastPipeline, PodcastService, VoiceMap};
use podcast_backend::infrastructure::config::{Config, LogFormat};
use podcast_backend::infrastructure::db::{check_connection, create_pool, run_migrations};
use podcast_backend::infrastructure::http::{build_router, start_http_server, AudioFiles};
use podcast_backend::infrastructure::repositories::{
    BlobStore, CompletionRepository, ElevenLabsTtsRepository, InMemoryPodcastRepository,
    LocalBlobStore, OpenAiCompletionRepository, PgPodcastRepository, PodcastRepository,
    TtsRepository,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        "Starting Podcast Backend on {}:{}",
        config.host,
        config.port
    );

    let missing = config.missing_provider_settings();
    if !missing.is_empty() {
        tracing::warn!(
            missing = ?missing,
            "Provider settings missing; generation requests will fail until they are set"
        );
    }

    let config = Arc::new(config);

    // === DEPENDENCY INJECTION SETUP ===
    // 1. Instantiate repositories
    tracing::info!("Instantiating repositories...");
    let records: Arc<dyn PodcastRepository> = match &config.database_url {
        Some(database_url) => {
            let pool = create_pool(database_url).await?;
            tracing::info!("Database connection pool created");

            check_connection(&pool).await?;
            tracing::info!("Database connection verified");

            run_migrations(&pool).await?;
            tracing::info!("Database migrations applied");

            Arc::new(PgPodcastRepository::new(Arc::new(pool)))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, podcasts are kept in memory and lost on restart");
            Arc::new(InMemoryPodcastRepository::new())
        }
    };

    let blobs: Arc<dyn BlobStore> = Arc::new(LocalBlobStore::new(
        config.audio_storage_dir.clone(),
        config.audio_public_base_url.clone(),
    ));
    tracing::info!(dir = %config.audio_storage_dir.display(), "Local audio storage configured");

    // 2. Instantiate provider clients
    tracing::info!("Instantiating provider clients...");
    let completion: Arc<dyn CompletionRepository> = Arc::new(OpenAiCompletionRepository::new(
        config.completion_api_key.clone(),
        config.completion_api_base.clone(),
        config.completion_model.clone(),
        config.provider_timeout(),
    ));
    let tts: Arc<dyn TtsRepository> = Arc::new(ElevenLabsTtsRepository::new(
        config.speech_api_key.clone(),
        config.speech_api_base.clone(),
        config.speech_model_id.clone(),
        config.provider_timeout(),
    )?);

    // 3. Instantiate services
    tracing::info!("Instantiating services...");
    let pipeline = Arc::new(PodcastPipeline::new(
        completion,
        tts,
        Arc::new(ConcatAssembler),
        records.clone(),
        blobs.clone(),
        VoiceMap::new(
            config.speaker_a_voice_id.clone(),
            config.speaker_b_voice_id.clone(),
        ),
    ));
    let podcast_service = Arc::new(PodcastService::new(pipeline, records, blobs));

    // 4. Instantiate controllers
    tracing::info!("Instantiating controllers...");
    let podcast_controller = Arc::new(PodcastController::new(podcast_service.clone()));

    // Start HTTP server with all routes
    let app = build_router(
        podcast_service,
        podcast_controller,
        AudioFiles::from_config(&config),
    );
    start_http_server(config, app).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "podcast_backend=debug,tower_http=debug".into());

    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
