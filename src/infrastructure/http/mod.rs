use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::controllers::{health, podcast::PodcastController};
use crate::domain::podcast::PodcastService;
use crate::infrastructure::config::Config;
use crate::infrastructure::request_id::request_id_middleware;

/// Stored audio served as static files
#[derive(Debug, Clone)]
pub struct AudioFiles {
    /// Route prefix, e.g. `/audio`
    pub route: String,
    pub dir: PathBuf,
}

impl AudioFiles {
    /// Only a path-style public base URL can be served from this process
    pub fn from_config(config: &Config) -> Option<Self> {
        let route = config.audio_public_base_url.trim_end_matches('/');
        if !route.starts_with('/') || route.len() < 2 {
            return None;
        }
        Some(Self {
            route: route.to_string(),
            dir: config.audio_storage_dir.clone(),
        })
    }
}

/// Build the application router with all routes configured
pub fn build_router(
    podcast_service: Arc<PodcastService>,
    podcast_controller: Arc<PodcastController>,
    audio_files: Option<AudioFiles>,
) -> Router {
    let podcast_routes = Router::new()
        .route(
            "/api/podcasts",
            get(PodcastController::list).post(PodcastController::generate),
        )
        .route("/api/podcasts/stream", post(PodcastController::generate_stream))
        .route(
            "/api/podcasts/:id",
            get(PodcastController::get).delete(PodcastController::delete),
        )
        .route("/api/podcasts/:id/audio", post(PodcastController::resume_audio))
        .with_state(podcast_controller);

    let mut app = Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::health_ready))
        .with_state(podcast_service)
        .merge(podcast_routes);

    if let Some(audio) = audio_files {
        app = app.nest_service(&audio.route, ServeDir::new(audio.dir));
    }

    app.layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
}

/// Start the HTTP server
pub async fn start_http_server(config: Arc<Config>, app: Router) -> anyhow::Result<()> {
    let app = if config.is_development() {
        app.layer(CorsLayer::permissive())
    } else {
        app
    };

    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
