use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;

use crate::domain::podcast::{PodcastService, PodcastServiceApi};

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Ready when the record store answers; provider configuration is reported but not required
pub async fn health_ready(State(service): State<Arc<PodcastService>>) -> impl IntoResponse {
    let readiness = service.readiness().await;
    let providers = if readiness.providers_configured {
        "configured"
    } else {
        "missing"
    };

    if readiness.database {
        (
            StatusCode::OK,
            Json(json!({
                "status": "ready",
                "database": "connected",
                "providers": providers
            })),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "not_ready",
                "database": "disconnected",
                "providers": providers
            })),
        )
    }
}
