use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use futures::stream::{self, Stream};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::podcast::{
        GeneratePodcastRequest, GeneratePodcastResponse, GenerationHandle, ListPodcastsQuery,
        PodcastResponse, PodcastService, PodcastServiceApi,
    },
    error::AppResult,
};

pub struct PodcastController {
    podcast_service: Arc<PodcastService>,
}

impl PodcastController {
    pub fn new(podcast_service: Arc<PodcastService>) -> Self {
        Self { podcast_service }
    }

    /// POST /api/podcasts - Generate script and audio for a topic
    ///
    /// Audio failures still return 201: the record exists and carries its script.
    pub async fn generate(
        State(controller): State<Arc<PodcastController>>,
        Json(request): Json<GeneratePodcastRequest>,
    ) -> AppResult<(StatusCode, Json<GeneratePodcastResponse>)> {
        let outcome = controller.podcast_service.generate(&request.topic).await?;

        Ok((StatusCode::CREATED, Json(outcome.into())))
    }

    /// POST /api/podcasts/stream - Generate while streaming every pipeline state
    ///
    /// Closing the stream before a terminal state cancels the run.
    pub async fn generate_stream(
        State(controller): State<Arc<PodcastController>>,
        Json(request): Json<GeneratePodcastRequest>,
    ) -> AppResult<Sse<impl Stream<Item = Result<Event, axum::Error>>>> {
        let GenerationHandle {
            progress, cancel, ..
        } = controller.podcast_service.start_generation(&request.topic)?;

        // The guard cancels the run if the client goes away before a terminal state
        let events = stream::unfold(
            (progress, Some(cancel.drop_guard())),
            |(mut progress, guard)| async move {
                let guard = guard?;
                let state = progress.recv().await?;
                let event = Event::default().event("state").json_data(&state);

                let guard = if state.is_terminal() {
                    guard.disarm();
                    None
                } else {
                    Some(guard)
                };
                Some((event, (progress, guard)))
            },
        );

        Ok(Sse::new(events).keep_alive(KeepAlive::default()))
    }

    /// GET /api/podcasts - Most recent podcasts first
    pub async fn list(
        State(controller): State<Arc<PodcastController>>,
        Query(query): Query<ListPodcastsQuery>,
    ) -> AppResult<Json<Vec<PodcastResponse>>> {
        let podcasts = controller.podcast_service.list(query.limit).await?;

        Ok(Json(podcasts.into_iter().map(PodcastResponse::from).collect()))
    }

    /// GET /api/podcasts/:id
    pub async fn get(
        State(controller): State<Arc<PodcastController>>,
        Path(id): Path<Uuid>,
    ) -> AppResult<Json<PodcastResponse>> {
        let podcast = controller.podcast_service.get(id).await?;

        Ok(Json(podcast.into()))
    }

    /// POST /api/podcasts/:id/audio - Retry audio production for a saved script
    pub async fn resume_audio(
        State(controller): State<Arc<PodcastController>>,
        Path(id): Path<Uuid>,
    ) -> AppResult<Json<GeneratePodcastResponse>> {
        let outcome = controller.podcast_service.resume_audio(id).await?;

        Ok(Json(outcome.into()))
    }

    /// DELETE /api/podcasts/:id
    pub async fn delete(
        State(controller): State<Arc<PodcastController>>,
        Path(id): Path<Uuid>,
    ) -> AppResult<StatusCode> {
        controller.podcast_service.delete(id).await?;

        Ok(StatusCode::NO_CONTENT)
    }
}
