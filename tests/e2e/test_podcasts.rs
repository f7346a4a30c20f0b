use crate::e2e::helpers;

use helpers::{
    providers::{mock_audio_bytes, FakeCompletion, FakeTts, OCEAN_SCRIPT, SUMMARY},
    TestContext, TestProviders, ALEX_VOICE, EVAN_VOICE,
};
use hyper::StatusCode;
use podcast_backend::domain::podcast::{GeneratePodcastResponse, GenerationStatus, PodcastError};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use test_context::test_context;
use uuid::Uuid;

fn id_of(body: &Value) -> Uuid {
    body["podcast"]["id"]
        .as_str()
        .and_then(|id| Uuid::parse_str(id).ok())
        .expect("Missing podcast id")
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_generate_a_complete_podcast(ctx: &TestContext) {
    let response = ctx
        .client
        .post("/api/podcasts", &json!({ "topic": "  ocean conservation  " }))
        .await
        .unwrap();

    response.assert_status(StatusCode::CREATED);

    let body: GeneratePodcastResponse = response.json().unwrap();
    assert_eq!(body.status, GenerationStatus::Complete);
    assert_eq!(body.failure, None);
    assert_eq!(body.ignored_lines, 1);
    assert_eq!(body.podcast.topic, "ocean conservation");
    assert_eq!(body.podcast.script, OCEAN_SCRIPT);
    assert_eq!(body.podcast.summary.as_deref(), Some(SUMMARY));

    let location = format!("/audio/{}.mp3", body.podcast.id);
    assert_eq!(body.podcast.audio_location.as_deref(), Some(location.as_str()));

    // Three segments, in script order, alternating voices
    let voices: Vec<String> = ctx.tts.calls().into_iter().map(|(_, voice)| voice).collect();
    assert_eq!(voices, vec![ALEX_VOICE, EVAN_VOICE, ALEX_VOICE]);

    // Stored audio is the in-order concatenation of every chunk
    let expected: Vec<u8> = (1..=3).flat_map(mock_audio_bytes).collect();
    assert_eq!(ctx.fixtures.stored_audio(body.podcast.id), Some(expected.clone()));

    // ... and is served at its public location
    let audio = ctx.client.get(&location).await.unwrap();
    audio.assert_status(StatusCode::OK);
    assert_eq!(audio.body_bytes, expected);
}

#[tokio::test]
async fn it_should_keep_the_script_when_synthesis_is_rate_limited() {
    let ctx = TestContext::with_providers(TestProviders {
        tts: FakeTts::failing_at(2, PodcastError::RateLimited("429 Too Many Requests".to_string())),
        ..TestProviders::default()
    })
    .await
    .unwrap();

    let response = ctx
        .client
        .post("/api/podcasts", &json!({ "topic": "ocean conservation" }))
        .await
        .unwrap();

    // Partial success is still a created record
    response.assert_status(StatusCode::CREATED);

    let body = response.body.as_ref().unwrap();
    assert_eq!(body["status"], "audio_failed");
    assert_eq!(body["failure"]["stage"], "audio");
    assert_eq!(body["failure"]["code"], "RATE_LIMITED");
    assert_eq!(body["failure"]["reason"], "rate_limited");
    assert!(!body["failure"]["message"].as_str().unwrap().contains("429"));
    assert!(body["podcast"].get("audio_location").is_none());

    // Segment 3 is never attempted
    assert_eq!(ctx.tts.calls().len(), 2);

    let id = id_of(body);
    let fetched = ctx.client.get(&format!("/api/podcasts/{}", id)).await.unwrap();
    fetched.assert_status(StatusCode::OK);
    let fetched = fetched.body.as_ref().unwrap();
    assert_eq!(fetched["script"], OCEAN_SCRIPT);
    assert!(fetched.get("audio_location").is_none());
    assert_eq!(ctx.fixtures.stored_audio(id), None);
}

#[tokio::test]
async fn it_should_report_scripts_without_dialogue() {
    let ctx = TestContext::with_providers(TestProviders {
        completion: FakeCompletion::replying("Narrator: once upon a time\n\nThe end."),
        ..TestProviders::default()
    })
    .await
    .unwrap();

    let response = ctx
        .client
        .post("/api/podcasts", &json!({ "topic": "fairy tales" }))
        .await
        .unwrap();

    response.assert_status(StatusCode::CREATED);
    let body = response.body.as_ref().unwrap();
    assert_eq!(body["status"], "audio_failed");
    assert_eq!(body["failure"]["code"], "NO_DIALOGUE_FOUND");
    assert_eq!(body["failure"]["reason"], "malformed_input");
    assert_eq!(body["ignored_lines"], 2);
    assert!(ctx.tts.calls().is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_blank_topic(ctx: &TestContext) {
    let response = ctx
        .client
        .post("/api/podcasts", &json!({ "topic": "   " }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_code("VALIDATION_ERROR");

    let listed = ctx.client.get("/api/podcasts").await.unwrap();
    assert_eq!(listed.body, Some(json!([])));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_missing_topic(ctx: &TestContext) {
    let response = ctx.client.post("/api/podcasts", &json!({})).await.unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_code("VALIDATION_ERROR");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_overlong_topic(ctx: &TestContext) {
    let topic = "a".repeat(501);
    let response = ctx
        .client
        .post("/api/podcasts", &json!({ "topic": topic }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_code("VALIDATION_ERROR");
}

#[tokio::test]
async fn it_should_name_missing_configuration() {
    let ctx = TestContext::with_providers(TestProviders {
        completion: FakeCompletion::unconfigured(),
        ..TestProviders::default()
    })
    .await
    .unwrap();

    let response = ctx
        .client
        .post("/api/podcasts", &json!({ "topic": "ocean conservation" }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::SERVICE_UNAVAILABLE)
        .assert_error_code("CONFIGURATION_MISSING");

    let body = response.body.as_ref().unwrap();
    assert_eq!(body["reason"], "configuration_missing");
    assert_eq!(body["stage"], "script");
    assert!(body["message"].as_str().unwrap().contains("COMPLETION_API_KEY"));
}

#[tokio::test]
async fn it_should_classify_rejected_credentials() {
    let ctx = TestContext::with_providers(TestProviders {
        completion: FakeCompletion::failing(PodcastError::ProviderAuth(
            "Incorrect API key provided: sk-live-123".to_string(),
        )),
        ..TestProviders::default()
    })
    .await
    .unwrap();

    let response = ctx
        .client
        .post("/api/podcasts", &json!({ "topic": "ocean conservation" }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_GATEWAY)
        .assert_error_code("PROVIDER_AUTH_ERROR");

    let body = response.body.as_ref().unwrap();
    assert_eq!(body["reason"], "authentication_invalid");
    assert!(!response.text().contains("sk-live-123"));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_list_most_recent_first(ctx: &TestContext) {
    for topic in ["first", "second", "third"] {
        ctx.fixtures.create_podcast(topic, "ALEX: hi").await.unwrap();
    }

    let response = ctx.client.get("/api/podcasts").await.unwrap();
    response.assert_status(StatusCode::OK);

    let topics: Vec<&str> = response
        .body
        .as_ref()
        .unwrap()
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["topic"].as_str().unwrap())
        .collect();
    assert_eq!(topics, vec!["third", "second", "first"]);

    let limited = ctx.client.get("/api/podcasts?limit=2").await.unwrap();
    assert_eq!(limited.body.as_ref().unwrap().as_array().unwrap().len(), 2);

    let clamped = ctx.client.get("/api/podcasts?limit=0").await.unwrap();
    assert_eq!(clamped.body.as_ref().unwrap().as_array().unwrap().len(), 1);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_not_found_for_unknown_podcast(ctx: &TestContext) {
    let response = ctx
        .client
        .get(&format!("/api/podcasts/{}", Uuid::new_v4()))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::NOT_FOUND)
        .assert_error_code("NOT_FOUND");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_malformed_podcast_id(ctx: &TestContext) {
    let response = ctx.client.get("/api/podcasts/not-a-uuid").await.unwrap();

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_delete_podcast_and_audio(ctx: &TestContext) {
    let created = ctx
        .client
        .post("/api/podcasts", &json!({ "topic": "ocean conservation" }))
        .await
        .unwrap();
    let id = id_of(created.body.as_ref().unwrap());
    assert!(ctx.fixtures.stored_audio(id).is_some());

    let response = ctx.client.delete(&format!("/api/podcasts/{}", id)).await.unwrap();
    response.assert_status(StatusCode::NO_CONTENT);

    assert_eq!(ctx.fixtures.stored_audio(id), None);
    ctx.client
        .get(&format!("/api/podcasts/{}", id))
        .await
        .unwrap()
        .assert_status(StatusCode::NOT_FOUND);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_delete_podcast_whose_audio_is_missing(ctx: &TestContext) {
    let record = ctx
        .fixtures
        .create_podcast("ocean conservation", OCEAN_SCRIPT)
        .await
        .unwrap();

    let response = ctx
        .client
        .delete(&format!("/api/podcasts/{}", record.id))
        .await
        .unwrap();

    response.assert_status(StatusCode::NO_CONTENT);
    assert!(ctx.fixtures.find_podcast(record.id).await.is_none());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_not_found_when_deleting_unknown_podcast(ctx: &TestContext) {
    let response = ctx
        .client
        .delete(&format!("/api/podcasts/{}", Uuid::new_v4()))
        .await
        .unwrap();

    response.assert_status(StatusCode::NOT_FOUND);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_resume_audio_for_saved_script(ctx: &TestContext) {
    let record = ctx
        .fixtures
        .create_podcast("ocean conservation", "ALEX: Hello.\nEVAN: Hi.")
        .await
        .unwrap();

    let response = ctx
        .client
        .post_empty(&format!("/api/podcasts/{}/audio", record.id))
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    let body: GeneratePodcastResponse = response.json().unwrap();
    assert_eq!(body.status, GenerationStatus::Complete);
    assert_eq!(ctx.tts.calls().len(), 2);

    let stored = ctx.fixtures.find_podcast(record.id).await.unwrap();
    assert_eq!(stored.audio_location, body.podcast.audio_location);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_not_found_when_resuming_unknown_podcast(ctx: &TestContext) {
    let response = ctx
        .client
        .post_empty(&format!("/api/podcasts/{}/audio", Uuid::new_v4()))
        .await
        .unwrap();

    response.assert_status(StatusCode::NOT_FOUND);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_stream_pipeline_states(ctx: &TestContext) {
    let response = ctx
        .client
        .post_event_stream("/api/podcasts/stream", &json!({ "topic": "ocean conservation" }))
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert!(response
        .header("content-type")
        .unwrap()
        .starts_with("text/event-stream"));

    let states = response.sse_events("state");
    let names: Vec<&str> = states.iter().filter_map(|s| s["state"].as_str()).collect();
    assert_eq!(
        names,
        vec![
            "script_pending",
            "script_ready",
            "audio_pending",
            "audio_pending",
            "audio_pending",
            "audio_pending",
            "complete",
        ]
    );

    // Progress counts every synthesized segment
    let completed: Vec<u64> = states[2..6]
        .iter()
        .filter_map(|s| s["completed"].as_u64())
        .collect();
    assert_eq!(completed, vec![0, 1, 2, 3]);
    assert!(states[2..6].iter().all(|s| s["total"] == 3));

    // The record id is handed out as soon as the script is saved
    let id = states[1]["record_id"].as_str().and_then(|id| Uuid::parse_str(id).ok()).unwrap();
    assert_eq!(states[6]["record_id"], states[1]["record_id"]);
    assert!(ctx.fixtures.stored_audio(id).is_some());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_blank_topic_before_streaming(ctx: &TestContext) {
    let response = ctx
        .client
        .post_event_stream("/api/podcasts/stream", &json!({ "topic": "" }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_code("VALIDATION_ERROR");
}
