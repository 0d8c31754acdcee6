//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use fireside_api::state::AppState;
use fireside_dice::KarmicDice;
use fireside_hub::Hub;
use fireside_session::{SessionContext, SessionRegistry};
use fireside_test_support::{FixedClock, RecordingSpeech, ScriptedNarrator, SequenceRng};
use http_body_util::BodyExt;
use tower::ServiceExt;
use uuid::Uuid;

/// A fully wired app with scripted collaborators.
pub struct TestApp {
    pub router: Router,
    pub registry: Arc<SessionRegistry>,
    pub narrator: Arc<ScriptedNarrator>,
    pub speech: Arc<RecordingSpeech>,
    pub audio_dir: PathBuf,
}

/// Build the full app router with a narrator that answers
/// `"narration <n>"`. Uses the same route structure as `main.rs`.
pub fn build_test_app() -> TestApp {
    build_test_app_with(ScriptedNarrator::new())
}

/// Build the full app router around `narrator`.
pub fn build_test_app_with(narrator: ScriptedNarrator) -> TestApp {
    let (hub, _task) = Hub::spawn();
    let narrator = Arc::new(narrator);
    let speech = Arc::new(RecordingSpeech::new());
    let context = SessionContext::new(
        hub,
        narrator.clone(),
        speech.clone(),
        Arc::new(KarmicDice::new(SequenceRng::new(vec![5]))),
        Arc::new(FixedClock::default()),
    );
    let registry = Arc::new(SessionRegistry::new(context));
    let audio_dir = std::env::temp_dir().join(format!("fireside-test-{}", Uuid::new_v4()));
    std::fs::create_dir_all(&audio_dir).unwrap();
    let router = fireside_api::app(AppState::new(Arc::clone(&registry)), &audio_dir);

    TestApp {
        router,
        registry,
        narrator,
        speech,
        audio_dir,
    }
}

/// Send a request and return status, headers and raw body.
pub async fn send(
    app: Router,
    method: &str,
    uri: &str,
) -> (StatusCode, HeaderMap, Vec<u8>) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.into_body().collect().await.unwrap().to_bytes();

    (status, headers, body.to_vec())
}

/// Send a GET request and return the response as JSON.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let (status, _, body) = send(app, "GET", uri).await;
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    (status, json)
}

/// Serve the app on an ephemeral local port.
pub async fn spawn_server(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
    addr
}
