//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use ludo_core::clock::Clock;
use ludo_core::rng::DeterministicRng;
use ludo_test_support::{FixedClock, SequenceRng};
use serde_json::Value;
use tokio::sync::mpsc::UnboundedReceiver;
use tower::ServiceExt;

use ludo_api::routes;
use ludo_api::state::AppState;

/// Fixed timestamp used across all integration tests.
fn fixed_clock() -> Arc<dyn Clock + Send + Sync> {
    Arc::new(FixedClock(
        chrono::TimeZone::with_ymd_and_hms(&chrono::Utc, 2026, 1, 15, 10, 0, 0).unwrap(),
    ))
}

/// Build application state with a fixed clock, scripted dice and no delay
/// before automatic passes.
pub fn test_state(rng: SequenceRng) -> AppState {
    let rng: Arc<Mutex<dyn DeterministicRng + Send>> = Arc::new(Mutex::new(rng));
    AppState::new(fixed_clock(), rng, Duration::ZERO)
}

/// Build the full app router over `state`. Uses the same route structure as
/// `main.rs`.
pub fn build_test_app(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .merge(routes::ws::router())
        .nest("/api/v1/rooms", routes::rooms::router())
        .with_state(state)
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Wait for the next outbound frame on a player's channel.
pub async fn next_frame(rx: &mut UnboundedReceiver<String>) -> Value {
    let frame = tokio::time::timeout(Duration::from_secs(1), rx.recv())
        .await
        .expect("timed out waiting for a frame")
        .expect("channel closed");
    serde_json::from_str(&frame).unwrap()
}

/// Collect the `type` of every frame already queued on a channel.
pub fn drain_types(rx: &mut UnboundedReceiver<String>) -> Vec<String> {
    let mut types = Vec::new();
    while let Ok(frame) = rx.try_recv() {
        let json: Value = serde_json::from_str(&frame).unwrap();
        types.push(json["type"].as_str().unwrap_or_default().to_string());
    }
    types
}
