//! Ludo room server entry point.

use std::error::Error;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::Router;
use ludo_core::clock::{Clock, SystemClock};
use ludo_core::rng::{DeterministicRng, SystemRng};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use ludo_api::config::ServerConfig;
use ludo_api::state::AppState;
use ludo_api::{routes, session, telemetry};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Read configuration from environment.
    let config = ServerConfig::from_env()?;

    // Initialize tracing subscriber.
    let tracer_provider = telemetry::init(config.otlp_endpoint.as_deref())?;

    tracing::info!("Starting Ludo room server");

    // Build application state.
    let clock: Arc<dyn Clock + Send + Sync> = Arc::new(SystemClock);
    let rng: Arc<Mutex<dyn DeterministicRng + Send>> =
        Arc::new(Mutex::new(SystemRng::from_entropy()));
    let app_state = AppState::new(clock, rng, config.pass_turn_delay);

    // Sweep stale rooms in the background.
    let sweep_state = app_state.clone();
    let sweep_interval = config.room_sweep_interval;
    let room_max_age = config.room_max_age;
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(sweep_interval);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            match session::sweep_stale_rooms(&sweep_state, room_max_age) {
                Ok(0) => {}
                Ok(removed) => tracing::info!(removed, "swept stale rooms"),
                Err(e) => tracing::warn!(error = %e, "room sweep failed"),
            }
        }
    });

    // Build router.
    // TODO: Replace CorsLayer::permissive() with restricted origins for production.
    let app = Router::new()
        .merge(routes::health::router())
        .merge(routes::ws::router())
        .nest("/api/v1/rooms", routes::rooms::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server.
    let addr: SocketAddr = config
        .bind_address()
        .parse()
        .map_err(|e| format!("invalid HOST:PORT combination: {e}"))?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    telemetry::shutdown(tracer_provider);

    Ok(())
}
