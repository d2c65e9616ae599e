//! Tracing subscriber setup.
//!
//! Logs are JSON on stdout, filtered by `RUST_LOG` (default `info`). When an
//! OTLP endpoint is configured, spans are also exported over gRPC.

use opentelemetry::trace::TracerProvider as _;
use opentelemetry_otlp::{SpanExporter, WithExportConfig};
use opentelemetry_sdk::Resource;
use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::error::AppError;

const SERVICE_NAME: &str = "ludo-api";

/// Installs the global subscriber. Returns the tracer provider when span
/// export is on; call [`shutdown`] with it before exiting to flush.
///
/// # Errors
///
/// Returns `AppError::Telemetry` if the exporter cannot be built or a global
/// subscriber is already installed.
pub fn init(otlp_endpoint: Option<&str>) -> Result<Option<SdkTracerProvider>, AppError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let provider = otlp_endpoint.map(build_provider).transpose()?;
    let otel_layer = provider
        .as_ref()
        .map(|p| tracing_opentelemetry::layer().with_tracer(p.tracer(SERVICE_NAME)));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().json())
        .with(otel_layer)
        .try_init()
        .map_err(|e| AppError::Telemetry(e.to_string()))?;

    Ok(provider)
}

fn build_provider(endpoint: &str) -> Result<SdkTracerProvider, AppError> {
    let exporter = SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()
        .map_err(|e| AppError::Telemetry(format!("failed to build span exporter: {e}")))?;

    Ok(SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_resource(Resource::builder().with_service_name(SERVICE_NAME).build())
        .build())
}

/// Flushes and stops span export.
pub fn shutdown(provider: Option<SdkTracerProvider>) {
    if let Some(provider) = provider
        && let Err(e) = provider.shutdown()
    {
        tracing::warn!(error = %e, "tracer provider shutdown failed");
    }
}
