//! Global tracing subscriber wiring.
//!
//! The server always logs through a structured `fmt` layer. When span
//! export is requested, a `tracing-opentelemetry` bridge is layered on
//! top with a stdout exporter -- enough for local inspection, and the
//! exporter is the only thing to swap for OTLP in a real deployment.

use std::sync::OnceLock;

use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Held so the exporter can be flushed on shutdown.
static TRACER_PROVIDER: OnceLock<SdkTracerProvider> = OnceLock::new();

/// Install the global subscriber.
///
/// `default_filter` applies when `RUST_LOG` is unset (the environment
/// always wins). Fails if a subscriber is already registered.
pub fn init_tracing(
    default_filter: &str,
    export_spans: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE);

    if export_spans {
        let provider = SdkTracerProvider::builder()
            .with_simple_exporter(opentelemetry_stdout::SpanExporter::default())
            .build();
        let otel_layer =
            tracing_opentelemetry::layer().with_tracer(provider.tracer("leadgate"));

        let _ = TRACER_PROVIDER.set(provider.clone());
        opentelemetry::global::set_tracer_provider(provider);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .init();
    }

    Ok(())
}

/// Flush buffered spans. Safe to call when span export was never enabled.
pub fn shutdown_tracing() {
    if let Some(provider) = TRACER_PROVIDER.get() {
        if let Err(e) = provider.shutdown() {
            eprintln!("Warning: tracer provider shutdown error: {e}");
        }
    }
}
