//! Tracing subscriber and Prometheus exporter setup.
//!
//! `RUST_LOG` takes precedence over `logger.level` from the config file.

mod config;

use std::net::SocketAddr;

pub(crate) use config::{LogFormat, LoggerConfig, TelemetryConfig, TelemetryMetricsConfig};
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub(crate) fn initialize(logger_config: &LoggerConfig, telemetry_config: &TelemetryConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logger_config.level));

    let registry = tracing_subscriber::registry().with(filter);
    match logger_config.format {
        LogFormat::Pretty => registry
            .with(fmt::layer().with_target(true).with_thread_ids(false))
            .init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(true))
            .init(),
    }

    initialize_metrics(&telemetry_config.metrics);
}

fn initialize_metrics(metrics_config: &TelemetryMetricsConfig) {
    if !metrics_config.enabled {
        tracing::info!("Prometheus metrics exporter disabled");
        return;
    }

    let bind_address: SocketAddr = match metrics_config.bind_address.parse() {
        Ok(address) => address,
        Err(error) => {
            tracing::warn!(
                bind_address = %metrics_config.bind_address,
                error = %error,
                "Invalid metrics bind address; metrics exporter disabled"
            );
            return;
        }
    };

    if let Err(error) = PrometheusBuilder::new()
        .with_http_listener(bind_address)
        .install()
    {
        tracing::warn!(
            bind_address = %bind_address,
            error = %error,
            "Failed to initialize Prometheus metrics exporter"
        );
        return;
    }

    tracing::info!(bind_address = %bind_address, "Prometheus metrics exporter enabled");
}
